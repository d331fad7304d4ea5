// Dump of a table as Rust statements that rebuild it

use super::{require_rows, Renderer};
use crate::error::Result;
use crate::table::DataTable;
use std::fmt::Write;

/// Renders a table as code, handy for turning live data into a test fixture
#[derive(Debug, Clone, Default)]
pub struct DebugRenderer {
    table: Option<DataTable>,
}

impl DebugRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugRenderer {
    type Output = String;

    fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    fn render(&mut self) -> Result<String> {
        let table = require_rows(self.table.as_ref())?;

        let mut code = String::new();
        let _ = writeln!(code, "let mut table = DataTable::new({:?});", table.name());
        if let Some(subname) = table.subname() {
            let _ = writeln!(code, "table.set_subname({:?});", subname);
        }
        if let Some(unit) = table.unit_label() {
            let _ = writeln!(code, "table.set_unit_label({:?});", unit);
        }
        if !table.show_in_chart() {
            code.push_str("table.set_show_in_chart(false);\n");
        }
        if !table.show_in_table() {
            code.push_str("table.set_show_in_table(false);\n");
        }
        for row in table.rows() {
            code.push('\n');
            let _ = writeln!(code, "let mut row = DataRow::new({:?});", row.name());
            for (label, value) in row.iter() {
                let _ = writeln!(code, "row.add_value({:?}, {});", label, float_literal(value));
            }
            if row.show_mean_value() {
                code.push_str("row.set_show_mean_value(true);\n");
            }
            if !row.show_point() {
                code.push_str("row.set_show_point(false);\n");
            }
            code.push_str("table.add_row(row);\n");
        }
        Ok(code)
    }
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "f64::NAN".to_string()
    } else if value == f64::INFINITY {
        "f64::INFINITY".to_string()
    } else if value == f64::NEG_INFINITY {
        "f64::NEG_INFINITY".to_string()
    } else {
        format!("{:?}", value)
    }
}
