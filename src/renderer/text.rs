// Pipe-delimited plain text table

use super::{require_table, Renderer};
use crate::error::Result;
use crate::format::NumberFormat;
use crate::table::DataTable;

const DELIMITER: &str = " | ";

/// Renders a table as plain text, one line per row
#[derive(Debug, Clone, Default)]
pub struct TextTableRenderer {
    table: Option<DataTable>,
    pattern: Option<String>,
}

impl TextTableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format values with a [`NumberFormat`] pattern instead of the
    /// shortest exact representation
    pub fn set_format_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = Some(pattern.into());
    }
}

impl Renderer for TextTableRenderer {
    type Output = String;

    fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    fn render(&mut self) -> Result<String> {
        let table = require_table(self.table.as_ref())?;
        let format = self.pattern.as_deref().map(NumberFormat::new).transpose()?;
        let Some(first) = table.rows().first() else {
            return Ok(String::new());
        };

        let mut text = String::from(DELIMITER);
        for label in first.labels() {
            text.push_str(label);
            text.push_str(DELIMITER);
        }
        text.push('\n');

        for row in table.rows() {
            text.push_str(row.name());
            text.push_str(DELIMITER);
            for value in row.values() {
                match &format {
                    Some(format) => text.push_str(&format.format(value)),
                    None => text.push_str(&value.to_string()),
                }
                text.push_str(DELIMITER);
            }
            text.push('\n');
        }
        Ok(text)
    }
}
