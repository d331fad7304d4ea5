// HTML table markup for a DataTable

use super::{require_table, Renderer};
use crate::error::Result;
use crate::format::NumberFormat;
use crate::table::DataTable;
use std::fmt::Write;

pub const DEFAULT_PATTERN: &str = "#";

/// Renders a table as an HTML `<table>` with a header of category labels
#[derive(Debug, Clone)]
pub struct HtmlTableRenderer {
    table: Option<DataTable>,
    pattern: String,
}

impl Default for HtmlTableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlTableRenderer {
    pub fn new() -> Self {
        HtmlTableRenderer {
            table: None,
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }

    /// Number pattern applied to every value, see [`NumberFormat`]
    pub fn set_format_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }
}

impl Renderer for HtmlTableRenderer {
    type Output = String;

    fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    fn render(&mut self) -> Result<String> {
        let table = require_table(self.table.as_ref())?;
        let format = NumberFormat::new(&self.pattern)?;
        let Some(first) = table.rows().first() else {
            return Ok(String::new());
        };

        let mut html = String::new();
        html.push_str("<table cellpadding=\"1px\" cellspacing=\"1px\" class=\"standardTable\">");

        html.push_str("<thead><tr class=\"standardTable_Header\">");
        match table.subname().filter(|s| !s.is_empty()) {
            Some(subname) => {
                let _ = write!(html, "<th class=\"standardTable_Header\">{}</th>", escape(subname));
            }
            None => html.push_str("<th class=\"standardTable_Header\" />"),
        }
        for label in first.labels() {
            let _ = write!(html, "<th class=\"standardTable_Header\">{}</th>", escape(label));
        }
        html.push_str("</tr></thead>");

        html.push_str("<tbody>");
        for row in table.rows() {
            html.push_str("<tr class=\"standardTable_Row1\">");
            let _ = write!(html, "<td class=\"standardTable_Column\">{}</td>", escape(row.name()));
            for value in row.values() {
                let _ = write!(html, "<td class=\"standardTable_Column\">{}</td>", format.format(value));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        Ok(html)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
