// Output renderers for a DataTable

pub mod chart;
pub mod debug;
pub mod html;
pub mod pie;
pub mod text;

pub use chart::ChartRenderer;
pub use debug::DebugRenderer;
pub use html::HtmlTableRenderer;
pub use pie::PieChartRenderer;
pub use text::TextTableRenderer;

use crate::error::{ChartError, Result};
use crate::table::DataTable;

/// Turns a table into one output format.
///
/// The table is handed over with `set_table` and rendered on demand; a
/// renderer can be rendered any number of times.
pub trait Renderer {
    type Output;

    fn set_table(&mut self, table: DataTable);

    fn render(&mut self) -> Result<Self::Output>;
}

pub(crate) fn require_table(table: Option<&DataTable>) -> Result<&DataTable> {
    table.ok_or_else(|| ChartError::Configuration("no data table set, nothing to render".to_string()))
}

pub(crate) fn require_rows(table: Option<&DataTable>) -> Result<&DataTable> {
    let table = require_table(table)?;
    if table.is_empty() {
        return Err(ChartError::Configuration(format!(
            "data table '{}' has no rows",
            table.name()
        )));
    }
    Ok(table)
}
