// Library exports for datachart

pub mod csv_reader;
pub mod error;
pub mod format;
pub mod palette;
pub mod renderer;
pub mod table;

// Chart engine
pub mod bitmap;
pub mod chart;
pub mod draw;
pub mod layout;
pub mod recording;
pub mod scale;
pub mod surface;

pub use chart::{ChartDraw, ChartOptions, ChartType, PointStyle};
pub use error::{ChartError, Result};
pub use format::NumberFormat;
pub use renderer::{ChartRenderer, DebugRenderer, HtmlTableRenderer, PieChartRenderer, Renderer, TextTableRenderer};
pub use table::{DataRow, DataTable};
