// Bar and line charts rendered into an RGB bitmap

use super::{require_rows, Renderer};
use crate::bitmap::{encode_png, BitmapSurface};
use crate::chart::{ChartDraw, ChartOptions, ChartType, PointStyle};
use crate::error::{ChartError, Result};
use crate::table::DataTable;
use image::RgbImage;
use plotters::style::RGBColor;
use tracing::debug;

pub const DEFAULT_FONT_SIZE: f64 = 13.0;

/// Renders a table as a bar or line chart
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    table: Option<DataTable>,
    options: ChartOptions,
    show_mean_values: bool,
    font_size: f64,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer {
    pub fn new() -> Self {
        ChartRenderer {
            table: None,
            options: ChartOptions::default(),
            show_mean_values: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.options.width = width;
        self.options.height = height;
    }

    /// Draw the mean line of every row
    pub fn set_show_mean_values(&mut self, show: bool) {
        self.show_mean_values = show;
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.options.chart_type = chart_type;
    }

    pub fn set_point_style(&mut self, point_style: PointStyle) {
        self.options.point_style = point_style;
    }

    pub fn set_colors(&mut self, colors: Vec<RGBColor>) {
        self.options.colors = Some(colors);
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        self.font_size = font_size;
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Render and encode as PNG
    pub fn render_png(&mut self) -> Result<Vec<u8>> {
        let image = self.render()?;
        encode_png(&image)
    }
}

impl Renderer for ChartRenderer {
    type Output = RgbImage;

    fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    fn render(&mut self) -> Result<RgbImage> {
        require_rows(self.table.as_ref())?;
        let show_mean_values = self.show_mean_values;
        let table = self
            .table
            .as_mut()
            .ok_or_else(|| ChartError::Configuration("no data table set, nothing to render".to_string()))?;
        table.show_all_mean_values(show_mean_values);

        let (width, height) = (self.options.width, self.options.height);
        debug!(width, height, rows = table.len(), "rendering chart");

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let mut surface = BitmapSurface::new(&mut buffer, width, height, self.font_size)?;
            ChartDraw::new(self.options.clone()).draw(table, &mut surface)?;
            surface.present()?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Backend("pixel buffer does not match the image size".to_string()))
    }
}
