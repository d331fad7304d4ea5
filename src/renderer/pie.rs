// Pie chart of the first table row, drawn with plotters' Pie element

use super::{require_rows, Renderer};
use crate::bitmap::{backend_error, encode_png};
use crate::error::{ChartError, Result};
use crate::palette::ColorPalette;
use crate::table::DataTable;
use image::RgbImage;
use plotters::element::Pie;
use plotters::prelude::*;
use tracing::debug;

/// Renders the first row of a table as a pie chart, encoded as PNG
#[derive(Debug, Clone)]
pub struct PieChartRenderer {
    table: Option<DataTable>,
    width: u32,
    height: u32,
    colors: Option<Vec<RGBColor>>,
}

impl Default for PieChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PieChartRenderer {
    pub fn new() -> Self {
        PieChartRenderer {
            table: None,
            width: 1024,
            height: 768,
            colors: None,
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn set_colors(&mut self, colors: Vec<RGBColor>) {
        self.colors = Some(colors);
    }
}

impl Renderer for PieChartRenderer {
    type Output = Vec<u8>;

    fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    fn render(&mut self) -> Result<Vec<u8>> {
        let table = require_rows(self.table.as_ref())?;
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::Configuration(format!(
                "pie chart size {}x{} is empty",
                self.width, self.height
            )));
        }
        let Some(row) = table.rows().first() else {
            return Err(ChartError::Configuration("table has no rows".to_string()));
        };

        // negative slices cannot be drawn
        let sizes: Vec<f64> = row.values().map(|v| v.max(0.0)).collect();
        let labels: Vec<String> = (0..row.len()).filter_map(|i| row.short_label(i)).collect();
        let palette = match &self.colors {
            Some(colors) => ColorPalette::custom(colors.clone()),
            None => ColorPalette::standard(),
        };
        let colors = palette.assign_colors(sizes.len());
        debug!(slices = sizes.len(), row = row.name(), "rendering pie chart");

        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(backend_error)?;

            let area = if table.name().is_empty() {
                root.clone()
            } else {
                root.titled(table.name(), ("sans-serif", 20)).map_err(backend_error)?
            };

            if sizes.iter().sum::<f64>() > 0.0 {
                let (area_width, area_height) = area.dim_in_pixel();
                let center = (area_width as i32 / 2, area_height as i32 / 2);
                let radius = area_width.min(area_height) as f64 * 0.35;

                let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
                pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
                pie.percentages(("sans-serif", 12).into_font().color(&WHITE));
                area.draw(&pie).map_err(backend_error)?;
            }

            root.present().map_err(backend_error)?;
        }

        let image = RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| ChartError::Backend("pixel buffer does not match the image size".to_string()))?;
        encode_png(&image)
    }
}
