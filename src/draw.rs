// Drawing primitives for charts, working from a computed ChartLayout

use crate::chart::PointStyle;
use crate::error::Result;
use crate::layout::{ChartLayout, LEGEND_PADDING};
use crate::surface::{Paint, Rect, Stroke, Surface, TextAlign};
use crate::table::DataTable;
use plotters::style::{RGBColor, BLACK, WHITE};

/// Dash length of mean-value lines
const MEAN_LINE_DASH: f64 = 7.0;
/// Dash length of horizontal gridlines
const GRID_DASH: f64 = 2.0;
/// Half length of the y-axis tick marks
const Y_TICK_HALF_LENGTH: f64 = 5.0;
const X_TICK_LENGTH: f64 = 7.0;
const LABEL_ANGLE: f64 = 45.0;

/// Issues drawing primitives onto a surface.
///
/// All positions come from the layout; the painter only converts them into
/// surface calls.
pub struct Painter<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    layout: &'a ChartLayout,
}

impl<'a, S: Surface + ?Sized> Painter<'a, S> {
    pub fn new(surface: &'a mut S, layout: &'a ChartLayout) -> Self {
        Painter { surface, layout }
    }

    pub fn layout(&self) -> &'a ChartLayout {
        self.layout
    }

    pub fn background(&mut self) -> Result<()> {
        let rect = Rect::new(0.0, 0.0, self.layout.width as f64, self.layout.height as f64);
        self.surface.fill_rect(rect, &Paint::Solid(WHITE))
    }

    /// Bar standing on the x-axis, fading from `color` to white downwards
    pub fn bar(&mut self, x_center: f64, width: f64, bar_height: f64, color: RGBColor) -> Result<()> {
        if bar_height <= 0.0 {
            return Ok(());
        }
        let paint = Paint::VerticalGradient {
            from: color,
            to: WHITE,
            start_y: self.layout.border_top as f64,
            end_y: 2.0 * self.layout.chart_height as f64,
        };
        let rect = Rect::new(
            x_center - 0.5 * width,
            self.layout.chart_bottom as f64 - bar_height,
            width,
            bar_height,
        );
        self.surface.fill_rect(rect, &paint)
    }

    /// Marker centered on `(x, y)`, half a line high
    pub fn point(&mut self, x: f64, y: f64, color: RGBColor, style: PointStyle) -> Result<()> {
        let quarter = self.layout.line_height as f64 / 4.0;
        let rect = Rect::new(x - quarter, y - quarter, 2.0 * quarter, 2.0 * quarter);
        match style {
            PointStyle::Circle => self.surface.fill_ellipse(rect, color),
            PointStyle::Square => self.surface.fill_rect(rect, &Paint::Solid(color)),
        }
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: RGBColor) -> Result<()> {
        self.surface.draw_line(from, to, &Stroke::solid(color))
    }

    /// Text whose vertical middle is at `y`, centered on `x`
    pub fn centered_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.text(text, x, y, TextAlign::Center)
    }

    /// Text whose vertical middle is at `y`, ending at `x`
    pub fn right_aligned_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.text(text, x, y, TextAlign::Right)
    }

    /// Text whose vertical middle is at `y`, starting at `x`
    pub fn left_aligned_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.text(text, x, y, TextAlign::Left)
    }

    fn text(&mut self, text: &str, x: f64, y: f64, align: TextAlign) -> Result<()> {
        let baseline = y + 0.5 * self.layout.ascent as f64 - 1.0;
        self.surface.draw_text(text, (x, baseline), align, BLACK)
    }

    /// Right-aligned text turned 45° counter-clockwise about `(x, y)`.
    /// The surface frame is back to normal when this returns.
    pub fn rotated_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.surface.rotate(-LABEL_ANGLE, (x, y));
        let drawn = self.right_aligned_text(text, x, y);
        self.surface.rotate(LABEL_ANGLE, (x, y));
        drawn
    }

    /// Dashed line across the chart at `offset` pixels above the x-axis
    pub fn mean_line(&mut self, offset: f64, color: RGBColor) -> Result<()> {
        let y = self.layout.chart_bottom as f64 - offset;
        self.surface.draw_line(
            (self.layout.border_left as f64, y),
            (self.layout.right_edge(), y),
            &Stroke::dashed(color, MEAN_LINE_DASH, MEAN_LINE_DASH),
        )
    }

    /// Value axis with gridlines, tick marks and numbers
    pub fn y_axis(&mut self) -> Result<()> {
        let layout = self.layout;
        let left = layout.border_left as f64;
        let solid = Stroke::solid(BLACK);
        let grid = Stroke::dashed(BLACK, GRID_DASH, GRID_DASH);

        self.surface.draw_line(
            (left, layout.chart_bottom as f64),
            (left, layout.border_top as f64),
            &solid,
        )?;

        for (i, label) in layout.y_scale.ticks.iter().enumerate() {
            let y = layout.y_tick_position(i);
            self.surface.draw_line((left, y), (layout.right_edge(), y), &grid)?;
            self.surface.draw_line(
                (left - Y_TICK_HALF_LENGTH, y),
                (left + Y_TICK_HALF_LENGTH, y),
                &solid,
            )?;
            self.right_aligned_text(label, left - layout.line_height as f64, y)?;
        }
        Ok(())
    }

    /// Category axis with one tick per category and its label
    pub fn x_axis(&mut self) -> Result<()> {
        let layout = self.layout;
        let bottom = layout.chart_bottom as f64;
        let solid = Stroke::solid(BLACK);

        self.surface.draw_line(
            (layout.border_left as f64, bottom),
            (layout.right_edge(), bottom),
            &solid,
        )?;

        let label_y = bottom + layout.line_height as f64;
        for (i, label) in layout.x_ticks.iter().enumerate() {
            let x = layout.category_center(i);
            self.surface.draw_line((x, bottom + X_TICK_LENGTH), (x, bottom), &solid)?;

            if layout.rotate_x_labels {
                if i % layout.x_label_step == 0 {
                    self.rotated_text(label, x, label_y)?;
                }
            } else {
                self.centered_text(label, x, label_y)?;
            }
        }
        Ok(())
    }

    /// Boxed legend with a swatch and the name of every row, placed exactly
    /// where the layout planned each entry
    pub fn legend(&mut self, table: &DataTable, style: PointStyle) -> Result<()> {
        let layout = self.layout;
        let Some(legend) = layout.legend.as_ref() else {
            return Ok(());
        };

        let left = (layout.width / 2 - legend.width / 2) as f64;
        let top = (layout.height - legend.height - LEGEND_PADDING) as f64;
        self.frame(Rect::new(left, top, legend.width as f64, legend.height as f64))?;

        let line_height = layout.line_height as f64;
        let first_line_y = (layout.height - legend.height + layout.line_height / 2) as f64;
        for entry in &legend.entries {
            let Some(row) = table.row(entry.row) else {
                continue;
            };
            let x = left + entry.x_offset as f64;
            let y = first_line_y + entry.line as f64 * line_height;
            let color = layout.colors[entry.row];

            self.point(x + line_height / 2.0, y, color, style)?;
            self.left_aligned_text(row.name(), x + line_height, y)?;
        }
        Ok(())
    }

    pub fn title(&mut self, title: &str) -> Result<()> {
        let layout = self.layout;
        self.centered_text(title, (layout.width / 2) as f64, (layout.border_top / 2) as f64)
    }

    /// Unit text centered above the legend box
    pub fn unit_label(&mut self, unit: &str) -> Result<()> {
        let layout = self.layout;
        let y = layout.height - layout.legend_height() - LEGEND_PADDING + layout.line_height / 2;
        self.centered_text(unit, (layout.width / 2) as f64, y as f64)
    }

    fn frame(&mut self, rect: Rect) -> Result<()> {
        let stroke = Stroke::solid(BLACK);
        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ];
        for i in 0..corners.len() {
            self.surface.draw_line(corners[i], corners[(i + 1) % corners.len()], &stroke)?;
        }
        Ok(())
    }
}
