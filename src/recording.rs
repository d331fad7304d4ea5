// In-memory surface that records every primitive it receives

use crate::error::Result;
use crate::surface::{Affine, EstimatedMetrics, Paint, Point, Rect, Stroke, Surface, TextAlign, TextMetrics};
use plotters::style::RGBColor;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    FillEllipse {
        rect: Rect,
        color: RGBColor,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Text {
        text: String,
        pos: Point,
        align: TextAlign,
        color: RGBColor,
        /// Frame rotation in effect when the text was drawn
        rotation: f64,
    },
    Rotate {
        degrees: f64,
        about: Point,
    },
}

/// Surface that keeps a log of drawing calls instead of rasterising them.
///
/// Measures text with [`EstimatedMetrics`] unless other metrics are supplied.
#[derive(Debug, Clone)]
pub struct RecordingSurface<M = EstimatedMetrics> {
    metrics: M,
    ops: Vec<DrawOp>,
    transform: Affine,
    rotation: f64,
}

impl RecordingSurface<EstimatedMetrics> {
    pub fn new() -> Self {
        Self::with_metrics(EstimatedMetrics::default())
    }
}

impl Default for RecordingSurface<EstimatedMetrics> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TextMetrics> RecordingSurface<M> {
    pub fn with_metrics(metrics: M) -> Self {
        RecordingSurface {
            metrics,
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            rotation: 0.0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Current frame transform
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// All recorded texts, in drawing order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl<M: TextMetrics> TextMetrics for RecordingSurface<M> {
    fn text_width(&self, text: &str) -> i32 {
        self.metrics.text_width(text)
    }

    fn line_height(&self) -> i32 {
        self.metrics.line_height()
    }

    fn ascent(&self) -> i32 {
        self.metrics.ascent()
    }
}

impl<M: TextMetrics> Surface for RecordingSurface<M> {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()> {
        self.ops.push(DrawOp::FillRect { rect, paint: *paint });
        Ok(())
    }

    fn fill_ellipse(&mut self, rect: Rect, color: RGBColor) -> Result<()> {
        self.ops.push(DrawOp::FillEllipse { rect, color });
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<()> {
        self.ops.push(DrawOp::Line {
            from,
            to,
            stroke: *stroke,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, pos: Point, align: TextAlign, color: RGBColor) -> Result<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            pos,
            align,
            color,
            rotation: self.rotation,
        });
        Ok(())
    }

    fn rotate(&mut self, degrees: f64, about: Point) {
        self.transform = self.transform.concat(&Affine::rotation_about(degrees, about));
        self.rotation += degrees;
        self.ops.push(DrawOp::Rotate { degrees, about });
    }
}
