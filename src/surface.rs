// Drawing surface capability shared by every chart backend

use crate::error::Result;
use plotters::style::RGBColor;

/// A pixel position, x to the right and y downwards
pub type Point = (f64, f64);

/// Pixel sizes of rendered text.
///
/// Label sizes drive the whole layout, so every surface reports the metrics of
/// the font it actually draws with.
pub trait TextMetrics {
    /// Width of `text` in pixels
    fn text_width(&self, text: &str) -> i32;

    /// Height of one line of text, including leading
    fn line_height(&self) -> i32;

    /// Distance from the top of a line to the baseline
    fn ascent(&self) -> i32;
}

/// Text metrics estimated from the font size alone.
///
/// Each character is assumed to be 0.6 em wide, which is close enough for
/// layout purposes and needs no font files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedMetrics {
    pub font_size: f64,
}

impl EstimatedMetrics {
    pub fn new(font_size: f64) -> Self {
        EstimatedMetrics { font_size }
    }
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        EstimatedMetrics::new(13.0)
    }
}

impl TextMetrics for EstimatedMetrics {
    fn text_width(&self, text: &str) -> i32 {
        (text.chars().count() as f64 * self.font_size * 6.0 / 10.0).ceil() as i32
    }

    fn line_height(&self) -> i32 {
        (self.font_size * 1.25).ceil() as i32
    }

    fn ascent(&self) -> i32 {
        (self.font_size * 0.8).round() as i32
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// How a filled shape is colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(RGBColor),
    /// Linear gradient along the y-axis, clamped outside `start_y..end_y`
    VerticalGradient {
        from: RGBColor,
        to: RGBColor,
        start_y: f64,
        end_y: f64,
    },
}

impl Paint {
    /// Color of the paint at vertical position `y`
    pub fn color_at(&self, y: f64) -> RGBColor {
        match *self {
            Paint::Solid(color) => color,
            Paint::VerticalGradient { from, to, start_y, end_y } => {
                let span = end_y - start_y;
                let t = if span.abs() < f64::EPSILON {
                    0.0
                } else {
                    ((y - start_y) / span).clamp(0.0, 1.0)
                };
                mix(from, to, t)
            }
        }
    }
}

fn mix(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(channel(from.0, to.0), channel(from.1, to.1), channel(from.2, to.2))
}

/// One-pixel line stroke, optionally dashed with `(on, off)` lengths in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: RGBColor,
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: RGBColor) -> Self {
        Stroke { color, dash: None }
    }

    pub fn dashed(color: RGBColor, on: f64, off: f64) -> Self {
        Stroke {
            color,
            dash: Some((on, off)),
        }
    }
}

/// Horizontal anchoring of text relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// The primitives a chart is drawn with.
///
/// Coordinates are pixels of the untransformed frame; `rotate` changes the
/// frame for every following call until it is rotated back.
pub trait Surface: TextMetrics {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()>;

    /// Fill the ellipse inscribed in `rect`
    fn fill_ellipse(&mut self, rect: Rect, color: RGBColor) -> Result<()>;

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<()>;

    /// Draw `text` with its baseline at `pos.1`, anchored at `pos.0` per `align`
    fn draw_text(&mut self, text: &str, pos: Point, align: TextAlign, color: RGBColor) -> Result<()>;

    /// Rotate the frame by `degrees` (clockwise on screen) about `about`
    fn rotate(&mut self, degrees: f64, about: Point);
}

/// 2-D affine transform, `x' = a·x + c·y + e`, `y' = b·x + d·y + f`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn rotation_about(degrees: f64, (cx, cy): Point) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: cx - cos * cx + sin * cy,
            f: cy - sin * cx - cos * cy,
        }
    }

    /// `self` after `inner`: points go through `inner` first
    pub fn concat(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn apply(&self, (x, y): Point) -> Point {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    pub fn inverse(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Affine {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    pub fn is_identity(&self) -> bool {
        const EPS: f64 = 1e-9;
        (self.a - 1.0).abs() < EPS
            && self.b.abs() < EPS
            && self.c.abs() < EPS
            && (self.d - 1.0).abs() < EPS
            && self.e.abs() < EPS
            && self.f.abs() < EPS
    }
}

impl Default for Affine {
    fn default() -> Self {
        Affine::IDENTITY
    }
}
