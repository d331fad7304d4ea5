// Bitmap surface on top of the plotters bitmap backend, plus PNG encoding

use crate::error::{ChartError, Result};
use crate::surface::{Affine, EstimatedMetrics, Paint, Point, Rect, Stroke, Surface, TextAlign, TextMetrics};
use image::{ImageEncoder, RgbImage};
use plotters::backend::DrawingBackend;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Vertices used to approximate ellipses
const ELLIPSE_SEGMENTS: usize = 32;

/// A [`Surface`] that rasterises into an RGB buffer.
///
/// Straight text goes through the backend's text renderer; text drawn in a
/// rotated frame is rendered into a scratch bitmap first and resampled.
pub struct BitmapSurface<'a> {
    backend: BitMapBackend<'a>,
    width: u32,
    height: u32,
    font_size: f64,
    transform: Affine,
}

impl<'a> BitmapSurface<'a> {
    /// Draw into `buffer`, which must hold `width * height * 3` bytes
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32, font_size: f64) -> Result<Self> {
        let needed = width as usize * height as usize * 3;
        if width == 0 || height == 0 || buffer.len() < needed {
            return Err(ChartError::Configuration(format!(
                "bitmap of {}x{} pixels needs a buffer of {} bytes, got {}",
                width,
                height,
                needed,
                buffer.len()
            )));
        }
        Ok(BitmapSurface {
            backend: BitMapBackend::with_buffer(buffer, (width, height)),
            width,
            height,
            font_size,
            transform: Affine::IDENTITY,
        })
    }

    /// Flush all pending drawing into the buffer
    pub fn present(&mut self) -> Result<()> {
        self.backend.present().map_err(backend_error)
    }

    fn font(&self) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.font_size, FontStyle::Normal)
    }

    fn estimated(&self) -> EstimatedMetrics {
        EstimatedMetrics::new(self.font_size)
    }

    fn project(&self, point: Point) -> (i32, i32) {
        let (x, y) = self.transform.apply(point);
        (x.round() as i32, y.round() as i32)
    }

    fn fill_quad(&mut self, rect: Rect, color: RGBColor) -> Result<()> {
        let style = ShapeStyle {
            color: color.to_rgba(),
            filled: true,
            stroke_width: 1,
        };
        if self.transform.is_identity() {
            // the backend fills up to, not including, the lower right corner
            let upper_left = (rect.x.round() as i32, rect.y.round() as i32);
            let bottom_right = (rect.right().round() as i32, rect.bottom().round() as i32);
            if bottom_right.0 <= upper_left.0 || bottom_right.1 <= upper_left.1 {
                return Ok(());
            }
            return self
                .backend
                .draw_rect(upper_left, bottom_right, &style, true)
                .map_err(backend_error);
        }
        let corners = [
            self.project((rect.x, rect.y)),
            self.project((rect.right(), rect.y)),
            self.project((rect.right(), rect.bottom())),
            self.project((rect.x, rect.bottom())),
        ];
        self.backend.fill_polygon(corners, &style).map_err(backend_error)
    }

    fn draw_straight_text(&mut self, text: &str, (x, baseline): Point, align: TextAlign, color: RGBColor) -> Result<()> {
        let h_pos = match align {
            TextAlign::Left => HPos::Left,
            TextAlign::Center => HPos::Center,
            TextAlign::Right => HPos::Right,
        };
        let top = baseline - self.ascent() as f64;
        let style = TextStyle::from(self.font())
            .color(&color)
            .pos(Pos::new(h_pos, VPos::Top));
        self.backend
            .draw_text(text, &style, (x.round() as i32, top.round() as i32))
            .map_err(backend_error)
    }

    fn draw_transformed_text(
        &mut self,
        text: &str,
        (x, baseline): Point,
        align: TextAlign,
        color: RGBColor,
    ) -> Result<()> {
        let (text_width, text_height) = self
            .font()
            .box_size(text)
            .map_err(|e| ChartError::Backend(format!("failed to measure '{}': {:?}", text, e)))?;
        let scratch_width = text_width + 2;
        let scratch_height = text_height.max(self.line_height() as u32) + 2;

        // render unrotated, black on white
        let mut glyphs = vec![255u8; scratch_width as usize * scratch_height as usize * 3];
        {
            let mut scratch = BitMapBackend::with_buffer(&mut glyphs, (scratch_width, scratch_height));
            let style = TextStyle::from(self.font())
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Top));
            scratch.draw_text(text, &style, (1, 1)).map_err(backend_error)?;
            scratch.present().map_err(backend_error)?;
        }

        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - text_width as f64 / 2.0,
            TextAlign::Right => x - text_width as f64,
        } - 1.0;
        let top = baseline - self.ascent() as f64 - 1.0;

        let inverse = self
            .transform
            .inverse()
            .ok_or_else(|| ChartError::State("surface transform is not invertible".to_string()))?;

        let corners = [
            (left, top),
            (left + scratch_width as f64, top),
            (left, top + scratch_height as f64),
            (left + scratch_width as f64, top + scratch_height as f64),
        ]
        .map(|corner| self.transform.apply(corner));
        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min).floor().max(0.0) as i32;
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max).ceil().min(self.width as f64) as i32;
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min).floor().max(0.0) as i32;
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max).ceil().min(self.height as f64) as i32;

        for py in min_y..max_y {
            for px in min_x..max_x {
                let (sx, sy) = inverse.apply((px as f64 + 0.5, py as f64 + 0.5));
                let u = (sx - left).floor();
                let v = (sy - top).floor();
                if u < 0.0 || v < 0.0 || u >= scratch_width as f64 || v >= scratch_height as f64 {
                    continue;
                }
                let offset = (v as usize * scratch_width as usize + u as usize) * 3;
                let coverage = 255 - glyphs[offset];
                if coverage == 0 {
                    continue;
                }
                let pixel = color.mix(coverage as f64 / 255.0).to_backend_color();
                self.backend.draw_pixel((px, py), pixel).map_err(backend_error)?;
            }
        }
        Ok(())
    }
}

impl TextMetrics for BitmapSurface<'_> {
    fn text_width(&self, text: &str) -> i32 {
        match self.font().box_size(text) {
            Ok((width, _)) => width as i32,
            Err(_) => self.estimated().text_width(text),
        }
    }

    fn line_height(&self) -> i32 {
        self.estimated().line_height()
    }

    fn ascent(&self) -> i32 {
        self.estimated().ascent()
    }
}

impl Surface for BitmapSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> Result<()> {
        match paint {
            Paint::Solid(color) => self.fill_quad(rect, *color),
            Paint::VerticalGradient { .. } => {
                let top = rect.y.floor() as i32;
                let bottom = rect.bottom().ceil() as i32;
                for row in top..bottom {
                    let strip_top = (row as f64).max(rect.y);
                    let strip_bottom = ((row + 1) as f64).min(rect.bottom());
                    let strip = Rect::new(rect.x, strip_top, rect.width, strip_bottom - strip_top);
                    self.fill_quad(strip, paint.color_at(row as f64))?;
                }
                Ok(())
            }
        }
    }

    fn fill_ellipse(&mut self, rect: Rect, color: RGBColor) -> Result<()> {
        let center = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        let vertices: Vec<(i32, i32)> = (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let angle = i as f64 / ELLIPSE_SEGMENTS as f64 * std::f64::consts::TAU;
                self.project((
                    center.0 + rect.width / 2.0 * angle.cos(),
                    center.1 + rect.height / 2.0 * angle.sin(),
                ))
            })
            .collect();
        self.backend
            .fill_polygon(vertices, &color.filled())
            .map_err(backend_error)
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<()> {
        let style = stroke.color.stroke_width(1);
        let Some((on, off)) = stroke.dash else {
            let (a, b) = (self.project(from), self.project(to));
            return self.backend.draw_line(a, b, &style).map_err(backend_error);
        };

        let length = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
        if length == 0.0 || on <= 0.0 {
            return Ok(());
        }
        let direction = ((to.0 - from.0) / length, (to.1 - from.1) / length);
        let mut start = 0.0;
        while start < length {
            let end = (start + on).min(length);
            let a = self.project((from.0 + direction.0 * start, from.1 + direction.1 * start));
            let b = self.project((from.0 + direction.0 * end, from.1 + direction.1 * end));
            self.backend.draw_line(a, b, &style).map_err(backend_error)?;
            start = end + off;
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, pos: Point, align: TextAlign, color: RGBColor) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if self.transform.is_identity() {
            self.draw_straight_text(text, pos, align, color)
        } else {
            self.draw_transformed_text(text, pos, align, color)
        }
    }

    fn rotate(&mut self, degrees: f64, about: Point) {
        self.transform = self.transform.concat(&Affine::rotation_about(degrees, about));
    }
}

/// Encode an RGB image as PNG
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder.write_image(image.as_raw(), image.width(), image.height(), image::ColorType::Rgb8)?;
    }
    Ok(png_bytes)
}

pub(crate) fn backend_error(err: impl std::fmt::Display) -> ChartError {
    ChartError::Backend(err.to_string())
}
