// Series colors for charts

use plotters::style::RGBColor;

/// The ten default series colors, in assignment order
pub const STANDARD_COLORS: [RGBColor; 10] = [
    RGBColor(200, 0, 0),     // red
    RGBColor(0, 0, 200),     // blue
    RGBColor(250, 220, 50),  // yellow
    RGBColor(0, 130, 80),    // green
    RGBColor(150, 0, 210),   // violet
    RGBColor(240, 140, 0),   // orange
    RGBColor(50, 150, 240),  // light blue
    RGBColor(70, 40, 0),     // brown
    RGBColor(230, 50, 220),  // pink
    RGBColor(0, 190, 150),   // mint green
];

/// Color palette for series, cycled by row index
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    pub fn standard() -> Self {
        ColorPalette {
            colors: STANDARD_COLORS.to_vec(),
        }
    }

    /// Use the caller's colors instead of the standard ones.
    /// An empty list falls back to the standard palette.
    pub fn custom(colors: Vec<RGBColor>) -> Self {
        if colors.is_empty() {
            Self::standard()
        } else {
            ColorPalette { colors }
        }
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    /// One color per series, in series order
    pub fn assign_colors(&self, series_count: usize) -> Vec<RGBColor> {
        (0..series_count).map(|i| self.get_color(i)).collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_palette_wraps() {
        let palette = ColorPalette::standard();
        assert_eq!(palette.get_color(0), RGBColor(200, 0, 0));
        assert_eq!(palette.get_color(9), RGBColor(0, 190, 150));
        assert_eq!(palette.get_color(10), palette.get_color(0));
        assert_eq!(palette.get_color(13), palette.get_color(3));
    }

    #[test]
    fn test_custom_palette_replaces_standard() {
        let palette = ColorPalette::custom(vec![RGBColor(1, 2, 3), RGBColor(4, 5, 6)]);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.assign_colors(3), vec![RGBColor(1, 2, 3), RGBColor(4, 5, 6), RGBColor(1, 2, 3)]);
    }

    #[test]
    fn test_empty_custom_palette_falls_back() {
        assert_eq!(ColorPalette::custom(Vec::new()), ColorPalette::standard());
    }
}
