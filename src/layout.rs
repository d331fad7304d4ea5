// Chart geometry derived from a table and the target image size

use crate::chart::ChartOptions;
use crate::error::{ChartError, Result};
use crate::palette::ColorPalette;
use crate::scale::YScale;
use crate::surface::TextMetrics;
use crate::table::DataTable;
use plotters::style::RGBColor;
use tracing::{debug, trace};

/// Border above the chart when there is no title
pub const BORDER_TOP_UNTITLED: i32 = 10;
pub const BORDER_RIGHT: i32 = 10;
/// Extra room left of the y-axis labels
pub const BORDER_LEFT_PADDING: i32 = 15;
/// Padding inside and around the legend
pub const LEGEND_PADDING: i32 = 5;

/// Everything needed to draw one chart, in pixels.
///
/// Computed by [`compute_layout`] and consumed by the draw primitives, which
/// never derive geometry on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: i32,
    pub height: i32,
    pub line_height: i32,
    pub ascent: i32,

    pub border_top: i32,
    pub border_left: i32,
    pub border_bottom: i32,

    pub chart_width: i32,
    pub chart_height: i32,
    /// y of the x-axis
    pub chart_bottom: i32,

    /// Width of one category on the x-axis
    pub x_grid_width: i32,
    pub x_ticks: Vec<String>,
    pub x_max_tick_width: i32,
    /// Category labels do not fit horizontally and are drawn at 45°
    pub rotate_x_labels: bool,
    /// Only every n-th rotated label is drawn
    pub x_label_step: usize,

    pub y_scale: YScale,
    pub y_max_tick_width: i32,

    pub legend: Option<LegendLayout>,
    /// Room reserved under the legend for the unit label, 0 without one
    pub unit_label_height: i32,

    /// Number of rows the layout was computed for
    pub row_count: usize,
    /// One color per row
    pub colors: Vec<RGBColor>,
}

/// Planned legend box and the position of every entry in it
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    pub width: i32,
    pub height: i32,
    pub lines: usize,
    pub entries: Vec<LegendEntry>,
}

/// Legend entry of one row
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub row: usize,
    /// Zero-based legend line
    pub line: usize,
    /// Distance of the swatch from the left edge of the legend box
    pub x_offset: i32,
    pub text_width: i32,
}

impl ChartLayout {
    pub fn category_count(&self) -> usize {
        self.x_ticks.len()
    }

    /// Height of the legend box plus the unit label area
    pub fn legend_height(&self) -> i32 {
        self.legend.as_ref().map_or(0, |legend| legend.height) + self.unit_label_height
    }

    pub fn right_edge(&self) -> f64 {
        (self.width - BORDER_RIGHT) as f64
    }

    /// x of the tick in the middle of category `index`
    pub fn category_center(&self, index: usize) -> f64 {
        self.border_left as f64
            + 0.5 * self.x_grid_width as f64
            + index as f64 * self.chart_width as f64 / self.category_count() as f64
    }

    /// Width of one bar when `rows` bars share a category
    pub fn bar_width(&self, rows: usize) -> f64 {
        0.5 * self.x_grid_width as f64 / rows as f64
    }

    /// x of the middle of the bar for `row` in category `index`
    pub fn bar_center(&self, row: usize, rows: usize, index: usize) -> f64 {
        self.border_left as f64
            + 0.25 * self.x_grid_width as f64
            + (row as f64 + 0.5) * self.bar_width(rows)
            + index as f64 * self.chart_width as f64 / self.category_count() as f64
    }

    /// Pixel height of `value` above the x-axis.
    ///
    /// The one-pixel offset is carried over unchanged from the established
    /// chart output; bars and lines both use it.
    pub fn value_height(&self, value: f64) -> f64 {
        value * self.chart_height as f64 / self.y_scale.max_value - 1.0
    }

    /// y of the gridline for tick `index` (0 is the lowest labeled tick)
    pub fn y_tick_position(&self, index: usize) -> f64 {
        self.chart_bottom as f64
            - (index + 1) as f64 * self.y_scale.grid_step * self.chart_height as f64 / self.y_scale.max_value
    }
}

/// Compute the chart geometry for `table` at the size given in `options`.
///
/// Fails when the table has no rows or no labels.
pub fn compute_layout<M>(table: &DataTable, options: &ChartOptions, metrics: &M) -> Result<ChartLayout>
where
    M: TextMetrics + ?Sized,
{
    let first_row = table
        .rows()
        .first()
        .ok_or_else(|| ChartError::Configuration("table has no rows to chart".to_string()))?;
    if first_row.is_empty() {
        return Err(ChartError::Configuration(format!(
            "table '{}' has no values to chart",
            table.name()
        )));
    }

    let width = options.width as i32;
    let height = options.height as i32;
    let line_height = metrics.line_height();

    // 1. Title
    let border_top = if table.name().is_empty() {
        BORDER_TOP_UNTITLED
    } else {
        2 * line_height
    };

    // 2. Category labels
    let x_ticks: Vec<String> = (0..first_row.len())
        .filter_map(|i| first_row.short_label(i))
        .collect();
    let x_max_tick_width = x_ticks
        .iter()
        .map(|label| metrics.text_width(label))
        .max()
        .unwrap_or(0);

    // 3. Value axis
    let y_scale = YScale::for_max(table.max_value());
    let y_max_tick_width = y_scale
        .ticks
        .iter()
        .map(|label| metrics.text_width(label))
        .chain(std::iter::once(metrics.text_width(&y_scale.max_tick_label())))
        .max()
        .unwrap_or(0);

    // 4. Left border
    let border_left = y_max_tick_width.max(2 * x_max_tick_width / 3) + BORDER_LEFT_PADDING;

    // 5. Horizontal extent
    let chart_width = width - border_left - BORDER_RIGHT;
    let x_grid_width = (chart_width / x_ticks.len() as i32).max(1);

    // 6. Bottom border
    let rotate_x_labels = x_max_tick_width > x_grid_width / 2;
    let border_bottom = if rotate_x_labels {
        2 * x_max_tick_width / 3 + 2 * line_height
    } else {
        2 * line_height
    };
    let x_label_step = label_step(line_height, x_grid_width);

    // 7. Legend
    let legend = if table.len() > 1 {
        let text_widths: Vec<i32> = table.rows().iter().map(|row| metrics.text_width(row.name())).collect();
        Some(plan_legend(&text_widths, line_height, chart_width))
    } else {
        None
    };

    // 8. Unit label
    let unit_label_height = match table.unit_label() {
        Some(unit) if !unit.is_empty() => LEGEND_PADDING + line_height,
        _ => 0,
    };

    // 9. Vertical extent
    let legend_region = legend.as_ref().map_or(0, |l| l.height) + unit_label_height;
    let chart_bottom = height - border_bottom - (legend_region + 2 * LEGEND_PADDING);
    let chart_height = chart_bottom - border_top;

    // 10. Colors
    let palette = match &options.colors {
        Some(colors) => ColorPalette::custom(colors.clone()),
        None => ColorPalette::standard(),
    };
    let colors = palette.assign_colors(table.len());

    debug!(
        categories = x_ticks.len(),
        rows = table.len(),
        chart_width,
        chart_height,
        y_max = y_scale.max_value,
        y_step = y_scale.grid_step,
        rotate_x_labels,
        "computed chart layout"
    );

    Ok(ChartLayout {
        width,
        height,
        line_height,
        ascent: metrics.ascent(),
        border_top,
        border_left,
        border_bottom,
        chart_width,
        chart_height,
        chart_bottom,
        x_grid_width,
        x_ticks,
        x_max_tick_width,
        rotate_x_labels,
        x_label_step,
        y_scale,
        y_max_tick_width,
        legend,
        unit_label_height,
        row_count: table.len(),
        colors,
    })
}

/// How many category labels to advance between two drawn rotated labels.
///
/// Labels are all drawn while a line of text fits into one category; once it
/// does not, the step is the number of categories a line covers, doubled.
pub fn label_step(line_height: i32, x_grid_width: i32) -> usize {
    let x_grid_width = x_grid_width.max(1);
    if line_height / x_grid_width < 1 {
        1
    } else {
        let covered = (line_height + x_grid_width - 1) / x_grid_width;
        covered as usize * 2
    }
}

/// Width of a legend entry: padding, swatch, text and trailing padding
pub fn legend_entry_width(text_width: i32, line_height: i32) -> i32 {
    LEGEND_PADDING + line_height + text_width + 2 * LEGEND_PADDING
}

/// Lay out legend entries for rows whose names are `text_widths` wide.
///
/// Entries run left to right and wrap greedily once a line would grow wider
/// than `max_width`. A line always holds at least one entry.
pub fn plan_legend(text_widths: &[i32], line_height: i32, max_width: i32) -> LegendLayout {
    let total: i32 = text_widths
        .iter()
        .map(|w| legend_entry_width(*w, line_height))
        .sum();
    let wraps = total > max_width;
    let width = if wraps { max_width } else { total };

    let mut entries = Vec::with_capacity(text_widths.len());
    let mut line = 0;
    let mut used = 0;
    for (row, text_width) in text_widths.iter().copied().enumerate() {
        let entry_width = legend_entry_width(text_width, line_height);
        if used > 0 && used + entry_width > width {
            line += 1;
            used = 0;
            trace!(row, line, "legend wraps");
        }
        entries.push(LegendEntry {
            row,
            line,
            x_offset: LEGEND_PADDING + used,
            text_width,
        });
        used += entry_width;
    }

    let lines = if entries.is_empty() { 0 } else { line + 1 };
    LegendLayout {
        width,
        height: lines as i32 * line_height + 2 * LEGEND_PADDING,
        lines,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::EstimatedMetrics;
    use crate::table::DataRow;

    const MONTHS: [&str; 12] = [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober",
        "November", "Dezember",
    ];

    fn monthly_row(name: &str, values: [f64; 12]) -> DataRow {
        let mut row = DataRow::new(name);
        for (month, value) in MONTHS.iter().zip(values) {
            row.add_value(*month, value);
        }
        row
    }

    fn sample_table() -> DataTable {
        let mut table = DataTable::new("Some sample data");
        table.set_unit_label("some unit");
        table.add_row(monthly_row(
            "2007",
            [5.0, 10.0, 21.7, 42.1, 342.7, 211.3, 121.7, 42.1, 252.7, 141.3, 132.7, 224.1],
        ));
        table.add_row(monthly_row(
            "2008",
            [38.4, 10.0, 28.7, 82.1, 242.7, 289.3, 223.7, 52.1, 162.7, 140.3, 119.7, 424.1],
        ));
        table.add_row(monthly_row(
            "2009",
            [80.0, 100.0, 201.7, 402.1, 42.7, 111.3, 181.7, 152.1, 52.7, 191.3, 112.7, 324.1],
        ));
        table
    }

    fn single_value_table() -> DataTable {
        let mut row = DataRow::new("only");
        row.add_value("x", 5.0);
        let mut table = DataTable::new("");
        table.add_row(row);
        table
    }

    #[test]
    fn test_layout_sample_table() {
        let table = sample_table();
        let metrics = EstimatedMetrics::default();
        let layout = compute_layout(&table, &ChartOptions::default(), &metrics).unwrap();

        assert_eq!(layout.x_ticks.len(), 12);
        assert_eq!(layout.x_ticks[0], "Januar");
        let legend = layout.legend.as_ref().expect("three rows need a legend");
        assert_eq!(legend.entries.len(), 3);
        assert!(layout.legend_height() > 0);

        let max = table.max_value();
        assert!(layout.y_scale.max_value >= max);
        let steps = layout.y_scale.max_value / layout.y_scale.grid_step;
        assert_eq!(steps, steps.round());
        assert_eq!(layout.border_top, 2 * metrics.line_height());
        assert_eq!(layout.colors.len(), 3);
    }

    #[test]
    fn test_layout_vertical_extent() {
        let table = sample_table();
        let metrics = EstimatedMetrics::default();
        let layout = compute_layout(&table, &ChartOptions::default(), &metrics).unwrap();

        let lh = metrics.line_height();
        assert_eq!(layout.unit_label_height, LEGEND_PADDING + lh);
        assert_eq!(
            layout.chart_bottom,
            800 - layout.border_bottom - (layout.legend_height() + 2 * LEGEND_PADDING)
        );
        assert_eq!(layout.chart_height, layout.chart_bottom - layout.border_top);
        assert_eq!(layout.chart_width, 1024 - layout.border_left - BORDER_RIGHT);
        assert_eq!(layout.x_grid_width, layout.chart_width / 12);
    }

    #[test]
    fn test_layout_single_value() {
        let layout = compute_layout(&single_value_table(), &ChartOptions::default(), &EstimatedMetrics::default())
            .unwrap();
        assert_eq!(layout.x_ticks.len(), 1);
        assert!(layout.legend.is_none());
        assert_eq!(layout.legend_height(), 0);
        assert_eq!(layout.border_top, BORDER_TOP_UNTITLED);
    }

    #[test]
    fn test_layout_all_zero() {
        let mut row = DataRow::new("zeros");
        row.add_value("a", 0.0);
        row.add_value("b", 0.0);
        let mut table = DataTable::new("nothing");
        table.add_row(row);

        let layout = compute_layout(&table, &ChartOptions::default(), &EstimatedMetrics::default()).unwrap();
        assert!(layout.y_scale.max_value > 0.0);
        assert!(layout.value_height(0.0).is_finite());
    }

    #[test]
    fn test_layout_rejects_empty_tables() {
        let options = ChartOptions::default();
        let metrics = EstimatedMetrics::default();

        let empty = DataTable::new("empty");
        assert!(matches!(compute_layout(&empty, &options, &metrics), Err(ChartError::Configuration(_))));

        let mut no_values = DataTable::new("no values");
        no_values.add_row(DataRow::new("row"));
        assert!(matches!(compute_layout(&no_values, &options, &metrics), Err(ChartError::Configuration(_))));
    }

    #[test]
    fn test_left_border_balances_axis_labels() {
        let metrics = EstimatedMetrics::default();
        let mut row = DataRow::new("r");
        row.add_value("a".repeat(30), 5.0);
        let mut table = DataTable::new("");
        table.add_row(row);

        let layout = compute_layout(&table, &ChartOptions::default(), &metrics).unwrap();
        let label_width = metrics.text_width(&"a".repeat(30));
        assert_eq!(layout.border_left, 2 * label_width / 3 + BORDER_LEFT_PADDING);
    }

    #[test]
    fn test_long_labels_are_rotated() {
        let metrics = EstimatedMetrics::default();
        let mut row = DataRow::new("r");
        for i in 0..40 {
            row.add_value(format!("a rather long category name {}", i), i as f64);
        }
        let mut table = DataTable::new("");
        table.add_row(row);

        let layout = compute_layout(&table, &ChartOptions::default(), &metrics).unwrap();
        assert!(layout.rotate_x_labels);
        assert_eq!(
            layout.border_bottom,
            2 * layout.x_max_tick_width / 3 + 2 * metrics.line_height()
        );
    }

    #[test]
    fn test_short_labels_stay_horizontal() {
        let table = {
            let mut row = DataRow::new("r");
            row.add_value("a", 1.0);
            row.add_value("b", 2.0);
            let mut t = DataTable::new("");
            t.add_row(row);
            t
        };
        let metrics = EstimatedMetrics::default();
        let layout = compute_layout(&table, &ChartOptions::default(), &metrics).unwrap();
        assert!(!layout.rotate_x_labels);
        assert_eq!(layout.border_bottom, 2 * metrics.line_height());
        assert_eq!(layout.x_label_step, 1);
    }

    #[test]
    fn test_label_step() {
        assert_eq!(label_step(16, 40), 1);
        assert_eq!(label_step(16, 16), 2);
        assert_eq!(label_step(16, 10), 4);
        assert_eq!(label_step(16, 0), 32);
    }

    #[test]
    fn test_legend_single_line() {
        let legend = plan_legend(&[20, 30], 10, 500);
        assert_eq!(legend.lines, 1);
        assert_eq!(legend.width, legend_entry_width(20, 10) + legend_entry_width(30, 10));
        assert_eq!(legend.height, 10 + 2 * LEGEND_PADDING);
        assert_eq!(legend.entries[1].x_offset, LEGEND_PADDING + legend_entry_width(20, 10));
    }

    #[test]
    fn test_legend_wraps_one_line_height_per_wrap() {
        let line_height = 16;
        // each entry is 5 + 16 + 60 + 10 = 91 pixels
        let widths = [60; 5];
        let single = plan_legend(&widths[..1], line_height, 200);
        let wrapped = plan_legend(&widths, line_height, 200);

        assert_eq!(wrapped.width, 200);
        assert_eq!(wrapped.lines, 3);
        assert_eq!(wrapped.height - single.height, 2 * line_height);

        let lines: Vec<usize> = wrapped.entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![0, 0, 1, 1, 2]);
        assert_eq!(wrapped.entries[2].x_offset, LEGEND_PADDING);
    }

    #[test]
    fn test_legend_oversized_entry_keeps_its_line() {
        let legend = plan_legend(&[500, 10], 10, 100);
        assert_eq!(legend.entries[0].line, 0);
        assert_eq!(legend.entries[1].line, 1);
        assert_eq!(legend.lines, 2);
    }

    #[test]
    fn test_layout_legend_wraps_for_long_names() {
        let metrics = EstimatedMetrics::default();
        let mut table = DataTable::new("t");
        for i in 0..12 {
            let mut row = DataRow::new(format!("a very long series name number {}", i));
            row.add_value("x", i as f64);
            table.add_row(row);
        }
        let layout = compute_layout(&table, &ChartOptions::default(), &metrics).unwrap();
        let legend = layout.legend.unwrap();
        assert!(legend.lines > 1);
        assert_eq!(legend.width, layout.chart_width);
        assert_eq!(legend.height, legend.lines as i32 * metrics.line_height() + 2 * LEGEND_PADDING);
    }

    #[test]
    fn test_custom_colors_replace_palette() {
        let options = ChartOptions {
            colors: Some(vec![RGBColor(1, 1, 1)]),
            ..ChartOptions::default()
        };
        let layout = compute_layout(&sample_table(), &options, &EstimatedMetrics::default()).unwrap();
        assert_eq!(layout.colors, vec![RGBColor(1, 1, 1); 3]);
    }

    #[test]
    fn test_bar_geometry() {
        let layout = compute_layout(&sample_table(), &ChartOptions::default(), &EstimatedMetrics::default()).unwrap();
        let gw = layout.x_grid_width as f64;
        let left = layout.border_left as f64;
        assert_eq!(layout.bar_width(3), 0.5 * gw / 3.0);
        assert_eq!(layout.bar_center(0, 3, 0), left + 0.25 * gw + 0.5 * layout.bar_width(3));
        assert_eq!(layout.category_center(0), left + 0.5 * gw);
    }
}
