// Chart orchestration: layout first, then every drawing phase in order

use crate::draw::Painter;
use crate::error::{ChartError, Result};
use crate::layout::{compute_layout, ChartLayout};
use crate::surface::{Surface, TextMetrics};
use crate::table::DataTable;
use plotters::style::RGBColor;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartType {
    #[default]
    Bar,
    Line,
}

/// Marker used for line chart points and legend swatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointStyle {
    Circle,
    #[default]
    Square,
}

/// Settings of a single chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub chart_type: ChartType,
    pub point_style: PointStyle,
    /// Replaces the standard palette entirely when set
    pub colors: Option<Vec<RGBColor>>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: 1024,
            height: 800,
            chart_type: ChartType::Bar,
            point_style: PointStyle::Square,
            colors: None,
        }
    }
}

/// Where a chart render currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    BorderCompute,
    SeriesDraw,
    MeanLineDraw,
    AxisDraw,
    TitleDraw,
    LegendDraw,
    UnitLabelDraw,
    Done,
}

/// Draws a bar or line chart of a [`DataTable`].
///
/// [`ChartDraw::compute_layout`] must run before [`ChartDraw::paint`]; the
/// layout is kept so tests and callers can inspect the geometry afterwards.
#[derive(Debug, Clone)]
pub struct ChartDraw {
    options: ChartOptions,
    layout: Option<ChartLayout>,
    phase: Phase,
}

impl ChartDraw {
    pub fn new(options: ChartOptions) -> Self {
        ChartDraw {
            options,
            layout: None,
            phase: Phase::Init,
        }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    /// Compute borders, scales and legend placement for `table`
    pub fn compute_layout<M>(&mut self, table: &DataTable, metrics: &M) -> Result<&ChartLayout>
    where
        M: TextMetrics + ?Sized,
    {
        self.enter(Phase::BorderCompute);
        let layout = compute_layout(table, &self.options, metrics)?;
        Ok(self.layout.insert(layout))
    }

    /// Draw the chart onto `surface` using the computed layout
    pub fn paint<S>(&mut self, table: &DataTable, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let layout = self
            .layout
            .take()
            .ok_or_else(|| ChartError::State("chart layout must be computed before painting".to_string()))?;
        let painted = self.paint_with(&layout, table, surface);
        self.layout = Some(layout);
        painted
    }

    /// Compute the layout with the surface's own metrics, then paint
    pub fn draw<S>(&mut self, table: &DataTable, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        self.compute_layout(table, &*surface)?;
        self.paint(table, surface)
    }

    fn paint_with<S>(&mut self, layout: &ChartLayout, table: &DataTable, surface: &mut S) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        if table.is_empty() {
            return Err(ChartError::Configuration("table has no rows to chart".to_string()));
        }
        let categories = table.rows().first().map_or(0, |row| row.len());
        if table.len() != layout.row_count || categories != layout.category_count() {
            return Err(ChartError::State(format!(
                "layout was computed for {} rows of {} values, table has {} rows of {}",
                layout.row_count,
                layout.category_count(),
                table.len(),
                categories
            )));
        }
        debug!(chart_type = ?self.options.chart_type, rows = table.len(), "painting chart");

        let point_style = self.options.point_style;
        let mut painter = Painter::new(surface, layout);
        painter.background()?;

        self.enter(Phase::SeriesDraw);
        match self.options.chart_type {
            ChartType::Bar => draw_bars(&mut painter, table)?,
            ChartType::Line => draw_lines(&mut painter, table, point_style)?,
        }

        self.enter(Phase::MeanLineDraw);
        for (index, row) in table.rows().iter().enumerate() {
            if row.show_mean_value() {
                painter.mean_line(layout.value_height(row.mean_value()), layout.colors[index])?;
            }
        }

        self.enter(Phase::AxisDraw);
        painter.y_axis()?;
        painter.x_axis()?;

        self.enter(Phase::TitleDraw);
        if !table.name().is_empty() {
            painter.title(table.name())?;
        }

        if table.len() > 1 {
            self.enter(Phase::LegendDraw);
            painter.legend(table, point_style)?;
        }

        if let Some(unit) = table.unit_label().filter(|unit| !unit.is_empty()) {
            self.enter(Phase::UnitLabelDraw);
            painter.unit_label(unit)?;
        }

        self.enter(Phase::Done);
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = ?self.phase, to = ?phase, "chart phase");
        self.phase = phase;
    }
}

fn draw_bars<S: Surface + ?Sized>(painter: &mut Painter<'_, S>, table: &DataTable) -> Result<()> {
    let layout = painter.layout();
    let rows = table.len();
    for (row_index, row) in table.rows().iter().enumerate() {
        let color = layout.colors[row_index];
        for (index, value) in row.values().enumerate() {
            painter.bar(
                layout.bar_center(row_index, rows, index),
                layout.bar_width(rows),
                layout.value_height(value),
                color,
            )?;
        }
    }
    Ok(())
}

fn draw_lines<S: Surface + ?Sized>(
    painter: &mut Painter<'_, S>,
    table: &DataTable,
    style: PointStyle,
) -> Result<()> {
    let layout = painter.layout();
    let bottom = layout.chart_bottom as f64;
    for (row_index, row) in table.rows().iter().enumerate() {
        let color = layout.colors[row_index];
        let mut previous: Option<(f64, f64)> = None;
        for (index, value) in row.values().enumerate() {
            let point = (layout.category_center(index), bottom - layout.value_height(value));
            if row.show_point() {
                painter.point(point.0, point.1, color, style)?;
            }
            if let Some(previous) = previous {
                painter.line(previous, point, color)?;
            }
            previous = Some(point);
        }
    }
    Ok(())
}
