use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use datachart::csv_reader;
use datachart::renderer::{
    ChartRenderer, DebugRenderer, HtmlTableRenderer, PieChartRenderer, Renderer, TextTableRenderer,
};
use datachart::{ChartType, PointStyle};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Bar or line chart as PNG
    Chart,
    /// Pie chart of the first row as PNG
    Pie,
    Html,
    Text,
    /// Rust statements rebuilding the table
    Debug,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Marker {
    Circle,
    Square,
}

#[derive(Parser, Debug)]
#[command(name = "datachart")]
#[command(about = "Render a CSV table as a chart or table", long_about = None)]
struct Args {
    #[arg(short = 'o', long = "output", value_enum, default_value = "chart", help = "Output format")]
    output: Output,

    #[arg(long = "chart-type", value_enum, default_value = "bar", help = "Chart type for --output chart")]
    chart_type: ChartKind,

    #[arg(long = "point-style", value_enum, default_value = "square", help = "Marker for points and legend swatches")]
    point_style: Marker,

    #[arg(long = "width", default_value = "1024", help = "Output width in pixels")]
    width: u32,

    #[arg(long = "height", default_value = "800", help = "Output height in pixels")]
    height: u32,

    #[arg(short = 't', long = "title", default_value = "", help = "Table title")]
    title: String,

    #[arg(long = "subtitle", help = "Table subtitle (defaults to the CSV corner cell)")]
    subtitle: Option<String>,

    #[arg(long = "unit", help = "Unit label drawn beneath the chart")]
    unit: Option<String>,

    #[arg(long = "mean-values", help = "Draw the mean line of every row")]
    mean_values: bool,

    #[arg(long = "pattern", help = "Number pattern for table output, e.g. \"#,##0.00\"")]
    pattern: Option<String>,

    #[arg(long = "transpose", help = "Swap rows and labels before rendering")]
    transpose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut table = csv_reader::read_table_from_stdin(&args.title)
        .context("Failed to read CSV from stdin")?;
    if let Some(subtitle) = &args.subtitle {
        table.set_subname(subtitle.as_str());
    }
    if let Some(unit) = &args.unit {
        table.set_unit_label(unit.as_str());
    }
    if args.transpose {
        table = table.transposed();
    }

    let bytes = match args.output {
        Output::Chart => {
            let mut renderer = ChartRenderer::new();
            renderer.set_size(args.width, args.height);
            renderer.set_show_mean_values(args.mean_values);
            renderer.set_chart_type(match args.chart_type {
                ChartKind::Bar => ChartType::Bar,
                ChartKind::Line => ChartType::Line,
            });
            renderer.set_point_style(match args.point_style {
                Marker::Circle => PointStyle::Circle,
                Marker::Square => PointStyle::Square,
            });
            renderer.set_table(table);
            renderer.render_png().context("Failed to generate chart")?
        }
        Output::Pie => {
            let mut renderer = PieChartRenderer::new();
            renderer.set_size(args.width, args.height);
            renderer.set_table(table);
            renderer.render().context("Failed to generate pie chart")?
        }
        Output::Html => {
            let mut renderer = HtmlTableRenderer::new();
            if let Some(pattern) = &args.pattern {
                renderer.set_format_pattern(pattern.as_str());
            }
            renderer.set_table(table);
            renderer.render().context("Failed to render HTML table")?.into_bytes()
        }
        Output::Text => {
            let mut renderer = TextTableRenderer::new();
            if let Some(pattern) = &args.pattern {
                renderer.set_format_pattern(pattern.as_str());
            }
            renderer.set_table(table);
            renderer.render().context("Failed to render text table")?.into_bytes()
        }
        Output::Debug => {
            let mut renderer = DebugRenderer::new();
            renderer.set_table(table);
            renderer.render().context("Failed to render table dump")?.into_bytes()
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&bytes)
        .context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
