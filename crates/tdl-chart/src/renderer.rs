//! `plotters` rendering of the mean-score and tile-probability charts.

use std::fmt;
use std::panic;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use plotters::coord::combinators::BindKeyPoints;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, TextStyle};
use tdl_core::error::{PlotError, Result};
use tdl_core::formatting::annotation_lines;
use tdl_core::models::{ParsedLog, TrainingSeries, TARGET_TILE};
use tracing::{debug, info};

use crate::axis::{value_bounds, EpisodeAxis};

/// Caption shown on every chart.
pub const CHART_TITLE: &str = "TDL2048";

const WHEAT: RGBColor = RGBColor(245, 222, 179);
const FONT: &str = "sans-serif";

// ── ChartKind ─────────────────────────────────────────────────────────────────

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Png,
    Svg,
}

impl ChartKind {
    pub fn extension(self) -> &'static str {
        match self {
            ChartKind::Png => "png",
            ChartKind::Svg => "svg",
        }
    }
}

impl FromStr for ChartKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ChartKind::Png),
            "svg" => Ok(ChartKind::Svg),
            other => Err(PlotError::Config(format!("unsupported image format: {other}"))),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ── ChartMetric ───────────────────────────────────────────────────────────────

/// Which series a chart plots against the episode number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMetric {
    MeanScore,
    TileProbability,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 2] = [ChartMetric::MeanScore, ChartMetric::TileProbability];

    pub fn y_label(self) -> String {
        match self {
            ChartMetric::MeanScore => "Mean Score per Episode".to_string(),
            ChartMetric::TileProbability => format!("Probability of {TARGET_TILE}-tile (%)"),
        }
    }

    /// Suffix appended to the output base path.
    pub fn file_suffix(self) -> String {
        match self {
            ChartMetric::MeanScore => "mean".to_string(),
            ChartMetric::TileProbability => TARGET_TILE.to_string(),
        }
    }

    fn points(self, series: &TrainingSeries) -> Vec<(u64, f64)> {
        match self {
            ChartMetric::MeanScore => series.mean_points(),
            ChartMetric::TileProbability => series.probability_points(),
        }
    }
}

// ── ChartRenderer ─────────────────────────────────────────────────────────────

/// Image format and canvas size shared by both charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            kind: ChartKind::Png,
            width: 1200,
            height: 800,
        }
    }
}

/// Draws the two training charts for a parsed log.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    options: ChartOptions,
}

impl ChartRenderer {
    pub fn new(options: ChartOptions) -> Result<Self> {
        if options.width == 0 || options.height == 0 {
            return Err(PlotError::InvalidDimensions {
                width: options.width,
                height: options.height,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> ChartOptions {
        self.options
    }

    /// `{base}-{suffix}.{ext}`, e.g. `result-mean.png` and `result-2048.png`.
    pub fn output_path(&self, base: &Path, metric: ChartMetric) -> PathBuf {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(
            "-{}.{}",
            metric.file_suffix(),
            self.options.kind.extension()
        ));
        PathBuf::from(name)
    }

    /// Render both charts next to `base` and return the written paths.
    pub fn render_all(&self, log: &ParsedLog, base: &Path) -> Result<Vec<PathBuf>> {
        ChartMetric::ALL
            .iter()
            .map(|&metric| {
                let path = self.output_path(base, metric);
                self.render(log, metric, &path)?;
                Ok(path)
            })
            .collect()
    }

    /// Render one chart to `path`.
    ///
    /// Backend panics (for example a missing system font) are reported as
    /// [`PlotError::Render`].
    pub fn render(&self, log: &ParsedLog, metric: ChartMetric, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let size = (self.options.width, self.options.height);
        let draw = || -> anyhow::Result<()> {
            match self.options.kind {
                ChartKind::Png => {
                    let root = BitMapBackend::new(path, size).into_drawing_area();
                    draw_chart(root, log, metric)
                }
                ChartKind::Svg => {
                    let root = SVGBackend::new(path, size).into_drawing_area();
                    draw_chart(root, log, metric)
                }
            }
        };

        let render_error = |message: String| PlotError::Render {
            path: path.to_path_buf(),
            message,
        };
        panic::catch_unwind(panic::AssertUnwindSafe(draw))
            .map_err(|_| render_error("plotting backend panicked".to_string()))?
            .map_err(|e| render_error(e.to_string()))?;

        info!("Saved {:?} chart to {}", metric, path.display());
        Ok(())
    }
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    log: &ParsedLog,
    metric: ChartMetric,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let points = metric.points(&log.series);
    let values: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
    let axis = EpisodeAxis::from_episodes(log.series.episodes());
    let (y_min, y_max) = value_bounds(&values);
    debug!(
        "{:?}: x {}..{} step {}, y {:.2}..{:.2}",
        metric,
        axis.lower,
        axis.upper,
        axis.step(),
        y_min,
        y_max
    );

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, (FONT, 36).into_font().style(FontStyle::Bold))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(
            (axis.lower..axis.upper).with_key_points(axis.ticks.clone()),
            y_min..y_max,
        )?;

    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc(metric.y_label())
        .axis_desc_style((FONT, 22))
        .label_style((FONT, 16))
        .x_label_formatter(&|v| v.to_string())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        BLUE.mix(0.8).stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.mix(0.8).filled())),
    )?;

    let lines = annotation_lines(&log.metadata);
    if !lines.is_empty() {
        let (x_range, y_range) = chart.plotting_area().get_pixel_range();
        draw_annotation(&root, &lines, (x_range.start + 12, y_range.start + 12))?;
    }

    root.present()?;
    Ok(())
}

/// Wheat-coloured text box with one metadata entry per line, anchored at
/// `origin` (top-left, in pixels).
fn draw_annotation<DB>(
    root: &DrawingArea<DB, Shift>,
    lines: &[String],
    origin: (i32, i32),
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const PADDING: i32 = 10;
    const LINE_GAP: i32 = 6;

    let style: TextStyle = (FONT, 20).into_font().color(&BLACK);

    let mut text_width = 0;
    let mut line_height = 0;
    for line in lines {
        let (w, h) = root.estimate_text_size(line, &style)?;
        text_width = text_width.max(w as i32);
        line_height = line_height.max(h as i32);
    }

    let rows = lines.len() as i32;
    let corner = (
        origin.0 + text_width + 2 * PADDING,
        origin.1 + rows * line_height + (rows - 1) * LINE_GAP + 2 * PADDING,
    );

    root.draw(&Rectangle::new([origin, corner], WHEAT.mix(0.8).filled()))?;
    root.draw(&Rectangle::new([origin, corner], BLACK.mix(0.4).stroke_width(1)))?;

    for (i, line) in lines.iter().enumerate() {
        let y = origin.1 + PADDING + i as i32 * (line_height + LINE_GAP);
        root.draw(&Text::new(
            line.clone(),
            (origin.0 + PADDING, y),
            style.clone(),
        ))?;
    }

    Ok(())
}
