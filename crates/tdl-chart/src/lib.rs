//! Chart rendering for the TDL2048 plotter.
//!
//! Turns a [`ParsedLog`](tdl_core::models::ParsedLog) into two line charts
//! (mean score and 2048-tile probability against episode) using
//! [`plotters`], written as PNG or SVG.

pub mod axis;
pub mod renderer;

pub use renderer::{ChartKind, ChartMetric, ChartOptions, ChartRenderer};
pub use tdl_core as core;
