//! Shared types for the TDL2048 training-log plotter.
//!
//! Holds the parsed-run data model, the error type, CLI settings with
//! persisted last-used options, and text formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{PlotError, Result};
