//! Data ingestion layer for the TDL2048 plotter.
//!
//! Reads training logs and turns their loosely structured text into run
//! metadata plus aligned episode / mean / tile-probability series.

pub mod parser;
pub mod reader;

pub use tdl_core as core;
