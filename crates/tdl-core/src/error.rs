use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the TDL2048 plotter.
#[derive(Error, Debug)]
pub enum PlotError {
    /// The training log could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line starts with a metadata key but has no `" = "` separator.
    ///
    /// `LogParser::parse` never returns this: every key prefix ends in
    /// `" = "`, so a trimmed line that matches one always contains the
    /// separator. Only a direct call to the separator helper can hit it.
    #[error("Malformed metadata on line {line_number}: {line:?}")]
    MalformedMetadataLine { line_number: usize, line: String },

    /// A plotting backend failed while producing an artifact.
    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },

    /// A chart was requested with a zero-sized canvas.
    #[error("Invalid chart dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the plotter crates.
pub type Result<T> = std::result::Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PlotError::FileRead {
            path: PathBuf::from("/runs/statistics.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/runs/statistics.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_malformed_metadata() {
        let err = PlotError::MalformedMetadataLine {
            line_number: 3,
            line: "alpha =0.1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed metadata on line 3: \"alpha =0.1\""
        );
    }

    #[test]
    fn test_error_display_render() {
        let err = PlotError::Render {
            path: PathBuf::from("out-mean.png"),
            message: "font unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to render out-mean.png: font unavailable"
        );
    }

    #[test]
    fn test_error_display_invalid_dimensions() {
        let err = PlotError::InvalidDimensions {
            width: 0,
            height: 800,
        };
        assert_eq!(err.to_string(), "Invalid chart dimensions: 0x800");
    }

    #[test]
    fn test_error_display_config() {
        let err = PlotError::Config("unknown format".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown format");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PlotError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: PlotError = json_err.into();
        assert!(err.to_string().contains("Failed to process JSON"));
    }
}
