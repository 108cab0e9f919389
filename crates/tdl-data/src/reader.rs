//! Training-log loading.
//!
//! Reads the raw text of a TDL2048 statistics file (or stdin) and runs it
//! through the [`LogParser`](crate::parser::LogParser).

use std::io::Read;
use std::path::Path;

use tdl_core::error::{PlotError, Result};
use tdl_core::models::ParsedLog;
use tracing::{debug, info};

use crate::parser::LogParser;

/// Path value that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

// ── Public API ────────────────────────────────────────────────────────────────

/// Read the whole log at `path` into memory. `-` reads stdin.
pub fn read_log(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_PATH) {
        return read_from(std::io::stdin().lock(), path);
    }

    let text = std::fs::read_to_string(path).map_err(|source| PlotError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Read and parse the log at `path`.
pub fn load_run(path: &Path) -> Result<ParsedLog> {
    let text = read_log(path)?;
    let log = LogParser::new().parse(&text)?;

    info!(
        "Loaded {} episode records from {}",
        log.series.len() - 1,
        display_name(path)
    );
    Ok(log)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_from<R: Read>(mut reader: R, path: &Path) -> Result<String> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| PlotError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(text)
}

fn display_name(path: &Path) -> String {
    if path == Path::new(STDIN_PATH) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_read_log_returns_contents() {
        let dir = TempDir::new().unwrap();
        let path = write_log(dir.path(), "statistics.txt", &["alpha = 0.1"]);

        assert_eq!(read_log(&path).unwrap(), "alpha = 0.1\n");
    }

    #[test]
    fn test_read_log_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");

        match read_log(&missing).unwrap_err() {
            PlotError::FileRead { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_from_reader() {
        let text = read_from("seed = 1\n".as_bytes(), Path::new(STDIN_PATH)).unwrap();
        assert_eq!(text, "seed = 1\n");
    }

    #[test]
    fn test_read_from_invalid_utf8() {
        let bytes: &[u8] = &[0xff, 0xfe, 0xfd];
        assert!(matches!(
            read_from(bytes, Path::new(STDIN_PATH)),
            Err(PlotError::FileRead { .. })
        ));
    }

    #[test]
    fn test_load_run_parses_file() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "statistics.txt",
            &[
                "alpha = 0.1",
                "total = 2000",
                "seed = 42",
                "1000\tmean = 2500.5\tmax = 4096",
                "\t2048\t0%",
                "2000\tmean = 5000.25\tmax = 8192",
                "\t2048\t1.75%",
            ],
        );

        let log = load_run(&path).unwrap();
        assert_eq!(log.metadata.total.as_deref(), Some("2000"));
        assert_eq!(log.series.episodes(), &[0, 1000, 2000]);
        assert_eq!(log.series.means(), &[0.0, 2500.5, 5000.25]);
        assert_eq!(log.series.tile_probability(), &[0.0, 0.0, 1.75]);
    }

    #[test]
    fn test_display_name_for_stdin() {
        assert_eq!(display_name(Path::new("-")), "<stdin>");
        assert_eq!(display_name(Path::new("a.txt")), "a.txt");
    }
}
