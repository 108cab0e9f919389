//! Line classifier and fold for TDL2048 training logs.
//!
//! A log mixes three kinds of interesting lines with arbitrary noise:
//!
//! ```text
//! alpha = 0.1
//! total = 100000
//! seed = 42
//! 1000	mean = 12345.6	max = 98765.4
//! 	2048	3.25%
//! ```
//!
//! Each line is classified into a [`LogLine`] and the classified lines are
//! folded into a [`ParsedLog`]. Probability lines belong to the episode line
//! that precedes them.

use regex::Regex;
use tdl_core::error::{PlotError, Result};
use tdl_core::models::{EpisodeRecord, MetadataKey, ParsedLog, RunMetadata, TrainingSeries};
use tracing::debug;

const METADATA_SEPARATOR: &str = " = ";

// ── LogLine ───────────────────────────────────────────────────────────────────

/// One classified line of a training log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    /// `alpha = 0.1`, `total = 1000` or `seed = 42`.
    Metadata { key: MetadataKey, value: String },
    /// `<episode> mean = <score> max = <score> ...`
    Episode { episode: u64, mean: f64 },
    /// `2048 <percent>%`, attached to the preceding episode.
    Probability(f64),
    /// An episode-shaped line whose episode number or mean does not parse.
    /// It still closes the previous episode, but contributes no data point.
    DroppedEpisode,
    /// Anything else, including probability lines whose number does not parse.
    Unrecognized,
}

// ── LogParser ─────────────────────────────────────────────────────────────────

/// Compiled patterns for classifying log lines.
///
/// # Example
/// ```
/// use tdl_data::parser::LogParser;
///
/// let log = LogParser::new()
///     .parse("seed = 42\n1000 mean = 5000.5 max = 16384\n  2048 1.5%")
///     .unwrap();
/// assert_eq!(log.metadata.seed.as_deref(), Some("42"));
/// assert_eq!(log.series.episodes(), &[0, 1000]);
/// assert_eq!(log.series.tile_probability(), &[0.0, 1.5]);
/// ```
#[derive(Debug, Clone)]
pub struct LogParser {
    episode_shape: Regex,
    mean_value: Regex,
    probability_shape: Regex,
    probability_value: Regex,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    pub fn new() -> Self {
        Self {
            episode_shape: Regex::new(r"^\d+\s+mean\s*=\s*[\d.]+\s+max\s*=\s*[\d.]+")
                .expect("regex is valid"),
            mean_value: Regex::new(r"mean\s*=\s*([\d.]+)").expect("regex is valid"),
            probability_shape: Regex::new(r"^\s*2048\s+[\d.]+%").expect("regex is valid"),
            probability_value: Regex::new(r"2048\s+([\d.]+)%").expect("regex is valid"),
        }
    }

    /// Parse a complete log.
    ///
    /// Fails only on a malformed metadata line; every other oddity is skipped.
    pub fn parse(&self, text: &str) -> Result<ParsedLog> {
        let mut builder = SeriesBuilder::default();

        for (index, raw) in text.lines().enumerate() {
            let line = self.classify(index + 1, raw)?;
            builder.apply(line);
        }

        let log = builder.finish();
        debug!(
            "Parsed {} episode records, {} metadata keys",
            log.series.len() - 1,
            log.metadata.entries().count()
        );
        Ok(log)
    }

    /// Classify a single line. `line_number` is 1-based and only used for
    /// error reporting and diagnostics.
    pub fn classify(&self, line_number: usize, raw: &str) -> Result<LogLine> {
        let line = raw.trim();

        if let Some(key) = MetadataKey::from_line(line) {
            let value = split_metadata(line_number, line)?;
            return Ok(LogLine::Metadata {
                key,
                value: value.to_string(),
            });
        }

        if self.episode_shape.is_match(line) {
            return Ok(self.episode(line_number, line));
        }

        if self.probability_shape.is_match(line) {
            return Ok(self.probability(line_number, line));
        }

        Ok(LogLine::Unrecognized)
    }

    fn episode(&self, line_number: usize, line: &str) -> LogLine {
        let episode = line
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u64>().ok());
        let mean = self
            .mean_value
            .captures(line)
            .and_then(|cap| cap[1].parse::<f64>().ok());

        match (episode, mean) {
            (Some(episode), Some(mean)) => LogLine::Episode { episode, mean },
            _ => {
                debug!("Skipping episode line {}: {:?}", line_number, line);
                LogLine::DroppedEpisode
            }
        }
    }

    fn probability(&self, line_number: usize, line: &str) -> LogLine {
        match self
            .probability_value
            .captures(line)
            .and_then(|cap| cap[1].parse::<f64>().ok())
        {
            Some(percent) => LogLine::Probability(percent),
            None => {
                debug!("Skipping probability line {}: {:?}", line_number, line);
                LogLine::Unrecognized
            }
        }
    }
}

/// Parse `text` with a freshly compiled [`LogParser`].
pub fn parse_log(text: &str) -> Result<ParsedLog> {
    LogParser::new().parse(text)
}

/// Return the value between the first `" = "` and the next one (or the end
/// of the line).
///
/// Lines reaching this from [`LogParser::classify`] already start with a
/// `"key = "` prefix, so the error branch only fires on direct calls.
fn split_metadata(line_number: usize, line: &str) -> Result<&str> {
    line.split(METADATA_SEPARATOR)
        .nth(1)
        .ok_or_else(|| PlotError::MalformedMetadataLine {
            line_number,
            line: line.to_string(),
        })
}

// ── SeriesBuilder ─────────────────────────────────────────────────────────────

/// Accumulates classified lines into a [`ParsedLog`].
///
/// `current` is the record still open for a probability line; it starts as
/// the origin sentinel and is appended when the next episode arrives or the
/// input ends. It is `None` after a dropped episode, so that episode's
/// probability line cannot land on a neighbour.
#[derive(Debug)]
struct SeriesBuilder {
    metadata: RunMetadata,
    series: TrainingSeries,
    current: Option<EpisodeRecord>,
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self {
            metadata: RunMetadata::default(),
            series: TrainingSeries::unseeded(),
            current: Some(EpisodeRecord::SENTINEL),
        }
    }
}

impl SeriesBuilder {
    fn apply(&mut self, line: LogLine) {
        match line {
            LogLine::Metadata { key, value } => self.metadata.set(key, value),
            LogLine::Episode { episode, mean } => {
                self.close_current();
                self.current = Some(EpisodeRecord::new(episode, mean));
            }
            LogLine::DroppedEpisode => self.close_current(),
            LogLine::Probability(percent) => {
                if let Some(record) = self.current.as_mut() {
                    record.tile_probability = percent;
                }
            }
            LogLine::Unrecognized => {}
        }
    }

    fn close_current(&mut self) {
        if let Some(done) = self.current.take() {
            self.series.push(done);
        }
    }

    fn finish(mut self) -> ParsedLog {
        self.close_current();
        ParsedLog {
            metadata: self.metadata,
            series: self.series,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
