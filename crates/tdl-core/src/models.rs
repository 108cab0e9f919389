use serde::{Deserialize, Serialize};

/// Tile value whose reach-probability the training log reports.
pub const TARGET_TILE: u32 = 2048;

/// The closed set of run parameters printed at the top of a training log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataKey {
    /// Learning rate.
    Alpha,
    /// Total number of training episodes.
    Total,
    /// Random seed.
    Seed,
}

impl MetadataKey {
    /// All keys, in annotation order.
    pub const ALL: [MetadataKey; 3] = [MetadataKey::Alpha, MetadataKey::Total, MetadataKey::Seed];

    /// The line prefix that introduces this key, e.g. `"alpha = "`.
    pub fn prefix(self) -> &'static str {
        match self {
            MetadataKey::Alpha => "alpha = ",
            MetadataKey::Total => "total = ",
            MetadataKey::Seed => "seed = ",
        }
    }

    /// Human-readable label used in chart annotations.
    pub fn label(self) -> &'static str {
        match self {
            MetadataKey::Alpha => "Alpha",
            MetadataKey::Total => "Total",
            MetadataKey::Seed => "Seed",
        }
    }

    /// Return the key whose prefix starts `line`, if any.
    pub fn from_line(line: &str) -> Option<MetadataKey> {
        Self::ALL.into_iter().find(|k| line.starts_with(k.prefix()))
    }
}

/// Run parameters extracted verbatim from `key = value` lines.
///
/// Values keep their original text; nothing is coerced to a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

impl RunMetadata {
    pub fn get(&self, key: MetadataKey) -> Option<&str> {
        match key {
            MetadataKey::Alpha => self.alpha.as_deref(),
            MetadataKey::Total => self.total.as_deref(),
            MetadataKey::Seed => self.seed.as_deref(),
        }
    }

    /// Store `value` under `key`, replacing any earlier value.
    pub fn set(&mut self, key: MetadataKey, value: impl Into<String>) {
        let slot = match key {
            MetadataKey::Alpha => &mut self.alpha,
            MetadataKey::Total => &mut self.total,
            MetadataKey::Seed => &mut self.seed,
        };
        *slot = Some(value.into());
    }

    /// Present entries in annotation order.
    pub fn entries(&self) -> impl Iterator<Item = (MetadataKey, &str)> + '_ {
        MetadataKey::ALL
            .into_iter()
            .filter_map(|k| self.get(k).map(|v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

/// One data point: an episode, its mean score and its tile probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: u64,
    pub mean: f64,
    /// Percentage of evaluation games that reached the target tile.
    pub tile_probability: f64,
}

impl EpisodeRecord {
    /// The synthetic origin point every series starts with.
    pub const SENTINEL: EpisodeRecord = EpisodeRecord {
        episode: 0,
        mean: 0.0,
        tile_probability: 0.0,
    };

    /// A freshly read episode whose probability is not known yet.
    pub fn new(episode: u64, mean: f64) -> Self {
        Self {
            episode,
            mean,
            tile_probability: 0.0,
        }
    }
}

/// Index-aligned episode, mean and probability sequences.
///
/// The three vectors always have the same length; they can only grow through
/// [`TrainingSeries::push`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSeries {
    episodes: Vec<u64>,
    means: Vec<f64>,
    tile_probability: Vec<f64>,
}

impl TrainingSeries {
    /// An empty series with no sentinel. Use [`Default`] for the seeded one.
    pub fn unseeded() -> Self {
        Self {
            episodes: Vec::new(),
            means: Vec::new(),
            tile_probability: Vec::new(),
        }
    }

    pub fn push(&mut self, record: EpisodeRecord) {
        self.episodes.push(record.episode);
        self.means.push(record.mean);
        self.tile_probability.push(record.tile_probability);
    }

    pub fn episodes(&self) -> &[u64] {
        &self.episodes
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn tile_probability(&self) -> &[f64] {
        &self.tile_probability
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<EpisodeRecord> {
        Some(EpisodeRecord {
            episode: *self.episodes.get(index)?,
            mean: *self.means.get(index)?,
            tile_probability: *self.tile_probability.get(index)?,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = EpisodeRecord> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// `(episode, mean)` pairs for plotting.
    pub fn mean_points(&self) -> Vec<(u64, f64)> {
        self.episodes
            .iter()
            .copied()
            .zip(self.means.iter().copied())
            .collect()
    }

    /// `(episode, probability)` pairs for plotting.
    pub fn probability_points(&self) -> Vec<(u64, f64)> {
        self.episodes
            .iter()
            .copied()
            .zip(self.tile_probability.iter().copied())
            .collect()
    }
}

impl Default for TrainingSeries {
    /// A series holding only the origin sentinel.
    fn default() -> Self {
        let mut series = Self::unseeded();
        series.push(EpisodeRecord::SENTINEL);
        series
    }
}

/// Everything extracted from one training log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedLog {
    pub metadata: RunMetadata,
    pub series: TrainingSeries,
}

impl ParsedLog {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_series(&self.series)
    }
}

/// Headline statistics for a parsed run, excluding the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of real episode records.
    pub data_points: usize,
    pub last: Option<EpisodeRecord>,
    /// Record with the highest mean score.
    pub best_mean: Option<EpisodeRecord>,
    /// Record with the highest tile probability.
    pub best_probability: Option<EpisodeRecord>,
}

impl RunSummary {
    pub fn from_series(series: &TrainingSeries) -> Self {
        let records: Vec<EpisodeRecord> = series.records().skip(1).collect();

        // Ties keep the earliest record.
        let best_by = |f: fn(&EpisodeRecord) -> f64| {
            records.iter().copied().fold(None, |best: Option<EpisodeRecord>, r| match best {
                Some(b) if f(&b) >= f(&r) => Some(b),
                _ => Some(r),
            })
        };

        Self {
            data_points: records.len(),
            last: records.last().copied(),
            best_mean: best_by(|r: &EpisodeRecord| r.mean),
            best_probability: best_by(|r: &EpisodeRecord| r.tile_probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_key_from_line() {
        assert_eq!(MetadataKey::from_line("alpha = 0.1"), Some(MetadataKey::Alpha));
        assert_eq!(MetadataKey::from_line("total = 1000"), Some(MetadataKey::Total));
        assert_eq!(MetadataKey::from_line("seed = 42"), Some(MetadataKey::Seed));
        assert_eq!(MetadataKey::from_line("alpha=0.1"), None);
        assert_eq!(MetadataKey::from_line("gamma = 1"), None);
    }

    #[test]
    fn test_run_metadata_set_overwrites() {
        let mut meta = RunMetadata::default();
        assert!(meta.is_empty());
        meta.set(MetadataKey::Seed, "42");
        meta.set(MetadataKey::Seed, "7");
        assert_eq!(meta.get(MetadataKey::Seed), Some("7"));
        assert!(!meta.is_empty());
    }

    #[test]
    fn test_run_metadata_entries_in_fixed_order() {
        let mut meta = RunMetadata::default();
        meta.set(MetadataKey::Seed, "42");
        meta.set(MetadataKey::Alpha, "0.1");
        let entries: Vec<_> = meta.entries().collect();
        assert_eq!(
            entries,
            vec![(MetadataKey::Alpha, "0.1"), (MetadataKey::Seed, "42")]
        );
    }

    #[test]
    fn test_series_default_holds_sentinel() {
        let series = TrainingSeries::default();
        assert_eq!(series.episodes(), &[0]);
        assert_eq!(series.means(), &[0.0]);
        assert_eq!(series.tile_probability(), &[0.0]);
    }

    #[test]
    fn test_series_push_keeps_alignment() {
        let mut series = TrainingSeries::default();
        series.push(EpisodeRecord {
            episode: 1000,
            mean: 5000.5,
            tile_probability: 1.5,
        });
        assert_eq!(series.len(), 2);
        assert_eq!(series.means().len(), 2);
        assert_eq!(series.tile_probability().len(), 2);
        assert_eq!(series.mean_points(), vec![(0, 0.0), (1000, 5000.5)]);
        assert_eq!(series.probability_points(), vec![(0, 0.0), (1000, 1.5)]);
    }

    #[test]
    fn test_summary_skips_sentinel() {
        let mut series = TrainingSeries::default();
        series.push(EpisodeRecord {
            episode: 1000,
            mean: 9000.0,
            tile_probability: 2.0,
        });
        series.push(EpisodeRecord {
            episode: 2000,
            mean: 8000.0,
            tile_probability: 4.0,
        });

        let summary = RunSummary::from_series(&series);
        assert_eq!(summary.data_points, 2);
        assert_eq!(summary.last.map(|r| r.episode), Some(2000));
        assert_eq!(summary.best_mean.map(|r| r.episode), Some(1000));
        assert_eq!(summary.best_probability.map(|r| r.episode), Some(2000));
    }

    #[test]
    fn test_summary_of_empty_run() {
        let summary = RunSummary::from_series(&TrainingSeries::default());
        assert_eq!(summary.data_points, 0);
        assert!(summary.last.is_none());
        assert!(summary.best_mean.is_none());
    }

    #[test]
    fn test_parsed_log_serializes_without_absent_keys() {
        let mut log = ParsedLog::default();
        log.metadata.set(MetadataKey::Alpha, "0.1");
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["metadata"], serde_json::json!({"alpha": "0.1"}));
        assert_eq!(json["series"]["episodes"], serde_json::json!([0]));
    }
}
