//! Axis ranges for the episode charts.

/// Episode numbers are bucketed to this granularity for the x-axis bounds.
pub const EPISODE_BUCKET: u64 = 1000;

/// Number of intervals between x-axis ticks.
pub const TICK_STEPS: u64 = 10;

/// X-axis extent and tick positions for a set of episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeAxis {
    pub lower: u64,
    pub upper: u64,
    /// Evenly spaced from `lower` to `upper`, both inclusive.
    pub ticks: Vec<u64>,
}

impl EpisodeAxis {
    /// Span `floor(min/1000)*1000 ..= floor(max/1000)*1000 + 1000` in ten
    /// equal steps.
    ///
    /// ```
    /// use tdl_chart::axis::EpisodeAxis;
    ///
    /// let axis = EpisodeAxis::from_episodes(&[0, 1000, 9500]);
    /// assert_eq!(axis.lower, 0);
    /// assert_eq!(axis.upper, 10_000);
    /// assert_eq!(axis.ticks[1], 1000);
    /// ```
    pub fn from_episodes(episodes: &[u64]) -> Self {
        let min = episodes.iter().copied().min().unwrap_or(0);
        let max = episodes.iter().copied().max().unwrap_or(0);

        let lower = (min / EPISODE_BUCKET) * EPISODE_BUCKET;
        let upper = (max / EPISODE_BUCKET)
            .saturating_mul(EPISODE_BUCKET)
            .saturating_add(EPISODE_BUCKET);
        let step = ((upper - lower) / TICK_STEPS).max(1);

        let ticks = (0..=TICK_STEPS)
            .map(|i| lower + i * step)
            .take_while(|t| *t <= upper)
            .collect();

        Self {
            lower,
            upper,
            ticks,
        }
    }

    pub fn step(&self) -> u64 {
        match self.ticks.as_slice() {
            [first, second, ..] => second - first,
            _ => 0,
        }
    }
}

/// Y-axis bounds for `values`: always includes zero, with 5% headroom above
/// the largest value. Non-finite values are ignored.
pub fn value_bounds(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if max > min {
        (min, max + (max - min) * 0.05)
    } else {
        (min, min + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_typical_run() {
        let axis = EpisodeAxis::from_episodes(&[0, 1000, 2000, 100_000]);
        assert_eq!(axis.lower, 0);
        assert_eq!(axis.upper, 101_000);
        assert_eq!(axis.step(), 10_100);
        assert_eq!(axis.ticks.len(), 11);
        assert_eq!(axis.ticks.last(), Some(&101_000));
    }

    #[test]
    fn test_axis_only_sentinel() {
        let axis = EpisodeAxis::from_episodes(&[0]);
        assert_eq!(axis.lower, 0);
        assert_eq!(axis.upper, 1000);
        assert_eq!(
            axis.ticks,
            vec![0, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]
        );
    }

    #[test]
    fn test_axis_empty_input() {
        assert_eq!(
            EpisodeAxis::from_episodes(&[]),
            EpisodeAxis::from_episodes(&[0])
        );
    }

    #[test]
    fn test_axis_floors_lower_bound() {
        let axis = EpisodeAxis::from_episodes(&[5500, 7200]);
        assert_eq!(axis.lower, 5000);
        assert_eq!(axis.upper, 8000);
        assert_eq!(axis.step(), 300);
    }

    #[test]
    fn test_axis_unordered_episodes() {
        let axis = EpisodeAxis::from_episodes(&[3000, 1000, 2000]);
        assert_eq!(axis.lower, 1000);
        assert_eq!(axis.upper, 4000);
    }

    #[test]
    fn test_axis_does_not_overflow() {
        let axis = EpisodeAxis::from_episodes(&[u64::MAX]);
        assert!(axis.upper >= axis.lower);
        assert!(!axis.ticks.is_empty());
    }

    #[test]
    fn test_value_bounds_includes_zero_and_headroom() {
        let (lo, hi) = value_bounds(&[0.0, 50.0, 100.0]);
        assert_eq!(lo, 0.0);
        assert!((hi - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_bounds_flat_series() {
        assert_eq!(value_bounds(&[0.0, 0.0]), (0.0, 1.0));
    }

    #[test]
    fn test_value_bounds_ignores_non_finite() {
        let (lo, hi) = value_bounds(&[f64::NAN, 10.0, f64::INFINITY]);
        assert_eq!(lo, 0.0);
        assert!((hi - 10.5).abs() < 1e-9);
    }
}
