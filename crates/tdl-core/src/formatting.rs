use crate::models::{EpisodeRecord, ParsedLog, RunMetadata, TARGET_TILE};

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use tdl_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // `frac_str` looks like "0.50"; keep ".50".
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a percentage with a trailing `%`.
///
/// ```
/// use tdl_core::formatting::format_percent;
///
/// assert_eq!(format_percent(3.25, 2), "3.25%");
/// assert_eq!(format_percent(100.0, 1), "100.0%");
/// ```
pub fn format_percent(value: f64, decimals: u32) -> String {
    format!("{}%", format_number(value, decimals))
}

/// Build the `"Label: value"` lines shown in the chart annotation box.
///
/// Only keys present in `metadata` produce a line, always in the order
/// alpha, total, seed.
///
/// ```
/// use tdl_core::formatting::annotation_lines;
/// use tdl_core::models::{MetadataKey, RunMetadata};
///
/// let mut meta = RunMetadata::default();
/// meta.set(MetadataKey::Seed, "42");
/// meta.set(MetadataKey::Alpha, "0.1");
/// assert_eq!(annotation_lines(&meta), vec!["Alpha: 0.1", "Seed: 42"]);
/// ```
pub fn annotation_lines(metadata: &RunMetadata) -> Vec<String> {
    metadata
        .entries()
        .map(|(key, value)| format!("{}: {}", key.label(), value))
        .collect()
}

/// Render a plain-text report of a parsed run for terminal output.
pub fn format_summary(log: &ParsedLog) -> String {
    let summary = log.summary();
    let mut out = Vec::new();

    out.push("TDL2048 training run".to_string());
    for line in annotation_lines(&log.metadata) {
        out.push(format!("  {}", line));
    }
    out.push(format!("  Data points: {}", summary.data_points));

    let describe = |label: &str, record: Option<EpisodeRecord>| match record {
        Some(r) => format!(
            "  {}: episode {} (mean {}, {}-tile {})",
            label,
            format_number(r.episode as f64, 0),
            format_number(r.mean, 1),
            TARGET_TILE,
            format_percent(r.tile_probability, 2),
        ),
        None => format!("  {}: n/a", label),
    };

    out.push(describe("Last", summary.last));
    out.push(describe("Best mean", summary.best_mean));
    out.push(describe("Best tile rate", summary.best_probability));

    out.join("\n")
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
