//! Value-shape heuristics computed over a column's sampled cells.

use std::sync::OnceLock;

use regex::Regex;

use crate::columns::ColumnSamples;

static DATE_LIKE_RE: OnceLock<Regex> = OnceLock::new();

fn date_like_regex() -> &'static Regex {
    DATE_LIKE_RE.get_or_init(|| {
        Regex::new(r"\d{1,4}[-/.]\d{1,2}[-/.]\d{1,4}").expect("date pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleProfile {
    /// Share of samples that parse as a number (decimal comma accepted).
    pub numeric_ratio: f64,
    /// Share of samples containing a `d-d-d` shaped date.
    pub date_like_ratio: f64,
    /// Mean character length of the samples.
    pub text_length: f64,
}

/// Inspects `samples` and returns their value-shape ratios.
///
/// Every ratio divides by the number of provided samples, blanks included,
/// so a column with many missing cells scores lower across the board.
pub fn analyse_samples(samples: &ColumnSamples) -> SampleProfile {
    if samples.is_empty() {
        return SampleProfile::default();
    }

    let mut numeric_matches = 0usize;
    let mut date_matches = 0usize;
    let mut total_length = 0usize;

    for text in samples.present() {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        total_length += text.chars().count();
        if date_like_regex().is_match(text) {
            date_matches += 1;
        }
        if looks_numeric(text) {
            numeric_matches += 1;
        }
    }

    let total = samples.len().max(1) as f64;
    SampleProfile {
        numeric_ratio: numeric_matches as f64 / total,
        date_like_ratio: date_matches as f64 / total,
        text_length: total_length as f64 / total,
    }
}

/// True when `text` parses as a float once a decimal comma becomes a point.
pub fn looks_numeric(text: &str) -> bool {
    text.trim().replace(',', ".").parse::<f64>().is_ok()
}
