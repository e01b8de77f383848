//! Candidate columns handed to the resolver: a header plus a few values.

use std::borrow::Cow;

/// Sampled cell values for one column.
///
/// Missing cells (absent, blank, or a literal `nan`) are stored as `None`.
/// They still count towards [`ColumnSamples::len`], which the heuristics use
/// as their denominator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSamples {
    values: Vec<Option<String>>,
}

impl ColumnSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds samples from raw cell text, normalizing missing markers.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            values: raw
                .into_iter()
                .map(|value| normalize_cell(value.as_ref()).map(Cow::into_owned))
                .collect(),
        }
    }

    /// Builds samples from cells that may already be absent.
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        Self {
            values: cells
                .into_iter()
                .map(|cell| {
                    cell.and_then(|value| normalize_cell(value.as_ref()).map(Cow::into_owned))
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present (non-missing) values in sample order.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(|value| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.values.iter().map(|value| value.as_deref())
    }
}

impl<S: AsRef<str>> FromIterator<S> for ColumnSamples {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_raw(iter)
    }
}

/// Returns the trimmed cell text, or `None` when the cell counts as missing.
pub fn normalize_cell(raw: &str) -> Option<Cow<'_, str>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    if trimmed.len() == raw.len() {
        Some(Cow::Borrowed(raw))
    } else {
        Some(Cow::Owned(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateColumn {
    pub header: String,
    pub samples: ColumnSamples,
}

impl CandidateColumn {
    pub fn new(header: impl Into<String>, samples: ColumnSamples) -> Self {
        Self {
            header: header.into(),
            samples,
        }
    }

    /// A column known only by its header.
    pub fn header_only(header: impl Into<String>) -> Self {
        Self::new(header, ColumnSamples::new())
    }
}

/// Wraps bare headers as sample-less candidates.
pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Vec<CandidateColumn> {
    headers
        .iter()
        .map(|header| CandidateColumn::header_only(header.as_ref()))
        .collect()
}
