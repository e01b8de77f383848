//! Maps spreadsheet columns onto canonical fields.
//!
//! Each field is resolved by the first strategy that succeeds:
//!
//! 1. an explicit field → column mapping supplied by the caller (a mapping to
//!    a column that does not exist is an error, never a hint);
//! 2. exact alias match on the trimmed, case-folded header;
//! 3. keyword substring match, scanning columns in file order;
//! 4. the [`ColumnGuesser`], when the resolver was given one.
//!
//! [`suggest_column_mapping`] and [`ColumnResolver::suggest`] never fail:
//! fields no strategy could place are reported in [`Resolution::missing`]
//! (required) or [`Resolution::unresolved_optional`].
//!
//! Columns named by the explicit mapping are claimed before the pass starts.
//! Outside strict mode the automatic strategies may still hand the same
//! column to two fields; only the guesser skips claimed columns.

use std::collections::{BTreeMap, HashSet};

use caseless::default_case_fold_str;
use log::debug;
use serde::Serialize;

use crate::{
    columns::{self, CandidateColumn},
    error::ColumnMappingError,
    fields::CanonicalField,
    guesser::ColumnGuesser,
};

pub type ColumnMapping = BTreeMap<CanonicalField, String>;
pub type AliasTable = BTreeMap<CanonicalField, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Explicit,
    Alias,
    Keyword,
    Classifier { score: f64 },
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Explicit => "explicit",
            Strategy::Alias => "alias",
            Strategy::Keyword => "keyword",
            Strategy::Classifier { .. } => "classifier",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub column: String,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub assignments: BTreeMap<CanonicalField, Assignment>,
    /// Required fields that could not be resolved, in canonical order.
    pub missing: Vec<CanonicalField>,
    pub unresolved_optional: Vec<CanonicalField>,
}

impl Resolution {
    pub fn column(&self, field: CanonicalField) -> Option<&str> {
        self.assignments
            .get(&field)
            .map(|assignment| assignment.column.as_str())
    }

    /// Plain field → column view of the assignments.
    pub fn mapping(&self) -> ColumnMapping {
        self.assignments
            .iter()
            .map(|(field, assignment)| (*field, assignment.column.clone()))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnResolver<'g> {
    column_mapping: ColumnMapping,
    aliases: AliasTable,
    guesser: Option<&'g ColumnGuesser>,
    strict: bool,
}

impl<'g> ColumnResolver<'g> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, column_mapping: ColumnMapping) -> Self {
        self.column_mapping = column_mapping;
        self
    }

    /// Extra aliases, tried after the built-in ones for each field.
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_guesser(mut self, guesser: &'g ColumnGuesser) -> Self {
        self.guesser = Some(guesser);
        self
    }

    /// In strict mode no column is assigned to more than one field.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves a single field against `columns`, ignoring other fields.
    pub fn resolve_field(
        &self,
        field: CanonicalField,
        columns: &[CandidateColumn],
    ) -> Result<Assignment, ColumnMappingError> {
        self.resolve_one(field, columns, &BTreeMap::new())
    }

    /// Resolves every field, collecting the ones that could not be placed.
    pub fn suggest(&self, columns: &[CandidateColumn]) -> Resolution {
        self.run_pass(columns).0
    }

    /// Resolves every field and fails on the first unresolved required one.
    pub fn resolve(&self, columns: &[CandidateColumn]) -> Result<Resolution, ColumnMappingError> {
        let (resolution, errors) = self.run_pass(columns);
        match errors.into_iter().find(|(field, _)| field.is_required()) {
            Some((_, err)) => Err(err),
            None => Ok(resolution),
        }
    }

    fn run_pass(
        &self,
        columns: &[CandidateColumn],
    ) -> (Resolution, Vec<(CanonicalField, ColumnMappingError)>) {
        let mut resolution = Resolution::default();
        let mut errors = Vec::new();
        // Explicitly mapped columns are reserved before any automatic match.
        let mut claimed: BTreeMap<String, CanonicalField> = BTreeMap::new();
        for (field, column) in &self.column_mapping {
            if columns.iter().any(|candidate| candidate.header == *column) {
                claimed.entry(column.clone()).or_insert(*field);
            }
        }

        for field in CanonicalField::all() {
            match self.resolve_one(field, columns, &claimed) {
                Ok(assignment) => {
                    debug!(
                        "Field '{field}' -> column '{}' via {}",
                        assignment.column,
                        assignment.strategy.as_str()
                    );
                    claimed.entry(assignment.column.clone()).or_insert(field);
                    resolution.assignments.insert(field, assignment);
                }
                Err(err) => {
                    debug!("Field '{field}' unresolved: {err}");
                    if field.is_required() {
                        resolution.missing.push(field);
                    } else {
                        resolution.unresolved_optional.push(field);
                    }
                    errors.push((field, err));
                }
            }
        }
        (resolution, errors)
    }

    fn resolve_one(
        &self,
        field: CanonicalField,
        columns: &[CandidateColumn],
        claimed: &BTreeMap<String, CanonicalField>,
    ) -> Result<Assignment, ColumnMappingError> {
        if let Some(column) = self.column_mapping.get(&field) {
            if !columns.iter().any(|candidate| candidate.header == *column) {
                return Err(ColumnMappingError::InvalidColumn {
                    field: field.to_string(),
                    column: column.clone(),
                });
            }
            if self.strict
                && let Some(owner) = claimed.get(column)
                && *owner != field
            {
                return Err(ColumnMappingError::ColumnReused {
                    field: field.to_string(),
                    column: column.clone(),
                    assigned_to: owner.to_string(),
                });
            }
            return Ok(Assignment {
                column: column.clone(),
                strategy: Strategy::Explicit,
            });
        }

        let available = columns
            .iter()
            .filter(|candidate| !self.strict || !claimed.contains_key(&candidate.header))
            .map(|candidate| candidate.header.as_str())
            .collect::<Vec<_>>();

        if let Some(column) = self.match_alias(field, &available) {
            return Ok(Assignment {
                column: column.to_string(),
                strategy: Strategy::Alias,
            });
        }

        if let Some(column) = match_keyword(field, &available) {
            return Ok(Assignment {
                column: column.to_string(),
                strategy: Strategy::Keyword,
            });
        }

        if let Some(guesser) = self.guesser {
            let assigned = claimed.keys().cloned().collect::<HashSet<_>>();
            let guess = guesser.guess(field, columns, &assigned);
            if let Some(column) = guess.column {
                return Ok(Assignment {
                    column,
                    strategy: Strategy::Classifier { score: guess.score },
                });
            }
        }

        Err(ColumnMappingError::Unresolved {
            field: field.to_string(),
        })
    }

    fn match_alias<'c>(&self, field: CanonicalField, available: &[&'c str]) -> Option<&'c str> {
        let normalized = available
            .iter()
            .map(|column| (normalize_header(column), *column))
            .collect::<Vec<_>>();
        let defaults = field
            .default_aliases()
            .iter()
            .map(|alias| normalize_header(alias));
        let extras = self
            .aliases
            .get(&field)
            .into_iter()
            .flatten()
            .map(|alias| normalize_header(alias));
        defaults.chain(extras).find_map(|alias| {
            normalized
                .iter()
                .find(|(header, _)| *header == alias)
                .map(|(_, column)| *column)
        })
    }
}

fn match_keyword<'c>(field: CanonicalField, available: &[&'c str]) -> Option<&'c str> {
    let keywords = field
        .keywords()
        .iter()
        .map(|keyword| normalize_header(keyword))
        .collect::<Vec<_>>();
    available.iter().copied().find(|column| {
        let header = normalize_header(column);
        keywords.iter().any(|keyword| header.contains(keyword.as_str()))
    })
}

/// Trims and case-folds a header or alias for comparison.
pub fn normalize_header(value: &str) -> String {
    default_case_fold_str(value.trim())
}

/// Resolves one field against bare headers, without the classifier.
pub fn resolve_field(
    field: CanonicalField,
    available_columns: &[String],
    column_mapping: Option<&ColumnMapping>,
    aliases: Option<&AliasTable>,
) -> Result<String, ColumnMappingError> {
    header_resolver(column_mapping, aliases)
        .resolve_field(field, &columns::from_headers(available_columns))
        .map(|assignment| assignment.column)
}

/// Best-effort mapping for bare headers; never fails.
///
/// Unresolved fields are split in two lists: required ones go to
/// [`Resolution::missing`], so an empty `missing` means the mapping is
/// usable, and optional ones go to [`Resolution::unresolved_optional`].
/// Together they hold every field without an assignment.
pub fn suggest_column_mapping(
    columns: &[String],
    column_mapping: Option<&ColumnMapping>,
    aliases: Option<&AliasTable>,
) -> Resolution {
    header_resolver(column_mapping, aliases).suggest(&columns::from_headers(columns))
}

fn header_resolver(
    column_mapping: Option<&ColumnMapping>,
    aliases: Option<&AliasTable>,
) -> ColumnResolver<'static> {
    ColumnResolver::new()
        .with_mapping(column_mapping.cloned().unwrap_or_default())
        .with_aliases(aliases.cloned().unwrap_or_default())
}
