//! Canonical fields an operation spreadsheet column can be mapped to.
//!
//! Each field carries the alias list used for exact header matching and the
//! keyword list used for substring matching. Training examples for the
//! classifier live in [`crate::training`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ColumnMappingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Employee,
    Process,
    Quantity,
    DurationMinutes,
    Machine,
    ProcessType,
}

impl CanonicalField {
    pub const REQUIRED: [CanonicalField; 5] = [
        CanonicalField::Date,
        CanonicalField::Employee,
        CanonicalField::Process,
        CanonicalField::Quantity,
        CanonicalField::DurationMinutes,
    ];

    pub const OPTIONAL: [CanonicalField; 2] =
        [CanonicalField::Machine, CanonicalField::ProcessType];

    /// Every field, required ones first, in resolution order.
    pub fn all() -> impl Iterator<Item = CanonicalField> {
        Self::REQUIRED.into_iter().chain(Self::OPTIONAL)
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().map(|field| field.as_str()).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::Employee => "employee",
            CanonicalField::Process => "process",
            CanonicalField::Quantity => "quantity",
            CanonicalField::DurationMinutes => "duration_minutes",
            CanonicalField::Machine => "machine",
            CanonicalField::ProcessType => "process_type",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, CanonicalField::Machine | CanonicalField::ProcessType)
    }

    /// Human label used in reports and the `fields` listing.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::Date => "Data",
            CanonicalField::Employee => "Dipendente",
            CanonicalField::Process => "Processo",
            CanonicalField::Quantity => "Quantità",
            CanonicalField::DurationMinutes => "Durata (min)",
            CanonicalField::Machine => "Macchina",
            CanonicalField::ProcessType => "Tipo processo",
        }
    }

    /// Header strings that identify the field when they match exactly
    /// (after trimming and lowercasing).
    pub fn default_aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Date => &["data", "date", "giorno"],
            CanonicalField::Employee => &["dipendente", "operatore", "employee"],
            CanonicalField::Process => &["processo", "fase", "process"],
            CanonicalField::Quantity => &["quantità", "pezzi", "quantity", "pieces"],
            CanonicalField::DurationMinutes => {
                &["durata (min)", "durata", "minuti", "duration", "minutes"]
            }
            CanonicalField::Machine => &["macchina", "machine", "impianto"],
            CanonicalField::ProcessType => &["tipo processo", "tipologia", "process type"],
        }
    }

    /// Substrings that commonly appear inside headers for the field.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Date => &["data", "date", "giorno", "day"],
            CanonicalField::Employee => &["operat", "dipendent", "employee", "worker", "addett"],
            CanonicalField::Process => &["process", "fase", "lavoraz", "stage", "linea"],
            CanonicalField::Quantity => &["quant", "pezz", "pieces", "qta", "qty"],
            CanonicalField::DurationMinutes => &["durat", "minut", "duration", "tempo"],
            CanonicalField::Machine => &["macchin", "machine", "impiant", "postazion"],
            CanonicalField::ProcessType => &["tipo", "tipolog", "categori", "famiglia", "type"],
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ColumnMappingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace([' ', '-'], "_");
        Self::all()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ColumnMappingError::UnknownField(value.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(
            "Duration-Minutes".parse::<CanonicalField>().unwrap(),
            CanonicalField::DurationMinutes
        );
        assert_eq!(
            " process type ".parse::<CanonicalField>().unwrap(),
            CanonicalField::ProcessType
        );
        assert!(matches!(
            "shift".parse::<CanonicalField>(),
            Err(ColumnMappingError::UnknownField(name)) if name == "shift"
        ));
    }

    #[test]
    fn required_fields_precede_optional_ones() {
        let all = CanonicalField::all().collect::<Vec<_>>();
        assert_eq!(all.len(), 7);
        assert!(all[..5].iter().all(CanonicalField::is_required));
        assert!(all[5..].iter().all(|field| !field.is_required()));
    }

    #[test]
    fn every_field_has_aliases_and_keywords() {
        for field in CanonicalField::all() {
            assert!(!field.default_aliases().is_empty(), "{field} aliases");
            assert!(!field.keywords().is_empty(), "{field} keywords");
        }
    }
}
