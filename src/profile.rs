//! Mapping profiles: YAML files that pin columns and add aliases, merged
//! with `FIELD=VALUE` overrides from the command line.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Deserialize;

use crate::{
    cli::MappingArgs,
    error::ColumnMappingError,
    fields::CanonicalField,
    loader::{DEFAULT_SAMPLE_ROWS, LoadOptions},
    resolver::{AliasTable, ColumnMapping},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingProfile {
    /// Field name → exact column header.
    pub columns: BTreeMap<String, String>,
    /// Field name → extra header aliases.
    pub aliases: BTreeMap<String, Vec<String>>,
    pub strict: bool,
    pub sample_rows: Option<usize>,
}

impl MappingProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening mapping profile {path:?}"))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Parsing mapping profile {path:?}"))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn column_mapping(&self) -> Result<ColumnMapping, ColumnMappingError> {
        self.columns
            .iter()
            .map(|(field, column)| {
                let field: CanonicalField = field.parse()?;
                Ok::<_, ColumnMappingError>((field, column.trim().to_string()))
            })
            .collect()
    }

    pub fn alias_table(&self) -> Result<AliasTable, ColumnMappingError> {
        let mut table = AliasTable::new();
        for (field, aliases) in &self.aliases {
            let field: CanonicalField = field.parse()?;
            table
                .entry(field)
                .or_default()
                .extend(aliases.iter().map(|alias| alias.trim().to_string()));
        }
        Ok(table)
    }
}

/// Splits `FIELD=VALUE`, validating the field name.
pub fn parse_assignment(raw: &str) -> Result<(CanonicalField, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected FIELD=VALUE but got '{raw}'"))?;
    let field: CanonicalField = field.parse()?;
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!("Missing value for field '{field}' in '{raw}'"));
    }
    Ok((field, value.to_string()))
}

/// Merges the optional profile with command-line overrides.
///
/// `--column` replaces the profile's entry for a field, `--alias` adds to it.
pub fn load_options(args: &MappingArgs) -> Result<LoadOptions> {
    let profile = match &args.profile {
        Some(path) => MappingProfile::load(path)?,
        None => MappingProfile::default(),
    };

    let mut column_mapping = profile.column_mapping()?;
    for raw in &args.columns {
        let (field, column) = parse_assignment(raw)?;
        if let Some(previous) = column_mapping.insert(field, column) {
            debug!("Command line overrides column '{previous}' for field '{field}'");
        }
    }

    let mut aliases = profile.alias_table()?;
    for raw in &args.aliases {
        let (field, alias) = parse_assignment(raw)?;
        aliases.entry(field).or_default().push(alias);
    }

    Ok(LoadOptions {
        column_mapping,
        aliases,
        strict: args.strict || profile.strict,
        sample_rows: args
            .sample_rows
            .or(profile.sample_rows)
            .unwrap_or(DEFAULT_SAMPLE_ROWS),
        use_classifier: !args.no_classifier,
    })
}
