use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{fields::CanonicalField, sheet::SheetOptions};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Production KPIs from spreadsheets with automatic column detection",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load operations and print productivity KPIs
    Report(ReportArgs),
    /// Show how each canonical field would be mapped to the file's columns
    Suggest(SuggestArgs),
    /// List canonical fields with their built-in aliases and keywords
    Fields,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Spreadsheet to read (.xlsx, .xls, .ods, .csv, .tsv or - for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Worksheet name or zero-based index (workbooks only)
    #[arg(long)]
    pub sheet: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

impl InputArgs {
    pub fn sheet_options(&self) -> SheetOptions {
        SheetOptions {
            sheet: self.sheet.clone(),
            delimiter: self.delimiter,
            encoding: self.input_encoding.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct MappingArgs {
    /// YAML mapping profile with `columns`, `aliases`, `strict` and `sample_rows`
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// Explicit mapping of the form `field=Column header`
    #[arg(short = 'c', long = "column", action = clap::ArgAction::Append)]
    pub columns: Vec<String>,
    /// Extra alias of the form `field=header`
    #[arg(long = "alias", action = clap::ArgAction::Append)]
    pub aliases: Vec<String>,
    /// Never assign one column to two fields
    #[arg(long)]
    pub strict: bool,
    /// Disable the header classifier fallback
    #[arg(long = "no-classifier")]
    pub no_classifier: bool,
    /// Rows sampled per column for the classifier (default 20)
    #[arg(long = "sample-rows")]
    pub sample_rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub mapping: MappingArgs,
    /// Add a breakdown by these fields (repeatable, e.g. `--group-by process --group-by machine`)
    #[arg(long = "group-by", value_parser = parse_field, action = clap::ArgAction::Append)]
    pub group_by: Vec<CanonicalField>,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub mapping: MappingArgs,
    /// Emit the resolution as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn parse_field(value: &str) -> Result<CanonicalField, String> {
    value.parse().map_err(|err: crate::error::ColumnMappingError| err.to_string())
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
