//! Turns a sheet into [`OperationRecord`]s once its columns are resolved.

use std::path::Path;

use anyhow::{Result, ensure};
use log::{debug, info, warn};

use crate::{
    data::{parse_naive_date, parse_number},
    error::ColumnMappingError,
    fields::CanonicalField,
    guesser::default_guesser,
    io_utils::is_dash,
    models::OperationRecord,
    resolver::{AliasTable, ColumnMapping, ColumnResolver, Resolution},
    sheet::{Sheet, SheetOptions, read_sheet},
};

pub const DEFAULT_SAMPLE_ROWS: usize = 20;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub column_mapping: ColumnMapping,
    pub aliases: AliasTable,
    pub strict: bool,
    /// Leading rows handed to the classifier as column samples.
    pub sample_rows: usize,
    pub use_classifier: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            column_mapping: ColumnMapping::new(),
            aliases: AliasTable::new(),
            strict: false,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            use_classifier: true,
        }
    }
}

impl LoadOptions {
    pub fn resolver(&self) -> ColumnResolver<'static> {
        let resolver = ColumnResolver::new()
            .with_mapping(self.column_mapping.clone())
            .with_aliases(self.aliases.clone())
            .strict(self.strict);
        if self.use_classifier {
            resolver.with_guesser(default_guesser())
        } else {
            resolver
        }
    }
}

/// Resolves every field against the sheet, failing on the first required
/// field that cannot be placed.
pub fn resolve_sheet_columns(sheet: &Sheet, options: &LoadOptions) -> Result<Resolution> {
    let candidates = sheet.candidates(options.sample_rows);
    let resolution = options.resolver().resolve(&candidates)?;
    Ok(resolution)
}

/// Builds records in sheet order.
///
/// Rows missing a date, employee or process are skipped with a warning.
/// A date or numeric cell that does not parse aborts the load with
/// [`ColumnMappingError::NotConvertible`].
pub fn load_operations(sheet: &Sheet, options: &LoadOptions) -> Result<Vec<OperationRecord>> {
    if sheet.is_empty() {
        info!("Sheet has no data rows");
        return Ok(Vec::new());
    }

    let resolution = resolve_sheet_columns(sheet, options)?;
    let index_of = |field: CanonicalField| {
        resolution
            .column(field)
            .and_then(|column| sheet.column_index(column))
    };
    let positions = ColumnPositions {
        date: required_index(index_of(CanonicalField::Date), CanonicalField::Date)?,
        employee: required_index(index_of(CanonicalField::Employee), CanonicalField::Employee)?,
        process: required_index(index_of(CanonicalField::Process), CanonicalField::Process)?,
        quantity: required_index(index_of(CanonicalField::Quantity), CanonicalField::Quantity)?,
        duration: required_index(
            index_of(CanonicalField::DurationMinutes),
            CanonicalField::DurationMinutes,
        )?,
        machine: index_of(CanonicalField::Machine),
        process_type: index_of(CanonicalField::ProcessType),
    };

    let mut records = Vec::with_capacity(sheet.rows.len());
    let mut dropped = 0usize;
    for row in 0..sheet.rows.len() {
        let line = sheet.line(row);
        let cell = |column: usize| sheet.cell(row, column);

        let (Some(date), Some(employee), Some(process)) = (
            cell(positions.date),
            cell(positions.employee),
            cell(positions.process),
        ) else {
            warn!("Skipping row {line}: date, employee or process is blank");
            dropped += 1;
            continue;
        };

        let date = parse_naive_date(date)
            .map_err(|_| not_convertible(CanonicalField::Date, line, date))?;
        let quantity = numeric_cell(cell(positions.quantity), CanonicalField::Quantity, line)?;
        let duration_minutes = numeric_cell(
            cell(positions.duration),
            CanonicalField::DurationMinutes,
            line,
        )?;

        records.push(OperationRecord {
            date,
            employee: employee.trim().to_string(),
            process: process.trim().to_string(),
            quantity: quantity.round_ties_even() as i64,
            duration_minutes,
            machine: positions.machine.and_then(cell).map(|v| v.trim().to_string()),
            process_type: positions
                .process_type
                .and_then(cell)
                .map(|v| v.trim().to_string()),
        });
    }

    if dropped > 0 {
        warn!("Skipped {dropped} incomplete row(s)");
    }
    debug!("Loaded {} operation record(s)", records.len());
    Ok(records)
}

/// Reads the sheet at `path` and loads its records.
pub fn load_operations_from_path(
    path: &Path,
    sheet_options: &SheetOptions,
    options: &LoadOptions,
) -> Result<Vec<OperationRecord>> {
    ensure!(
        is_dash(path) || path.exists(),
        "Input file {} does not exist",
        path.display()
    );
    let sheet = read_sheet(path, sheet_options)?;
    load_operations(&sheet, options)
}

struct ColumnPositions {
    date: usize,
    employee: usize,
    process: usize,
    quantity: usize,
    duration: usize,
    machine: Option<usize>,
    process_type: Option<usize>,
}

fn required_index(index: Option<usize>, field: CanonicalField) -> Result<usize, ColumnMappingError> {
    index.ok_or_else(|| ColumnMappingError::Unresolved {
        field: field.to_string(),
    })
}

fn numeric_cell(value: Option<&str>, field: CanonicalField, line: usize) -> Result<f64> {
    let raw = value.unwrap_or_default();
    let parsed = parse_number(raw).map_err(|_| not_convertible(field, line, raw))?;
    Ok(parsed)
}

fn not_convertible(field: CanonicalField, row: usize, value: &str) -> ColumnMappingError {
    ColumnMappingError::NotConvertible {
        field: field.to_string(),
        row,
        value: value.to_string(),
    }
}
