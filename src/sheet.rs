//! Tabular input: delimited text through `csv`, workbooks through `calamine`.

use std::{io::Read, path::Path};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use encoding_rs::Encoding;
use log::debug;

use crate::{
    columns::{CandidateColumn, ColumnSamples, normalize_cell},
    data::format_number,
    io_utils,
};

/// Where and how to read a sheet from.
#[derive(Debug, Clone, Default)]
pub struct SheetOptions {
    /// Worksheet name or zero-based index; the first sheet when absent.
    pub sheet: Option<String>,
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
}

/// A header row plus data rows. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// 1-based source line of each entry in `rows`.
    lines: Vec<usize>,
}

impl Sheet {
    /// Builds a sheet from raw header and cell text, the header on line 1
    /// and each row on the following line.
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = Vec<C>>,
        C: AsRef<str>,
    {
        Self::with_lines(headers, rows.into_iter().zip(2..))
    }

    /// Builds a sheet from rows tagged with their source line numbers.
    ///
    /// Rows with no value at all are dropped; the remaining ones keep
    /// their line numbers.
    pub fn with_lines<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = (Vec<C>, usize)>,
        C: AsRef<str>,
    {
        let headers = clean_headers(headers.into_iter().map(|h| h.as_ref().to_string()));
        let (rows, lines): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .map(|(row, line)| {
                let cells = row
                    .iter()
                    .map(|cell| normalize_cell(cell.as_ref()).map(|c| c.into_owned()))
                    .collect::<Vec<_>>();
                (cells, line)
            })
            .filter(|(cells, _)| cells.iter().any(Option::is_some))
            .unzip();
        Self {
            headers,
            rows,
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source line of data row `row`, as a spreadsheet user would count it.
    pub fn line(&self, row: usize) -> usize {
        self.lines.get(row).copied().unwrap_or(row + 2)
    }

    /// Position of the first column with this exact header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|candidate| candidate == header)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }

    /// Candidate columns carrying up to `sample_rows` leading values each.
    pub fn candidates(&self, sample_rows: usize) -> Vec<CandidateColumn> {
        let sampled = self.rows.len().min(sample_rows);
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let samples = ColumnSamples::from_cells(
                    (0..sampled).map(|row| self.cell(row, idx)),
                );
                CandidateColumn::new(header.clone(), samples)
            })
            .collect()
    }
}

/// Reads a sheet, choosing the backend from the file extension.
pub fn read_sheet(path: &Path, options: &SheetOptions) -> Result<Sheet> {
    let sheet = if io_utils::is_workbook_path(path) {
        read_workbook(path, options.sheet.as_deref())?
    } else {
        let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
        let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
        let reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        read_delimited(reader, encoding).with_context(|| format!("Reading {path:?}"))?
    };
    debug!(
        "Read {} row(s) with columns {:?} from {:?}",
        sheet.rows.len(),
        sheet.headers,
        path
    );
    Ok(sheet)
}

pub fn read_delimited<R: Read>(
    mut reader: csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Sheet> {
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let line = record
            .position()
            .map_or(idx + 2, |position| position.line() as usize);
        rows.push((io_utils::decode_record(&record, encoding)?, line));
    }
    Ok(Sheet::with_lines(headers, rows))
}

fn read_workbook(path: &Path, selector: Option<&str>) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Opening workbook {}", path.display()))?;
    let names = workbook.sheet_names();
    let name = select_sheet(&names, selector)
        .ok_or_else(|| {
            anyhow!(
                "Sheet '{}' not found in {} (available: {})",
                selector.unwrap_or("0"),
                path.display(),
                names.join(", ")
            )
        })?
        .to_string();
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("Reading sheet '{name}' of {}", path.display()))?;

    // Ranges start at the first used row, not necessarily row 1.
    let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Sheet::default());
    };
    let headers = header_row.iter().map(cell_text).collect::<Vec<_>>();
    let body = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .zip(header_line + 1..)
        .collect::<Vec<_>>();
    Ok(Sheet::with_lines(headers, body))
}

fn select_sheet<'a>(names: &'a [String], selector: Option<&str>) -> Option<&'a str> {
    let Some(selector) = selector.map(str::trim) else {
        return names.first().map(String::as_str);
    };
    if let Some(name) = names.iter().find(|name| name.as_str() == selector) {
        return Some(name);
    }
    selector
        .parse::<usize>()
        .ok()
        .and_then(|idx| names.get(idx))
        .map(String::as_str)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()),
    }
}

/// Renders an Excel serial date as `YYYY-MM-DD`, adding the time of day
/// when it is not midnight.
fn excel_serial_to_text(serial: f64) -> String {
    let Some(datetime) = excel_serial_to_datetime(serial) else {
        return format_number(serial);
    };
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.trunc();
    let seconds = ((serial - days) * 86_400.0).round() as u32;
    // Serial 0 is 1899-12-30 once Excel's phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(Days::new(days as u64))?;
    let time = if seconds >= 86_400 {
        NaiveTime::MIN
    } else {
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?
    };
    let datetime = date.and_time(time);
    if seconds >= 86_400 {
        datetime.checked_add_days(Days::new(1))
    } else {
        Some(datetime)
    }
}

fn clean_headers<I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let trimmed = header.trim();
            if trimmed.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    fn sheet_from_csv(text: &str) -> Sheet {
        let reader = io_utils::open_csv_reader(text.as_bytes(), b',');
        read_delimited(reader, UTF_8).unwrap()
    }

    #[test]
    fn headers_are_trimmed_and_blanks_named() {
        let sheet = sheet_from_csv(" Data ,,Pezzi\n2024-01-01,x,10\n");
        assert_eq!(sheet.headers, vec!["Data", "column_2", "Pezzi"]);
    }

    #[test]
    fn blank_cells_and_rows_are_dropped_to_none() {
        let sheet = sheet_from_csv("a,b\n1, \n,\n nan ,4\n");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.cell(0, 0), Some("1"));
        assert_eq!(sheet.cell(0, 1), None);
        assert_eq!(sheet.cell(1, 0), None);
        assert_eq!(sheet.cell(1, 1), Some("4"));
    }

    #[test]
    fn rows_keep_their_source_lines() {
        let sheet = sheet_from_csv("a,b\n , \n1,2\n\"x\ny\",3\n4,5\n");
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.line(0), 3);
        assert_eq!(sheet.line(1), 4);
        assert_eq!(sheet.line(2), 6);
    }

    #[test]
    fn candidates_sample_leading_rows() {
        let sheet = sheet_from_csv("Pezzi,Note\n1,a\n2\n3,c\n");
        let candidates = sheet.candidates(2);
        assert_eq!(candidates.len(), 2);
        assert_eq!(
            candidates[0].samples.present().collect::<Vec<_>>(),
            vec!["1", "2"]
        );
        assert_eq!(candidates[1].samples.len(), 2);
        assert_eq!(candidates[1].samples.present().count(), 1);
    }

    #[test]
    fn sheets_are_selected_by_name_or_index() {
        let names = vec!["Gennaio".to_string(), "Febbraio".to_string()];
        assert_eq!(select_sheet(&names, None), Some("Gennaio"));
        assert_eq!(select_sheet(&names, Some("Febbraio")), Some("Febbraio"));
        assert_eq!(select_sheet(&names, Some("1")), Some("Febbraio"));
        assert_eq!(select_sheet(&names, Some("Marzo")), None);
    }

    #[test]
    fn excel_serials_become_iso_text() {
        assert_eq!(excel_serial_to_text(45_292.0), "2024-01-01");
        assert_eq!(excel_serial_to_text(45_292.5), "2024-01-01 12:00:00");
    }

    #[test]
    fn workbook_cells_render_as_text() {
        assert_eq!(cell_text(&Data::Float(120.0)), "120");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_sheet(Path::new("no/such/turni.csv"), &SheetOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("turni.csv"));
    }
}
