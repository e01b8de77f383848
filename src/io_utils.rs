//! Input helpers: delimiter and encoding resolution, CSV readers, and
//! workbook detection.
//!
//! The `-` path reads delimited text from stdin.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

/// True when the extension names a workbook format rather than delimited text.
pub fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Exported spreadsheets often have ragged trailing cells, so rows may vary
/// in length.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    // `decode` also drops the BOM some exports put before the first header.
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(resolve_input_delimiter(Path::new("ops.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("ops.CSV"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("-"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("ops.tsv"), Some(b';')), b';');
    }

    #[test]
    fn workbook_extensions_are_detected() {
        assert!(is_workbook_path(Path::new("turni.xlsx")));
        assert!(is_workbook_path(Path::new("turni.ODS")));
        assert!(!is_workbook_path(Path::new("turni.csv")));
        assert!(!is_workbook_path(Path::new("-")));
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some(" latin1 ")).unwrap(), WINDOWS_1252);
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn latin1_headers_are_decoded() {
        let bytes: &[u8] = b"Quantit\xe0;Durata\n10;5\n";
        let mut reader = open_csv_reader(bytes, b';');
        let headers = reader_headers(&mut reader, WINDOWS_1252).unwrap();
        assert_eq!(headers, vec!["Quantità", "Durata"]);
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let bytes: &[u8] = b"a,b,c\n1,2\n3,4,5,6\n";
        let mut reader = open_csv_reader(bytes, b',');
        let lengths: Vec<usize> = reader
            .byte_records()
            .map(|record| record.unwrap().len())
            .collect();
        assert_eq!(lengths, vec![2, 4]);
    }
}
