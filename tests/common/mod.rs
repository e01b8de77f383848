#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tempfile::{TempDir, tempdir};

/// Absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// A spreadsheet cell for [`TestWorkspace::write_xlsx`].
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Excel serial date rendered as `dd/mm/yyyy`.
    Date(f64),
    Blank,
}

/// Scratch directory removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    /// Writes a workbook whose sheets are `(name, header, rows)` triples.
    pub fn write_xlsx(&self, name: &str, sheets: Vec<(&str, Vec<&str>, Vec<Vec<Cell>>)>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("dd/mm/yyyy");
        for (sheet_name, header, rows) in &sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*sheet_name).expect("sheet name");
            for (col, title) in header.iter().enumerate() {
                worksheet
                    .write_string(0, col as u16, *title)
                    .expect("write header");
            }
            for (row_idx, row) in rows.iter().enumerate() {
                let row_num = row_idx as u32 + 1;
                for (col, cell) in row.iter().enumerate() {
                    let col = col as u16;
                    match cell {
                        Cell::Text(text) => {
                            worksheet.write_string(row_num, col, *text).expect("write text");
                        }
                        Cell::Number(value) => {
                            worksheet
                                .write_number(row_num, col, *value)
                                .expect("write number");
                        }
                        Cell::Date(serial) => {
                            worksheet
                                .write_number_with_format(row_num, col, *serial, &date_format)
                                .expect("write date");
                        }
                        Cell::Blank => {}
                    }
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }
}
