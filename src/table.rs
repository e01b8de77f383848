//! Plain-text tables for terminal reports.

use std::fmt::Write as _;

use crate::heuristics::looks_numeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Renders rows under a header and a dashed rule.
///
/// Columns whose non-empty cells are all numeric are right-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let alignments = (0..headers.len())
        .map(|idx| {
            let mut cells = rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|cell| !cell.trim().is_empty())
                .peekable();
            if cells.peek().is_some() && cells.all(|cell| looks_numeric(cell)) {
                Align::Right
            } else {
                Align::Left
            }
        })
        .collect::<Vec<_>>();
    render_aligned(headers, rows, &alignments)
}

fn render_aligned(headers: &[String], rows: &[Vec<String>], alignments: &[Align]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| display_width(&sanitize(header)).max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(&sanitize(cell)));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, alignments));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, alignments));
    }
    output
}

fn format_row(values: &[String], widths: &[usize], alignments: &[Align]) -> String {
    let line = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let value = values
                .get(idx)
                .map(|value| sanitize(value))
                .unwrap_or_default();
            let padding = " ".repeat(width.saturating_sub(display_width(&value)));
            match alignments.get(idx) {
                Some(Align::Right) => format!("{padding}{value}"),
                _ => format!("{value}{padding}"),
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}

fn display_width(value: &str) -> usize {
    value.chars().filter(|ch| !ch.is_control()).count()
}
