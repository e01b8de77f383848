use std::{collections::BTreeMap, fmt::Write as _};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{
    cli::ReportArgs,
    fields::CanonicalField,
    loader, metrics,
    metrics::EntityPerformance,
    models::OperationRecord,
    profile,
};

pub const NO_DATA_MESSAGE: &str = "Nessun dato trovato nel file specificato.";

pub fn execute(args: &ReportArgs) -> Result<()> {
    let options = profile::load_options(&args.mapping)?;
    let records =
        loader::load_operations_from_path(&args.input.input, &args.input.sheet_options(), &options)
            .with_context(|| format!("Loading operations from {:?}", args.input.input))?;
    info!(
        "Loaded {} operation(s) from {:?}",
        records.len(),
        args.input.input
    );
    print!("{}", render_report(&records, &args.group_by)?);
    Ok(())
}

/// Italian plain-text report: totals, per employee, per process, an optional
/// attribute breakdown, and the daily trend.
pub fn render_report(records: &[OperationRecord], group_by: &[CanonicalField]) -> Result<String> {
    let mut out = String::new();
    if records.is_empty() {
        writeln!(out, "{NO_DATA_MESSAGE}")?;
        return Ok(out);
    }

    let summary = metrics::summarize_operations(records);
    writeln!(out, "=== Riepilogo generale ===")?;
    writeln!(out, "Totale pezzi: {}", summary.total_quantity)?;
    writeln!(out, "Ore lavorate: {:.2}", summary.total_hours)?;
    writeln!(out, "Produttività media: {:.2} pezzi/ora", summary.throughput)?;
    writeln!(out, "Dipendenti coinvolti: {}", summary.employees)?;
    writeln!(out, "Processi analizzati: {}", summary.processes)?;
    if summary.machines > 0 {
        writeln!(out, "Macchine utilizzate: {}", summary.machines)?;
    }
    if summary.process_types > 0 {
        writeln!(out, "Tipologie di processo: {}", summary.process_types)?;
    }
    writeln!(out)?;

    write_section(
        &mut out,
        "Performance per dipendente",
        &metrics::group_by_employee(records),
    )?;
    write_section(
        &mut out,
        "Performance per processo",
        &metrics::group_by_process(records),
    )?;

    if !group_by.is_empty() {
        let display_names = group_by
            .iter()
            .map(|field| (*field, field.label().to_string()))
            .collect::<BTreeMap<_, _>>();
        let grouped = metrics::group_by_attributes(records, group_by, &display_names)?;
        let title = format!(
            "Dettaglio per {}",
            group_by.iter().map(|field| field.label().to_lowercase()).join(" / ")
        );
        write_section(&mut out, &title, &grouped)?;
    }

    writeln!(out, "=== Andamento giornaliero ===")?;
    for day in metrics::daily_trend(records) {
        writeln!(
            out,
            "- {}: {} pezzi in {:.2} h ({:.2} pezzi/ora)",
            day.date.format("%d/%m/%Y"),
            day.total_quantity,
            day.total_hours,
            day.throughput
        )?;
    }
    Ok(out)
}

fn write_section(out: &mut String, title: &str, rows: &[EntityPerformance]) -> Result<()> {
    writeln!(out, "=== {title} ===")?;
    for performance in rows {
        writeln!(
            out,
            "- {}: {} pezzi, {:.2} h, {:.2} pezzi/ora",
            performance.entity,
            performance.total_quantity,
            performance.total_hours,
            performance.throughput
        )?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, employee: &str, process: &str, quantity: i64, minutes: f64) -> OperationRecord {
        OperationRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            employee: employee.into(),
            process: process.into(),
            quantity,
            duration_minutes: minutes,
            machine: None,
            process_type: None,
        }
    }

    #[test]
    fn empty_input_prints_no_data() {
        assert_eq!(render_report(&[], &[]).unwrap(), format!("{NO_DATA_MESSAGE}\n"));
    }

    #[test]
    fn report_lists_every_section() {
        let records = vec![
            record(1, "Mario", "Taglio", 120, 90.0),
            record(2, "Luigi", "Piegatura", 80, 120.0),
        ];
        let report = render_report(&records, &[CanonicalField::Process]).unwrap();
        assert!(report.contains("Totale pezzi: 200"));
        assert!(report.contains("Ore lavorate: 3.50"));
        assert!(report.contains("- Mario: 120 pezzi, 1.50 h, 80.00 pezzi/ora"));
        assert!(report.contains("=== Performance per processo ===\n- Taglio"));
        assert!(report.contains("- Processo: Taglio: 120 pezzi"));
        assert!(report.contains("- 02/01/2024: 80 pezzi in 2.00 h (40.00 pezzi/ora)"));
        assert!(!report.contains("Macchine utilizzate"));
    }
}
