use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trumetrapla::{
    ColumnResolver, LoadOptions,
    columns::{CandidateColumn, ColumnSamples},
    guesser::default_guesser,
    load_operations,
    sheet::Sheet,
    suggest_column_mapping,
};

fn free_form_columns() -> Vec<CandidateColumn> {
    let sample = |values: &[&str]| ColumnSamples::from_raw(values.iter().copied());
    vec![
        CandidateColumn::new("Giorno", sample(&["2024-01-01", "2024-01-02", "2024-01-03"])),
        CandidateColumn::new("Chi", sample(&["Mario Rossi", "Anna Verdi", "Luca Neri"])),
        CandidateColumn::new("Cosa", sample(&["Taglio laser", "Piegatura", "Saldatura"])),
        CandidateColumn::new("Numero", sample(&["45", "100", "12"])),
        CandidateColumn::new("Tempo", sample(&["30", "55", "20"])),
        CandidateColumn::new("Note", sample(&["turno lungo", "", "ok"])),
    ]
}

fn generate_sheet(rows: usize) -> Sheet {
    let headers = ["Data", "Operatore", "Fase", "Pezzi", "Durata (min)", "Macchina"];
    let body = (0..rows)
        .map(|i| {
            vec![
                format!("2024-01-{:02}", (i % 28) + 1),
                format!("Operatore {}", i % 12),
                ["Taglio", "Piegatura", "Saldatura"][i % 3].to_string(),
                ((i % 90) + 10).to_string(),
                ((i % 50) + 5).to_string(),
                format!("Linea {}", i % 4),
            ]
        })
        .collect::<Vec<_>>();
    Sheet::new(headers, body)
}

fn bench_resolution(c: &mut Criterion) {
    let headers = [
        "Data produzione",
        "Nome operatore",
        "Fase lavorazione",
        "Quantità prodotta",
        "Durata minuti",
        "Centro di lavoro",
    ]
    .map(String::from);
    c.bench_function("suggest_headers_only", |b| {
        b.iter(|| suggest_column_mapping(black_box(&headers), None, None))
    });

    let columns = free_form_columns();
    let resolver = ColumnResolver::new().with_guesser(default_guesser());
    c.bench_function("suggest_with_classifier", |b| {
        b.iter(|| resolver.suggest(black_box(&columns)))
    });
}

fn bench_loading(c: &mut Criterion) {
    let sheet = generate_sheet(10_000);
    let options = LoadOptions::default();
    c.bench_function("load_10k_rows", |b| {
        b.iter(|| load_operations(black_box(&sheet), &options).expect("load"))
    });
}

criterion_group!(benches, bench_resolution, bench_loading);
criterion_main!(benches);
