pub mod classifier;
pub mod cli;
pub mod columns;
pub mod data;
pub mod error;
pub mod fields;
pub mod guesser;
pub mod heuristics;
pub mod io_utils;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod profile;
pub mod report;
pub mod resolver;
pub mod sheet;
pub mod suggest;
pub mod table;
pub mod tokenize;
pub mod training;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::{
    cli::{Cli, Commands},
    fields::CanonicalField,
};

pub use crate::{
    error::{ColumnMappingError, ConfigurationError},
    loader::{LoadOptions, load_operations, load_operations_from_path},
    models::OperationRecord,
    resolver::{ColumnResolver, Resolution, resolve_field, suggest_column_mapping},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("trumetrapla", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => report::execute(&args),
        Commands::Suggest(args) => suggest::execute(&args),
        Commands::Fields => {
            print!("{}", render_fields());
            Ok(())
        }
    }
}

fn render_fields() -> String {
    let headers = ["Campo", "Etichetta", "Obbligatorio", "Alias", "Parole chiave"]
        .map(String::from)
        .to_vec();
    let rows = CanonicalField::all()
        .map(|field| {
            vec![
                field.to_string(),
                field.label().to_string(),
                if field.is_required() { "sì" } else { "no" }.to_string(),
                field.default_aliases().join(", "),
                field.keywords().join(", "),
            ]
        })
        .collect::<Vec<_>>();
    table::render_table(&headers, &rows)
}
