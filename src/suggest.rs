use anyhow::{Result, ensure};
use log::info;
use serde::Serialize;

use crate::{
    cli::SuggestArgs,
    columns::CandidateColumn,
    fields::CanonicalField,
    guesser::default_guesser,
    io_utils::is_dash,
    profile,
    resolver::{Resolution, Strategy},
    sheet::read_sheet,
    table,
};

const RANKED_FIELDS: usize = 3;

/// Resolution of a sheet plus the classifier's view of the leftover columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingSuggestion {
    pub columns: Vec<String>,
    pub resolution: Resolution,
    /// Best-scoring fields for every column no field was assigned to.
    pub unassigned: Vec<ColumnRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnRanking {
    pub column: String,
    pub fields: Vec<(String, f64)>,
}

pub fn execute(args: &SuggestArgs) -> Result<()> {
    let path = &args.input.input;
    ensure!(
        is_dash(path) || path.exists(),
        "Input file {} does not exist",
        path.display()
    );
    let options = profile::load_options(&args.mapping)?;
    let sheet = read_sheet(path, &args.input.sheet_options())?;
    let candidates = sheet.candidates(options.sample_rows);
    let resolution = options.resolver().suggest(&candidates);
    let suggestion = build_suggestion(&candidates, resolution, options.use_classifier);
    info!(
        "Resolved {} of {} field(s) for {:?}",
        suggestion.resolution.assignments.len(),
        CanonicalField::all().count(),
        path
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
    } else {
        print!("{}", render_suggestion(&suggestion));
    }
    Ok(())
}

pub fn build_suggestion(
    candidates: &[CandidateColumn],
    resolution: Resolution,
    rank_unassigned: bool,
) -> MappingSuggestion {
    let unassigned = if rank_unassigned {
        let classifier = default_guesser().classifier();
        candidates
            .iter()
            .filter(|candidate| {
                !resolution
                    .assignments
                    .values()
                    .any(|assignment| assignment.column == candidate.header)
            })
            .map(|candidate| ColumnRanking {
                column: candidate.header.clone(),
                fields: classifier
                    .most_likely_fields(&candidate.header, &candidate.samples, None)
                    .into_iter()
                    .take(RANKED_FIELDS)
                    .collect(),
            })
            .collect()
    } else {
        Vec::new()
    };
    MappingSuggestion {
        columns: candidates.iter().map(|c| c.header.clone()).collect(),
        resolution,
        unassigned,
    }
}

pub fn render_suggestion(suggestion: &MappingSuggestion) -> String {
    let headers = ["Campo", "Colonna", "Strategia", "Punteggio"]
        .map(String::from)
        .to_vec();
    let rows = CanonicalField::all()
        .map(|field| {
            let name = if field.is_required() {
                format!("{field}*")
            } else {
                field.to_string()
            };
            match suggestion.resolution.assignments.get(&field) {
                Some(assignment) => {
                    let score = match assignment.strategy {
                        Strategy::Classifier { score } => format!("{score:.2}"),
                        _ => "-".to_string(),
                    };
                    vec![
                        name,
                        assignment.column.clone(),
                        assignment.strategy.as_str().to_string(),
                        score,
                    ]
                }
                None => vec![name, "-".into(), "unresolved".into(), "-".into()],
            }
        })
        .collect::<Vec<_>>();

    let mut out = table::render_table(&headers, &rows);
    out.push_str("(* campo obbligatorio)\n");
    if !suggestion.resolution.missing.is_empty() {
        let missing = suggestion
            .resolution
            .missing
            .iter()
            .map(|field| field.as_str())
            .collect::<Vec<_>>();
        out.push_str(&format!(
            "\nCampi obbligatori non risolti: {}\nColonne disponibili: {}\n",
            missing.join(", "),
            suggestion.columns.join(", ")
        ));
    }
    if !suggestion.unassigned.is_empty() {
        out.push_str("\nColonne non assegnate:\n");
        for ranking in &suggestion.unassigned {
            let fields = ranking
                .fields
                .iter()
                .map(|(field, score)| format!("{field} ({score:.2})"))
                .collect::<Vec<_>>();
            out.push_str(&format!("- {}: {}\n", ranking.column, fields.join(", ")));
        }
    }
    out
}
