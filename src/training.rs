//! Embedded training corpus for the header classifier.
//!
//! Each field lists header phrasings seen in production spreadsheets (Italian
//! and English) together with a few representative cell values.

use crate::fields::CanonicalField;

pub const DEFAULT_TRAINING_DATA: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::Date,
        &[
            "data produzione",
            "giorno commessa",
            "production date",
            "day",
            "data registrazione",
            "2024-01-01",
            "03/02/2024",
            "12.02.24",
        ],
    ),
    (
        CanonicalField::Employee,
        &[
            "operatore",
            "dipendente",
            "responsabile cella",
            "worker name",
            "operator",
            "mario rossi",
            "team leader",
        ],
    ),
    (
        CanonicalField::Process,
        &[
            "processo",
            "fase produttiva",
            "operazione",
            "fase",
            "production stage",
            "taglio laser",
            "assemblaggio",
        ],
    ),
    (
        CanonicalField::Machine,
        &[
            "macchina",
            "impianto",
            "postazione",
            "machine",
            "equipment",
            "piegatrice 02",
        ],
    ),
    (
        CanonicalField::ProcessType,
        &[
            "tipo processo",
            "tipologia",
            "categoria",
            "process family",
            "assemblaggio",
            "lavorazione meccanica",
        ],
    ),
    (
        CanonicalField::Quantity,
        &[
            "pezzi",
            "output",
            "qta prodotta",
            "pieces",
            "numero pezzi",
            "100",
            "45",
        ],
    ),
    (
        CanonicalField::DurationMinutes,
        &[
            "durata",
            "minuti lavorati",
            "tempo ciclo",
            "cycle minutes",
            "tempo totale",
            "89",
            "123",
        ],
    ),
];

/// The embedded corpus keyed by field name, in classifier input form.
pub fn default_training_data() -> Vec<(&'static str, Vec<&'static str>)> {
    DEFAULT_TRAINING_DATA
        .iter()
        .map(|(field, examples)| (field.as_str(), examples.to_vec()))
        .collect()
}
