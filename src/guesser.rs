//! Picks the most plausible column for a field by fusing classifier scores
//! with value-shape heuristics.

use std::{collections::HashSet, sync::OnceLock};

use log::debug;

use crate::{
    classifier::NaiveBayesClassifier,
    columns::{CandidateColumn, ColumnSamples},
    error::ConfigurationError,
    fields::CanonicalField,
    heuristics::analyse_samples,
    training::default_training_data,
};

/// Score substituted for a column the classifier cannot score at all.
pub const NO_EVIDENCE_SCORE: f64 = -1_000.0;
/// Guesses below this score are rejected outright.
pub const MIN_CONFIDENCE: f64 = -20.0;
/// Required lead of the best column over the runner-up.
pub const MIN_MARGIN: f64 = 0.75;

static DEFAULT_GUESSER: OnceLock<ColumnGuesser> = OnceLock::new();

/// Shared guesser trained on the embedded corpus.
pub fn default_guesser() -> &'static ColumnGuesser {
    DEFAULT_GUESSER.get_or_init(|| {
        ColumnGuesser::with_default_training().expect("embedded training corpus is valid")
    })
}

/// Outcome of [`ColumnGuesser::guess`].
///
/// `score` is reported even when the guess is rejected so callers can log
/// how close it came.
#[derive(Debug, Clone, PartialEq)]
pub struct Guess {
    pub column: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct ColumnGuesser {
    classifier: NaiveBayesClassifier,
}

impl ColumnGuesser {
    pub fn new(classifier: NaiveBayesClassifier) -> Self {
        Self { classifier }
    }

    pub fn with_default_training() -> Result<Self, ConfigurationError> {
        Ok(Self::new(NaiveBayesClassifier::new(default_training_data())?))
    }

    pub fn classifier(&self) -> &NaiveBayesClassifier {
        &self.classifier
    }

    /// Confidence that the column belongs to `field`.
    pub fn evaluate(&self, field: CanonicalField, header: &str, samples: &ColumnSamples) -> f64 {
        let profile = analyse_samples(samples);
        let base = self
            .classifier
            .score(field.as_str(), header, samples)
            .filter(|score| score.is_finite())
            .unwrap_or(NO_EVIDENCE_SCORE);

        let numeric = profile.numeric_ratio;
        let date_like = profile.date_like_ratio;
        match field {
            // Plain numbers are rarely dates.
            CanonicalField::Date => base + 2.5 * date_like - 1.5 * numeric,
            CanonicalField::Quantity | CanonicalField::DurationMinutes => {
                base + 3.0 * numeric - 1.0 * date_like
            }
            CanonicalField::Employee
            | CanonicalField::Process
            | CanonicalField::Machine
            | CanonicalField::ProcessType => {
                base + 0.002 * profile.text_length - 2.0 * numeric
            }
        }
    }

    /// Chooses the best unassigned column for `field`.
    ///
    /// The winner must clear [`MIN_CONFIDENCE`] and beat the runner-up by at
    /// least [`MIN_MARGIN`]; otherwise no column is returned.
    pub fn guess(
        &self,
        field: CanonicalField,
        columns: &[CandidateColumn],
        already_assigned: &HashSet<String>,
    ) -> Guess {
        let mut best_column: Option<&str> = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut second_score = f64::NEG_INFINITY;

        for column in columns {
            if already_assigned.contains(&column.header) {
                continue;
            }
            let score = self.evaluate(field, &column.header, &column.samples);
            if score > best_score {
                second_score = best_score;
                best_score = score;
                best_column = Some(&column.header);
            } else if score > second_score {
                second_score = score;
            }
        }

        let Some(best_column) = best_column else {
            return Guess {
                column: None,
                score: f64::NEG_INFINITY,
            };
        };

        let margin = best_score - second_score;
        if best_score < MIN_CONFIDENCE || margin < MIN_MARGIN {
            debug!(
                "Rejected guess '{best_column}' for field '{field}' (score {best_score:.3}, margin {margin:.3})"
            );
            return Guess {
                column: None,
                score: best_score,
            };
        }

        Guess {
            column: Some(best_column.to_string()),
            score: best_score,
        }
    }
}
