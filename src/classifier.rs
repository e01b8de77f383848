//! Multinomial Naive Bayes scoring of column headers and sample values.
//!
//! The classifier is trained once from a small corpus of header phrasings and
//! cell values per field. Scores are raw log-likelihoods with add-one
//! smoothing; they are only meaningful when compared against each other.

use std::collections::{HashMap, HashSet};

use crate::{columns::ColumnSamples, error::ConfigurationError, tokenize::tokenize};

#[derive(Debug, Clone)]
struct FieldProfile {
    name: String,
    token_counts: HashMap<String, usize>,
    total_tokens: usize,
}

impl FieldProfile {
    fn new(name: String) -> Self {
        Self {
            name,
            token_counts: HashMap::new(),
            total_tokens: 0,
        }
    }

    fn learn(&mut self, example: &str) {
        for token in tokenize(example) {
            *self.token_counts.entry(token).or_insert(0) += 1;
            self.total_tokens += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    profiles: Vec<FieldProfile>,
    vocabulary_size: usize,
    log_prior: f64,
}

impl NaiveBayesClassifier {
    /// Trains a classifier from `(field, examples)` pairs.
    ///
    /// Field order is kept and used to break ties in
    /// [`most_likely_fields`](Self::most_likely_fields). Repeated field names
    /// are merged into a single profile.
    pub fn new<I, K, E, S>(training: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profiles: Vec<FieldProfile> = Vec::new();
        for (field, examples) in training {
            let name = field.into();
            let position = match profiles.iter().position(|profile| profile.name == name) {
                Some(position) => position,
                None => {
                    profiles.push(FieldProfile::new(name.clone()));
                    profiles.len() - 1
                }
            };
            let profile = &mut profiles[position];
            let mut seen_example = false;
            for example in examples {
                seen_example = true;
                profile.learn(example.as_ref());
            }
            if !seen_example && profile.total_tokens == 0 {
                return Err(ConfigurationError::NoExamples(name));
            }
        }

        if profiles.is_empty() {
            return Err(ConfigurationError::EmptyTrainingData);
        }

        let vocabulary = profiles
            .iter()
            .flat_map(|profile| profile.token_counts.keys())
            .collect::<HashSet<_>>();
        let vocabulary_size = vocabulary.len().max(1);
        let log_prior = (1.0 / profiles.len() as f64).ln();

        Ok(Self {
            profiles,
            vocabulary_size,
            log_prior,
        })
    }

    /// Field names in training order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|profile| profile.name.as_str())
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Log-score of `field` for a column with this header and samples.
    ///
    /// Returns `None` when the classifier was not trained on `field`, and
    /// negative infinity when neither header nor samples contain a token.
    pub fn score(&self, field: &str, header: &str, samples: &ColumnSamples) -> Option<f64> {
        let profile = self.profiles.iter().find(|profile| profile.name == field)?;
        Some(self.score_tokens(profile, &column_tokens(header, samples)))
    }

    /// Scores every candidate field (all fields when `candidates` is `None`)
    /// and returns them from most to least likely.
    pub fn most_likely_fields(
        &self,
        header: &str,
        samples: &ColumnSamples,
        candidates: Option<&[&str]>,
    ) -> Vec<(String, f64)> {
        let tokens = column_tokens(header, samples);
        let profiles: Vec<&FieldProfile> = match candidates {
            Some(names) => names
                .iter()
                .filter_map(|name| self.profiles.iter().find(|profile| profile.name == *name))
                .collect(),
            None => self.profiles.iter().collect(),
        };
        let mut scored = profiles
            .into_iter()
            .map(|profile| (profile.name.clone(), self.score_tokens(profile, &tokens)))
            .collect::<Vec<_>>();
        // `sort_by` is stable, so equal scores keep candidate order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    fn score_tokens(&self, profile: &FieldProfile, tokens: &[String]) -> f64 {
        if tokens.is_empty() {
            return f64::NEG_INFINITY;
        }
        let denominator = (profile.total_tokens + self.vocabulary_size) as f64;
        tokens.iter().fold(self.log_prior, |score, token| {
            let count = profile.token_counts.get(token).copied().unwrap_or(0);
            score + ((count + 1) as f64 / denominator).ln()
        })
    }
}

fn column_tokens(header: &str, samples: &ColumnSamples) -> Vec<String> {
    let mut tokens = tokenize(header);
    for sample in samples.present() {
        tokens.extend(tokenize(sample));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::default_training_data;

    fn default_classifier() -> NaiveBayesClassifier {
        NaiveBayesClassifier::new(default_training_data()).expect("default corpus")
    }

    #[test]
    fn empty_training_data_is_rejected() {
        let training: Vec<(String, Vec<String>)> = Vec::new();
        assert_eq!(
            NaiveBayesClassifier::new(training).unwrap_err(),
            ConfigurationError::EmptyTrainingData
        );
    }

    #[test]
    fn field_without_examples_is_rejected() {
        let training = vec![("date", vec!["data"]), ("employee", vec![])];
        assert_eq!(
            NaiveBayesClassifier::new(training).unwrap_err(),
            ConfigurationError::NoExamples("employee".into())
        );
    }

    #[test]
    fn score_follows_laplace_smoothing() {
        let classifier =
            NaiveBayesClassifier::new(vec![("a", vec!["alpha alpha beta"]), ("b", vec!["gamma"])])
                .unwrap();
        assert_eq!(classifier.vocabulary_size(), 3);
        let score = classifier
            .score("a", "alpha", &ColumnSamples::new())
            .unwrap();
        let expected = (0.5f64).ln() + (3.0f64 / 6.0).ln();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn no_tokens_scores_negative_infinity() {
        let classifier = default_classifier();
        let score = classifier
            .score("date", "  ", &ColumnSamples::from_raw(["", "nan"]))
            .unwrap();
        assert_eq!(score, f64::NEG_INFINITY);
    }

    #[test]
    fn unknown_field_has_no_score() {
        assert!(
            default_classifier()
                .score("shift", "Turno", &ColumnSamples::new())
                .is_none()
        );
    }

    #[test]
    fn quantity_outranks_date_for_piece_counts() {
        let ranking = default_classifier().most_likely_fields(
            "Pezzi prodotti",
            &ColumnSamples::from_raw(["45", "100", "12"]),
            None,
        );
        let position = |name: &str| ranking.iter().position(|(field, _)| field == name).unwrap();
        assert!(position("quantity") < position("date"));
        assert_eq!(ranking[0].0, "quantity");
    }

    #[test]
    fn ties_keep_candidate_order() {
        let classifier =
            NaiveBayesClassifier::new(vec![("first", vec!["x"]), ("second", vec!["y"])]).unwrap();
        let ranking = classifier.most_likely_fields(
            "unseen",
            &ColumnSamples::new(),
            Some(&["second", "first"][..]),
        );
        assert_eq!(ranking[0].0, "second");
        assert_eq!(ranking[1].0, "first");
        assert_eq!(ranking[0].1, ranking[1].1);
    }
}
