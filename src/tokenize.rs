use std::sync::OnceLock;

use caseless::default_case_fold_str;
use regex::Regex;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    // `\w` is Unicode-aware, so accented Latin letters stay inside words.
    TOKEN_RE.get_or_init(|| Regex::new(r"\w+").expect("token pattern is valid"))
}

/// Splits `text` into case-folded word tokens.
///
/// Full Unicode case folding is used, so `Maß` and `MASS` give the same token.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    token_regex()
        .find_iter(text)
        .map(|token| default_case_fold_str(token.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  -- / ").is_empty());
    }

    #[test]
    fn splits_on_punctuation_and_keeps_accents() {
        assert_eq!(
            tokenize("Quantità prodotta (pz.)"),
            vec!["quantità", "prodotta", "pz"]
        );
        assert_eq!(tokenize("DURATA [min]"), vec!["durata", "min"]);
        assert_eq!(tokenize("12.02.24"), vec!["12", "02", "24"]);
    }

    #[test]
    fn accented_uppercase_letters_fold() {
        assert_eq!(tokenize("QUANTITÀ ÉTAPE"), vec!["quantità", "étape"]);
    }

    #[test]
    fn sharp_s_folds_like_its_uppercase() {
        assert_eq!(tokenize("Maß"), vec!["mass"]);
        assert_eq!(tokenize("Maß"), tokenize(&"Maß".to_uppercase()));
    }

    proptest! {
        #[test]
        fn uppercasing_does_not_change_tokens(text in "[a-zA-Zàèéìòùß0-9 ,./_-]{0,40}") {
            prop_assert_eq!(tokenize(&text), tokenize(&text.to_uppercase()));
        }

        #[test]
        fn tokens_are_lowercase_and_non_empty(text in "[A-Za-zÀÈÉÌÒÙàèéìòùß0-9 ()\\[\\]:;]{0,40}") {
            for token in tokenize(&text) {
                prop_assert!(!token.is_empty());
                prop_assert_eq!(token.to_lowercase(), token.clone());
            }
        }
    }
}
