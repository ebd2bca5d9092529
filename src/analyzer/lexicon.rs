//! Lexicon-based polarity scoring.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::warn;

/// Anything that can score already-cleaned text.
pub trait PolarityModel {
    /// Polarity in `[-1.0, 1.0]`; `0.0` when nothing opinionated is found.
    fn polarity(&self, text: &str) -> f64;
}

/// Negated words flip and dampen: "not great" is mildly negative, not
/// the mirror image of "great".
const NEGATION_FACTOR: f64 = -0.5;

const WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("calm", 0.3),
    ("cool", 0.35),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("fantastic", 0.4),
    ("fine", 0.4),
    ("fun", 0.3),
    ("funny", 0.25),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("hope", 0.2),
    ("incredible", 0.9),
    ("interesting", 0.5),
    ("love", 0.5),
    ("lovely", 0.5),
    ("lucky", 0.33),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("positive", 0.23),
    ("proud", 0.8),
    ("safe", 0.5),
    ("strong", 0.43),
    ("success", 0.3),
    ("thanks", 0.2),
    ("win", 0.8),
    ("wonderful", 1.0),
    ("afraid", -0.6),
    ("angry", -0.5),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("crazy", -0.6),
    ("dangerous", -0.6),
    ("dead", -0.2),
    ("disappointed", -0.75),
    ("dumb", -0.38),
    ("fake", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("ill", -0.5),
    ("lonely", -0.25),
    ("lost", -0.2),
    ("negative", -0.3),
    ("panic", -0.6),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scary", -0.5),
    ("serious", -0.33),
    ("sick", -0.71),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("wrong", -0.5),
    ("worse", -0.4),
    ("worst", -1.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.5),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.4),
    ("totally", 1.3),
    ("very", 1.3),
    ("pretty", 0.9),
    ("quite", 0.9),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nothing", "nobody", "hardly", "cannot", "cant",
    "dont", "don", "doesn", "didn", "isn", "wasn", "aren", "weren", "won", "wouldn", "couldn",
    "shouldn",
];

/// Word polarities plus the modifiers that shape them.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::with_words(WORDS.iter().map(|&(w, p)| (w.to_string(), p)).collect())
    }
}

impl Lexicon {
    fn with_words(words: HashMap<String, f64>) -> Self {
        Self {
            words,
            intensifiers: INTENSIFIERS
                .iter()
                .map(|&(w, m)| (w.to_string(), m))
                .collect(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Replace the word table with a JSON object of `word -> polarity`.
    pub fn from_json(json: &str) -> Result<Self> {
        let words: HashMap<String, f64> =
            serde_json::from_str(json).context("Failed to parse lexicon")?;

        let mut lexicon = Self::with_words(HashMap::new());

        for (word, polarity) in words {
            lexicon.add_word(&word, polarity);
        }

        Ok(lexicon)
    }

    /// Non-finite polarities are ignored.
    pub fn add_word(&mut self, word: &str, polarity: f64) {
        if !polarity.is_finite() {
            warn!(word, polarity, "Ignoring non-finite polarity");
            return;
        }

        self.words
            .insert(word.to_lowercase(), polarity.clamp(-1.0, 1.0));
    }

    pub fn word(&self, word: &str) -> Option<f64> {
        self.words.get(word).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|n| n == word)
    }
}

impl PolarityModel for Lexicon {
    fn polarity(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut negated = false;
        let mut intensity = 1.0;

        for token in text.split_whitespace().map(str::to_lowercase) {
            // cleaning strips apostrophes, leaving "don t"
            if token == "t" {
                continue;
            }

            if self.is_negation(&token) {
                negated = true;
                continue;
            }

            if let Some(&factor) = self.intensifiers.get(&token) {
                intensity *= factor;
                continue;
            }

            if let Some(polarity) = self.word(&token) {
                let mut score = polarity * intensity;
                if negated {
                    score *= NEGATION_FACTOR;
                }
                scores.push(score);
            }

            negated = false;
            intensity = 1.0;
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;

        mean.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_without_opinion_words() {
        let lexicon = Lexicon::default();

        assert_eq!(lexicon.polarity(""), 0.0);
        assert_eq!(lexicon.polarity("the train leaves at noon"), 0.0);
    }

    #[test]
    fn averages_matched_words() {
        let lexicon = Lexicon::default();

        assert!((lexicon.polarity("Great day") - 0.8).abs() < 1e-9);
        assert!((lexicon.polarity("good and bad") - 0.0).abs() < 1e-9);
    }

    #[test]
    fn negation_flips_and_dampens() {
        let lexicon = Lexicon::default();

        assert!((lexicon.polarity("not good") + 0.35).abs() < 1e-9);
        assert!((lexicon.polarity("I don t love it") + 0.25).abs() < 1e-9);
    }

    #[test]
    fn intensifiers_scale_but_stay_in_range() {
        let lexicon = Lexicon::default();

        assert!(lexicon.polarity("very good") > lexicon.polarity("good"));
        assert_eq!(lexicon.polarity("absolutely extremely perfect"), 1.0);
        assert_eq!(lexicon.polarity("really very terrible"), -1.0);
    }

    #[test]
    fn modifiers_reset_after_unknown_word() {
        let lexicon = Lexicon::default();

        assert!((lexicon.polarity("not today good") - 0.7).abs() < 1e-9);
    }

    #[test]
    fn custom_words_from_json() {
        let mut lexicon = Lexicon::from_json(r#"{"Bullish": 0.8, "rekt": -3.0}"#).unwrap();
        lexicon.add_word("moon", 0.6);

        assert_eq!(lexicon.word("bullish"), Some(0.8));
        assert_eq!(lexicon.word("rekt"), Some(-1.0));
        assert_eq!(lexicon.word("great"), None);
        assert!((lexicon.polarity("moon") - 0.6).abs() < 1e-9);
    }

    #[test]
    fn non_finite_polarities_are_ignored() {
        let mut lexicon = Lexicon::default();
        lexicon.add_word("void", f64::NAN);
        lexicon.add_word("great", f64::INFINITY);

        assert_eq!(lexicon.word("void"), None);
        assert_eq!(lexicon.word("great"), Some(0.8));
        assert_eq!(lexicon.polarity("void"), 0.0);
        assert!((lexicon.polarity("great void") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Lexicon::from_json("[1, 2]").is_err());
    }
}
