//! Word-list polarity used when no other scorer is plugged in.

use super::sentiment::Polarity;
use std::collections::HashMap;

const WORDS: &[(&str, f64)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("congrats", 0.6),
    ("cool", 0.35),
    ("enjoy", 0.4),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("exciting", 0.3),
    ("fantastic", 0.4),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("impressive", 1.0),
    ("incredible", 0.9),
    ("interesting", 0.5),
    ("like", 0.2),
    ("love", 0.5),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("proud", 0.8),
    ("super", 0.33),
    ("thank", 0.2),
    ("thanks", 0.2),
    ("win", 0.8),
    ("wonderful", 1.0),
    ("wow", 0.1),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("crazy", -0.6),
    ("dead", -0.2),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("fail", -0.5),
    ("fake", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("lose", -0.4),
    ("mad", -0.6),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scary", -0.5),
    ("sick", -0.7),
    ("sorry", -0.5),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("wrong", -0.5),
    ("worse", -0.4),
    ("worst", -1.0),
];

/// Contractions lose their apostrophe when cleaned ("don't" becomes "don t"),
/// so the stems are listed alongside the full words.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "hardly", "dont", "don", "doesn", "didn", "isn",
    "wasn", "aren", "weren", "couldn", "shouldn", "wouldn", "cant",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("totally", 1.4),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("pretty", 0.8),
];

/// Averages lexicon scores of the words in a text. A negator flips and halves
/// the next sentiment word; an intensifier scales it.
pub struct LexiconPolarity {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconPolarity {
    pub fn new() -> Self {
        Self {
            words: WORDS
                .iter()
                .map(|(word, score)| (word.to_string(), *score))
                .collect(),
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(word, factor)| (word.to_string(), *factor))
                .collect(),
        }
    }

    /// Add or replace entries. Keys are matched case-insensitively.
    pub fn with_words(mut self, extra: &HashMap<String, f64>) -> Self {
        for (word, score) in extra {
            self.words
                .insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        }
        self
    }
}

impl Polarity for LexiconPolarity {
    fn polarity(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut negate = false;
        let mut factor = 1.0;

        for token in text.split_whitespace() {
            let word = token.to_lowercase();

            // Leftovers of contractions ("t", "s") carry no meaning.
            if word.chars().count() == 1 {
                continue;
            }

            if let Some(score) = self.words.get(&word) {
                let mut score = score * factor;
                if negate {
                    score *= -0.5;
                }
                scores.push(score);
                negate = false;
                factor = 1.0;
            } else if NEGATORS.contains(&word.as_str()) {
                negate = true;
            } else if let Some(multiplier) = self.intensifiers.get(&word) {
                factor = *multiplier;
            } else {
                negate = false;
                factor = 1.0;
            }
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}
