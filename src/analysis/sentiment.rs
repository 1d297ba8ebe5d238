use super::clean::clean;
use std::fmt;

/// A continuous sentiment score in `[-1, 1]`.
pub trait Polarity: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            SentimentLabel::Positive
        } else if polarity == 0.0 {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Negative
        }
    }

    pub fn value(self) -> i8 {
        match self {
            SentimentLabel::Negative => -1,
            SentimentLabel::Neutral => 0,
            SentimentLabel::Positive => 1,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Cleans the text, asks the polarity function, and keeps only the sign.
pub struct SentimentScorer {
    polarity: Box<dyn Polarity>,
}

impl SentimentScorer {
    pub fn new(polarity: Box<dyn Polarity>) -> Self {
        Self { polarity }
    }

    pub fn score(&self, text: &str) -> SentimentLabel {
        let cleaned = clean(text);
        SentimentLabel::from_polarity(self.polarity.polarity(&cleaned))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Looks the cleaned text up in a fixed table; unknown text scores 0.
    pub(crate) struct TablePolarity {
        scores: HashMap<String, f64>,
        pub seen: Arc<Mutex<Vec<String>>>,
    }

    impl TablePolarity {
        pub(crate) fn new(scores: &[(&str, f64)]) -> Self {
            Self {
                scores: scores
                    .iter()
                    .map(|(text, score)| (text.to_string(), *score))
                    .collect(),
                seen: Arc::default(),
            }
        }
    }

    impl Polarity for TablePolarity {
        fn polarity(&self, text: &str) -> f64 {
            self.seen.lock().unwrap().push(text.to_string());
            self.scores.get(text).copied().unwrap_or(0.0)
        }
    }

    #[test]
    fn test_quantization() {
        assert_eq!(SentimentLabel::from_polarity(0.8), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(f64::MIN_POSITIVE), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-1e-9), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_polarity(-1.0), SentimentLabel::Negative);
    }

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(SentimentLabel::Positive.to_string(), "1");
        assert_eq!(SentimentLabel::Neutral.to_string(), "0");
        assert_eq!(SentimentLabel::Negative.to_string(), "-1");
    }

    #[test]
    fn test_scorer_cleans_before_scoring() {
        let polarity = TablePolarity::new(&[("I love this", 0.8)]);
        let seen = polarity.seen.clone();
        let scorer = SentimentScorer::new(Box::new(polarity));

        assert_eq!(
            scorer.score("I love this!!! @someone https://t.co/x"),
            SentimentLabel::Positive
        );
        assert_eq!(seen.lock().unwrap().as_slice(), ["I love this"]);
    }

    #[test]
    fn test_scorer_is_deterministic() {
        let scorer = SentimentScorer::new(Box::new(TablePolarity::new(&[("meh", 0.0), ("bad", -0.3)])));
        for _ in 0..3 {
            assert_eq!(scorer.score("meh"), SentimentLabel::Neutral);
            assert_eq!(scorer.score("bad"), SentimentLabel::Negative);
        }
    }
}
