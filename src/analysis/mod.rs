pub mod clean;
pub mod lexicon;
pub mod sentiment;

pub use clean::clean;
pub use lexicon::LexiconPolarity;
pub use sentiment::{Polarity, SentimentLabel, SentimentScorer};
