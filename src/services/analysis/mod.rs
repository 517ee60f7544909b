// Analysis Module
// Review analysis core logic organized into specialized submodules:
// - authenticity: fake/real verdicts (model or heuristic)
// - sentiment: positive/negative/neutral verdicts (model or lexical polarity)
// - category: quality/price/delivery/general verdicts (model or lexicons)
// - polarity: lexical polarity scorer used by the sentiment heuristic
// - lexicon: fixed term lists
// - jitter: injectable noise for the fake heuristic
// - aggregation: tallies verdicts into the corpus report
// - engine: per-call strategy selection and the analyzer entry points

pub mod aggregation;
pub mod authenticity;
pub mod category;
pub mod engine;
pub mod jitter;
pub mod lexicon;
pub mod polarity;
pub mod sentiment;

pub use aggregation::{empty_report, fake_percentage, ReviewTally};
pub use authenticity::{
    classify_authenticity,
    heuristic_fake_score,
    AuthenticityStrategy,
    HeuristicAuthenticity,
    ModelAuthenticity,
};
pub use category::{classify_category, CategoryStrategy, HeuristicCategory, ModelCategory};
pub use engine::{AnalysisError, AnalyzerSettings, AxisStrategies, ReviewAnalyzer};
pub use jitter::{JitterSource, SeededJitter, ThreadJitter, ZeroJitter};
pub use polarity::polarity;
pub use sentiment::{classify_sentiment, HeuristicSentiment, ModelSentiment, SentimentStrategy};
