// RevAI Core Services

pub mod analysis;
pub mod config_store;
pub mod model_gate;
pub mod rate_limit;
pub mod review_source;
pub mod text_processor;

pub use config_store::*;
pub use model_gate::*;
pub use text_processor::*;

pub use analysis::{
    classify_authenticity,
    classify_category,
    classify_sentiment,
    AnalysisError,
    AnalyzerSettings,
    ReviewAnalyzer,
    ReviewTally,
};
pub use rate_limit::{Clock, DemoRateLimiter, RateLimitError, RateLimiter, SystemClock};
pub use review_source::{collect_reviews, extract_asin, RapidApiReviewSource, ReviewSourceError};
