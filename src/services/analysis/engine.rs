// Review Analyzer
// Picks one strategy per axis for each call, classifies every review and
// aggregates the verdicts.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{AnalysisReport, QuickSummary, SingleReviewAnalysis};
use crate::services::model_gate::ModelGate;
use crate::services::text_processor::{clean_reviews, preview, MIN_REVIEW_CHARS};

use super::aggregation::ReviewTally;
use super::authenticity::{classify_authenticity, AuthenticityStrategy, HeuristicAuthenticity, ModelAuthenticity};
use super::category::{classify_category, CategoryStrategy, HeuristicCategory, ModelCategory};
use super::jitter::{JitterSource, ThreadJitter, DEFAULT_JITTER_BOUND};
use super::sentiment::{classify_sentiment, HeuristicSentiment, ModelSentiment, SentimentStrategy};

pub const DEFAULT_MAX_REVIEWS: usize = 100;
pub const DEFAULT_QUICK_SAMPLE: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no analyzable reviews ({submitted} submitted, all empty or shorter than {min_chars} chars)")]
    NoAnalyzableReviews { submitted: usize, min_chars: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSettings {
    pub min_review_chars: usize,
    pub max_reviews: usize,
    pub quick_sample: usize,
    pub jitter_bound: f64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            min_review_chars: MIN_REVIEW_CHARS,
            max_reviews: DEFAULT_MAX_REVIEWS,
            quick_sample: DEFAULT_QUICK_SAMPLE,
            jitter_bound: DEFAULT_JITTER_BOUND,
        }
    }
}

/// The strategy chosen for each axis, fixed for the duration of one call.
pub struct AxisStrategies {
    pub authenticity: Box<dyn AuthenticityStrategy>,
    pub sentiment: Box<dyn SentimentStrategy>,
    pub category: Box<dyn CategoryStrategy>,
}

impl AxisStrategies {
    pub fn analyze(&self, review: &str) -> SingleReviewAnalysis {
        let (is_fake, confidence_score) = classify_authenticity(self.authenticity.as_ref(), review);
        let (sentiment, sentiment_score) = classify_sentiment(self.sentiment.as_ref(), review);
        let category = classify_category(self.category.as_ref(), review);

        SingleReviewAnalysis {
            review_text: review.to_string(),
            is_fake,
            sentiment,
            sentiment_score,
            category,
            confidence_score,
        }
    }
}

/// Stateless across calls; share it behind an `Arc` between request handlers.
pub struct ReviewAnalyzer {
    gate: Arc<ModelGate>,
    jitter: Arc<dyn JitterSource>,
    settings: AnalyzerSettings,
}

impl ReviewAnalyzer {
    pub fn new(gate: Arc<ModelGate>, jitter: Arc<dyn JitterSource>) -> Self {
        Self {
            gate,
            jitter,
            settings: AnalyzerSettings::default(),
        }
    }

    /// No models, non-deterministic jitter.
    pub fn heuristic_only() -> Self {
        Self::new(Arc::new(ModelGate::heuristic_only()), Arc::new(ThreadJitter))
    }

    pub fn with_settings(mut self, settings: AnalyzerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn gate(&self) -> &ModelGate {
        &self.gate
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn strategies(&self) -> AxisStrategies {
        let authenticity: Box<dyn AuthenticityStrategy> = match self.gate.fake_detector() {
            Some(detector) => Box::new(ModelAuthenticity::new(detector)),
            None => Box::new(HeuristicAuthenticity::new(
                Arc::clone(&self.jitter),
                self.settings.jitter_bound,
            )),
        };
        let sentiment: Box<dyn SentimentStrategy> = match self.gate.sentiment_model() {
            Some(model) => Box::new(ModelSentiment::new(model)),
            None => Box::new(HeuristicSentiment),
        };
        let category: Box<dyn CategoryStrategy> = match self.gate.category_model() {
            Some(model) => Box::new(ModelCategory::new(model)),
            None => Box::new(HeuristicCategory),
        };

        AxisStrategies {
            authenticity,
            sentiment,
            category,
        }
    }

    pub fn analyze_single(&self, review: &str) -> SingleReviewAnalysis {
        self.strategies().analyze(review.trim())
    }

    /// Analyze a corpus. Empty and too-short reviews are dropped silently; an
    /// input with nothing left yields an empty report.
    pub fn analyze<S: AsRef<str>>(&self, reviews: &[S]) -> AnalysisReport {
        let analysis_id = Uuid::new_v4();
        let cleaned = clean_reviews(reviews, self.settings.min_review_chars);
        let strategies = self.strategies();

        info!(
            analysis_id = %analysis_id,
            submitted = reviews.len(),
            analyzable = cleaned.len(),
            authenticity = strategies.authenticity.name(),
            sentiment = strategies.sentiment.name(),
            category = strategies.category.name(),
            "[ANALYZER] Starting review analysis"
        );

        let tally: ReviewTally = cleaned
            .iter()
            .map(|review| {
                let analysis = strategies.analyze(review);
                debug!(
                    analysis_id = %analysis_id,
                    "[ANALYZER] {:?}/{}/{} <- {}",
                    analysis.is_fake,
                    analysis.sentiment,
                    analysis.category,
                    preview(review, 40)
                );
                analysis
            })
            .collect();
        let report = tally.into_report();

        info!(
            analysis_id = %analysis_id,
            total = report.total_reviews,
            fake = report.fake_count,
            fake_percentage = report.fake_percentage,
            overall = %report.overall_sentiment,
            "[ANALYZER] Analysis complete"
        );
        report
    }

    /// Like `analyze`, but an input with no analyzable review is an error.
    pub fn analyze_strict<S: AsRef<str>>(&self, reviews: &[S]) -> Result<AnalysisReport, AnalysisError> {
        let report = self.analyze(reviews);
        if report.is_empty() {
            return Err(AnalysisError::NoAnalyzableReviews {
                submitted: reviews.len(),
                min_chars: self.settings.min_review_chars,
            });
        }
        Ok(report)
    }

    /// Trim, drop empties and keep at most `max_reviews` before analyzing.
    pub fn analyze_capped<S: AsRef<str>>(&self, reviews: &[S]) -> AnalysisReport {
        let mut cleaned = clean_reviews(reviews, 1);
        if cleaned.len() > self.settings.max_reviews {
            warn!(
                "[ANALYZER] Limited analysis to first {} of {} reviews",
                self.settings.max_reviews,
                cleaned.len()
            );
            cleaned.truncate(self.settings.max_reviews);
        }
        self.analyze(&cleaned)
    }

    /// Summary statistics over the first `quick_sample` non-empty reviews.
    pub fn quick_summary<S: AsRef<str>>(&self, reviews: &[S]) -> QuickSummary {
        let mut cleaned = clean_reviews(reviews, 1);
        cleaned.truncate(self.settings.quick_sample);
        QuickSummary::from(&self.analyze(&cleaned))
    }
}
