// Sentiment classification
// Model label + max class probability, or lexical polarity thresholds

use tracing::{debug, warn};

use crate::models::SentimentVerdict;
use crate::services::model_gate::{ModelError, TextModel};

use super::polarity::polarity;

const POLARITY_THRESHOLD: f64 = 0.1;

pub const FALLBACK_SENTIMENT: (SentimentVerdict, f64) = (SentimentVerdict::Neutral, 0.5);

pub trait SentimentStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, text: &str) -> Result<(SentimentVerdict, f64), ModelError>;
}

pub fn classify_sentiment(strategy: &dyn SentimentStrategy, text: &str) -> (SentimentVerdict, f64) {
    match strategy.classify(text) {
        Ok(result) => result,
        Err(e) => {
            warn!("[ANALYZER] Error in sentiment analysis ({}): {}", strategy.name(), e);
            FALLBACK_SENTIMENT
        }
    }
}

pub struct ModelSentiment {
    model: TextModel,
}

impl ModelSentiment {
    pub fn new(model: TextModel) -> Self {
        Self { model }
    }
}

impl SentimentStrategy for ModelSentiment {
    fn name(&self) -> &'static str {
        "model"
    }

    fn classify(&self, text: &str) -> Result<(SentimentVerdict, f64), ModelError> {
        let processed = text.to_lowercase();
        let label = self.model.predict(&processed)?;
        let proba = self
            .model
            .predict_proba(&processed)
            .ok_or_else(|| ModelError::Shape("sentiment model has no predict_proba".to_string()))??;

        let score = proba.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !score.is_finite() {
            return Err(if proba.is_empty() {
                ModelError::Shape("empty probability vector".to_string())
            } else {
                ModelError::NonFinite
            });
        }

        let sentiment = SentimentVerdict::from_label(&label).unwrap_or(SentimentVerdict::Neutral);
        debug!("[ANALYZER] ML model sentiment analysis: {} with confidence {:.2}", sentiment, score);
        Ok((sentiment, score.clamp(0.0, 1.0)))
    }
}

pub fn verdict_from_polarity(polarity: f64) -> (SentimentVerdict, f64) {
    let sentiment = if polarity > POLARITY_THRESHOLD {
        SentimentVerdict::Positive
    } else if polarity < -POLARITY_THRESHOLD {
        SentimentVerdict::Negative
    } else {
        SentimentVerdict::Neutral
    };
    (sentiment, polarity.abs().min(1.0))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicSentiment;

impl SentimentStrategy for HeuristicSentiment {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn classify(&self, text: &str) -> Result<(SentimentVerdict, f64), ModelError> {
        Ok(verdict_from_polarity(polarity(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::model_gate::test_support::*;
    use std::sync::Arc;

    #[test]
    fn test_polarity_thresholds() {
        assert_eq!(verdict_from_polarity(0.5).0, SentimentVerdict::Positive);
        assert_eq!(verdict_from_polarity(-0.5), (SentimentVerdict::Negative, 0.5));
        assert_eq!(verdict_from_polarity(0.1).0, SentimentVerdict::Neutral);
        assert_eq!(verdict_from_polarity(-0.1).0, SentimentVerdict::Neutral);
        assert_eq!(verdict_from_polarity(0.0), (SentimentVerdict::Neutral, 0.0));
    }

    #[test]
    fn test_heuristic_sentiment() {
        let (sentiment, score) = classify_sentiment(&HeuristicSentiment, "Great blender, I love it");
        assert_eq!(sentiment, SentimentVerdict::Positive);
        assert!(score > 0.1 && score <= 1.0);

        let (sentiment, _) = classify_sentiment(&HeuristicSentiment, "Awful quality, broke in a day");
        assert_eq!(sentiment, SentimentVerdict::Negative);
    }

    #[test]
    fn test_heuristic_covers_common_review_words() {
        let (sentiment, _) = classify_sentiment(
            &HeuristicSentiment,
            "Lovely gift, my favorite purchase this year. So glad I bought it!",
        );
        assert_eq!(sentiment, SentimentVerdict::Positive);

        let (sentiment, _) = classify_sentiment(&HeuristicSentiment, "It failed on day one, completely useless.");
        assert_eq!(sentiment, SentimentVerdict::Negative);
    }

    #[test]
    fn test_model_sees_lowercased_text() {
        let model = Arc::new(RecordingText::new("positive"));
        let strategy = ModelSentiment::new(model.clone());

        assert_eq!(classify_sentiment(&strategy, "MiXeD CaSe!"), (SentimentVerdict::Positive, 0.75));
        let inputs = model.inputs();
        assert!(!inputs.is_empty());
        assert!(inputs.iter().all(|i| i == "mixed case!"));
    }

    #[test]
    fn test_model_label_mapping() {
        let strategy = ModelSentiment::new(Arc::new(FixedProba("NEGATIVE", vec![0.1, 0.7, 0.2])));
        assert_eq!(classify_sentiment(&strategy, "text"), (SentimentVerdict::Negative, 0.7));

        let strategy = ModelSentiment::new(Arc::new(FixedProba("mixed", vec![0.6, 0.4])));
        assert_eq!(classify_sentiment(&strategy, "text"), (SentimentVerdict::Neutral, 0.6));
    }

    #[test]
    fn test_model_failures_fall_back() {
        let strategy = ModelSentiment::new(Arc::new(Broken));
        assert_eq!(classify_sentiment(&strategy, "text"), FALLBACK_SENTIMENT);

        let strategy = ModelSentiment::new(Arc::new(FixedLabel("positive")));
        assert_eq!(classify_sentiment(&strategy, "text"), FALLBACK_SENTIMENT);

        let strategy = ModelSentiment::new(Arc::new(FixedProba("positive", vec![])));
        assert_eq!(classify_sentiment(&strategy, "text"), FALLBACK_SENTIMENT);
    }
}
