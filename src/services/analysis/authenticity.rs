// Authenticity (fake/real) classification
// - Model path: vectorizer + fake detector, probability or decision margin
// - Heuristic path: exclamation density, hype terms, length outliers, jitter

use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::FakeVerdict;
use crate::services::model_gate::{ClassifierModel, FakeDetectorHandle, ModelError};
use crate::services::text_processor::{char_len, lexicon_hits};

use super::jitter::JitterSource;
use super::lexicon::HYPE_TERMS;

const FAKE_THRESHOLD: f64 = 0.5;
const EXCLAMATION_WEIGHT: f64 = 2.0;
const HYPE_TERM_WEIGHT: f64 = 0.2;
const LENGTH_OUTLIER_SCORE: f64 = 0.3;
const MIN_TYPICAL_CHARS: usize = 20;
const MAX_TYPICAL_CHARS: usize = 1000;

/// Verdict used when a classifier fails.
pub const FALLBACK_AUTHENTICITY: (FakeVerdict, f64) = (FakeVerdict::Real, 0.5);

pub trait AuthenticityStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, text: &str) -> Result<(FakeVerdict, f64), ModelError>;
}

/// Run a strategy, absorbing failures into `FALLBACK_AUTHENTICITY`.
pub fn classify_authenticity(strategy: &dyn AuthenticityStrategy, text: &str) -> (FakeVerdict, f64) {
    match strategy.classify(text) {
        Ok(result) => result,
        Err(e) => {
            warn!("[ANALYZER] Error in fake detection ({}): {}", strategy.name(), e);
            FALLBACK_AUTHENTICITY
        }
    }
}

/// Threshold a fake probability; confidence is the probability of the chosen side.
pub fn verdict_from_probability(p: f64) -> (FakeVerdict, f64) {
    let p = p.clamp(0.0, 1.0);
    if p > FAKE_THRESHOLD {
        (FakeVerdict::Fake, p)
    } else {
        (FakeVerdict::Real, 1.0 - p)
    }
}

#[inline]
fn logistic(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

fn ensure_finite(v: f64) -> Result<f64, ModelError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ModelError::NonFinite)
    }
}

/// Class-1 probability, from `predict_proba` when available, else the
/// logistic of the decision margin.
pub fn fake_probability(model: &dyn ClassifierModel<[f64]>, features: &[f64]) -> Result<f64, ModelError> {
    if let Some(proba) = model.predict_proba(features) {
        let proba = proba?;
        let p = match proba.as_slice() {
            [] => return Err(ModelError::Shape("empty probability vector".to_string())),
            [only] => *only,
            [_, fake, ..] => *fake,
        };
        return Ok(ensure_finite(p)?.clamp(0.0, 1.0));
    }

    if let Some(margin) = model.decision_function(features) {
        return Ok(logistic(ensure_finite(margin?)?));
    }

    Err(ModelError::NoScoreInterface)
}

pub struct ModelAuthenticity {
    detector: FakeDetectorHandle,
}

impl ModelAuthenticity {
    pub fn new(detector: FakeDetectorHandle) -> Self {
        Self { detector }
    }
}

impl AuthenticityStrategy for ModelAuthenticity {
    fn name(&self) -> &'static str {
        "model"
    }

    fn classify(&self, text: &str) -> Result<(FakeVerdict, f64), ModelError> {
        let features = self.detector.vectorizer.transform(&text.to_lowercase())?;
        let p = fake_probability(self.detector.model.as_ref(), &features)?;
        let (verdict, confidence) = verdict_from_probability(p);
        debug!("[ANALYZER] ML model fake detection: {:?} with confidence {:.2}", verdict, confidence);
        Ok((verdict, confidence))
    }
}

/// Pre-jitter heuristic score in [0, 1].
pub fn heuristic_fake_score(text: &str) -> f64 {
    let len = char_len(text);
    let exclamation_density = text.matches('!').count() as f64 / len.max(1) as f64;
    let hype_hits = lexicon_hits(text, &HYPE_TERMS) as f64;
    let length_outlier = if len < MIN_TYPICAL_CHARS || len > MAX_TYPICAL_CHARS {
        LENGTH_OUTLIER_SCORE
    } else {
        0.0
    };

    (EXCLAMATION_WEIGHT * exclamation_density + HYPE_TERM_WEIGHT * hype_hits + length_outlier)
        .clamp(0.0, 1.0)
}

pub struct HeuristicAuthenticity {
    jitter: Arc<dyn JitterSource>,
    jitter_bound: f64,
}

impl HeuristicAuthenticity {
    pub fn new(jitter: Arc<dyn JitterSource>, jitter_bound: f64) -> Self {
        Self { jitter, jitter_bound }
    }
}

impl AuthenticityStrategy for HeuristicAuthenticity {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn classify(&self, text: &str) -> Result<(FakeVerdict, f64), ModelError> {
        let score = heuristic_fake_score(text) + self.jitter.sample(self.jitter_bound);
        Ok(verdict_from_probability(score.clamp(0.0, 1.0)))
    }
}
