// Model Provisioning Gate
// Holds the optional classifier handles the analyzer may use

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("unexpected output shape: {0}")]
    Shape(String),
    #[error("model returned a non-finite value")]
    NonFinite,
    #[error("model exposes neither predict_proba nor decision_function")]
    NoScoreInterface,
}

/// Turns raw text into a feature vector for a feature-based classifier.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<Vec<f64>, ModelError>;
}

/// A trained classifier. `Input` is `str` for text pipelines and `[f64]` for
/// classifiers that expect vectorized features.
///
/// `predict_proba` and `decision_function` are optional capabilities; the
/// default implementations report them as absent.
pub trait ClassifierModel<Input: ?Sized>: Send + Sync {
    fn predict(&self, input: &Input) -> Result<String, ModelError>;

    fn predict_proba(&self, _input: &Input) -> Option<Result<Vec<f64>, ModelError>> {
        None
    }

    fn decision_function(&self, _input: &Input) -> Option<Result<f64, ModelError>> {
        None
    }
}

pub type FeatureModel = Arc<dyn ClassifierModel<[f64]>>;
pub type TextModel = Arc<dyn ClassifierModel<str>>;
pub type SharedVectorizer = Arc<dyn Vectorizer>;

/// Fake-detector paired with the vectorizer it was trained against.
#[derive(Clone)]
pub struct FakeDetectorHandle {
    pub model: FeatureModel,
    pub vectorizer: SharedVectorizer,
}

/// Set once at warm-up and read-only afterwards.
#[derive(Clone, Default)]
pub struct ModelGate {
    fake_model: Option<FeatureModel>,
    vectorizer: Option<SharedVectorizer>,
    sentiment_model: Option<TextModel>,
    category_model: Option<TextModel>,
    models_loaded: bool,
}

impl fmt::Debug for ModelGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGate")
            .field("fake_model", &self.fake_model.is_some())
            .field("vectorizer", &self.vectorizer.is_some())
            .field("sentiment_model", &self.sentiment_model.is_some())
            .field("category_model", &self.category_model.is_some())
            .field("models_loaded", &self.models_loaded)
            .finish()
    }
}

impl ModelGate {
    /// Gate with no models: every axis runs its heuristic.
    pub fn heuristic_only() -> Self {
        Self::default()
    }

    pub fn builder() -> ModelGateBuilder {
        ModelGateBuilder::default()
    }

    /// True if at least one classifier model was provided.
    pub fn is_ready(&self) -> bool {
        self.models_loaded
    }

    /// Both halves of the fake detector, or `None` if either is missing.
    pub fn fake_detector(&self) -> Option<FakeDetectorHandle> {
        match (&self.fake_model, &self.vectorizer) {
            (Some(model), Some(vectorizer)) => Some(FakeDetectorHandle {
                model: Arc::clone(model),
                vectorizer: Arc::clone(vectorizer),
            }),
            _ => None,
        }
    }

    pub fn sentiment_model(&self) -> Option<TextModel> {
        self.sentiment_model.clone()
    }

    pub fn category_model(&self) -> Option<TextModel> {
        self.category_model.clone()
    }
}

#[derive(Default)]
pub struct ModelGateBuilder {
    fake_model: Option<FeatureModel>,
    vectorizer: Option<SharedVectorizer>,
    sentiment_model: Option<TextModel>,
    category_model: Option<TextModel>,
}

impl ModelGateBuilder {
    pub fn fake_model(mut self, model: FeatureModel) -> Self {
        self.fake_model = Some(model);
        self
    }

    pub fn vectorizer(mut self, vectorizer: SharedVectorizer) -> Self {
        self.vectorizer = Some(vectorizer);
        self
    }

    pub fn sentiment_model(mut self, model: TextModel) -> Self {
        self.sentiment_model = Some(model);
        self
    }

    pub fn category_model(mut self, model: TextModel) -> Self {
        self.category_model = Some(model);
        self
    }

    pub fn build(self) -> ModelGate {
        let models_loaded = self.fake_model.is_some()
            || self.sentiment_model.is_some()
            || self.category_model.is_some();

        if self.fake_model.is_some() != self.vectorizer.is_some() {
            warn!(
                "[MODEL_GATE] Fake detector incomplete (model: {}, vectorizer: {}); heuristic will be used",
                self.fake_model.is_some(),
                self.vectorizer.is_some()
            );
        }

        if models_loaded {
            info!(
                fake = self.fake_model.is_some() && self.vectorizer.is_some(),
                sentiment = self.sentiment_model.is_some(),
                category = self.category_model.is_some(),
                "[MODEL_GATE] Model loading complete"
            );
        } else {
            warn!("[MODEL_GATE] No ML models were loaded. Using fallback implementations.");
        }

        ModelGate {
            fake_model: self.fake_model,
            vectorizer: self.vectorizer,
            sentiment_model: self.sentiment_model,
            category_model: self.category_model,
            models_loaded,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_empty_gate_is_not_ready() {
        let gate = ModelGate::heuristic_only();
        assert!(!gate.is_ready());
        assert!(gate.fake_detector().is_none());
        assert!(gate.sentiment_model().is_none());
        assert!(gate.category_model().is_none());
    }

    #[test]
    fn test_any_model_makes_gate_ready() {
        let gate = ModelGate::builder()
            .category_model(Arc::new(FixedLabel("price")))
            .build();
        assert!(gate.is_ready());
        assert!(gate.category_model().is_some());
    }

    #[test]
    fn test_vectorizer_alone_does_not_count() {
        let gate = ModelGate::builder().vectorizer(Arc::new(LengthVectorizer)).build();
        assert!(!gate.is_ready());
        assert!(gate.fake_detector().is_none());
    }

    #[test]
    fn test_fake_detector_requires_both_halves() {
        let gate = ModelGate::builder()
            .fake_model(Arc::new(MarginFeatureModel(1.0)))
            .build();
        assert!(gate.is_ready());
        assert!(gate.fake_detector().is_none());

        let gate = ModelGate::builder()
            .fake_model(Arc::new(MarginFeatureModel(1.0)))
            .vectorizer(Arc::new(LengthVectorizer))
            .build();
        assert!(gate.fake_detector().is_some());
    }
}
