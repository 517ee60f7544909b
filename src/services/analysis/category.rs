// Category classification
// Model label mapping, or lexicon counts over quality/price/delivery.
// Neither path produces `Service`: no lexicon or model label maps to it.

use tracing::{debug, warn};

use crate::models::CategoryVerdict;
use crate::services::model_gate::{ModelError, TextModel};
use crate::services::text_processor::lexicon_hits;

use super::lexicon::{DELIVERY_TERMS, PRICE_TERMS, QUALITY_TERMS};

pub const FALLBACK_CATEGORY: CategoryVerdict = CategoryVerdict::General;

pub trait CategoryStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, text: &str) -> Result<CategoryVerdict, ModelError>;
}

pub fn classify_category(strategy: &dyn CategoryStrategy, text: &str) -> CategoryVerdict {
    match strategy.classify(text) {
        Ok(category) => category,
        Err(e) => {
            warn!("[ANALYZER] Error in categorization ({}): {}", strategy.name(), e);
            FALLBACK_CATEGORY
        }
    }
}

/// Labels a category model may emit; anything else is `General`.
pub fn category_from_model_label(label: &str) -> CategoryVerdict {
    match label.trim().to_lowercase().as_str() {
        "quality" => CategoryVerdict::Quality,
        "price" => CategoryVerdict::Price,
        "delivery" => CategoryVerdict::Delivery,
        _ => CategoryVerdict::General,
    }
}

pub struct ModelCategory {
    model: TextModel,
}

impl ModelCategory {
    pub fn new(model: TextModel) -> Self {
        Self { model }
    }
}

impl CategoryStrategy for ModelCategory {
    fn name(&self) -> &'static str {
        "model"
    }

    fn classify(&self, text: &str) -> Result<CategoryVerdict, ModelError> {
        let label = self.model.predict(&text.to_lowercase())?;
        let category = category_from_model_label(&label);
        debug!("[ANALYZER] ML model categorization: {}", category);
        Ok(category)
    }
}

/// Strict maximum of the lexicon counts; ties resolve quality, price, delivery.
pub fn category_from_counts(quality: usize, price: usize, delivery: usize) -> CategoryVerdict {
    let max = quality.max(price).max(delivery);
    if max == 0 {
        CategoryVerdict::General
    } else if quality == max {
        CategoryVerdict::Quality
    } else if price == max {
        CategoryVerdict::Price
    } else {
        CategoryVerdict::Delivery
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicCategory;

impl CategoryStrategy for HeuristicCategory {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn classify(&self, text: &str) -> Result<CategoryVerdict, ModelError> {
        Ok(category_from_counts(
            lexicon_hits(text, &QUALITY_TERMS),
            lexicon_hits(text, &PRICE_TERMS),
            lexicon_hits(text, &DELIVERY_TERMS),
        ))
    }
}
