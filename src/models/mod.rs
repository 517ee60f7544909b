// RevAI Data Models
// Verdicts, per-review results and the corpus report

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Verdicts ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FakeVerdict {
    Fake,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentVerdict {
    Positive,
    Negative,
    Neutral,
}

impl SentimentVerdict {
    /// Fixed iteration order, also the tie-break order for the overall sentiment.
    pub const ALL: [SentimentVerdict; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Case-insensitive label lookup; unknown labels are `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryVerdict {
    Quality,
    Price,
    Delivery,
    Service,
    General,
}

impl CategoryVerdict {
    pub const ALL: [CategoryVerdict; 5] = [
        Self::Quality,
        Self::Price,
        Self::Delivery,
        Self::Service,
        Self::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Price => "price",
            Self::Delivery => "delivery",
            Self::Service => "service",
            Self::General => "general",
        }
    }
}

impl fmt::Display for CategoryVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============ Distributions ============

/// Per-sentiment counts. Every key is always present in the serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn get(&self, sentiment: SentimentVerdict) -> usize {
        match sentiment {
            SentimentVerdict::Positive => self.positive,
            SentimentVerdict::Negative => self.negative,
            SentimentVerdict::Neutral => self.neutral,
        }
    }

    pub fn increment(&mut self, sentiment: SentimentVerdict) {
        match sentiment {
            SentimentVerdict::Positive => self.positive += 1,
            SentimentVerdict::Negative => self.negative += 1,
            SentimentVerdict::Neutral => self.neutral += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.positive += other.positive;
        self.negative += other.negative;
        self.neutral += other.neutral;
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Sentiment with the highest count. Ties go to the first key in
    /// `SentimentVerdict::ALL` order.
    pub fn dominant(&self) -> SentimentVerdict {
        let mut best = SentimentVerdict::ALL[0];
        for candidate in SentimentVerdict::ALL.iter().copied().skip(1) {
            if self.get(candidate) > self.get(best) {
                best = candidate;
            }
        }
        best
    }
}

/// Per-category counts. Every key is always present in the serialized form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub quality: usize,
    pub price: usize,
    pub delivery: usize,
    pub service: usize,
    pub general: usize,
}

impl CategoryDistribution {
    pub fn get(&self, category: CategoryVerdict) -> usize {
        match category {
            CategoryVerdict::Quality => self.quality,
            CategoryVerdict::Price => self.price,
            CategoryVerdict::Delivery => self.delivery,
            CategoryVerdict::Service => self.service,
            CategoryVerdict::General => self.general,
        }
    }

    pub fn increment(&mut self, category: CategoryVerdict) {
        match category {
            CategoryVerdict::Quality => self.quality += 1,
            CategoryVerdict::Price => self.price += 1,
            CategoryVerdict::Delivery => self.delivery += 1,
            CategoryVerdict::Service => self.service += 1,
            CategoryVerdict::General => self.general += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.quality += other.quality;
        self.price += other.price;
        self.delivery += other.delivery;
        self.service += other.service;
        self.general += other.general;
    }

    pub fn total(&self) -> usize {
        self.quality + self.price + self.delivery + self.service + self.general
    }
}

// ============ Review Results ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleReviewAnalysis {
    pub review_text: String,
    pub is_fake: FakeVerdict,
    pub sentiment: SentimentVerdict,
    pub sentiment_score: f64,
    pub category: CategoryVerdict,
    /// Confidence of the fake/real verdict, in [0, 1].
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_reviews: usize,
    pub fake_count: usize,
    pub real_count: usize,
    pub sentiment_distribution: SentimentDistribution,
    pub category_distribution: CategoryDistribution,
    pub detailed_results: Vec<SingleReviewAnalysis>,
    pub overall_sentiment: SentimentVerdict,
    pub fake_percentage: f64,
}

impl AnalysisReport {
    /// True when no review survived filtering.
    pub fn is_empty(&self) -> bool {
        self.total_reviews == 0
    }
}

/// Summary-only view used by quick analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickSummary {
    pub total_analyzed: usize,
    pub fake_percentage: f64,
    pub overall_sentiment: SentimentVerdict,
    pub sentiment_distribution: SentimentDistribution,
    pub category_distribution: CategoryDistribution,
}

impl From<&AnalysisReport> for QuickSummary {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            total_analyzed: report.total_reviews,
            fake_percentage: report.fake_percentage,
            overall_sentiment: report.overall_sentiment,
            sentiment_distribution: report.sentiment_distribution,
            category_distribution: report.category_distribution,
        }
    }
}

// ============ Ingestion ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOrigin {
    Url,
    Manual,
    Mixed,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub total_reviews: usize,
    pub reviews: Vec<String>,
    pub source: ReviewOrigin,
}

// ============ Demo Quota ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoQuota {
    pub tries_used: u32,
    pub remaining: u32,
}
