// Fixed lexicons used by the heuristic classifiers

/// Superlative / hype terms typical of planted reviews.
pub const HYPE_TERMS: [&str; 10] = [
    "amazing",
    "perfect",
    "best ever",
    "life changing",
    "miraculous",
    "unbelievable",
    "fantastic",
    "incredible",
    "outstanding",
    "phenomenal",
];

pub const QUALITY_TERMS: [&str; 12] = [
    "quality",
    "durable",
    "sturdy",
    "build",
    "material",
    "construction",
    "solid",
    "cheap",
    "flimsy",
    "broke",
    "broken",
    "defective",
];

pub const PRICE_TERMS: [&str; 11] = [
    "price",
    "cost",
    "expensive",
    "cheap",
    "value",
    "money",
    "worth",
    "affordable",
    "budget",
    "overpriced",
    "deal",
];

pub const DELIVERY_TERMS: [&str; 11] = [
    "shipping",
    "delivery",
    "fast",
    "slow",
    "arrived",
    "package",
    "packaging",
    "box",
    "delayed",
    "quick",
    "overnight",
];
