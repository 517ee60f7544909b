// Review Source Service
// Fetches product reviews from the RapidAPI Amazon data endpoint and merges
// them with manually supplied reviews

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::env;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{ReviewBatch, ReviewOrigin};
use crate::services::config_store::{ConfigStore, ReviewSourceConfig};
use crate::services::text_processor::{char_len, dedupe_preserving_order, preview};

const REVIEWS_PATH: &str = "/product-reviews";
/// Fetched reviews shorter than this are discarded as noise.
const MIN_FETCHED_REVIEW_CHARS: usize = 10;
const MAX_FETCHED_REVIEWS: usize = 50;
const REVIEW_TEXT_FIELDS: [&str; 6] = ["Review", "review", "ReviewText", "text", "comment", "ReviewContent"];

#[derive(Error, Debug)]
pub enum ReviewSourceError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("rate limited by review API")]
    RateLimited,
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("Invalid Amazon URL. Could not extract ASIN.")]
    InvalidUrl,
    #[error("RapidAPI key not configured")]
    MissingApiKey,
}

fn asin_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"/dp/([A-Z0-9]{10})",
            r"/gp/product/([A-Z0-9]{10})",
            r"asin=([A-Z0-9]{10})",
            r"/product/([A-Z0-9]{10})",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid ASIN pattern"))
        .collect()
    })
}

/// Extract the 10-character ASIN from an Amazon product URL.
pub fn extract_asin(url: &str) -> Result<String, ReviewSourceError> {
    asin_patterns()
        .iter()
        .find_map(|re| re.captures(url).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string())
        .ok_or(ReviewSourceError::InvalidUrl)
}

/// RapidAPI key: environment first, then the config file.
pub fn get_api_key() -> Option<String> {
    for key in ["RAPIDAPI_KEY", "REVAI_RAPIDAPI_KEY"] {
        if let Ok(val) = env::var(key) {
            let v = val.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }

    ConfigStore::open_default()
        .and_then(|store| store.get_api_key("rapidapi").ok().flatten())
        .filter(|k| !k.trim().is_empty())
}

/// Null, false, zero and empty strings or containers carry no review text.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        v if is_blank(v) => String::new(),
        other => other.to_string(),
    }
}

/// The first non-blank text field wins, even when it trims to nothing; only
/// then is `ReviewTitle + ReviewContent` tried, and only if both keys exist.
fn review_text(reviewer: &Value) -> Option<String> {
    let direct = REVIEW_TEXT_FIELDS
        .iter()
        .filter_map(|field| reviewer.get(*field))
        .find(|value| !is_blank(value))
        .map(|value| field_text(value).trim().to_string());
    if let Some(text) = direct.filter(|t| !t.is_empty()) {
        return Some(text);
    }

    let title = reviewer.get("ReviewTitle")?;
    let content = reviewer.get("ReviewContent")?;
    if is_blank(title) && is_blank(content) {
        return None;
    }
    let combined = format!("{} {}", field_text(title), field_text(content)).trim().to_string();
    (!combined.is_empty()).then_some(combined)
}

/// Review texts from one API response page (`Reviewers[]`).
pub fn parse_reviews_page(json: &Value) -> Vec<String> {
    let Some(reviewers) = json.get("Reviewers").and_then(Value::as_array) else {
        return Vec::new();
    };

    reviewers
        .iter()
        .filter(|r| r.is_object())
        .filter_map(review_text)
        .filter(|text| char_len(text) > MIN_FETCHED_REVIEW_CHARS)
        .collect()
}

pub struct RapidApiReviewSource {
    client: Client,
    reviews_url: String,
    host: String,
    api_key: String,
    country: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl RapidApiReviewSource {
    pub fn new(api_key: impl Into<String>, config: &ReviewSourceConfig) -> Result<Self, ReviewSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .clone()
            .or_else(|| env::var("RAPIDAPI_BASE_URL").ok())
            .unwrap_or_else(|| format!("https://{}", config.host));

        Ok(Self {
            client,
            reviews_url: format!("{}{}", base_url.trim_end_matches('/'), REVIEWS_PATH),
            host: env::var("RAPIDAPI_HOST").unwrap_or_else(|_| config.host.clone()),
            api_key: api_key.into(),
            country: config.country.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Build with the key from `get_api_key`.
    pub fn from_env(config: &ReviewSourceConfig) -> Result<Self, ReviewSourceError> {
        let api_key = get_api_key().ok_or(ReviewSourceError::MissingApiKey)?;
        Self::new(api_key, config)
    }

    async fn request_page(&self, asin: &str, page: u32) -> Result<Value, ReviewSourceError> {
        let mut delay = self.retry_delay;
        let page = page.to_string();

        for attempt in 1..=self.max_retries {
            let start = Instant::now();
            let response = self
                .client
                .get(&self.reviews_url)
                .header("x-rapidapi-key", &self.api_key)
                .header("x-rapidapi-host", &self.host)
                .query(&[("asin", asin), ("country", self.country.as_str()), ("page", page.as_str())])
                .send()
                .await?;
            let status = response.status();
            debug!(
                "[REVIEW_SOURCE] page={} attempt={} status={} latency_ms={}",
                page,
                attempt,
                status.as_u16(),
                start.elapsed().as_millis()
            );

            match status {
                StatusCode::OK => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        ReviewSourceError::JsonError(format!("{} - body: {}", e, preview(&body, 300)))
                    });
                }
                StatusCode::SERVICE_UNAVAILABLE if attempt < self.max_retries => {
                    warn!(
                        "[REVIEW_SOURCE] API service overloaded (503), retrying in {}ms (attempt {}/{})",
                        delay.as_millis(),
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                StatusCode::TOO_MANY_REQUESTS => return Err(ReviewSourceError::RateLimited),
                _ => {
                    let message = response.text().await.unwrap_or_default();
                    return Err(ReviewSourceError::ApiError {
                        status: status.as_u16(),
                        message: preview(&message, 300),
                    });
                }
            }
        }

        Err(ReviewSourceError::ApiError {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            message: format!("still unavailable after {} attempts", self.max_retries),
        })
    }

    /// Fetch up to `max_pages` pages. Stops at the first empty or failed page
    /// and returns what was collected so far, deduplicated and capped.
    pub async fn fetch_reviews(&self, asin: &str, max_pages: u32) -> Vec<String> {
        let mut all_reviews = Vec::new();

        for page in 1..=max_pages {
            info!("[REVIEW_SOURCE] Fetching page {} for ASIN: {}", page, asin);
            match self.request_page(asin, page).await {
                Ok(json) => {
                    let page_reviews = parse_reviews_page(&json);
                    info!("[REVIEW_SOURCE] Found {} reviews on page {}", page_reviews.len(), page);
                    if page_reviews.is_empty() {
                        break;
                    }
                    all_reviews.extend(page_reviews);
                }
                Err(ReviewSourceError::RateLimited) => {
                    warn!("[REVIEW_SOURCE] Rate limit hit for page {}", page);
                    break;
                }
                Err(e) => {
                    error!("[REVIEW_SOURCE] Request failed for page {}: {}", page, e);
                    break;
                }
            }
        }

        let mut unique = dedupe_preserving_order(all_reviews);
        unique.truncate(MAX_FETCHED_REVIEWS);
        info!("[REVIEW_SOURCE] Total unique reviews fetched: {}", unique.len());
        unique
    }

    /// Single-page connectivity check; returns the number of reviews on page 1.
    pub async fn test_connection(&self, asin: &str) -> Result<usize, ReviewSourceError> {
        let json = self.request_page(asin, 1).await?;
        Ok(parse_reviews_page(&json).len())
    }
}

/// Merge fetched and manual reviews into one deduplicated batch.
pub fn collect_reviews(fetched: Option<Vec<String>>, manual: Option<&[String]>) -> ReviewBatch {
    let source = match (fetched.is_some(), manual.is_some()) {
        (true, true) => ReviewOrigin::Mixed,
        (true, false) => ReviewOrigin::Url,
        (false, true) => ReviewOrigin::Manual,
        (false, false) => ReviewOrigin::Unknown,
    };

    let mut all_reviews = fetched.unwrap_or_default();
    if let Some(manual) = manual {
        all_reviews.extend(
            manual
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(|r| r.to_string()),
        );
    }

    let reviews = dedupe_preserving_order(all_reviews);
    ReviewBatch {
        total_reviews: reviews.len(),
        reviews,
        source,
    }
}
