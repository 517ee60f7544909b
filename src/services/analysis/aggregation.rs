// Aggregation Logic
// Tallies per-review verdicts into the corpus report

use crate::models::{
    AnalysisReport, CategoryDistribution, FakeVerdict, SentimentDistribution, SingleReviewAnalysis,
};

/// Running counts over analyzed reviews. Tallies merge by plain addition, so
/// partial tallies over disjoint slices combine in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewTally {
    pub fake_count: usize,
    pub sentiment: SentimentDistribution,
    pub category: CategoryDistribution,
    pub results: Vec<SingleReviewAnalysis>,
}

impl ReviewTally {
    pub fn record(&mut self, analysis: SingleReviewAnalysis) {
        self.sentiment.increment(analysis.sentiment);
        self.category.increment(analysis.category);
        if analysis.is_fake == FakeVerdict::Fake {
            self.fake_count += 1;
        }
        self.results.push(analysis);
    }

    /// Append `other`; result order is `self` then `other`.
    pub fn merge(mut self, other: ReviewTally) -> ReviewTally {
        self.fake_count += other.fake_count;
        self.sentiment.merge(&other.sentiment);
        self.category.merge(&other.category);
        self.results.extend(other.results);
        self
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_report(self) -> AnalysisReport {
        let total_reviews = self.results.len();
        let fake_count = self.fake_count.min(total_reviews);
        AnalysisReport {
            total_reviews,
            fake_count,
            real_count: total_reviews - fake_count,
            overall_sentiment: self.sentiment.dominant(),
            fake_percentage: fake_percentage(fake_count, total_reviews),
            sentiment_distribution: self.sentiment,
            category_distribution: self.category,
            detailed_results: self.results,
        }
    }
}

impl FromIterator<SingleReviewAnalysis> for ReviewTally {
    fn from_iter<I: IntoIterator<Item = SingleReviewAnalysis>>(iter: I) -> Self {
        let mut tally = ReviewTally::default();
        for analysis in iter {
            tally.record(analysis);
        }
        tally
    }
}

/// `100 * fake / total` rounded to 2 decimals; 0 for an empty corpus.
pub fn fake_percentage(fake_count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = fake_count as f64 / total as f64 * 100.0;
    ((pct * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Report for an empty corpus.
pub fn empty_report() -> AnalysisReport {
    ReviewTally::default().into_report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryVerdict, SentimentVerdict};

    fn review(fake: bool, sentiment: SentimentVerdict, category: CategoryVerdict) -> SingleReviewAnalysis {
        SingleReviewAnalysis {
            review_text: "sample review".to_string(),
            is_fake: if fake { FakeVerdict::Fake } else { FakeVerdict::Real },
            sentiment,
            sentiment_score: 0.5,
            category,
            confidence_score: 0.5,
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let report = empty_report();
        assert_eq!(report.total_reviews, 0);
        assert_eq!(report.fake_count, 0);
        assert_eq!(report.real_count, 0);
        assert_eq!(report.fake_percentage, 0.0);
        assert!(report.detailed_results.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn test_counts_and_percentage() {
        let tally: ReviewTally = vec![
            review(true, SentimentVerdict::Positive, CategoryVerdict::Price),
            review(false, SentimentVerdict::Negative, CategoryVerdict::Quality),
            review(false, SentimentVerdict::Negative, CategoryVerdict::General),
        ]
        .into_iter()
        .collect();
        let report = tally.into_report();

        assert_eq!(report.total_reviews, 3);
        assert_eq!(report.fake_count + report.real_count, report.total_reviews);
        assert_eq!(report.sentiment_distribution.total(), 3);
        assert_eq!(report.category_distribution.total(), 3);
        assert_eq!(report.overall_sentiment, SentimentVerdict::Negative);
        assert_eq!(report.fake_percentage, 33.33);
    }

    #[test]
    fn test_fake_percentage_rounding_and_bounds() {
        assert_eq!(fake_percentage(2, 3), 66.67);
        assert_eq!(fake_percentage(1, 1), 100.0);
        assert_eq!(fake_percentage(0, 7), 0.0);
        assert_eq!(fake_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let items = vec![
            review(true, SentimentVerdict::Neutral, CategoryVerdict::Delivery),
            review(false, SentimentVerdict::Positive, CategoryVerdict::Delivery),
            review(true, SentimentVerdict::Positive, CategoryVerdict::General),
            review(false, SentimentVerdict::Negative, CategoryVerdict::Price),
        ];
        let whole: ReviewTally = items.clone().into_iter().collect();
        let left: ReviewTally = items[..1].iter().cloned().collect();
        let right: ReviewTally = items[1..].iter().cloned().collect();

        assert_eq!(left.merge(right), whole);
    }
}
