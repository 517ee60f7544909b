// Lexical Polarity
// Compound polarity from the VADER lexicon (about 7,500 scored English words,
// slang and emoticons), with its booster, negation, contrast ("but") and
// punctuation-emphasis rules.

use vader_sentiment::SentimentIntensityAnalyzer;

/// Polarity in [-1, 1]; 0 when the text carries no opinion words.
pub fn polarity(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }
    let analyzer = SentimentIntensityAnalyzer::new();
    let scores = analyzer.polarity_scores(text);
    let compound = scores.get("compound").copied().unwrap_or(0.0);
    if compound.is_finite() {
        compound.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_polarity_signs() {
        assert!(polarity("This is a great product") > 0.1);
        assert!(polarity("Terrible, the worst purchase") < -0.1);
        assert_eq!(polarity("It has two handles and a lid."), 0.0);
        assert_eq!(polarity("   "), 0.0);
    }

    #[test]
    fn test_everyday_review_vocabulary() {
        assert!(polarity("Lovely gift, my favorite purchase this year. So glad I bought it!") > 0.1);
        assert!(polarity("It failed on day one, completely useless.") < -0.1);
        assert!(polarity("I hate it, horrible experience and rude support.") < -0.1);
        assert!(polarity("Excellent blender, I love how smooth the drinks come out.") > 0.1);
    }

    #[test]
    fn test_intensifier_strengthens() {
        assert!(polarity("very good") > polarity("good"));
        assert!(polarity("slightly good") < polarity("good"));
    }

    #[test]
    fn test_negation_flips() {
        assert!(polarity("not good") < 0.0);
        assert!(polarity("it isn't bad") > 0.0);
    }

    #[test]
    fn test_polarity_bounded() {
        let p = polarity("absolutely extremely perfect excellent amazing wonderful!!!");
        assert!(p <= 1.0 && p > 0.0);
        let n = polarity("horrible awful terrible disgusting worst!!!");
        assert!(n >= -1.0 && n < 0.0);
    }
}
