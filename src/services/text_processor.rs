// Text Processing Service
// Review cleaning and lexicon matching helpers

use std::collections::HashSet;

/// Minimum trimmed length (in chars) for a review to be analyzed.
pub const MIN_REVIEW_CHARS: usize = 5;

/// Length in chars, which is what every length signal is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Trim reviews and drop the ones that are empty or shorter than `min_chars`.
pub fn clean_reviews<S: AsRef<str>>(reviews: &[S], min_chars: usize) -> Vec<String> {
    reviews
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty() && char_len(r) >= min_chars)
        .map(|r| r.to_string())
        .collect()
}

/// Count non-overlapping occurrences of `needle` in an already lower-cased haystack.
pub fn count_occurrences(haystack_lower: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack_lower.matches(needle).count()
}

/// Total occurrences of every lexicon term (case-insensitive).
pub fn lexicon_hits(text: &str, lexicon: &[&str]) -> usize {
    let lower = text.to_lowercase();
    lexicon
        .iter()
        .map(|term| count_occurrences(&lower, term))
        .sum()
}

/// Drop duplicates while keeping the first occurrence of each entry.
pub fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Short single-line preview for logs.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if char_len(text) > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_reviews_filters_short_and_empty() {
        let input = vec!["  This product is fine  ", "", "ok", "    ", "12345"];
        let cleaned = clean_reviews(&input, MIN_REVIEW_CHARS);
        assert_eq!(cleaned, vec!["This product is fine".to_string(), "12345".to_string()]);
    }

    #[test]
    fn test_clean_reviews_counts_chars_not_bytes() {
        // 4 chars but 12 bytes
        let cleaned = clean_reviews(&["好好好好"], MIN_REVIEW_CHARS);
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_lexicon_hits_counts_occurrences() {
        assert_eq!(lexicon_hits("Amazing, simply AMAZING and perfect", &["amazing", "perfect"]), 3);
        assert_eq!(lexicon_hits("nothing here", &["amazing"]), 0);
    }

    #[test]
    fn test_dedupe_preserving_order() {
        let items = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedupe_preserving_order(items), vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ab\ncd", 10), "ab cd");
    }
}
