//! Quality score extraction from free-form model text.
//!
//! Models are asked to end their report with `Score: NN/100`, but they drift:
//! some write `Score - 85`, others only `85/100`. Extraction is an ordered
//! list of strategies; the first one that yields an in-range value wins.

use std::sync::LazyLock;

use regex::Regex;

/// Highest score a diagram can receive.
pub const MAX_SCORE: u32 = 100;

static LABELLED_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Score\s*[:\-]?\s*(\d{1,3})").unwrap());

static OUT_OF_HUNDRED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})\s*/\s*100").unwrap());

/// A single way of reading a score out of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    /// `Score: 87`, `score - 87`, `SCORE 87`.
    Labelled,
    /// `87/100`, `87 / 100`.
    OutOfHundred,
}

/// Strategies in precedence order.
pub const DEFAULT_STRATEGIES: &[ScoreStrategy] =
    &[ScoreStrategy::Labelled, ScoreStrategy::OutOfHundred];

impl ScoreStrategy {
    fn pattern(self) -> &'static Regex {
        match self {
            ScoreStrategy::Labelled => &LABELLED_SCORE,
            ScoreStrategy::OutOfHundred => &OUT_OF_HUNDRED,
        }
    }

    /// Value of the first match in `text`, if any.
    pub fn find(self, text: &str) -> Option<u32> {
        self.pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Extract a 0-100 score using [`DEFAULT_STRATEGIES`].
pub fn extract_score(text: &str) -> Option<u8> {
    extract_score_with(text, DEFAULT_STRATEGIES)
}

/// Extract a score using the given strategies.
///
/// The first strategy producing a value within `0..=100` wins. When every
/// match is out of range, the last value seen is clamped to 100.
pub fn extract_score_with(text: &str, strategies: &[ScoreStrategy]) -> Option<u8> {
    if text.is_empty() {
        return None;
    }

    let mut fallback = None;
    for strategy in strategies {
        match strategy.find(text) {
            Some(value) if value <= MAX_SCORE => return Some(value as u8),
            Some(value) => fallback = Some(value),
            None => {}
        }
    }

    fallback.map(|value| value.min(MAX_SCORE) as u8)
}

/// Coarse verdict shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    NeedsImprovement,
    Critical,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::Excellent,
            50.. => ScoreBand::NeedsImprovement,
            _ => ScoreBand::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "EXCELLENT CONDITION",
            ScoreBand::NeedsImprovement => "NEEDS IMPROVEMENT",
            ScoreBand::Critical => "CRITICAL ISSUES",
        }
    }

    /// CSS modifier class used by the results page.
    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "er-band-excellent",
            ScoreBand::NeedsImprovement => "er-band-warn",
            ScoreBand::Critical => "er-band-critical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_score() {
        assert_eq!(extract_score("Overall fine.\nScore: 87\nGood keys."), Some(87));
        assert_eq!(extract_score("score - 64"), Some(64));
        assert_eq!(extract_score("SCORE 5"), Some(5));
    }

    #[test]
    fn test_out_of_hundred_only() {
        assert_eq!(extract_score("I would rate this 73/100 overall."), Some(73));
        assert_eq!(extract_score("rated 73 / 100"), Some(73));
    }

    #[test]
    fn test_labelled_preferred_when_in_range() {
        assert_eq!(extract_score("Score: 60\nelsewhere 90/100"), Some(60));
    }

    #[test]
    fn test_falls_back_when_labelled_out_of_range() {
        assert_eq!(extract_score("Score: 150\nreally 42/100"), Some(42));
    }

    #[test]
    fn test_out_of_range_without_fallback_is_clamped() {
        assert_eq!(extract_score("Score: 150"), Some(100));
        assert_eq!(extract_score("Score: 999 and 300/100"), Some(100));
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_score("Score: 40\nScore: 95"), Some(40));
        assert_eq!(extract_score("12/100 then 99/100"), Some(12));
    }

    #[test]
    fn test_no_score() {
        assert_eq!(extract_score(""), None);
        assert_eq!(extract_score("The diagram has three entities."), None);
    }

    #[test]
    fn test_every_score_round_trips() {
        for n in 0..=100u8 {
            assert_eq!(extract_score(&format!("Score: {}", n)), Some(n));
        }
    }

    #[test]
    fn test_single_strategy() {
        let text = "Score: 70 and 20/100";
        assert_eq!(
            extract_score_with(text, &[ScoreStrategy::OutOfHundred]),
            Some(20)
        );
        assert_eq!(extract_score_with(text, &[]), None);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Critical);
        assert_eq!(ScoreBand::from_score(0).label(), "CRITICAL ISSUES");
    }
}
