//! Splitting a structured model response into titled, classified sections.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+)$").unwrap());

/// Literal marker stripped from the score section's justification.
const SCORE_LINE_MARKER: &str = "Score:";

/// Topic of a section, derived from its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionCategory {
    Issue,
    Suggestion,
    Structural,
    Generic,
}

/// Title keywords per category, in precedence order.
const CATEGORY_KEYWORDS: &[(SectionCategory, &[&str])] = &[
    (SectionCategory::Issue, &["issue", "error", "problem"]),
    (SectionCategory::Suggestion, &["suggestion", "fix", "recommend"]),
    (
        SectionCategory::Structural,
        &["entity", "attribute", "relationship"],
    ),
];

impl SectionCategory {
    /// Classify a section title by keyword.
    pub fn classify(title: &str) -> Self {
        let lower = title.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(SectionCategory::Generic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionCategory::Issue => "issue",
            SectionCategory::Suggestion => "suggestion",
            SectionCategory::Structural => "structural",
            SectionCategory::Generic => "generic",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SectionCategory::Issue => "⚠️",
            SectionCategory::Suggestion => "💡",
            SectionCategory::Structural => "🧬",
            SectionCategory::Generic => "📄",
        }
    }

    /// CSS class of the card this section is rendered in.
    pub fn card_class(&self) -> &'static str {
        match self {
            SectionCategory::Issue => "er-card-issue",
            SectionCategory::Suggestion => "er-card-suggestion",
            SectionCategory::Structural => "er-card-structural",
            SectionCategory::Generic => "er-card-generic",
        }
    }
}

impl std::fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A titled block of a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
    pub category: SectionCategory,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let category = SectionCategory::classify(&title);
        Self {
            title,
            body: body.into(),
            category,
        }
    }
}

/// Result of splitting a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Displayable sections in source order (score section excluded).
    pub sections: Vec<Section>,
    /// Justification text from the score section, `Score:` lines removed.
    pub reasoning: String,
    /// False when the text had no `## ` headers at all.
    pub structured: bool,
}

fn is_score_title(title: &str) -> bool {
    title.to_lowercase().contains("score")
}

fn clean_reasoning(body: &str) -> String {
    body.lines()
        .filter(|line| !line.contains(SCORE_LINE_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Split `text` on level-2 headers.
///
/// Text before the first header is dropped. If there are no headers the
/// outcome is unstructured and the caller should display the text as-is.
pub fn split_sections(text: &str) -> SplitOutcome {
    let headers: Vec<_> = SECTION_HEADER.captures_iter(text).collect();
    if headers.is_empty() {
        return SplitOutcome::default();
    }

    let mut outcome = SplitOutcome {
        structured: true,
        ..SplitOutcome::default()
    };
    let mut reasoning_found = false;

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());

        let title = title.as_str().trim();
        let body = text[whole.end()..body_end].trim();

        if is_score_title(title) {
            if !reasoning_found {
                outcome.reasoning = clean_reasoning(body);
                reasoning_found = true;
            }
            continue;
        }

        outcome.sections.push(Section::new(title, body));
    }

    outcome
}
