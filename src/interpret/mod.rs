//! Interpretation of free-form model responses.
//!
//! A response is turned into:
//! - a 0-100 quality score (see [`score`])
//! - titled, classified sections split on `## ` headers (see [`sections`])
//! - HTML fragments for display (see [`markup`])

pub mod markup;
pub mod score;
pub mod sections;

use serde::{Deserialize, Serialize};

pub use markup::render;
pub use score::{extract_score, ScoreBand};
pub use sections::{split_sections, Section, SectionCategory, SplitOutcome};

/// A model response reduced to what the results page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    /// Quality score, absent when the text carried none.
    pub score: Option<u8>,
    /// Displayable sections in source order.
    pub sections: Vec<Section>,
    /// The full response text (or a diagnostic on failure).
    pub summary_text: String,
    /// Justification taken from the score section.
    pub reasoning: String,
    /// Whether the response used `## ` section headers.
    pub structured: bool,
    /// True when `summary_text` is a diagnostic rather than a model reply.
    #[serde(default)]
    pub failed: bool,
}

impl ParsedResult {
    /// A result carrying only a diagnostic message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            summary_text: message.into(),
            failed: true,
            ..Self::default()
        }
    }

    pub fn band(&self) -> Option<ScoreBand> {
        self.score.map(ScoreBand::from_score)
    }

    pub fn is_empty(&self) -> bool {
        self.summary_text.trim().is_empty()
    }
}

/// Interpret a model response.
pub fn interpret(text: &str) -> ParsedResult {
    let SplitOutcome {
        sections,
        reasoning,
        structured,
    } = split_sections(text);

    ParsedResult {
        score: extract_score(text),
        sections,
        summary_text: text.to_string(),
        reasoning,
        structured,
        failed: false,
    }
}
