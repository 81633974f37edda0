//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.

use askama::Template;

use crate::analysis::{AnalysisMethod, AnalysisRecord, MethodGuide};
use crate::interpret::{render, Section, ScoreBand};

/// Helper struct for method choices on the upload form.
pub struct MethodOption {
    pub id: &'static str,
    pub label: &'static str,
    pub checked: bool,
    pub guide: MethodGuide,
}

impl MethodOption {
    pub fn all(selected: AnalysisMethod) -> Vec<Self> {
        AnalysisMethod::ALL
            .into_iter()
            .map(|method| MethodOption {
                id: method.id(),
                label: method.label(),
                checked: method == selected,
                guide: method.guide(),
            })
            .collect()
    }
}

/// Helper struct for the score widget.
pub struct ScoreView {
    pub value: u8,
    pub label: &'static str,
    pub css_class: &'static str,
}

impl ScoreView {
    fn new(value: u8) -> Self {
        let band = ScoreBand::from_score(value);
        Self {
            value,
            label: band.label(),
            css_class: band.css_class(),
        }
    }
}

/// Helper struct for one section card.
pub struct SectionCard {
    pub title: String,
    pub icon: &'static str,
    pub card_class: &'static str,
    pub body_html: String,
}

impl From<&Section> for SectionCard {
    fn from(section: &Section) -> Self {
        Self {
            title: section.title.clone(),
            icon: section.category.icon(),
            card_class: section.category.card_class(),
            body_html: render(&section.body),
        }
    }
}

/// Landing page.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub title: &'a str,
    pub methods: Vec<MethodOption>,
}

/// Upload form.
#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadTemplate<'a> {
    pub title: &'a str,
    pub methods: Vec<MethodOption>,
    pub error: Option<String>,
    /// Show the "no analysis available" notice.
    pub missing: bool,
}

/// Results page.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate<'a> {
    pub title: &'a str,
    pub file_name: &'a str,
    pub method_label: &'static str,
    pub heading: &'static str,
    pub elapsed: String,
    pub score: Option<ScoreView>,
    pub reasoning_html: String,
    pub cards: Vec<SectionCard>,
    pub structured: bool,
    pub failed: bool,
    pub empty: bool,
    pub summary_text: &'a str,
    pub fallback_html: String,
    pub raw_ocr_text: Option<&'a str>,
}

impl<'a> ResultsTemplate<'a> {
    pub fn new(record: &'a AnalysisRecord, file_name: &'a str) -> Self {
        let result = &record.result;
        let structured = result.structured;

        Self {
            title: "Results",
            file_name,
            method_label: record.mode.label(),
            heading: record.mode.results_heading(),
            elapsed: record.elapsed_display(),
            score: result.score.map(ScoreView::new),
            reasoning_html: render(&result.reasoning),
            cards: result.sections.iter().map(SectionCard::from).collect(),
            structured,
            failed: result.failed,
            empty: result.is_empty(),
            summary_text: &result.summary_text,
            fallback_html: if structured || result.failed {
                String::new()
            } else {
                render(&result.summary_text)
            },
            raw_ocr_text: record
                .raw_ocr_text
                .as_deref()
                .filter(|text| !text.is_empty()),
        }
    }
}
