//! The three analysis pipelines a user can choose from.

use serde::{Deserialize, Serialize};

/// How a diagram is analyzed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum AnalysisMethod {
    /// OCR the image, then send only the text to the model.
    #[default]
    #[serde(rename = "ocr_llm")]
    #[value(name = "ocr_llm")]
    OcrLlm,
    /// Send the image to the vision model for a balanced review.
    #[serde(rename = "llava_image")]
    #[value(name = "llava_image")]
    Vision,
    /// Send the image to the vision model with an extraction-focused prompt.
    #[serde(rename = "llava_extract")]
    #[value(name = "llava_extract")]
    VisionExtract,
}

impl AnalysisMethod {
    pub const ALL: [AnalysisMethod; 3] = [
        AnalysisMethod::OcrLlm,
        AnalysisMethod::Vision,
        AnalysisMethod::VisionExtract,
    ];

    /// Stable identifier used in forms, the CLI and JSON output.
    pub fn id(&self) -> &'static str {
        match self {
            AnalysisMethod::OcrLlm => "ocr_llm",
            AnalysisMethod::Vision => "llava_image",
            AnalysisMethod::VisionExtract => "llava_extract",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == s)
    }

    /// Label shown on the upload form.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMethod::OcrLlm => "OCR + text LLM (baseline)",
            AnalysisMethod::Vision => "LLaVA image-based (Ollama)",
            AnalysisMethod::VisionExtract => "LLaVA extraction (entities & relationships)",
        }
    }

    /// Heading of the results column.
    pub fn results_heading(&self) -> &'static str {
        match self {
            AnalysisMethod::OcrLlm => "Analysis: OCR + Text LLM",
            AnalysisMethod::Vision => "Analysis: LLaVA (Vision)",
            AnalysisMethod::VisionExtract => "Analysis: LLaVA (Extraction Focused)",
        }
    }

    /// "Why use this?" explanation on the upload form.
    pub fn guide(&self) -> MethodGuide {
        match self {
            AnalysisMethod::OcrLlm => MethodGuide {
                question: "Why use OCR + Text LLM?",
                best_for: "Messy handwriting or text-heavy diagrams.",
                summary: "Runs a dedicated OCR engine to read every word, then sends only the text to the AI.",
                pros: "Reads small or faint labels the vision model may skip.",
                cons: "Loses visual context (doesn't know which box points to which).",
            },
            AnalysisMethod::Vision => MethodGuide {
                question: "Why use LLaVA Image-Based?",
                best_for: "Logic checks and structural design.",
                summary: "Sends the actual image to the vision model, which looks at the diagram like a human would.",
                pros: "Understands relationships (cardinality), flow, and nesting.",
                cons: "Can sometimes hallucinate small text or misread blurry words.",
            },
            AnalysisMethod::VisionExtract => MethodGuide {
                question: "Why use LLaVA Extraction?",
                best_for: "Reverse engineering and documentation.",
                summary: "Like the image-based method, but the AI is prompted to inventory every entity and connection it finds.",
                pros: "Exhaustive lists of entities, attributes and cardinalities.",
                cons: "Provides less critique or advice; focuses on data extraction.",
            },
        }
    }
}

impl std::fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Explanatory copy for one method.
#[derive(Debug, Clone, Copy)]
pub struct MethodGuide {
    pub question: &'static str,
    pub best_for: &'static str,
    pub summary: &'static str,
    pub pros: &'static str,
    pub cons: &'static str,
}
