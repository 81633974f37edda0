//! Diagram analysis pipelines.
//!
//! - `ocr_llm`: Tesseract reads the labels, the model reviews the text
//! - `llava_image`: the vision model reviews the image directly
//! - `llava_extract`: the vision model inventories entities and relationships

mod method;
mod pipeline;
mod record;

pub use method::{AnalysisMethod, MethodGuide};
pub use pipeline::Pipeline;
pub use record::{AnalysisRecord, AnalysisRequest};
