//! ERror Normalizer - feedback on entity-relationship diagrams.
//!
//! An uploaded diagram is reviewed by a local vision language model, either
//! directly from the image or from text read by Tesseract, and the free-form
//! reply is reduced to a score, classified sections and display HTML.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod interpret;
pub mod llm;
pub mod ocr;
pub mod server;
pub mod session;
pub mod utils;
