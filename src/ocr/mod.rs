//! OCR collaborator and image helpers.
//!
//! Tesseract (via its command-line binary) reads the text lines of a
//! diagram for the OCR + text-model pipeline. The image helpers decode
//! uploads and produce the base64 PNG the vision model expects.

mod backend;
mod imaging;
mod tesseract;

pub use backend::{OcrBackend, OcrConfig, OcrError};
pub use imaging::{decode_image, encode_png_base64, sniff_mime};
pub use tesseract::TesseractBackend;

#[cfg(test)]
pub(crate) use imaging::sample_png;
