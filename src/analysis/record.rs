//! Inputs and outputs of one analysis run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::method::AnalysisMethod;
use crate::interpret::ParsedResult;
use crate::session::content_hash;

/// An image and the pipeline to run on it.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: Arc<[u8]>,
    pub method: AnalysisMethod,
}

impl AnalysisRequest {
    pub fn new(image: Arc<[u8]>, method: AnalysisMethod) -> Self {
        Self { image, method }
    }

    pub fn image_hash(&self) -> String {
        content_hash(&self.image)
    }
}

/// Everything the results page needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub mode: AnalysisMethod,
    pub image_hash: String,
    pub result: ParsedResult,
    /// Text detected by OCR, for the OCR + text-model pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ocr_text: Option<String>,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(
        mode: AnalysisMethod,
        image_hash: String,
        result: ParsedResult,
        raw_ocr_text: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            mode,
            image_hash,
            result,
            raw_ocr_text,
            elapsed,
            analyzed_at: Utc::now(),
        }
    }

    /// Wall time formatted like `12.34s`.
    pub fn elapsed_display(&self) -> String {
        format!("{:.2}s", self.elapsed.as_secs_f64())
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
