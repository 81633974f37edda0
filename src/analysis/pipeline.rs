//! Orchestration of the OCR engine and model endpoint for one analysis.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use tracing::{info, warn};

use super::method::AnalysisMethod;
use super::record::{AnalysisRecord, AnalysisRequest};
use crate::interpret::{interpret, ParsedResult};
use crate::llm::{prompts, ChatModel, ChatRequest};
use crate::ocr::{decode_image, encode_png_base64, OcrBackend, OcrError};
use crate::session::{Session, SessionError, Upload};

/// Runs analyses against the configured collaborators.
///
/// Each run is sequential: at most one OCR call followed by one model call.
/// Collaborator failures become diagnostic results rather than errors.
pub struct Pipeline {
    model: Arc<dyn ChatModel>,
    ocr: Arc<dyn OcrBackend>,
    ocr_num_ctx: u32,
    ocr_timeout: Duration,
}

/// Default bound on a single OCR run.
pub const DEFAULT_OCR_TIMEOUT: Duration = Duration::from_secs(120);

impl Pipeline {
    pub fn new(model: Arc<dyn ChatModel>, ocr: Arc<dyn OcrBackend>, ocr_num_ctx: u32) -> Self {
        Self {
            model,
            ocr,
            ocr_num_ctx,
            ocr_timeout: DEFAULT_OCR_TIMEOUT,
        }
    }

    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }

    /// Analyze the session's current upload, reusing the stored result when
    /// neither the image nor the method changed since it was computed.
    ///
    /// The session state is only locked to read the upload and to store the
    /// result, so other requests for the session are served while the
    /// collaborators run.
    pub async fn analyze_session(
        &self,
        session: &Session,
    ) -> Result<(Upload, AnalysisRecord), SessionError> {
        let _slot = session.analysis_slot().await;

        let upload = {
            let state = session.state().await;
            let upload = state.upload().cloned().ok_or(SessionError::MissingInput)?;
            if let Some(record) = state.cached_result() {
                info!("Reusing cached {} analysis", upload.method);
                return Ok((upload, record.clone()));
            }
            upload
        };

        let request = AnalysisRequest::new(upload.bytes.clone(), upload.method);
        let record = self.run_analysis(&request).await;
        if !session.state().await.store_result(record.clone()) {
            info!("Upload replaced during analysis; result not stored");
        }
        Ok((upload, record))
    }

    /// Run one analysis. Never fails; problems are reported in the record.
    pub async fn run_analysis(&self, request: &AnalysisRequest) -> AnalysisRecord {
        let start = Instant::now();
        let image_hash = request.image_hash();
        info!(
            "Starting {} analysis ({} bytes)",
            request.method,
            request.image.len()
        );

        let (result, raw_ocr_text) = match decode_image(&request.image) {
            Ok(image) => match request.method {
                AnalysisMethod::OcrLlm => self.ocr_then_text(image).await,
                AnalysisMethod::Vision => (self.vision(&image, prompts::VISION_PROMPT).await, None),
                AnalysisMethod::VisionExtract => {
                    (self.vision(&image, prompts::EXTRACTION_PROMPT).await, None)
                }
            },
            Err(e) => {
                warn!("Uploaded image could not be decoded: {}", e);
                (ParsedResult::failure(format!("Error reading image: {}", e)), None)
            }
        };

        let elapsed = start.elapsed();
        info!(
            "Analysis complete in {:.2}s (score: {:?})",
            elapsed.as_secs_f64(),
            result.score
        );

        AnalysisRecord::new(request.method, image_hash, result, raw_ocr_text, elapsed)
    }

    async fn vision(&self, image: &RgbImage, prompt: &str) -> ParsedResult {
        let encoded = match encode_png_base64(image) {
            Ok(encoded) => encoded,
            Err(e) => {
                return ParsedResult::failure(format!("Error reading image: {}", e));
            }
        };
        self.ask_model(ChatRequest::vision(prompt, encoded)).await
    }

    async fn ocr_then_text(&self, image: RgbImage) -> (ParsedResult, Option<String>) {
        let lines = match self.recognize(image).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("OCR failed: {}", e);
                let message = format!("Error calling {}: {}", self.ocr.display_name(), e);
                return (ParsedResult::failure(message), None);
            }
        };
        info!("OCR detected {} text lines", lines.len());

        let extracted = lines.join("\n");
        let request =
            ChatRequest::text(prompts::ocr_prompt(&extracted)).with_num_ctx(self.ocr_num_ctx);
        (self.ask_model(request).await, Some(extracted))
    }

    async fn recognize(&self, image: RgbImage) -> Result<Vec<String>, OcrError> {
        let ocr = self.ocr.clone();
        let task = tokio::task::spawn_blocking(move || ocr.recognize(&image));
        match tokio::time::timeout(self.ocr_timeout, task).await {
            Ok(joined) => {
                joined.map_err(|e| OcrError::OcrFailed(format!("OCR task failed: {}", e)))?
            }
            Err(_) => Err(OcrError::OcrFailed(format!(
                "timed out after {:?}",
                self.ocr_timeout
            ))),
        }
    }

    async fn ask_model(&self, request: ChatRequest) -> ParsedResult {
        match self.model.chat(&request).await {
            Ok(text) => interpret(&text),
            Err(e) => {
                warn!("Model call failed: {}", e);
                ParsedResult::failure(format!(
                    "Error calling {}: {}",
                    self.model.display_name(),
                    e
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::LlmError;
    use crate::ocr::sample_png;

    const REPORT: &str = "## 1. Overview\nA school.\n## 4. Issues\n- Enrollment lacks a key\n## 6. Score\nScore: 81/100\nSolid.";

    #[derive(Default)]
    struct MockModel {
        calls: AtomicUsize,
        fail: bool,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl MockModel {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ChatModel for MockModel {
        fn display_name(&self) -> &str {
            "LLaVA"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                Err(LlmError::Connection("connection refused".to_string()))
            } else {
                Ok(REPORT.to_string())
            }
        }
    }

    #[derive(Default)]
    struct MockOcr {
        calls: AtomicUsize,
        fail: bool,
        delay: Option<Duration>,
    }

    impl OcrBackend for MockOcr {
        fn display_name(&self) -> &str {
            "OCR"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            String::new()
        }

        fn recognize(&self, _image: &RgbImage) -> Result<Vec<String>, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            if self.fail {
                Err(OcrError::BackendNotAvailable("tesseract not found".to_string()))
            } else {
                Ok(vec!["Student".to_string(), "student_id PK".to_string()])
            }
        }
    }

    fn pipeline(model: &Arc<MockModel>, ocr: &Arc<MockOcr>) -> Pipeline {
        Pipeline::new(model.clone(), ocr.clone(), 2048)
    }

    fn request(method: AnalysisMethod) -> AnalysisRequest {
        AnalysisRequest::new(sample_png().into(), method)
    }

    #[tokio::test]
    async fn test_vision_makes_single_model_call() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());

        let record = pipeline(&model, &ocr)
            .run_analysis(&request(AnalysisMethod::Vision))
            .await;

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.result.score, Some(81));
        assert_eq!(record.result.sections.len(), 2);
        assert_eq!(record.result.reasoning, "Solid.");
        assert!(record.raw_ocr_text.is_none());

        let requests = model.requests.lock().unwrap();
        assert!(requests[0].image_png_base64.is_some());
        assert_eq!(requests[0].prompt, prompts::VISION_PROMPT);
    }

    #[tokio::test]
    async fn test_extract_uses_extraction_prompt() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());

        let record = pipeline(&model, &ocr)
            .run_analysis(&request(AnalysisMethod::VisionExtract))
            .await;

        assert_eq!(record.mode, AnalysisMethod::VisionExtract);
        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, prompts::EXTRACTION_PROMPT);
    }

    #[tokio::test]
    async fn test_ocr_mode_calls_ocr_then_text_model() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());

        let record = pipeline(&model, &ocr)
            .run_analysis(&request(AnalysisMethod::OcrLlm))
            .await;

        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(record.raw_ocr_text.as_deref(), Some("Student\nstudent_id PK"));

        let requests = model.requests.lock().unwrap();
        assert!(requests[0].image_png_base64.is_none());
        assert_eq!(requests[0].num_ctx, Some(2048));
        assert!(requests[0].prompt.contains("Student\nstudent_id PK"));
    }

    #[tokio::test]
    async fn test_model_failure_becomes_diagnostic() {
        let model = Arc::new(MockModel::failing());
        let ocr = Arc::new(MockOcr::default());

        let record = pipeline(&model, &ocr)
            .run_analysis(&request(AnalysisMethod::Vision))
            .await;

        assert_eq!(record.result.score, None);
        assert!(record.result.summary_text.starts_with("Error calling"));
        assert!(record.result.summary_text.contains("LLaVA"));
        assert!(record.result.sections.is_empty());
    }

    #[tokio::test]
    async fn test_ocr_failure_skips_model() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr {
            fail: true,
            ..MockOcr::default()
        });

        let record = pipeline(&model, &ocr)
            .run_analysis(&request(AnalysisMethod::OcrLlm))
            .await;

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.result.score, None);
        assert!(record.result.summary_text.starts_with("Error calling OCR"));
    }

    #[tokio::test]
    async fn test_slow_ocr_times_out() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr {
            delay: Some(Duration::from_secs(2)),
            ..MockOcr::default()
        });

        let record = pipeline(&model, &ocr)
            .with_ocr_timeout(Duration::from_millis(200))
            .run_analysis(&request(AnalysisMethod::OcrLlm))
            .await;

        assert!(record.result.failed);
        assert_eq!(record.result.score, None);
        assert!(record.result.summary_text.starts_with("Error calling OCR"));
        assert!(record.result.summary_text.contains("timed out after 200ms"));
        assert!(record.raw_ocr_text.is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undecodable_image_makes_no_calls() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());

        let record = pipeline(&model, &ocr)
            .run_analysis(&AnalysisRequest::new(
                b"not an image".to_vec().into(),
                AnalysisMethod::Vision,
            ))
            .await;

        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.result.score, None);
        assert!(record.result.summary_text.starts_with("Error reading image"));
    }

    #[tokio::test]
    async fn test_session_analysis_is_cached() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());
        let pipeline = pipeline(&model, &ocr);

        let session = Session::default();
        session
            .state()
            .await
            .begin_upload(Upload::new(sample_png(), "erd.png", AnalysisMethod::Vision));

        let (upload, first) = pipeline.analyze_session(&session).await.unwrap();
        let (_, second) = pipeline.analyze_session(&session).await.unwrap();

        assert_eq!(upload.file_name, "erd.png");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_session_reruns_when_method_changes() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());
        let pipeline = pipeline(&model, &ocr);

        let session = Session::default();
        session
            .state()
            .await
            .begin_upload(Upload::new(sample_png(), "erd.png", AnalysisMethod::Vision));
        pipeline.analyze_session(&session).await.unwrap();

        session.state().await.begin_upload(Upload::new(
            sample_png(),
            "erd.png",
            AnalysisMethod::VisionExtract,
        ));
        let (_, record) = pipeline.analyze_session(&session).await.unwrap();

        assert_eq!(record.mode, AnalysisMethod::VisionExtract);
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_session_without_upload() {
        let model = Arc::new(MockModel::default());
        let ocr = Arc::new(MockOcr::default());

        let session = Session::default();
        let err = pipeline(&model, &ocr)
            .analyze_session(&session)
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::MissingInput);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
