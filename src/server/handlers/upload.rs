//! Upload form submission.

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use super::super::template_structs::{MethodOption, UploadTemplate};
use super::super::AppState;
use super::helpers::{render_html, session_cookie, session_id};
use crate::analysis::AnalysisMethod;
use crate::session::Upload;

const NO_IMAGE_MESSAGE: &str = "Please upload an image before validating.";
const UNSUPPORTED_MESSAGE: &str = "Unsupported file type. Please upload a PNG or JPEG image.";

/// Fields read from the multipart form.
#[derive(Default)]
struct UploadForm {
    image: Option<(String, Vec<u8>)>,
    method: AnalysisMethod,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, String> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid upload: {}", e))?
    {
        match field.name() {
            Some("image") => {
                let file_name = field.file_name().unwrap_or("diagram").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Invalid upload: {}", e))?;
                if !bytes.is_empty() {
                    form.image = Some((file_name, bytes.to_vec()));
                }
            }
            Some("method") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid upload: {}", e))?;
                form.method = AnalysisMethod::from_id(value.trim()).unwrap_or_default();
            }
            other => debug!("Ignoring upload field {:?}", other),
        }
    }

    Ok(form)
}

fn is_supported_image(bytes: &[u8]) -> bool {
    matches!(
        infer::get(bytes).map(|kind| kind.mime_type()),
        Some("image/png") | Some("image/jpeg")
    )
}

fn form_error(method: AnalysisMethod, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        render_html(&UploadTemplate {
            title: "Upload",
            methods: MethodOption::all(method),
            error: Some(message.to_string()),
            missing: false,
        }),
    )
        .into_response()
}

/// Store the submitted diagram in the session and go to the results page.
pub async fn upload_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return form_error(AnalysisMethod::default(), &message),
    };

    let Some((file_name, bytes)) = form.image else {
        return form_error(form.method, NO_IMAGE_MESSAGE);
    };
    if !is_supported_image(&bytes) {
        return form_error(form.method, UNSUPPORTED_MESSAGE);
    }

    let existing = session_id(&headers);
    let (id, handle) = state.sessions.get_or_create(existing.as_deref()).await;

    info!(
        "Received {} ({} bytes) for {} analysis",
        file_name,
        bytes.len(),
        form.method
    );
    handle
        .state()
        .await
        .begin_upload(Upload::new(bytes, file_name, form.method));

    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, HeaderValue::from_static("/results")),
            (header::SET_COOKIE, session_cookie(&id)),
        ],
    )
        .into_response()
}
