//! Page handlers: landing page, upload form and results.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::super::template_structs::{HomeTemplate, MethodOption, ResultsTemplate, UploadTemplate};
use super::super::AppState;
use super::helpers::{render_html, session_id};
use crate::analysis::AnalysisMethod;
use crate::ocr::sniff_mime;
use crate::session::{SessionError, SessionHandle};

async fn current_session(state: &AppState, headers: &HeaderMap) -> Option<SessionHandle> {
    let id = session_id(headers)?;
    state.sessions.get(&id).await
}

/// Where results requests without an upload are sent.
const MISSING_REDIRECT: &str = "/upload?missing=1";

fn missing_redirect() -> Response {
    Redirect::to(MISSING_REDIRECT).into_response()
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Set when redirected from the results page without an upload.
    missing: Option<String>,
}

/// Landing page.
pub async fn home() -> impl IntoResponse {
    render_html(&HomeTemplate {
        title: "Home",
        methods: MethodOption::all(AnalysisMethod::default()),
    })
}

/// Upload form, preselecting the session's last method.
pub async fn upload_form(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut selected = AnalysisMethod::default();
    if let Some(handle) = current_session(&state, &headers).await {
        let session = handle.state().await;
        if let Some(upload) = session.upload() {
            selected = upload.method;
        }
    }

    render_html(&UploadTemplate {
        title: "Upload",
        methods: MethodOption::all(selected),
        error: None,
        missing: query.missing.is_some(),
    })
}

/// Results page. Runs the analysis on first view of an upload and sends
/// sessions without an upload back to the form.
pub async fn results_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(handle) = current_session(&state, &headers).await else {
        return missing_redirect();
    };

    match state.pipeline.analyze_session(&handle).await {
        Ok((upload, record)) => {
            render_html(&ResultsTemplate::new(&record, &upload.file_name)).into_response()
        }
        Err(SessionError::MissingInput) => missing_redirect(),
    }
}

/// The uploaded diagram, for the results preview.
pub async fn results_image(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(handle) = current_session(&state, &headers).await else {
        return (StatusCode::NOT_FOUND, "No image uploaded").into_response();
    };

    let session = handle.state().await;
    let Some(upload) = session.upload() else {
        return (StatusCode::NOT_FOUND, "No image uploaded").into_response();
    };
    let mime = sniff_mime(&upload.bytes, &upload.file_name);
    ([(header::CONTENT_TYPE, mime)], upload.bytes.to_vec()).into_response()
}
