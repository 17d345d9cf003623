//! HTTP boundary router.
//!
//! Thin orchestration over the core: upload → extract → store,
//! status → session read, check → dual-source checker, transcript →
//! speech monitor. Verdict-producing routes never fail on source
//! errors; only input validation and document parsing reject.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::api::types::{
    CheckRequest, FragmentRequest, FragmentResponse, HealthResponse, UploadResponse,
};
use crate::config::{APP_NAME, MAX_UPLOAD_BYTES};
use crate::core_state::CoreState;
use crate::extraction::{self, DrugName};
use crate::interactions::InteractionVerdict;
use crate::session::SessionStatus;
use crate::speech::FragmentOutcome;

/// Build the boundary router.
pub fn app_router(core: Arc<CoreState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/documents/upload", post(upload_document))
        .route("/documents/status", get(document_status))
        .route("/interactions/check", post(check_interactions))
        .route("/transcript/fragment", post(transcript_fragment))
        .with_state(core)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: APP_NAME,
    })
}

/// `POST /documents/upload` — multipart PDF in, drug list out.
///
/// Validates the payload before parsing, extracts the text layer off
/// the async runtime, runs drug extraction, and replaces the session
/// slot atomically.
async fn upload_document(
    State(core): State<Arc<CoreState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if matches!(field.name(), Some("pdf") | Some("file")) {
            file = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?,
            );
            break;
        }
    }
    let bytes = file.ok_or(ApiError::EmptyUpload)?;

    let text = tokio::task::spawn_blocking(move || extraction::pdf_text(&bytes))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let drugs = extraction::extract_drug_names(&text);
    let drugs = core.session.replace(text, drugs)?;
    tracing::info!(drug_count = drugs.len(), "document uploaded and stored");

    Ok(Json(UploadResponse {
        ok: true,
        drug_count: drugs.len(),
        drugs,
    }))
}

/// `GET /documents/status` — pure read of the session slot.
async fn document_status(
    State(core): State<Arc<CoreState>>,
) -> Result<Json<SessionStatus>, ApiError> {
    Ok(Json(core.session.status()?))
}

/// `POST /interactions/check` — verdict for a newly named drug
/// against the session's known list.
async fn check_interactions(
    State(core): State<Arc<CoreState>>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<InteractionVerdict>, ApiError> {
    let name = request
        .new_drug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingInput("newDrug"))?;
    let new_drug = DrugName::new(name).ok_or_else(|| {
        ApiError::BadRequest("newDrug must be longer than 2 characters".to_string())
    })?;

    let known = core.session.drugs()?;
    let verdict = core.checker.check(&new_drug, &known).await;
    Ok(Json(verdict))
}

/// `POST /transcript/fragment` — feed a live transcript fragment
/// through the speech monitor; a fired detection runs a full check.
async fn transcript_fragment(
    State(core): State<Arc<CoreState>>,
    Json(request): Json<FragmentRequest>,
) -> Result<Json<FragmentResponse>, ApiError> {
    let text = request.text.ok_or(ApiError::MissingInput("text"))?;

    let response = match core.monitor.handle_fragment(&text) {
        FragmentOutcome::None => FragmentResponse {
            candidate: None,
            fired: false,
            verdict: None,
        },
        FragmentOutcome::Suppressed(drug) => FragmentResponse {
            candidate: Some(drug.display().to_string()),
            fired: false,
            verdict: None,
        },
        FragmentOutcome::Fire(drug) => {
            let known = core.session.drugs()?;
            let verdict = core.checker.check(&drug, &known).await;
            FragmentResponse {
                candidate: Some(drug.display().to_string()),
                fired: true,
                verdict: Some(verdict),
            }
        }
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::extraction::document::make_test_pdf;

    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    /// Core with unroutable source endpoints: checks resolve to the
    /// neutral error verdict without touching the network.
    fn test_core() -> Arc<CoreState> {
        let settings = Settings {
            port: 0,
            scrape: None,
            scrape_base_url: "http://127.0.0.1:1".to_string(),
            interactions_page_base: "http://127.0.0.1:1/drug_interactions".to_string(),
            terminology_base_url: "http://127.0.0.1:1".to_string(),
            http_timeout: Duration::from_millis(200),
            cooldown: Duration::from_secs(8),
        };
        Arc::new(CoreState::new(settings))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(uri: &str, field_name: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "MEDSENTRYBOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"{field_name}\"; filename=\"doc.pdf\"\r\n\
                 Content-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_service_name() {
        let app = app_router(test_core());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["service"], "medsentry");
    }

    #[tokio::test]
    async fn status_starts_unloaded() {
        let app = app_router(test_core());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/documents/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["loaded"], false);
        assert_eq!(json["drugCount"], 0);
    }

    #[tokio::test]
    async fn upload_then_status_reflects_extracted_drugs() {
        let core = test_core();
        let pdf = make_test_pdf("Atorvastatin 20mg daily and Lisinopril 10mg");

        let response = app_router(core.clone())
            .oneshot(multipart_request("/documents/upload", "pdf", &pdf))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ok"], true);
        let drugs = json["drugs"].as_array().unwrap();
        assert!(drugs.iter().any(|d| d == "Atorvastatin"));
        assert!(drugs.iter().any(|d| d == "Lisinopril"));

        let response = app_router(core)
            .oneshot(
                Request::builder()
                    .uri("/documents/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["loaded"], true);
        assert!(json["drugCount"].as_u64().unwrap() >= 2);
    }

    #[tokio::test]
    async fn second_upload_replaces_first() {
        let core = test_core();
        let first = make_test_pdf("Atorvastatin 20mg daily");
        let second = make_test_pdf("Metformin 500mg twice daily");

        app_router(core.clone())
            .oneshot(multipart_request("/documents/upload", "pdf", &first))
            .await
            .unwrap();
        app_router(core.clone())
            .oneshot(multipart_request("/documents/upload", "file", &second))
            .await
            .unwrap();

        let response = app_router(core)
            .oneshot(
                Request::builder()
                    .uri("/documents/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        let drugs = json["drugs"].as_array().unwrap();
        assert!(drugs.iter().any(|d| d == "Metformin"));
        assert!(!drugs.iter().any(|d| d == "Atorvastatin"));
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let response = app_router(test_core())
            .oneshot(multipart_request("/documents/upload", "attachment", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "EMPTY_UPLOAD");
    }

    #[tokio::test]
    async fn upload_of_non_pdf_bytes_is_rejected() {
        let response = app_router(test_core())
            .oneshot(multipart_request("/documents/upload", "pdf", b"just plain text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn corrupt_pdf_yields_actionable_parse_failure() {
        let mut pdf = make_test_pdf("Some content");
        pdf.truncate(40);
        let response = app_router(test_core())
            .oneshot(multipart_request("/documents/upload", "pdf", &pdf))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PARSE_FAILURE");
    }

    #[tokio::test]
    async fn check_without_new_drug_is_rejected() {
        let response = app_router(test_core())
            .oneshot(json_request("/interactions/check", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "MISSING_INPUT");
    }

    #[tokio::test]
    async fn check_with_blank_new_drug_is_rejected() {
        let response = app_router(test_core())
            .oneshot(json_request("/interactions/check", r#"{"newDrug":"   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn check_never_errors_when_sources_are_down() {
        let response = app_router(test_core())
            .oneshot(json_request(
                "/interactions/check",
                r#"{"newDrug":"Warfarin"}"#,
            ))
            .await
            .unwrap();
        // Total source failure is a neutral 200 verdict, never a 5xx.
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["hasConflict"], false);
        assert_eq!(json["source"], "error");
    }

    #[tokio::test]
    async fn transcript_without_trigger_detects_nothing() {
        let response = app_router(test_core())
            .oneshot(json_request(
                "/transcript/fragment",
                r#"{"text":"The weather is nice today"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["candidate"], serde_json::Value::Null);
        assert_eq!(json["fired"], false);
    }

    #[tokio::test]
    async fn transcript_detection_fires_then_suppresses() {
        let core = test_core();
        let body = r#"{"text":"I'm going to prescribe Metformin for you"}"#;

        let response = app_router(core.clone())
            .oneshot(json_request("/transcript/fragment", body))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["candidate"], "Metformin");
        assert_eq!(json["fired"], true);
        assert_eq!(json["verdict"]["source"], "error"); // sources down

        let response = app_router(core)
            .oneshot(json_request("/transcript/fragment", body))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["candidate"], "Metformin");
        assert_eq!(json["fired"], false);
        assert!(json.get("verdict").is_none());
    }

    #[tokio::test]
    async fn transcript_without_text_is_rejected() {
        let response = app_router(test_core())
            .oneshot(json_request("/transcript/fragment", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app_router(test_core())
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
