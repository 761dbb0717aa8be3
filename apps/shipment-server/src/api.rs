//! API handlers for the shipment server
//!
//! Provides REST endpoints for:
//! - Uploading a batch of delivery-note PDFs
//! - Reading back the parsed batch
//! - Downloading the forwarder TSV export

use std::collections::HashSet;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipment_engine::export::{EXPORT_CONTENT_TYPE, EXPORT_FILENAME};
use shipment_engine::export_tsv;
use shipment_types::{DocumentStatus, ProcessedDocument};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::ServerError;
use crate::state::{AppState, UploadBatch};

/// Multipart field carrying the PDF files
pub const FILES_FIELD: &str = "pdf_files";
/// Multipart field carrying the preparer's signature
pub const SIGNATURE_FIELD: &str = "signature";

/// Build the router with all endpoints and middleware
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Upload and results
        .route("/api/upload", post(handle_upload))
        .route("/api/results", get(handle_results))
        // Export
        .route("/download_tsv", get(handle_download_tsv))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub hazard_entries: usize,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "shipment-server",
        version: env!("CARGO_PKG_VERSION"),
        hazard_entries: state.engine.hazards().len(),
    })
}

/// Parsed batch response
#[derive(Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub count: usize,
    pub warnings: usize,
    pub errors: usize,
    pub documents: Vec<ProcessedDocument>,
}

impl BatchResponse {
    fn from_batch(batch: Option<UploadBatch>) -> Self {
        let (uploaded_at, documents) = match batch {
            Some(batch) => (Some(batch.uploaded_at), batch.documents),
            None => (None, Vec::new()),
        };
        let count_status = |status: DocumentStatus| {
            documents.iter().filter(|d| d.status == status).count()
        };

        Self {
            success: true,
            uploaded_at,
            count: documents.len(),
            warnings: count_status(DocumentStatus::Warning),
            errors: count_status(DocumentStatus::Error),
            documents,
        }
    }
}

/// Handler: POST /api/upload
///
/// Processes every `pdf_files` part and replaces the session batch.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResponse>, ServerError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut signature = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            FILES_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                debug!("Received {} ({} bytes)", filename, data.len());
                files.push((filename, data.to_vec()));
            }
            SIGNATURE_FIELD => {
                signature = field.text().await?.trim().to_string();
            }
            other => debug!("Ignoring upload field '{}'", other),
        }
    }

    info!("Upload batch: {} files", files.len());

    let engine = state.engine.clone();
    let extractor = state.extractor.clone();
    let documents =
        tokio::task::spawn_blocking(move || engine.process_batch(files, extractor.as_ref()))
            .await
            .map_err(|e| ServerError::Internal(format!("Document processing failed: {}", e)))?;

    let batch = UploadBatch::new(signature, documents);
    state.session.replace(batch.clone()).await;

    Ok(Json(BatchResponse::from_batch(Some(batch))))
}

/// Handler: GET /api/results
pub async fn handle_results(State(state): State<AppState>) -> Json<BatchResponse> {
    Json(BatchResponse::from_batch(state.session.current().await))
}

/// Query parameters for the TSV download
#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub signature: Option<String>,
    /// JSON array of delivery numbers that need a checklist service
    pub checklist: Option<String>,
}

/// Parse the checklist parameter; anything malformed means "no checklist".
pub fn parse_checklist(raw: Option<&str>) -> HashSet<String> {
    let Some(raw) = raw else {
        return HashSet::new();
    };

    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Err(e) => {
            debug!("Ignoring malformed checklist '{}': {}", raw, e);
            HashSet::new()
        }
    }
}

/// Handler: GET /download_tsv
pub async fn handle_download_tsv(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ServerError> {
    let batch = state.session.current().await.ok_or(ServerError::NoData)?;

    let signature = params
        .signature
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| batch.signature.clone());
    let checklist = parse_checklist(params.checklist.as_deref());

    let tsv = export_tsv(&batch.records(), &signature, &checklist, &state.profile)?;

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        tsv,
    )
        .into_response())
}
