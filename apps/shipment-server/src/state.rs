//! Application state for the shipment server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared_pdf::{PdfTextExtractor, TextExtractor};
use shipment_engine::{batch_records, ExportProfile, ShipmentEngine};
use shipment_types::{ExtractedRecord, ProcessedDocument};
use tokio::sync::RwLock;

/// The most recent upload, replaced wholesale by the next one
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub uploaded_at: DateTime<Utc>,
    pub signature: String,
    pub documents: Vec<ProcessedDocument>,
}

impl UploadBatch {
    pub fn new(signature: String, documents: Vec<ProcessedDocument>) -> Self {
        Self {
            uploaded_at: Utc::now(),
            signature,
            documents,
        }
    }

    /// Records that can be exported (error-flagged documents have none)
    pub fn records(&self) -> Vec<ExtractedRecord> {
        batch_records(&self.documents)
    }
}

/// Single-slot session cache
///
/// One user session at a time: a new upload overwrites whatever was there.
#[derive(Default)]
pub struct SessionStore {
    current: RwLock<Option<UploadBatch>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, batch: UploadBatch) {
        *self.current.write().await = Some(batch);
    }

    pub async fn current(&self) -> Option<UploadBatch> {
        self.current.read().await.clone()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ShipmentEngine>,
    pub profile: Arc<ExportProfile>,
    pub extractor: Arc<dyn TextExtractor>,
    pub session: Arc<SessionStore>,
}

impl AppState {
    pub fn new(engine: ShipmentEngine, profile: ExportProfile) -> Self {
        Self::with_extractor(engine, profile, Arc::new(PdfTextExtractor::new()))
    }

    pub fn with_extractor(
        engine: ShipmentEngine,
        profile: ExportProfile,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            profile: Arc::new(profile),
            extractor,
            session: Arc::new(SessionStore::new()),
        }
    }
}
