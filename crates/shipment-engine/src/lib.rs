pub mod boxes;
pub mod country;
pub mod export;
pub mod extractor;
pub mod hazard;
pub mod rules;

pub use export::{export_tsv, format_export, write_tsv, ExportError, ExportProfile, ExportRow};
pub use hazard::{HazardTable, HazardTableError};

use shared_pdf::TextExtractor;
use shipment_types::{ExtractedRecord, ProcessedDocument};
use tracing::{info, warn};

pub const NO_TEXT_MESSAGE: &str = "No readable text found in PDF.";
pub const NO_FIELDS_MESSAGE: &str = "No extractable information found.";

/// ShipmentEngine entry point
pub struct ShipmentEngine {
    hazards: HazardTable,
}

impl ShipmentEngine {
    pub fn new(hazards: HazardTable) -> Self {
        Self { hazards }
    }

    pub fn hazards(&self) -> &HazardTable {
        &self.hazards
    }

    /// Extract shipment fields from already-extracted document text
    pub fn extract(&self, text: &str) -> ExtractedRecord {
        extractor::extract_info(text, &self.hazards)
    }

    /// Turn one uploaded document into a parsed, warning or error outcome.
    pub fn process_document(
        &self,
        filename: &str,
        data: &[u8],
        text_extractor: &dyn TextExtractor,
    ) -> ProcessedDocument {
        let text = match text_extractor.extract_text(data) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to process {}: {}", filename, e);
                return ProcessedDocument::error(filename, format!("Failed to process PDF: {}", e));
            }
        };

        if text.trim().is_empty() {
            warn!("No text in {}", filename);
            return ProcessedDocument::error(filename, NO_TEXT_MESSAGE);
        }

        let record = self.extract(&text);
        if record.is_empty() {
            warn!("Nothing extracted from {}", filename);
            return ProcessedDocument::warning(filename, record, NO_FIELDS_MESSAGE);
        }

        info!(
            "Parsed {}: delivery={} boxes={} items={}",
            filename,
            record.delivery_id(),
            record.total_boxes,
            record.item_numbers.len()
        );
        ProcessedDocument::parsed(filename, record)
    }

    /// Process an upload batch in order. Files not named `*.pdf` are skipped;
    /// a failing document never stops the rest.
    pub fn process_batch<I, N, D>(
        &self,
        files: I,
        text_extractor: &dyn TextExtractor,
    ) -> Vec<ProcessedDocument>
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: AsRef<[u8]>,
    {
        files
            .into_iter()
            .filter(|(name, _)| name.as_ref().ends_with(".pdf"))
            .map(|(name, data)| self.process_document(name.as_ref(), data.as_ref(), text_extractor))
            .collect()
    }
}

impl Default for ShipmentEngine {
    fn default() -> Self {
        Self::new(HazardTable::new())
    }
}

/// Records of a processed batch, skipping error-flagged documents.
///
/// A document that could not be read has no delivery to declare, so it adds
/// no rows to the export: no empty "DG Packaging" row and no separator. A
/// batch made only of such documents has nothing to export.
pub fn batch_records(documents: &[ProcessedDocument]) -> Vec<ExtractedRecord> {
    documents
        .iter()
        .filter_map(|doc| doc.record.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_pdf::PdfError;
    use std::collections::HashSet;
    use shipment_types::DocumentStatus;

    /// Treats the uploaded bytes as the document text
    struct PlainText;

    impl TextExtractor for PlainText {
        fn name(&self) -> &'static str {
            "plain"
        }

        fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError> {
            if data == b"CORRUPT" {
                return Err(PdfError::InvalidPdf("bad xref".into()));
            }
            Ok(vec![String::from_utf8_lossy(data).into_owned()])
        }
    }

    #[test]
    fn test_engine_parses_document() {
        let engine = ShipmentEngine::default();
        let doc = engine.process_document(
            "note.pdf",
            b"Delivery: 77\nTotal number of containers : 2\nTotal Qty/LPN: 4",
            &PlainText,
        );

        assert_eq!(doc.status, DocumentStatus::Parsed);
        assert_eq!(doc.filename, "note.pdf");
        let record = doc.record.unwrap();
        assert_eq!(record.delivery_id(), "77");
        assert_eq!(record.boxes.len(), 1);
        assert_eq!(record.boxes[0].total_boxes, 2);
    }

    #[test]
    fn test_engine_flags_blank_text_as_error() {
        let engine = ShipmentEngine::default();
        let doc = engine.process_document("blank.pdf", b"  \n\t ", &PlainText);
        assert_eq!(doc.status, DocumentStatus::Error);
        assert_eq!(doc.message.as_deref(), Some(NO_TEXT_MESSAGE));
        assert!(doc.record.is_none());
    }

    #[test]
    fn test_engine_flags_unreadable_document_as_error() {
        let engine = ShipmentEngine::default();
        let doc = engine.process_document("bad.pdf", b"CORRUPT", &PlainText);
        assert_eq!(doc.status, DocumentStatus::Error);
        assert!(doc
            .message
            .as_deref()
            .unwrap()
            .starts_with("Failed to process PDF: invalid PDF"));
    }

    #[test]
    fn test_engine_warns_when_nothing_extracted() {
        let engine = ShipmentEngine::default();
        let doc = engine.process_document("memo.pdf", b"Quarterly memo", &PlainText);
        assert_eq!(doc.status, DocumentStatus::Warning);
        assert_eq!(doc.message.as_deref(), Some(NO_FIELDS_MESSAGE));
        assert!(doc.record.is_some());
    }

    #[test]
    fn test_batch_skips_non_pdf_and_continues_after_errors() {
        let engine = ShipmentEngine::default();
        let files: Vec<(&str, &[u8])> = vec![
            ("a.pdf", &b"CORRUPT"[..]),
            ("notes.txt", &b"Delivery: 1"[..]),
            ("b.pdf", &b"Delivery: 2"[..]),
        ];
        let docs = engine.process_batch(files, &PlainText);

        assert_eq!(docs.len(), 2);
        assert!(docs[0].is_error());
        assert_eq!(docs[1].status, DocumentStatus::Parsed);

        let records = batch_records(&docs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].delivery_id(), "2");
    }

    #[test]
    fn test_error_only_batch_has_nothing_to_export() {
        let engine = ShipmentEngine::default();
        let docs = engine.process_batch(vec![("a.pdf", &b"CORRUPT"[..])], &PlainText);

        let records = batch_records(&docs);
        assert!(records.is_empty());
        assert!(matches!(
            export_tsv(&records, "", &HashSet::new(), &ExportProfile::default()),
            Err(ExportError::NoRecords)
        ));
    }
}
