use serde::{Deserialize, Serialize};

/// One or more physical containers sharing the same unit count and weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentBox {
    /// 1-based position of the first container in the run
    pub index: usize,
    pub units: u64,
    /// Kilograms, rounded to 2 decimals
    pub weight: f64,
    /// Number of identical containers this entry stands for
    pub total_boxes: u32,
}

impl ShipmentBox {
    pub fn single(index: usize, units: u64, weight: f64) -> Self {
        Self {
            index,
            units,
            weight,
            total_boxes: 1,
        }
    }

    pub fn same_contents(&self, other: &ShipmentBox) -> bool {
        self.units == other.units && self.weight == other.weight
    }
}

/// Dangerous-goods attributes for one item type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardAttributes {
    pub un_number: String,
    pub hazard_class: String,
    pub packing_group: String,
    pub packing_instructions: String,
    pub description: String,
}

impl HazardAttributes {
    pub fn is_empty(&self) -> bool {
        self.un_number.is_empty()
            && self.hazard_class.is_empty()
            && self.packing_group.is_empty()
            && self.packing_instructions.is_empty()
            && self.description.is_empty()
    }
}

/// An item number found in the document together with its hazard lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemHazard {
    pub item_number: String,
    pub hazard: HazardAttributes,
}

/// Structured fields pulled out of one shipment document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<String>,
    pub total_containers: u32,
    pub total_quantity: f64,
    pub net_weight_kg: f64,
    /// In order of appearance, duplicates kept
    pub item_numbers: Vec<String>,
    pub boxes: Vec<ShipmentBox>,
    pub total_boxes: usize,
    pub total_units: u64,
    pub total_weight: f64,
    /// Aligned with `item_numbers`
    pub hazards: Vec<ItemHazard>,
}

impl ExtractedRecord {
    /// True when no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.delivery.as_deref().map_or(true, str::is_empty)
            && self.ship_to.as_deref().map_or(true, str::is_empty)
            && self.total_containers == 0
            && self.total_quantity == 0.0
            && self.net_weight_kg == 0.0
            && self.item_numbers.is_empty()
            && self.boxes.is_empty()
            && self.total_units == 0
            && self.total_weight == 0.0
    }

    pub fn delivery_id(&self) -> &str {
        self.delivery.as_deref().unwrap_or("")
    }

    /// Hazard attributes of the first listed item, used for the export rows.
    pub fn primary_hazard(&self) -> Option<&HazardAttributes> {
        self.hazards.first().map(|h| &h.hazard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Parsed,
    Warning,
    Error,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Parsed => write!(f, "parsed"),
            DocumentStatus::Warning => write!(f, "warning"),
            DocumentStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of processing one uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub filename: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Absent for error-flagged documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<ExtractedRecord>,
}

impl ProcessedDocument {
    pub fn parsed(filename: impl Into<String>, record: ExtractedRecord) -> Self {
        Self {
            filename: filename.into(),
            status: DocumentStatus::Parsed,
            message: None,
            record: Some(record),
        }
    }

    pub fn warning(
        filename: impl Into<String>,
        record: ExtractedRecord,
        message: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            status: DocumentStatus::Warning,
            message: Some(message.into()),
            record: Some(record),
        }
    }

    pub fn error(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: DocumentStatus::Error,
            message: Some(message.into()),
            record: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == DocumentStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_record_is_empty() {
        assert!(ExtractedRecord::default().is_empty());
    }

    #[test]
    fn record_with_delivery_is_not_empty() {
        let record = ExtractedRecord {
            delivery: Some("8001234".into()),
            ..Default::default()
        };
        assert!(!record.is_empty());
        assert_eq!(record.delivery_id(), "8001234");
    }

    #[test]
    fn missing_ship_to_is_omitted_from_json() {
        let record = ExtractedRecord {
            delivery: Some("1".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("ship_to").is_none());
        assert_eq!(value["delivery"], "1");
    }

    #[test]
    fn error_document_has_no_record() {
        let doc = ProcessedDocument::error("a.pdf", "No readable text found in PDF.");
        assert!(doc.is_error());
        assert!(doc.record.is_none());
        assert_eq!(doc.status.to_string(), "error");
    }

    #[test]
    fn boxes_compare_units_and_weight_only() {
        let a = ShipmentBox::single(1, 3, 6.0);
        let b = ShipmentBox::single(2, 3, 6.0);
        let c = ShipmentBox::single(3, 3, 6.01);
        assert!(a.same_contents(&b));
        assert!(!a.same_contents(&c));
    }
}
