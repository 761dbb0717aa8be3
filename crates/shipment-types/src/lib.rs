pub mod types;

pub use types::{
    DocumentStatus, ExtractedRecord, HazardAttributes, ItemHazard, ProcessedDocument, ShipmentBox,
};
