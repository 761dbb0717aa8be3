//! Forwarder export: fixed-column rows and their TSV serialization
//!
//! Every box of a record becomes one row. The first box of the first
//! occurrence of a delivery carries the "DG Declaration" service, the first
//! occurrence is followed by a "DG Packaging" service row, checklisted
//! deliveries get a "Checklist Service" row, and each record ends with a blank
//! separator row.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use shipment_types::ExtractedRecord;
use thiserror::Error;
use tracing::info;

/// Column headers, in output order
pub const EXPORT_COLUMNS: [&str; 29] = [
    "",
    "Ship to",
    "Job Description",
    "Shipper",
    "Consignee",
    "Airport Departure",
    "Airport Destination",
    "Airway Bill No.",
    "Shipper Reference Number",
    "Shipment Type",
    "UN or ID NO.",
    "Proper shipping name",
    "Packing Group",
    "PCS/AP Qty",
    "Type of Packing",
    "Weight",
    "Pack",
    "Label Marking",
    "OP Qty",
    "Auth",
    "User",
    "Reference Number",
    "Remarks (CS)",
    "Pickp Address",
    "Ship To Address",
    "Mode of Transport",
    "Services",
    "Service Qty",
    "Signature",
];

pub const DG_DECLARATION: &str = "DG Declaration";
pub const DG_PACKAGING: &str = "DG Packaging";
pub const CHECKLIST_SERVICE: &str = "Checklist Service";

pub const EXPORT_FILENAME: &str = "shipment_data.tsv";
pub const EXPORT_CONTENT_TYPE: &str = "text/tab-separated-values";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data available. Please upload PDFs first.")]
    NoRecords,

    #[error("Failed to write TSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write TSV: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to read export profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid export profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Boilerplate written on every box row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportProfile {
    pub job_description: String,
    pub shipper: String,
    pub shipment_type: String,
    pub type_of_packing: String,
    pub pack: String,
    pub op_qty: String,
    pub auth: String,
    pub user: String,
    pub remarks: String,
    pub pickup_address: String,
    pub ship_to_address: String,
    pub mode_of_transport: String,
}

impl Default for ExportProfile {
    fn default() -> Self {
        Self {
            job_description: "GE Healthcare".to_string(),
            shipper: "GE Healthcare Global Parts Company Inc\n\
                      C/O DHL Global Forwarding (S) Pte Ltd\n\
                      40 Alps Avenue 3rd floor\n\
                      Singapore 498781 SG"
                .to_string(),
            shipment_type: "Non Radioactive".to_string(),
            type_of_packing: "Fibreboard Box".to_string(),
            pack: "OP".to_string(),
            op_qty: "1".to_string(),
            auth: "IB".to_string(),
            user: String::new(),
            remarks: "Max net 10kg. CAO, Battery Label, Handling Label".to_string(),
            pickup_address: "-".to_string(),
            ship_to_address: "DHL Supply Chain Singapore Pte Ltd\n\
                              40 Alps Avenue #03-01\n\
                              Singapore 498781\n"
                .to_string(),
            mode_of_transport: "Cargo (Air)".to_string(),
        }
    }
}

impl ExportProfile {
    /// Load a JSON profile; fields left out keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// One output line over [`EXPORT_COLUMNS`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRow {
    pub marker: String,
    pub ship_to: String,
    pub job_description: String,
    pub shipper: String,
    pub consignee: String,
    pub airport_departure: String,
    pub airport_destination: String,
    pub airway_bill_no: String,
    pub shipper_reference: String,
    pub shipment_type: String,
    pub un_number: String,
    pub proper_shipping_name: String,
    pub packing_group: String,
    pub pieces: String,
    pub type_of_packing: String,
    pub weight: String,
    pub pack: String,
    pub label_marking: String,
    pub op_qty: String,
    pub auth: String,
    pub user: String,
    pub reference_number: String,
    pub remarks: String,
    pub pickup_address: String,
    pub ship_to_address: String,
    pub mode_of_transport: String,
    pub services: String,
    pub service_qty: String,
    pub signature: String,
}

impl ExportRow {
    pub fn blank() -> Self {
        Self::default()
    }

    /// A row that only names a billable service.
    pub fn service(name: &str, qty: impl ToString) -> Self {
        Self {
            services: name.to_string(),
            service_qty: qty.to_string(),
            ..Self::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells().iter().all(|c| c.is_empty())
    }

    /// Cell values in [`EXPORT_COLUMNS`] order
    pub fn cells(&self) -> [&str; 29] {
        [
            self.marker.as_str(),
            self.ship_to.as_str(),
            self.job_description.as_str(),
            self.shipper.as_str(),
            self.consignee.as_str(),
            self.airport_departure.as_str(),
            self.airport_destination.as_str(),
            self.airway_bill_no.as_str(),
            self.shipper_reference.as_str(),
            self.shipment_type.as_str(),
            self.un_number.as_str(),
            self.proper_shipping_name.as_str(),
            self.packing_group.as_str(),
            self.pieces.as_str(),
            self.type_of_packing.as_str(),
            self.weight.as_str(),
            self.pack.as_str(),
            self.label_marking.as_str(),
            self.op_qty.as_str(),
            self.auth.as_str(),
            self.user.as_str(),
            self.reference_number.as_str(),
            self.remarks.as_str(),
            self.pickup_address.as_str(),
            self.ship_to_address.as_str(),
            self.mode_of_transport.as_str(),
            self.services.as_str(),
            self.service_qty.as_str(),
            self.signature.as_str(),
        ]
    }
}

/// Render a weight the way it reads on paperwork: `8.0`, `6.67`
pub fn format_weight(weight: f64) -> String {
    if weight.is_finite() && weight.fract() == 0.0 {
        format!("{:.1}", weight)
    } else {
        format!("{}", weight)
    }
}

/// Weight cell of a box row. Without a quantity there is nothing to
/// apportion, and the cell holds a bare `0`.
fn weight_cell(record: &ExtractedRecord, weight: f64) -> String {
    if record.total_quantity > 0.0 {
        format_weight(weight)
    } else {
        "0".to_string()
    }
}

/// Build the export rows for a batch of records.
///
/// "First occurrence" of a delivery is tracked across the whole batch, so a
/// delivery split over several documents gets its declaration and packaging
/// services once.
pub fn format_export(
    records: &[ExtractedRecord],
    signature: &str,
    checklist: &HashSet<String>,
    profile: &ExportProfile,
) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    let mut seen_deliveries: HashSet<&str> = HashSet::new();

    for record in records {
        let delivery = record.delivery_id();
        let first_occurrence = !seen_deliveries.contains(delivery);
        let hazard = record.primary_hazard().cloned().unwrap_or_default();

        for (i, b) in record.boxes.iter().enumerate() {
            let declares = first_occurrence && i == 0;
            rows.push(ExportRow {
                job_description: profile.job_description.clone(),
                shipper: profile.shipper.clone(),
                consignee: record.ship_to.clone().unwrap_or_default(),
                shipper_reference: delivery.to_string(),
                shipment_type: profile.shipment_type.clone(),
                un_number: hazard.un_number.clone(),
                proper_shipping_name: hazard.description.clone(),
                packing_group: hazard.packing_group.clone(),
                pieces: b.total_boxes.to_string(),
                type_of_packing: profile.type_of_packing.clone(),
                weight: weight_cell(record, b.weight),
                pack: profile.pack.clone(),
                label_marking: delivery.to_string(),
                op_qty: profile.op_qty.clone(),
                auth: profile.auth.clone(),
                user: profile.user.clone(),
                reference_number: delivery.to_string(),
                remarks: profile.remarks.clone(),
                pickup_address: profile.pickup_address.clone(),
                ship_to_address: profile.ship_to_address.clone(),
                mode_of_transport: profile.mode_of_transport.clone(),
                services: if declares { DG_DECLARATION.to_string() } else { String::new() },
                service_qty: if declares { "1".to_string() } else { String::new() },
                signature: signature.to_string(),
                ..ExportRow::default()
            });
        }

        if first_occurrence {
            rows.push(ExportRow::service(DG_PACKAGING, record.total_containers));
        }

        if checklist.contains(delivery) {
            rows.push(ExportRow::service(CHECKLIST_SERVICE, 1));
        }

        seen_deliveries.insert(delivery);
        rows.push(ExportRow::blank());
    }

    rows
}

/// Write the header line and `rows` as tab-separated values.
pub fn write_tsv<W: Write>(rows: &[ExportRow], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Format and serialize a batch. An empty batch is rejected outright.
pub fn export_tsv(
    records: &[ExtractedRecord],
    signature: &str,
    checklist: &HashSet<String>,
    profile: &ExportProfile,
) -> Result<Vec<u8>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let rows = format_export(records, signature, checklist, profile);
    let mut buffer = Vec::new();
    write_tsv(&rows, &mut buffer)?;

    info!(
        "Exported {} rows for {} records ({} bytes)",
        rows.len(),
        records.len(),
        buffer.len()
    );
    Ok(buffer)
}
