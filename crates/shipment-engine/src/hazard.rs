//! Hazardous-materials reference table
//!
//! Maps item numbers to their dangerous-goods attributes. The table is read
//! once at startup from a delimited export of the reference sheet and is
//! read-only afterwards.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use shipment_types::HazardAttributes;
use thiserror::Error;
use tracing::{debug, info};

pub const KEY_COLUMN: &str = "GE Item Number";
pub const UN_NUMBER_COLUMN: &str = "UN Number";
pub const HAZARD_CLASS_COLUMN: &str = "IATA UN Hazard Class";
pub const PACKING_GROUP_COLUMN: &str = "Packing Group";
pub const PACKING_INSTRUCTIONS_COLUMN: &str = "IATA Packing Instructions";
pub const DESCRIPTION_COLUMN: &str = "UN Description";

#[derive(Error, Debug)]
pub enum HazardTableError {
    #[error("Failed to read hazard table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed hazard table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Hazard table has no '{0}' column")]
    MissingKeyColumn(String),
}

/// Item number -> hazard attributes
#[derive(Debug, Clone, Default)]
pub struct HazardTable {
    entries: HashMap<String, HazardAttributes>,
}

impl HazardTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item_number: impl Into<String>, attributes: HazardAttributes) {
        self.entries.insert(item_number.into(), attributes);
    }

    pub fn get(&self, item_number: &str) -> Option<&HazardAttributes> {
        self.entries.get(item_number)
    }

    /// Attributes for `item_number`, all empty when the item is not listed.
    pub fn lookup(&self, item_number: &str) -> HazardAttributes {
        self.get(item_number).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a `.tsv` (tab) or any other extension (comma) file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HazardTableError> {
        let path = path.as_ref();
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };

        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file, delimiter)?;
        info!(
            "Loaded {} hazard entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse a delimited table with a header row.
    ///
    /// Blank header cells are ignored and a repeated header keeps its first
    /// column. Rows without an item number are skipped; a later row for the
    /// same item replaces the earlier one.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, HazardTableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let mut columns: HashMap<String, usize> = HashMap::new();
        for (idx, header) in reader.headers()?.iter().enumerate() {
            let header = header.trim();
            if header.is_empty() {
                continue;
            }
            columns.entry(header.to_string()).or_insert(idx);
        }

        let key_idx = *columns
            .get(KEY_COLUMN)
            .ok_or_else(|| HazardTableError::MissingKeyColumn(KEY_COLUMN.to_string()))?;

        let cell = |record: &csv::StringRecord, column: &str| -> String {
            columns
                .get(column)
                .and_then(|&idx| record.get(idx))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let mut table = Self::new();
        for result in reader.records() {
            let record = result?;
            let key = record.get(key_idx).map(str::trim).unwrap_or("");
            if key.is_empty() {
                debug!("Skipping hazard row without item number");
                continue;
            }

            let attributes = HazardAttributes {
                un_number: cell(&record, UN_NUMBER_COLUMN),
                hazard_class: cell(&record, HAZARD_CLASS_COLUMN),
                packing_group: cell(&record, PACKING_GROUP_COLUMN),
                packing_instructions: cell(&record, PACKING_INSTRUCTIONS_COLUMN),
                description: cell(&record, DESCRIPTION_COLUMN),
            };
            table.insert(key, attributes);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SHEET: &str = "\
GE Item Number,UN Number,IATA UN Hazard Class,Packing Group,IATA Packing Instructions,UN Description
5412345-2,UN3481,9,,PI967,Lithium ion batteries contained in equipment
5400001,UN1266,3,II,Y341,Perfumery products
";

    #[test]
    fn test_lookup_known_item() {
        let table = HazardTable::from_reader(SHEET.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), 2);

        let battery = table.lookup("5412345-2");
        assert_eq!(battery.un_number, "UN3481");
        assert_eq!(battery.hazard_class, "9");
        assert_eq!(battery.packing_group, "");
        assert_eq!(battery.packing_instructions, "PI967");
        assert_eq!(
            battery.description,
            "Lithium ion batteries contained in equipment"
        );
    }

    #[test]
    fn test_lookup_absent_item_is_all_empty() {
        let table = HazardTable::from_reader(SHEET.as_bytes(), b',').unwrap();
        let missing = table.lookup("does-not-exist");
        assert_eq!(missing, HazardAttributes::default());
        assert!(missing.is_empty());
        assert!(HazardTable::new().lookup("").is_empty());
    }

    #[test]
    fn test_missing_attribute_columns_are_empty() {
        let sheet = "GE Item Number\tUN Number\nA1\tUN3090\n";
        let table = HazardTable::from_reader(sheet.as_bytes(), b'\t').unwrap();
        let entry = table.lookup("A1");
        assert_eq!(entry.un_number, "UN3090");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let sheet = "GE Item Number,,UN Number,UN Number\nA1,x,UN1,UN2\n";
        let table = HazardTable::from_reader(sheet.as_bytes(), b',').unwrap();
        assert_eq!(table.lookup("A1").un_number, "UN1");
    }

    #[test]
    fn test_later_row_wins_and_blank_keys_skipped() {
        let sheet = "GE Item Number,UN Number\nA1,UN1\n,UN9\nA1,UN2\n";
        let table = HazardTable::from_reader(sheet.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("A1").un_number, "UN2");
    }

    #[test]
    fn test_missing_key_column_is_rejected() {
        let sheet = "Item,UN Number\nA1,UN1\n";
        let err = HazardTable::from_reader(sheet.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, HazardTableError::MissingKeyColumn(_)));
    }

    #[test]
    fn test_from_path_uses_tab_for_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hazards.tsv");
        std::fs::write(&path, "GE Item Number\tUN Number\nB7\tUN3480\n").unwrap();

        let table = HazardTable::from_path(&path).unwrap();
        assert_eq!(table.lookup("B7").un_number, "UN3480");
    }
}
