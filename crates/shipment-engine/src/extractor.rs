//! Shipment field extraction
//!
//! Turns the raw text of a delivery note into an [`ExtractedRecord`]:
//! labelled fields, boxes split from the totals, and hazard attributes for
//! every item number.

use shipment_types::{ExtractedRecord, ItemHazard};

use crate::boxes::split_into_runs;
use crate::hazard::HazardTable;
use crate::rules;

/// Extract all shipment fields from `text`. Never fails; missing labels leave
/// their field at its default.
pub fn extract_info(text: &str, hazards: &HazardTable) -> ExtractedRecord {
    let delivery = rules::extract_delivery(text);
    let ship_to = rules::extract_ship_to(text);
    let total_containers = rules::extract_total_containers(text);
    let total_quantity = rules::extract_total_quantity(text);
    let net_weight_kg = rules::extract_net_weight(text);
    let item_numbers = rules::extract_item_numbers(text);

    let boxes = split_into_runs(total_quantity, net_weight_kg, total_containers);

    let total_boxes = boxes.len();
    let total_units = boxes.iter().map(|b| b.units).sum();
    let total_weight = boxes.iter().map(|b| b.weight).sum();

    let hazards = item_numbers
        .iter()
        .map(|item| ItemHazard {
            item_number: item.clone(),
            hazard: hazards.lookup(item),
        })
        .collect();

    ExtractedRecord {
        delivery,
        ship_to,
        total_containers,
        total_quantity,
        net_weight_kg,
        item_numbers,
        boxes,
        total_boxes,
        total_units,
        total_weight,
        hazards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shipment_types::HazardAttributes;

    const DELIVERY_NOTE: &str = "\
Packing List
Delivery: 80012345
Ship To: GE HEALTHCARE KOREA
416 HANGANG-DAERO
SEOUL 04637 KR

Ship From: DHL SUPPLY CHAIN
as5412345-2 BATTERY PACK 1 EA
as5400001 CLEANER 9 EA
as5412345-2 BATTERY PACK 1 EA
Total number of containers : 3
Total Qty/LPN: 10
Net Weight(kg): 20
";

    fn battery_table() -> HazardTable {
        let mut table = HazardTable::new();
        table.insert(
            "5412345-2",
            HazardAttributes {
                un_number: "UN3481".into(),
                hazard_class: "9".into(),
                packing_group: String::new(),
                packing_instructions: "PI967".into(),
                description: "Lithium ion batteries contained in equipment".into(),
            },
        );
        table
    }

    #[test]
    fn test_extracts_full_delivery_note() {
        let record = extract_info(DELIVERY_NOTE, &battery_table());

        assert_eq!(record.delivery.as_deref(), Some("80012345"));
        assert_eq!(
            record.ship_to.as_deref(),
            Some("GE HEALTHCARE KOREA\n416 HANGANG-DAERO\nSEOUL 04637 KR Korea")
        );
        assert_eq!(record.total_containers, 3);
        assert_eq!(record.total_quantity, 10.0);
        assert_eq!(record.net_weight_kg, 20.0);
        assert_eq!(
            record.item_numbers,
            vec!["5412345-2", "5400001", "5412345-2"]
        );

        assert_eq!(record.boxes.len(), 2);
        assert_eq!(record.total_boxes, 2);
        assert_eq!(record.total_units, 7);
        assert_eq!(record.total_weight, 14.0);
    }

    #[test]
    fn test_hazards_align_with_items() {
        let record = extract_info(DELIVERY_NOTE, &battery_table());

        assert_eq!(record.hazards.len(), record.item_numbers.len());
        assert_eq!(record.hazards[0].hazard.un_number, "UN3481");
        assert!(record.hazards[1].hazard.is_empty());
        assert_eq!(record.hazards[2].item_number, "5412345-2");
        assert_eq!(record.primary_hazard().unwrap().packing_instructions, "PI967");
    }

    #[test]
    fn test_missing_ship_to_label_leaves_field_absent() {
        let record = extract_info("Delivery: 1\nTotal Qty/LPN: 4", &HazardTable::new());
        assert_eq!(record.ship_to, None);
        assert_eq!(record.delivery.as_deref(), Some("1"));
        assert!(record.boxes.is_empty());
    }

    #[test]
    fn test_text_without_labels_yields_empty_record() {
        let record = extract_info("lorem ipsum\ndolor sit amet", &HazardTable::new());
        assert!(record.is_empty());
    }

    #[test]
    fn test_huge_container_count_stays_two_runs() {
        let text = "Delivery: 9\nTotal number of containers : 4000000000\nTotal Qty/LPN: 10\nNet Weight(kg): 20";
        let record = extract_info(text, &HazardTable::new());

        assert_eq!(record.total_containers, 4_000_000_000);
        assert_eq!(record.total_boxes, 2);
        assert_eq!(record.boxes[0].total_boxes, 10);
        assert_eq!(record.boxes[1].total_boxes, 3_999_999_990);
        // aggregates sum the run entries, as for any merged box list
        assert_eq!(record.total_units, 1);
    }

    #[test]
    fn test_full_width_digits_are_read() {
        let text = "Delivery: ８００１\nTotal number of containers : ３\nTotal Qty/LPN: 6\nNet Weight(kg): 3";
        let record = extract_info(text, &HazardTable::new());

        assert_eq!(record.delivery.as_deref(), Some("８００１"));
        assert_eq!(record.total_containers, 3);
        assert_eq!(record.total_boxes, 1);
        assert_eq!(record.boxes[0].weight, 1.0);
    }
}
