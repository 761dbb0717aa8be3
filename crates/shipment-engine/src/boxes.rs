//! Splitting shipment totals into boxes and compacting identical runs

use shipment_types::ShipmentBox;

/// Round to 2 decimal places.
///
/// Rounds the exact binary value with ties to even, so `0.125` gives `0.12`
/// and `2.675` (stored just below the tie) gives `2.67`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

fn box_weight(units: u64, total_quantity: f64, total_weight: f64) -> f64 {
    if total_quantity > 0.0 {
        round2(total_weight * (units as f64 / total_quantity))
    } else {
        0.0
    }
}

/// Whole units per box and the number of boxes taking one extra unit
fn unit_split(total_quantity: f64, containers: u32) -> (u64, u64) {
    let whole_units = total_quantity.max(0.0).trunc() as u64;
    let count = u64::from(containers);
    (whole_units / count, whole_units % count)
}

/// Distribute `total_quantity` units and `total_weight` kg over `containers`
/// boxes.
///
/// Quantity is truncated to a whole number of units. Boxes get
/// `quantity / containers` units each and the first `quantity % containers`
/// boxes take one extra unit. Weight follows units proportionally.
///
/// Allocates one entry per container; use [`split_into_runs`] when the count
/// comes from untrusted input.
pub fn split_into_boxes(total_quantity: f64, total_weight: f64, containers: u32) -> Vec<ShipmentBox> {
    if containers == 0 {
        return Vec::new();
    }

    let (base_units, remainder) = unit_split(total_quantity, containers);

    (0..u64::from(containers))
        .map(|i| {
            let units = base_units + u64::from(i < remainder);
            let weight = box_weight(units, total_quantity, total_weight);
            ShipmentBox::single(i as usize + 1, units, weight)
        })
        .collect()
}

/// Same result as `merge_boxes(&split_into_boxes(..))` without materializing
/// every container.
///
/// Boxes with equal units always weigh the same, so the split is at most two
/// runs: the boxes with an extra unit, then the rest.
pub fn split_into_runs(total_quantity: f64, total_weight: f64, containers: u32) -> Vec<ShipmentBox> {
    if containers == 0 {
        return Vec::new();
    }

    let (base_units, remainder) = unit_split(total_quantity, containers);
    // remainder < containers, so both counts fit in u32
    let heavier = remainder as u32;
    let lighter = containers - heavier;

    let mut runs = Vec::with_capacity(2);
    if heavier > 0 {
        let units = base_units + 1;
        runs.push(ShipmentBox {
            index: 1,
            units,
            weight: box_weight(units, total_quantity, total_weight),
            total_boxes: heavier,
        });
    }
    if lighter > 0 {
        runs.push(ShipmentBox {
            index: heavier as usize + 1,
            units: base_units,
            weight: box_weight(base_units, total_quantity, total_weight),
            total_boxes: lighter,
        });
    }
    runs
}

/// Collapse consecutive boxes with identical units and weight into one entry.
///
/// Only neighbours merge; equal boxes separated by a different one stay
/// separate entries.
pub fn merge_boxes(boxes: &[ShipmentBox]) -> Vec<ShipmentBox> {
    let mut merged: Vec<ShipmentBox> = Vec::with_capacity(boxes.len());

    for b in boxes {
        match merged.last_mut() {
            Some(current) if current.same_contents(b) => current.total_boxes += b.total_boxes,
            _ => merged.push(b.clone()),
        }
    }

    merged
}
