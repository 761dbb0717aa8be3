//! Field extraction rules for shipment delivery notes
//!
//! Each labelled field of the delivery note has its own pattern and its own
//! fallback. A missing label never fails a document; it leaves the field at
//! its default.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::str::FromStr;
use tracing::warn;

use crate::country::annotate_last_line;

lazy_static! {
    static ref DELIVERY_PATTERN: Regex = Regex::new(r"Delivery\s*:\s*(\d+)").unwrap();

    /// Everything between "Ship To:" and the next "Ship From:", across lines
    static ref SHIP_TO_PATTERN: Regex =
        Regex::new(r"(?s)Ship To:\s*(.*?)\s*Ship From:").unwrap();

    static ref TOTAL_CONTAINERS_PATTERN: Regex =
        Regex::new(r"Total number of containers\s*:\s*(\d+)").unwrap();

    static ref TOTAL_QUANTITY_PATTERN: Regex = Regex::new(r"Total Qty/LPN:\s*([\d.]+)").unwrap();

    static ref NET_WEIGHT_PATTERN: Regex = Regex::new(r"Net Weight\(kg\):\s*([\d.]+)").unwrap();

    /// Item lines start with "as" directly followed by the item number
    static ref ITEM_NUMBER_PATTERN: Regex = Regex::new(r"(?mi)^\s*as(\S*)").unwrap();
}

pub const DEFAULT_TOTAL_CONTAINERS: u32 = 0;
pub const DEFAULT_TOTAL_QUANTITY: f64 = 0.0;
pub const DEFAULT_NET_WEIGHT: f64 = 0.0;

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Code points of the zero digit in decimal scripts seen in scanned notes
const DIGIT_ZEROS: [u32; 5] = [
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x0966, // Devanagari
    0x0E50, // Thai
    0xFF10, // Fullwidth
];

/// Rewrite non-ASCII decimal digits as ASCII so they parse as numbers.
fn ascii_digits(raw: &str) -> Cow<'_, str> {
    if raw.is_ascii() {
        return Cow::Borrowed(raw);
    }

    raw.chars()
        .map(|c| {
            let cp = u32::from(c);
            DIGIT_ZEROS
                .iter()
                .find(|&&zero| (zero..zero + 10).contains(&cp))
                .and_then(|&zero| char::from_digit(cp - zero, 10))
                .unwrap_or(c)
        })
        .collect()
}

fn parse_or_default<T: FromStr + Copy>(field: &'static str, raw: Option<&str>, default: T) -> T {
    match raw {
        Some(raw) => ascii_digits(raw).parse().unwrap_or_else(|_| {
            warn!(field, value = raw, "unparseable number, using default");
            default
        }),
        None => default,
    }
}

/// Line breaks recognised when splitting an address block
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0B' | '\x0C' | '\x1C' | '\x1D' | '\x1E' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Delivery number: first digit run after "Delivery:".
pub fn extract_delivery(text: &str) -> Option<String> {
    first_capture(&DELIVERY_PATTERN, text).map(str::to_string)
}

/// Ship-to address block.
///
/// Blank lines are dropped and trailing whitespace trimmed from each line;
/// the country code on the final line is spelled out.
pub fn extract_ship_to(text: &str) -> Option<String> {
    let block = first_capture(&SHIP_TO_PATTERN, text)?;

    let mut lines: Vec<String> = block
        .split(is_line_break)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_end().to_string())
        .collect();

    if lines.is_empty() {
        return None;
    }

    annotate_last_line(&mut lines);
    Some(lines.join("\n"))
}

pub fn extract_total_containers(text: &str) -> u32 {
    parse_or_default(
        "total_containers",
        first_capture(&TOTAL_CONTAINERS_PATTERN, text),
        DEFAULT_TOTAL_CONTAINERS,
    )
}

pub fn extract_total_quantity(text: &str) -> f64 {
    parse_or_default(
        "total_quantity",
        first_capture(&TOTAL_QUANTITY_PATTERN, text),
        DEFAULT_TOTAL_QUANTITY,
    )
}

pub fn extract_net_weight(text: &str) -> f64 {
    parse_or_default(
        "net_weight_kg",
        first_capture(&NET_WEIGHT_PATTERN, text),
        DEFAULT_NET_WEIGHT,
    )
}

/// Item numbers, one per matching line, in document order.
///
/// Non-ASCII characters are removed first so extraction artifacts glued to
/// the front of a line do not hide the "as" prefix.
pub fn extract_item_numbers(text: &str) -> Vec<String> {
    let ascii: String = text.chars().filter(char::is_ascii).collect();

    ITEM_NUMBER_PATTERN
        .captures_iter(&ascii)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
