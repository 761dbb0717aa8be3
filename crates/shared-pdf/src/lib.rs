//! Shared PDF handling utilities
//!
//! This crate turns uploaded PDF bytes into plain text for the shipment
//! extraction engine. Extraction sits behind the [`TextExtractor`] trait so
//! callers can substitute another backend (or a fixed text in tests).

pub mod extract;

pub use extract::{join_pages, PdfError, PdfTextExtractor, TextExtractor};
