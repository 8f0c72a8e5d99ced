//! Decoding solver output into divisions.

mod extractor;

pub use extractor::extract_divisions;
