//! # Sequence scanning
//!
//! Two forward scans:
//!
//! - [`Indexed`] walks a window of an in-memory sequence.
//! - [`scan`] reads an external resource record by record and releases it on
//!   every exit path, including body errors and panics.

pub mod indexed;
pub mod resource;
pub mod sources;

#[cfg(test)]
mod tests;

pub use indexed::Indexed;
pub use resource::{scan, scan_each, Missing, Record, Resource, ScanOptions, Source};
pub use sources::{JsonLines, JsonLinesSource, LineSource, Lines};
