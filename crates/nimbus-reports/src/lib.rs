//! User weather reports for Nimbus
//!
//! Append-only flat-file storage of free-text weather reports, one file
//! per city. Entries are never edited or deleted by the application.

pub mod store;

pub use store::{ReportEntry, ReportStore, ReportStoreError};
