//! Localized disease metadata.
//!
//! Lookups never fail: an unknown language resolves through the default
//! language, and an unknown class resolves to an empty record.

mod builtin;
mod store;

pub use builtin::builtin_english_table;
pub use store::{DiseaseRecord, DiseaseTable, MetadataStore};
