//! Class label catalog.
//!
//! The label enumeration is deployment configuration: its order must match
//! the order of the model's output vector.

mod labels;

pub use labels::{ClassLabels, DEFAULT_CLASS_NAMES};
