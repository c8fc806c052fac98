//! Filtering: per-key filter definitions and the registry that applies them.

mod definition;
mod registry;

pub use definition::{DynamicFilter, FilterDefinition, SupportedValue, TypedFilter};
pub use registry::{FilterRegistry, SupportedFilterProperty};

/// Type name reported for every enumerated filter type.
pub const ENUM_TYPE_NAME: &str = "enum";
