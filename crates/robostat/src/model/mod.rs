//! Data model types for score records.
//!
//! - Categories (field schemas) and composite record schemas
//! - Field values and records

pub mod category;
pub mod value;

pub use category::{Category, CompositeRecord, CompositeRecordBuilder, Field, IntCategory};
pub use value::{FieldValue, Record};
