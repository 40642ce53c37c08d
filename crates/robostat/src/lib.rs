//! Robostat: score records and rankings for judged competitions.
//!
//! This crate provides the two pieces of a competition scoring system
//! that carry real logic: a schema-driven binary codec for score records,
//! and a ranking algebra that turns decoded scores into standings.
//!
//! # Quick Start
//!
//! ```rust
//! use robostat::{CategoryRuleset, CompositeRecord, IntCategory, Ruleset};
//! use robostat::rank::{aggregate, sort_descending};
//!
//! let schema = CompositeRecord::builder("Sprint")
//!     .int("value", IntCategory::u16())
//!     .build()
//!     .unwrap();
//! let ruleset = CategoryRuleset::new(schema).unwrap();
//!
//! // Encode a few results as they would be stored
//! let stored: Vec<(&str, Vec<u8>)> = [("A", 10), ("B", 20), ("A", 30)]
//!     .into_iter()
//!     .map(|(team, value)| {
//!         let score = ruleset.create().with("value", value).unwrap();
//!         ruleset.validate(&score).unwrap();
//!         (team, ruleset.encode(&score).unwrap())
//!     })
//!     .collect();
//!
//! // Decode, keep each team's best, highest first
//! let scores = stored
//!     .iter()
//!     .map(|(team, data)| Ok((*team, ruleset.decode(data)?)))
//!     .collect::<Result<Vec<_>, robostat::CodecError>>()
//!     .unwrap();
//! let best = aggregate(scores, |ss| ss.iter().filter_map(|s| s.int("value")).max());
//! assert_eq!(sort_descending(best), vec![("A", Some(30)), ("B", Some(20))]);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Categories (field schemas), record schemas and values
//! - [`codec`]: Binary encoding/decoding of records
//! - [`validate`]: Range and shape validation
//! - [`ruleset`]: The create/decode/encode/validate facade
//! - [`rank`]: Rank values, aggregation and combination of rankings
//! - [`tournament`]: Blocks, named rankings and multi-block decoding
//! - [`error`]: Error types
//! - [`limits`]: Codec limits
//!
//! # Wire Format
//!
//! A record is the concatenation of its fields in schema order, with no
//! padding or framing:
//! - Integers: fixed-width big-endian, two's complement when signed
//! - Lists: one unsigned count byte (0-255), then the elements
//! - Nested records: their fields, inline
//!
//! A record must be decoded from exactly its own bytes; short input and
//! trailing bytes are both errors.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod rank;
pub mod ruleset;
pub mod tournament;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{CodecError, EncodeError, SchemaError, TournamentError, ValidationError};
pub use model::{Category, CompositeRecord, Field, FieldValue, IntCategory, Record};
pub use rank::{CombinedRank, WeightedRank};
pub use ruleset::{decode_scores, scored, CategoryRuleset, Ruleset};
pub use tournament::{Block, Ranking, SharedRuleset, Tournament};
pub use validate::{validate_field, validate_record};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
