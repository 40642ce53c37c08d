//! Binary encoding/decoding for score records.

pub mod primitives;
pub mod record;

pub use primitives::{Reader, Writer};
pub use record::{decode_field, decode_record, decode_record_fields, encode_field, encode_record};
