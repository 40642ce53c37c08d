//! Record encoding/decoding.
//!
//! Binary layout: fields are concatenated in schema order with no
//! padding. Integers are fixed-width big-endian; lists are one unsigned
//! count byte followed by that many elements.

use std::sync::Arc;

use crate::codec::primitives::{Reader, Writer};
use crate::error::{CodecError, EncodeError};
use crate::limits::MAX_LIST_LEN;
use crate::model::{Category, CompositeRecord, FieldValue, Record};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one field value of `category` at the reader's position.
pub fn decode_field(reader: &mut Reader<'_>, category: &Category) -> Result<FieldValue, CodecError> {
    match category {
        Category::Int(int) => {
            let value = reader.read_int_be(int.length(), int.signed(), "int")?;
            Ok(FieldValue::Int(value))
        }
        Category::List(inner) => {
            let count = reader.read_byte("list count")? as usize;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(decode_field(reader, inner)?);
            }
            Ok(FieldValue::List(items))
        }
        Category::Composite(schema) => decode_record_fields(reader, schema).map(FieldValue::Record),
    }
}

/// Decodes the fields of `schema` at the reader's position.
///
/// Consumes exactly the record's own bytes; anything after it is left
/// for the enclosing structure.
pub fn decode_record_fields(
    reader: &mut Reader<'_>,
    schema: &Arc<CompositeRecord>,
) -> Result<Record, CodecError> {
    let mut values = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let value = decode_field(reader, &field.category).map_err(|e| e.in_field(&field.name))?;
        values.push(value);
    }
    Ok(Record::from_parts(Arc::clone(schema), values))
}

/// Decodes a complete record from `data`.
///
/// The record must account for every byte of `data`.
pub fn decode_record(data: &[u8], schema: &Arc<CompositeRecord>) -> Result<Record, CodecError> {
    let mut reader = Reader::new(data);
    let record = decode_record_fields(&mut reader, schema)?;

    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes {
            read: reader.position(),
            total: reader.total_len(),
        });
    }

    tracing::trace!(record = schema.name(), bytes = data.len(), "decoded record");
    Ok(record)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Appends the encoding of `value` as `category`.
///
/// On error the writer may hold a partial encoding and should be
/// discarded.
pub fn encode_field(
    writer: &mut Writer,
    category: &Category,
    value: &FieldValue,
) -> Result<(), EncodeError> {
    match (category, value) {
        (Category::Int(int), FieldValue::Int(v)) => {
            writer.write_int_be(*v, int.length(), int.signed())
        }
        (Category::List(inner), FieldValue::List(items)) => {
            let count = u8::try_from(items.len()).map_err(|_| EncodeError::LengthExceedsLimit {
                len: items.len(),
                max: MAX_LIST_LEN,
            })?;
            writer.write_byte(count);
            for item in items {
                encode_field(writer, inner, item)?;
            }
            Ok(())
        }
        (Category::Composite(schema), FieldValue::Record(record)) => {
            let same = Arc::ptr_eq(schema, record.schema())
                || schema.as_ref() == record.schema().as_ref();
            if !same {
                return Err(EncodeError::SchemaMismatch {
                    expected: schema.name().to_string(),
                    found: record.schema().name().to_string(),
                });
            }
            encode_record(writer, record)
        }
        (category, _) => Err(EncodeError::ShapeMismatch {
            expected: category.kind(),
        }),
    }
}

/// Appends the encoding of every field of `record`, in schema order.
pub fn encode_record(writer: &mut Writer, record: &Record) -> Result<(), EncodeError> {
    for (field, value) in record.schema().fields().iter().zip(record.values()) {
        encode_field(writer, &field.category, value).map_err(|e| e.in_field(&field.name))?;
    }
    Ok(())
}
