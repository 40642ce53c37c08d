//! Field schemas for score records.
//!
//! A [`Category`] describes one field: its binary shape, its default
//! value and the rule a value must satisfy. A [`CompositeRecord`] is an
//! ordered, named aggregate of categories and is itself usable as a
//! category, so records nest inside lists and other records.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::codec::primitives::{Reader, Writer};
use crate::codec::record::{decode_field, encode_field};
use crate::error::{CodecError, EncodeError, SchemaError, ValidationError};
use crate::limits::MAX_INT_LENGTH;
use crate::model::value::{FieldValue, Record};
use crate::validate::validate_field;

/// Schema node for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    /// Fixed-width big-endian integer.
    Int(IntCategory),
    /// One count byte followed by that many elements of the inner category.
    List(Box<Category>),
    /// A nested record.
    Composite(Arc<CompositeRecord>),
}

impl Category {
    /// Creates a list category over `inner`.
    pub fn list(inner: impl Into<Category>) -> Self {
        Category::List(Box::new(inner.into()))
    }

    /// Returns the value used when no bytes are supplied.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Category::Int(int) => FieldValue::Int(int.default_value()),
            Category::List(_) => FieldValue::List(Vec::new()),
            Category::Composite(schema) => FieldValue::Record(Record::new(Arc::clone(schema))),
        }
    }

    /// Decodes one value from the front of `data`.
    ///
    /// Returns the value and the number of bytes it occupied. Bytes past
    /// the field are left alone; see [`CompositeRecord::decode`] for the
    /// whole-buffer form.
    pub fn decode(&self, data: &[u8]) -> Result<(FieldValue, usize), CodecError> {
        let mut reader = Reader::new(data);
        let value = decode_field(&mut reader, self)?;
        Ok((value, reader.position()))
    }

    /// Appends the encoding of `value` to `out`.
    ///
    /// Fails if `value` has the wrong shape or does not fit the field;
    /// values that pass [`Category::validate`] always encode.
    pub fn encode(&self, value: &FieldValue, out: &mut Writer) -> Result<(), EncodeError> {
        encode_field(out, self, value)
    }

    /// Checks `value` against this category's constraints.
    pub fn validate(&self, value: &FieldValue) -> Result<(), ValidationError> {
        validate_field(self, value)
    }

    /// Short name of the value shape this category holds.
    pub fn kind(&self) -> &'static str {
        match self {
            Category::Int(_) => "int",
            Category::List(_) => "list",
            Category::Composite(_) => "record",
        }
    }

    /// Returns true if `value` has the shape this category describes.
    ///
    /// Only the shape is checked (integer vs list vs record, recursively);
    /// ranges are the business of [`Category::validate`].
    pub fn matches_shape(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Category::Int(_), FieldValue::Int(_)) => true,
            (Category::List(inner), FieldValue::List(items)) => {
                items.iter().all(|item| inner.matches_shape(item))
            }
            (Category::Composite(schema), FieldValue::Record(record)) => {
                record.schema().as_ref() == schema.as_ref()
            }
            _ => false,
        }
    }

    /// Checks the configuration of this category and everything below it.
    pub fn validate_schema(&self) -> Result<(), SchemaError> {
        match self {
            Category::Int(int) => int.validate_schema(),
            Category::List(inner) => inner.validate_schema(),
            Category::Composite(schema) => schema.validate_schema(),
        }
    }
}

impl From<IntCategory> for Category {
    fn from(int: IntCategory) -> Self {
        Category::Int(int)
    }
}

impl From<Arc<CompositeRecord>> for Category {
    fn from(schema: Arc<CompositeRecord>) -> Self {
        Category::Composite(schema)
    }
}

impl From<CompositeRecord> for Category {
    fn from(schema: CompositeRecord) -> Self {
        Category::Composite(Arc::new(schema))
    }
}

// =============================================================================
// INT
// =============================================================================

/// Fixed-width big-endian integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntCategory {
    length: usize,
    signed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    default: i128,
}

impl IntCategory {
    /// Creates an integer field of `length` bytes with default 0.
    pub fn new(length: usize, signed: bool) -> Result<Self, SchemaError> {
        let int = Self {
            length,
            signed,
            default: 0,
        };
        int.validate_schema()?;
        Ok(int)
    }

    /// One-byte unsigned integer.
    pub fn u8() -> Self {
        Self {
            length: 1,
            signed: false,
            default: 0,
        }
    }

    /// Two-byte unsigned integer.
    pub fn u16() -> Self {
        Self {
            length: 2,
            signed: false,
            default: 0,
        }
    }

    /// Two-byte signed integer.
    pub fn i16() -> Self {
        Self {
            length: 2,
            signed: true,
            default: 0,
        }
    }

    /// Returns a copy with a different default value.
    pub fn with_default(self, default: impl Into<i128>) -> Result<Self, SchemaError> {
        let int = Self {
            default: default.into(),
            ..self
        };
        int.validate_schema()?;
        Ok(int)
    }

    /// Width in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether values are two's complement.
    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Value used when no bytes are supplied.
    pub fn default_value(&self) -> i128 {
        self.default
    }

    /// Inclusive range of values that fit this field.
    pub fn range(&self) -> (i128, i128) {
        let bits = 8 * self.length as u32;
        if self.signed {
            let half = 1i128 << (bits - 1);
            (-half, half - 1)
        } else {
            (0, (1i128 << bits) - 1)
        }
    }

    /// Checks that `value` fits this field.
    pub fn check(&self, value: i128) -> Result<(), ValidationError> {
        if value < 0 && !self.signed {
            return Err(ValidationError::NegativeUnsigned { value });
        }
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(ValidationError::IntOverflow {
                value,
                length: self.length,
            });
        }
        Ok(())
    }

    fn validate_schema(&self) -> Result<(), SchemaError> {
        if self.length == 0 || self.length > MAX_INT_LENGTH {
            return Err(SchemaError::InvalidIntLength {
                length: self.length,
                max: MAX_INT_LENGTH,
            });
        }
        if self.check(self.default).is_err() {
            return Err(SchemaError::DefaultOutOfRange {
                default: self.default,
                length: self.length,
                signed: self.signed,
            });
        }
        Ok(())
    }
}

impl Default for IntCategory {
    fn default() -> Self {
        Self::u16()
    }
}

// =============================================================================
// COMPOSITE
// =============================================================================

/// A named field of a composite record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub category: Category,
}

/// Ordered aggregate of named categories forming one record type.
///
/// Field order defines both the value layout of [`Record`] and the
/// binary layout: a record encodes as the concatenation of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeRecord {
    name: String,
    fields: Vec<Field>,
}

impl CompositeRecord {
    /// Creates a record schema from `(name, category)` pairs in layout order.
    pub fn new<N, C>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, C)>,
    ) -> Result<Self, SchemaError>
    where
        N: Into<String>,
        C: Into<Category>,
    {
        let schema = Self {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(name, category)| Field {
                    name: name.into(),
                    category: category.into(),
                })
                .collect(),
        };
        schema.validate_schema()?;
        Ok(schema)
    }

    /// Starts building a record schema.
    pub fn builder(name: impl Into<String>) -> CompositeRecordBuilder {
        CompositeRecordBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Wraps the schema for sharing between records and rulesets.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in layout order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Category of the field called `name`.
    pub fn field(&self, name: &str) -> Option<&Category> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.category)
    }

    /// Decodes a whole record from `data`.
    ///
    /// Every byte must belong to some field: leftover bytes are a
    /// [`CodecError::TrailingBytes`] error.
    pub fn decode(self: &Arc<Self>, data: &[u8]) -> Result<Record, CodecError> {
        crate::codec::record::decode_record(data, self)
    }

    /// Checks field name uniqueness and every field's configuration.
    ///
    /// Schemas built through [`CompositeRecord::new`] are already checked;
    /// this is for schemas obtained some other way, e.g. deserialized.
    pub fn validate_schema(&self) -> Result<(), SchemaError> {
        let mut seen = FxHashSet::with_capacity_and_hasher(self.fields.len(), Default::default());
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            field.category.validate_schema()?;
        }
        Ok(())
    }
}

/// Builder for [`CompositeRecord`].
#[derive(Debug, Clone)]
pub struct CompositeRecordBuilder {
    name: String,
    fields: Vec<(String, Category)>,
}

impl CompositeRecordBuilder {
    /// Appends a field of any category.
    pub fn field(mut self, name: impl Into<String>, category: impl Into<Category>) -> Self {
        self.fields.push((name.into(), category.into()));
        self
    }

    /// Appends an integer field.
    pub fn int(self, name: impl Into<String>, int: IntCategory) -> Self {
        self.field(name, int)
    }

    /// Appends a list field over `inner`.
    pub fn list(self, name: impl Into<String>, inner: impl Into<Category>) -> Self {
        self.field(name, Category::list(inner))
    }

    /// Appends a nested record field.
    pub fn record(self, name: impl Into<String>, schema: Arc<CompositeRecord>) -> Self {
        self.field(name, schema)
    }

    /// Builds the schema, ready to be shared between records.
    pub fn build(self) -> Result<Arc<CompositeRecord>, SchemaError> {
        CompositeRecord::new(self.name, self.fields).map(Arc::new)
    }
}
