//! Values held by score records.

use std::fmt;
use std::sync::Arc;

use crate::codec::primitives::Writer;
use crate::codec::record::encode_record;
use crate::error::{EncodeError, SchemaError, ValidationError};
use crate::model::category::CompositeRecord;
use crate::validate::validate_record;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i128),
    List(Vec<FieldValue>),
    Record(Record),
}

impl FieldValue {
    /// Returns the integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list value.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the record, if this is a nested record value.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(record) => Some(record),
            _ => None,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(v: $t) -> Self {
                    FieldValue::Int(i128::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        FieldValue::Record(record)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            FieldValue::Record(record) => write!(f, "{}", record),
        }
    }
}

/// One score record: a value per field of its schema, in layout order.
///
/// Field values can only be replaced with values of the shape their
/// category describes. Ranges are not checked until [`Record::validate`];
/// a valid record always encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: Arc<CompositeRecord>,
    values: Vec<FieldValue>,
}

impl Record {
    /// Creates a record with every field set to its default.
    pub fn new(schema: Arc<CompositeRecord>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| f.category.default_value())
            .collect();
        Self { schema, values }
    }

    /// Assembles a record from already decoded values.
    pub(crate) fn from_parts(schema: Arc<CompositeRecord>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// The schema this record was built from.
    pub fn schema(&self) -> &Arc<CompositeRecord> {
        &self.schema
    }

    /// Field values in layout order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Iterates over `(name, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .zip(&self.values)
    }

    /// Value of the field called `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    /// Integer value of the field called `name`.
    pub fn int(&self, name: &str) -> Option<i128> {
        self.get(name).and_then(FieldValue::as_int)
    }

    /// Elements of the list field called `name`.
    pub fn list(&self, name: &str) -> Option<&[FieldValue]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    /// Replaces the value of the field called `name`.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), SchemaError> {
        let index = self
            .schema
            .index_of(name)
            .ok_or_else(|| SchemaError::UnknownField {
                name: name.to_string(),
            })?;
        let value = value.into();
        let category = &self.schema.fields()[index].category;
        if !category.matches_shape(&value) {
            return Err(SchemaError::ShapeMismatch {
                field: name.to_string(),
                expected: category.kind(),
            });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Result<Self, SchemaError> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Appends this record's encoding to `out`.
    pub fn encode(&self, out: &mut Writer) -> Result<(), EncodeError> {
        encode_record(out, self)
    }

    /// Encodes this record into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Validates every field in layout order, stopping at the first error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_record(self)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.schema.name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntCategory;

    fn schema() -> Arc<CompositeRecord> {
        CompositeRecord::builder("Run")
            .int("time", IntCategory::u16())
            .list("checkpoints", IntCategory::u8())
            .build()
            .unwrap()
    }

    #[test]
    fn test_set_and_get() {
        let mut record = Record::new(schema());
        record.set("time", 120).unwrap();
        record
            .set("checkpoints", vec![FieldValue::from(1u8), FieldValue::from(3u8)])
            .unwrap();

        assert_eq!(record.int("time"), Some(120));
        assert_eq!(record.list("checkpoints").map(<[_]>::len), Some(2));
        let names: Vec<_> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["time", "checkpoints"]);
    }

    #[test]
    fn test_set_unknown_field() {
        let mut record = Record::new(schema());
        assert_eq!(
            record.set("penalty", 1),
            Err(SchemaError::UnknownField {
                name: "penalty".to_string()
            })
        );
    }

    #[test]
    fn test_set_wrong_shape() {
        let mut record = Record::new(schema());
        assert!(matches!(
            record.set("time", vec![FieldValue::Int(1)]),
            Err(SchemaError::ShapeMismatch { expected: "int", .. })
        ));
        // Out of range is a validation concern, not a shape concern
        record.set("time", -1).unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_display() {
        let record = Record::new(schema())
            .with("time", 42)
            .unwrap()
            .with("checkpoints", vec![FieldValue::Int(1), FieldValue::Int(2)])
            .unwrap();
        assert_eq!(record.to_string(), "Run { time: 42, checkpoints: [1, 2] }");
    }
}
