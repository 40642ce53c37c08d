//! Semantic validation for score records.
//!
//! Structural checks happen during decode; this module checks that
//! values fit the ranges their categories allow. Validation is
//! fail-fast: the first offending field stops the walk.

use crate::error::ValidationError;
use crate::limits::MAX_LIST_LEN;
use crate::model::{Category, FieldValue, Record};

/// Validates a single value against its category.
///
/// Element errors inside a list are returned as-is; the enclosing
/// record adds the field name.
pub fn validate_field(category: &Category, value: &FieldValue) -> Result<(), ValidationError> {
    match (category, value) {
        (Category::Int(int), FieldValue::Int(v)) => int.check(*v),
        (Category::List(inner), FieldValue::List(items)) => {
            if items.len() > MAX_LIST_LEN {
                return Err(ValidationError::ListTooLong {
                    len: items.len(),
                    max: MAX_LIST_LEN,
                });
            }
            items.iter().try_for_each(|item| validate_field(inner, item))
        }
        (Category::Composite(schema), FieldValue::Record(record)) => {
            if record.schema().as_ref() != schema.as_ref() {
                return Err(ValidationError::SchemaMismatch {
                    expected: schema.name().to_string(),
                    found: record.schema().name().to_string(),
                });
            }
            validate_record(record)
        }
        (category, _) => Err(ValidationError::TypeMismatch {
            expected: category.kind(),
        }),
    }
}

/// Validates every field of `record` in schema order.
pub fn validate_record(record: &Record) -> Result<(), ValidationError> {
    for (field, value) in record.schema().fields().iter().zip(record.values()) {
        validate_field(&field.category, value).map_err(|e| e.in_field(&field.name))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompositeRecord, IntCategory};

    #[test]
    fn test_unsigned_byte_bounds() {
        let cat = Category::Int(IntCategory::new(1, false).unwrap());
        assert!(validate_field(&cat, &FieldValue::Int(0)).is_ok());
        assert!(validate_field(&cat, &FieldValue::Int(255)).is_ok());
        assert_eq!(
            validate_field(&cat, &FieldValue::Int(256)),
            Err(ValidationError::IntOverflow { value: 256, length: 1 })
        );
        assert_eq!(
            validate_field(&cat, &FieldValue::Int(-1)),
            Err(ValidationError::NegativeUnsigned { value: -1 })
        );
    }

    #[test]
    fn test_signed_short_bounds() {
        let cat = Category::Int(IntCategory::new(2, true).unwrap());
        assert!(validate_field(&cat, &FieldValue::Int(-32768)).is_ok());
        assert!(validate_field(&cat, &FieldValue::Int(32767)).is_ok());
        assert!(matches!(
            validate_field(&cat, &FieldValue::Int(32768)),
            Err(ValidationError::IntOverflow { .. })
        ));
        assert!(matches!(
            validate_field(&cat, &FieldValue::Int(-32769)),
            Err(ValidationError::IntOverflow { .. })
        ));
    }

    #[test]
    fn test_list_length_bound() {
        let cat = Category::list(IntCategory::u8());
        let ok = FieldValue::List(vec![FieldValue::Int(1); 255]);
        assert!(validate_field(&cat, &ok).is_ok());

        let too_long = FieldValue::List(vec![FieldValue::Int(1); 256]);
        assert_eq!(
            validate_field(&cat, &too_long),
            Err(ValidationError::ListTooLong { len: 256, max: 255 })
        );
    }

    #[test]
    fn test_list_element_error_unchanged() {
        let cat = Category::list(IntCategory::u8());
        let value = FieldValue::List(vec![FieldValue::Int(1), FieldValue::Int(300)]);
        assert_eq!(
            validate_field(&cat, &value),
            Err(ValidationError::IntOverflow { value: 300, length: 1 })
        );
    }

    #[test]
    fn test_record_fails_fast() {
        let schema = CompositeRecord::builder("Pair")
            .int("a", IntCategory::u8())
            .int("b", IntCategory::u8())
            .build()
            .unwrap();
        let record = Record::new(schema)
            .with("a", -1)
            .unwrap()
            .with("b", 1000)
            .unwrap();

        let err = validate_record(&record).unwrap_err();
        assert!(matches!(&err, ValidationError::InField { field, .. } if field == "a"));
        assert_eq!(err.root(), &ValidationError::NegativeUnsigned { value: -1 });
    }

    #[test]
    fn test_shape_mismatch() {
        let cat = Category::list(IntCategory::u8());
        assert_eq!(
            validate_field(&cat, &FieldValue::Int(0)),
            Err(ValidationError::TypeMismatch { expected: "list" })
        );
    }
}
