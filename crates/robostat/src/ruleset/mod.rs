//! The ruleset facade that score consumers program against.
//!
//! A [`Ruleset`] maps between stored bytes and an application-defined
//! score value. Nothing outside the ruleset assumes anything about how
//! a score looks; [`CategoryRuleset`] is the common case where the score
//! is a [`Record`] of a [`CompositeRecord`] schema.

use std::sync::Arc;

use crate::error::{CodecError, EncodeError, SchemaError, ValidationError};
use crate::model::{CompositeRecord, Record};

/// Conversion between stored bytes and scores, plus score validation.
///
/// Implementations are configured once and are pure afterwards, so a
/// shared reference can be used from any number of threads.
pub trait Ruleset {
    /// The value describing one recorded result.
    type Score;

    /// Creates a fresh default-valued score.
    fn create(&self) -> Self::Score;

    /// Decodes a score from its stored bytes.
    fn decode(&self, data: &[u8]) -> Result<Self::Score, CodecError>;

    /// Encodes a score. Inverse of [`Ruleset::decode`] for valid scores.
    fn encode(&self, score: &Self::Score) -> Result<Vec<u8>, EncodeError>;

    /// Validates a single score. Accepts anything unless overridden.
    fn validate(&self, _score: &Self::Score) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Jointly validates a group of related scores, e.g. both sides of a match.
    ///
    /// Accepts anything unless overridden.
    fn validate_group(&self, _scores: &[&Self::Score]) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl<R: Ruleset + ?Sized> Ruleset for Arc<R> {
    type Score = R::Score;

    fn create(&self) -> Self::Score {
        (**self).create()
    }

    fn decode(&self, data: &[u8]) -> Result<Self::Score, CodecError> {
        (**self).decode(data)
    }

    fn encode(&self, score: &Self::Score) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(score)
    }

    fn validate(&self, score: &Self::Score) -> Result<(), ValidationError> {
        (**self).validate(score)
    }

    fn validate_group(&self, scores: &[&Self::Score]) -> Result<(), ValidationError> {
        (**self).validate_group(scores)
    }
}

/// Ruleset whose scores are records of one composite schema.
#[derive(Debug, Clone)]
pub struct CategoryRuleset {
    schema: Arc<CompositeRecord>,
}

impl CategoryRuleset {
    /// Creates a ruleset over `schema`.
    ///
    /// The schema is re-checked so that deserialized schemas get the same
    /// guarantees as built ones.
    pub fn new(schema: Arc<CompositeRecord>) -> Result<Self, SchemaError> {
        schema.validate_schema()?;
        Ok(Self { schema })
    }

    /// The record schema.
    pub fn schema(&self) -> &Arc<CompositeRecord> {
        &self.schema
    }

    fn holds(&self, score: &Record) -> bool {
        Arc::ptr_eq(score.schema(), &self.schema) || score.schema().as_ref() == self.schema.as_ref()
    }
}

impl Ruleset for CategoryRuleset {
    type Score = Record;

    fn create(&self) -> Record {
        Record::new(Arc::clone(&self.schema))
    }

    fn decode(&self, data: &[u8]) -> Result<Record, CodecError> {
        self.schema.decode(data)
    }

    /// Refuses records of another schema, whose bytes `decode` would reject.
    fn encode(&self, score: &Record) -> Result<Vec<u8>, EncodeError> {
        if !self.holds(score) {
            return Err(EncodeError::SchemaMismatch {
                expected: self.schema.name().to_string(),
                found: score.schema().name().to_string(),
            });
        }
        score.to_bytes()
    }

    fn validate(&self, score: &Record) -> Result<(), ValidationError> {
        if !self.holds(score) {
            return Err(ValidationError::SchemaMismatch {
                expected: self.schema.name().to_string(),
                found: score.schema().name().to_string(),
            });
        }
        score.validate()
    }

    /// Validates each score on its own; a plain record schema has no
    /// rules spanning several scores.
    fn validate_group(&self, scores: &[&Record]) -> Result<(), ValidationError> {
        scores.iter().try_for_each(|score| self.validate(score))
    }
}

/// Decodes stored score rows with `ruleset`.
///
/// A row without a payload means no score was recorded: it comes out as
/// `None` and the ruleset is not consulted. An empty payload is still a
/// payload and is decoded. The first malformed payload aborts the batch.
pub fn decode_scores<R, T, D, I>(
    ruleset: &R,
    rows: I,
) -> Result<Vec<(T, Option<R::Score>)>, CodecError>
where
    R: Ruleset + ?Sized,
    D: AsRef<[u8]>,
    I: IntoIterator<Item = (T, Option<D>)>,
{
    let mut unscored = 0usize;
    let decoded = rows
        .into_iter()
        .map(|(team, data)| match data {
            Some(data) => ruleset.decode(data.as_ref()).map(|score| (team, Some(score))),
            None => {
                unscored += 1;
                Ok((team, None))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        scored = decoded.len() - unscored,
        unscored,
        "decoded score rows"
    );
    Ok(decoded)
}

/// Drops rows that have no recorded score.
pub fn scored<T, S>(rows: impl IntoIterator<Item = (T, Option<S>)>) -> impl Iterator<Item = (T, S)> {
    rows.into_iter()
        .filter_map(|(team, score)| score.map(|score| (team, score)))
}
