//! Base implementation of records for logging.
use crate::error::LanderError;
use chrono::prelude::{DateTime, Local};
use std::collections::HashMap;

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like scores.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use lander_core::record::{Record, RecordValue};
///
/// let mut record = Record::empty();
/// record.insert("score", RecordValue::Scalar(0.5));
/// record.insert("epsilon", RecordValue::Scalar(0.9));
///
/// let score = record.get_scalar("score").unwrap();
/// assert_eq!(score, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not exist or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, LanderError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(LanderError::RecordValueTypeError("Scalar".to_string())),
            None => Err(LanderError::RecordKeyError(k.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_scalar_errors() {
        let mut r = Record::from_slice(&[("score", RecordValue::Scalar(1.0))]);
        r.insert("datetime", RecordValue::DateTime(Local::now()));

        assert_eq!(r.get_scalar("score"), Ok(1.0));
        assert_eq!(
            r.get_scalar("datetime"),
            Err(LanderError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(LanderError::RecordKeyError("missing".to_string()))
        );
    }
}
