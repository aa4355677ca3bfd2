//! Validation error types
//!
//! One `ValidationError` describes a single rule violated by a single field.
//! `FieldErrors` collects every violation of a request so the client sees
//! all of them at once, keyed by field name.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Validation error for a single payload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required key is absent
    Required { field: &'static str },

    /// Key is present but `null`
    Null { field: &'static str },

    /// Field is empty (after trimming) when it shouldn't be
    Blank { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field should be a string
    NotAString { field: &'static str },

    /// Field should be a number or a numeric string
    NotANumber { field: &'static str },

    /// Decimal has more fractional digits than the column allows
    TooManyDecimalPlaces { field: &'static str, max: u32 },

    /// Decimal has more integral digits than the column allows
    TooManyWholeDigits { field: &'static str, max: u32 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::Null { field }
            | Self::Blank { field }
            | Self::TooLong { field, .. }
            | Self::NotAString { field }
            | Self::NotANumber { field }
            | Self::TooManyDecimalPlaces { field, .. }
            | Self::TooManyWholeDigits { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { .. } => write!(f, "This field is required."),
            Self::Null { .. } => write!(f, "This field may not be null."),
            Self::Blank { .. } => write!(f, "This field may not be blank."),
            Self::TooLong { max, .. } => {
                write!(f, "Ensure this field has no more than {} characters.", max)
            }
            Self::NotAString { .. } => write!(f, "Not a valid string."),
            Self::NotANumber { .. } => write!(f, "A valid number is required."),
            Self::TooManyDecimalPlaces { max, .. } => {
                write!(f, "Ensure that there are no more than {} decimal places.", max)
            }
            Self::TooManyWholeDigits { max, .. } => write!(
                f,
                "Ensure that there are no more than {} digits before the decimal point.",
                max
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// All validation failures of one payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Messages grouped by field, fields in alphabetical order.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for err in &self.0 {
            map.entry(err.field()).or_default().push(err.to_string());
        }
        map
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        Self(vec![err])
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field(), err)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let grouped = self.by_field();
        let mut map = serializer.serialize_map(Some(grouped.len()))?;
        for (field, messages) in &grouped {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}
