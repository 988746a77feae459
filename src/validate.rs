//! # Field Validation
//!
//! Form submissions arrive as a flat mapping of field name to raw string.  This module
//! holds that mapping ([`FieldSet`]) together with the per-field rules every audio kind
//! builds on:
//!
//! - Text fields are required, non-empty and at most [`MAX_TEXT_CHARS`] characters.
//! - `duration` is a non-negative integer no larger than [`MAX_DURATION`].
//! - Podcast participants are checked by [`crate::Participants::validate`].
//!
//! ## Usage Examples
//!
//! ```rust
//! use audio_catalog::{FieldSet, validate_text, parse_duration};
//!
//! let fields = FieldSet::from_pairs(vec![
//!     ("name".to_string(), "song3".to_string()),
//!     ("duration".to_string(), "400".to_string()),
//! ]);
//! assert!(fields.is_exactly(&["duration", "name"]));
//!
//! assert_eq!(validate_text("name", "song3").unwrap(), "song3");
//! assert!(validate_text("name", "").is_err());
//! assert_eq!(parse_duration("400").unwrap(), 400);
//! assert!(parse_duration("-1").is_err());
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// Maximum length, in characters, of every text field and of each participant name.
pub const MAX_TEXT_CHARS: usize = 100;

/// Largest accepted duration.
pub const MAX_DURATION: i64 = i32::MAX as i64;

/////////////////////////////////////////// ValidationError ////////////////////////////////////////////

/// A violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent.
    Missing {
        /// The absent field.
        field: String,
    },
    /// A field that must carry text was empty.
    Empty {
        /// The empty field.
        field: String,
    },
    /// A text field exceeded its maximum length.
    TooLong {
        /// The offending field.
        field: String,
        /// Its length in characters.
        chars: usize,
        /// The permitted maximum.
        max: usize,
    },
    /// `duration` was not an integer in `0..=MAX_DURATION`.
    InvalidDuration {
        /// The rejected raw value.
        value: String,
    },
    /// More participants than a podcast may list.
    TooManyParticipants {
        /// Number of participants submitted.
        count: usize,
        /// The permitted maximum.
        max: usize,
    },
    /// One participant name exceeded the maximum length.
    ParticipantTooLong {
        /// Position of the offending participant.
        index: usize,
        /// Its length in characters.
        chars: usize,
        /// The permitted maximum.
        max: usize,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Missing { field } => write!(f, "missing field '{}'", field),
            ValidationError::Empty { field } => write!(f, "field '{}' must not be empty", field),
            ValidationError::TooLong { field, chars, max } => write!(
                f,
                "field '{}' is {} characters long; the limit is {}",
                field, chars, max
            ),
            ValidationError::InvalidDuration { value } => write!(
                f,
                "duration {:?} is not an integer between 0 and {}",
                value, MAX_DURATION
            ),
            ValidationError::TooManyParticipants { count, max } => write!(
                f,
                "{} participants given; at most {} are allowed",
                count, max
            ),
            ValidationError::ParticipantTooLong { index, chars, max } => write!(
                f,
                "participant #{} is {} characters long; the limit is {}",
                index, chars, max
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

////////////////////////////////////////////// FieldSet ////////////////////////////////////////////////

/// The decoded fields of a form submission.
///
/// Duplicate keys collapse into one entry holding the last value submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: BTreeMap<String, String>,
}

impl FieldSet {
    /// Creates an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a field set from decoded key/value pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        FieldSet {
            fields: pairs.into_iter().collect(),
        }
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(Self::from_pairs(pairs))
    }

    /// Adds or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// The raw value of a field, if submitted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The raw value of a field, or a `Missing` error.
    pub fn require(&self, name: &str) -> Result<&str, ValidationError> {
        self.get(name).ok_or_else(|| ValidationError::Missing {
            field: name.to_string(),
        })
    }

    /// The value of a field when it was submitted with non-empty content.
    ///
    /// Updates treat an empty value exactly like an omitted one.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// The submitted field names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields were submitted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when the submitted names equal `expected` as a set.
    pub fn is_exactly(&self, expected: &[&str]) -> bool {
        let expected: BTreeSet<&str> = expected.iter().copied().collect();
        let submitted: BTreeSet<&str> = self.names().collect();
        submitted == expected
    }

    /// The submitted names that are not in `allowed`.
    pub fn unknown_fields<'a>(&'a self, allowed: &[&str]) -> Vec<&'a str> {
        self.names().filter(|n| !allowed.contains(n)).collect()
    }
}

//////////////////////////////////////////////// Rules /////////////////////////////////////////////////

/// Checks a required text field and returns its owned value.
pub fn validate_text(field: &str, value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    let chars = value.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            chars,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(value.to_string())
}

/// Parses a raw duration value.
///
/// Surrounding whitespace is ignored; signs other than a leading `+`, fractions and
/// values beyond [`MAX_DURATION`] are rejected.
pub fn parse_duration(value: &str) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidDuration {
        value: value.to_string(),
    };
    let parsed: i64 = value.trim().parse().map_err(|_| invalid())?;
    check_duration(parsed).map_err(|_| invalid())
}

/// Checks that an already-numeric duration is in range.
pub fn check_duration(duration: i64) -> Result<i64, ValidationError> {
    if (0..=MAX_DURATION).contains(&duration) {
        Ok(duration)
    } else {
        Err(ValidationError::InvalidDuration {
            value: duration.to_string(),
        })
    }
}
