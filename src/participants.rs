//! # Podcast Participants
//!
//! Podcast participants travel as a single comma-separated form value and are stored as a
//! single text column.  This module owns both representations so that neither the
//! dispatcher nor the store needs to know how the list is laid out.
//!
//! The stored form is a JSON array of strings.  Decoding a stored value yields exactly the
//! sequence that was encoded: no reordering, no deduplication, no filtering of empty items.
//!
//! ```rust
//! use audio_catalog::Participants;
//!
//! let participants = Participants::parse(" alice , bob,carol ");
//! assert_eq!(participants.as_slice(), &["alice", "bob", "carol"]);
//!
//! let stored = participants.encode().unwrap();
//! assert_eq!(stored, r#"["alice","bob","carol"]"#);
//! assert_eq!(Participants::decode(&stored).unwrap(), participants);
//! ```

use serde::{Deserialize, Serialize};

use crate::validate::{MAX_TEXT_CHARS, ValidationError};

/// Upper bound on the number of participants a podcast may list.
pub const MAX_PARTICIPANTS: usize = 10;

/// Ordered list of podcast participant names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participants(Vec<String>);

impl Participants {
    /// Wraps an already-split list without trimming it.
    pub fn new(names: Vec<String>) -> Self {
        Participants(names)
    }

    /// Splits a comma-separated form value and trims whitespace around every item.
    ///
    /// Parsing never fails; bounds are checked by [`Participants::validate`].
    pub fn parse(input: &str) -> Self {
        Participants(input.split(',').map(|p| p.trim().to_string()).collect())
    }

    /// Checks the participant count and the length of every item.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.0.len() > MAX_PARTICIPANTS {
            return Err(ValidationError::TooManyParticipants {
                count: self.0.len(),
                max: MAX_PARTICIPANTS,
            });
        }
        for (index, name) in self.0.iter().enumerate() {
            let chars = name.chars().count();
            if chars > MAX_TEXT_CHARS {
                return Err(ValidationError::ParticipantTooLong {
                    index,
                    chars,
                    max: MAX_TEXT_CHARS,
                });
            }
        }
        Ok(())
    }

    /// Serializes the list into its storage form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    /// Restores a list from its storage form.
    pub fn decode(stored: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(stored).map(Participants)
    }

    /// The participant names in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the list holds no names at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_each_item() {
        let p = Participants::parse("participant1, participant2 ,  participant3");
        assert_eq!(
            p.as_slice(),
            &["participant1", "participant2", "participant3"]
        );
    }

    #[test]
    fn parse_keeps_order_and_duplicates() {
        let p = Participants::parse("b,a,b");
        assert_eq!(p.as_slice(), &["b", "a", "b"]);
    }

    #[test]
    fn parse_empty_input_yields_one_empty_item() {
        let p = Participants::parse("");
        assert_eq!(p.as_slice(), &[""]);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn ten_items_of_max_length_are_valid() {
        let p = Participants::new(vec!["a".repeat(100); 10]);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn eleven_items_are_rejected() {
        let p = Participants::new(vec!["a".to_string(); 11]);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::TooManyParticipants { count: 11, max: 10 })
        ));
    }

    #[test]
    fn long_item_is_rejected_with_its_index() {
        let mut names = vec!["a".repeat(100); 9];
        names.push("a".repeat(101));
        let p = Participants::new(names);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::ParticipantTooLong { index: 9, chars: 101, .. })
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let p = Participants::new(vec!["é".repeat(100)]);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn decode_restores_encoded_list() {
        let p = Participants::parse("x, \"quoted\", y\\z");
        let stored = p.encode().unwrap();
        assert_eq!(Participants::decode(&stored).unwrap(), p);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Participants::decode("not json").is_err());
        assert!(Participants::decode("[1, 2]").is_err());
    }
}
