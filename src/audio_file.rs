use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, check_duration, validate_text};
use crate::{AudioKind, Participants};

///////////////////////////////////////////////// Song /////////////////////////////////////////////////

/// The stored fields of a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Song name.
    pub name: String,
    /// Duration in seconds.
    pub duration: i64,
}

impl Song {
    /// Checks every field constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("name", &self.name)?;
        check_duration(self.duration)?;
        Ok(())
    }
}

/////////////////////////////////////////////// Podcast ////////////////////////////////////////////////

/// The stored fields of a podcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    /// Podcast name.
    pub name: String,
    /// Duration in seconds.
    pub duration: i64,
    /// Host of the episode.
    pub host: String,
    /// Guests, in the order they were submitted.
    pub participants: Participants,
}

impl Podcast {
    /// Checks every field constraint, participants included.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("name", &self.name)?;
        check_duration(self.duration)?;
        validate_text("host", &self.host)?;
        self.participants.validate()
    }
}

////////////////////////////////////////////// Audiobook ///////////////////////////////////////////////

/// The stored fields of an audiobook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audiobook {
    /// Book title.
    pub title: String,
    /// Author of the book.
    pub author: String,
    /// Narrator of the recording.
    pub narrator: String,
    /// Duration in seconds.
    pub duration: i64,
}

impl Audiobook {
    /// Checks every field constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("title", &self.title)?;
        validate_text("author", &self.author)?;
        validate_text("narrator", &self.narrator)?;
        check_duration(self.duration)?;
        Ok(())
    }
}

////////////////////////////////////////////// AudioFields /////////////////////////////////////////////

/// The fields of any catalog entry, tagged by kind.
///
/// Serializes as the bare field structure of the inner record, so a podcast's
/// participants come out as an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AudioFields {
    /// Song fields.
    Song(Song),
    /// Podcast fields.
    Podcast(Podcast),
    /// Audiobook fields.
    Audiobook(Audiobook),
}

impl AudioFields {
    /// The kind these fields belong to.
    pub fn kind(&self) -> AudioKind {
        match self {
            AudioFields::Song(_) => AudioKind::Song,
            AudioFields::Podcast(_) => AudioKind::Podcast,
            AudioFields::Audiobook(_) => AudioKind::Audiobook,
        }
    }

    /// Checks every field constraint of the inner record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            AudioFields::Song(song) => song.validate(),
            AudioFields::Podcast(podcast) => podcast.validate(),
            AudioFields::Audiobook(audiobook) => audiobook.validate(),
        }
    }
}

impl From<Song> for AudioFields {
    fn from(song: Song) -> Self {
        AudioFields::Song(song)
    }
}

impl From<Podcast> for AudioFields {
    fn from(podcast: Podcast) -> Self {
        AudioFields::Podcast(podcast)
    }
}

impl From<Audiobook> for AudioFields {
    fn from(audiobook: Audiobook) -> Self {
        AudioFields::Audiobook(audiobook)
    }
}

////////////////////////////////////////////// StoredAudio /////////////////////////////////////////////

/// A catalog entry as held by a [`crate::DataStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAudio {
    /// Store-assigned identifier; never reused.
    pub id: i64,
    /// When the entry was created.
    #[serde(skip)]
    pub uploaded_time: DateTime<Utc>,
    /// The entry's fields.
    #[serde(flatten)]
    pub fields: AudioFields,
}

impl StoredAudio {
    /// The kind of the stored entry.
    pub fn kind(&self) -> AudioKind {
        self.fields.kind()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn podcast() -> Podcast {
        Podcast {
            name: "podcast1".to_string(),
            duration: 500,
            host: "host1".to_string(),
            participants: Participants::parse("p1, p2"),
        }
    }

    #[test]
    fn stored_song_serializes_flat_without_timestamp() {
        let stored = StoredAudio {
            id: 7,
            uploaded_time: Utc::now(),
            fields: Song {
                name: "song1".to_string(),
                duration: 100,
            }
            .into(),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value, json!({"id": 7, "name": "song1", "duration": 100}));
    }

    #[test]
    fn stored_podcast_exposes_participants_as_array() {
        let stored = StoredAudio {
            id: 2,
            uploaded_time: Utc::now(),
            fields: podcast().into(),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 2,
                "name": "podcast1",
                "duration": 500,
                "host": "host1",
                "participants": ["p1", "p2"],
            })
        );
    }

    #[test]
    fn audiobook_requires_every_text_field() {
        let mut book = Audiobook {
            title: "t".to_string(),
            author: "a".to_string(),
            narrator: "n".to_string(),
            duration: 1000,
        };
        assert!(book.validate().is_ok());
        book.narrator.clear();
        assert_eq!(
            book.validate(),
            Err(ValidationError::Empty {
                field: "narrator".to_string()
            })
        );
    }

    #[test]
    fn podcast_validation_covers_participants() {
        let mut p = podcast();
        assert!(p.validate().is_ok());
        p.participants = Participants::new(vec!["x".to_string(); 11]);
        assert!(matches!(
            p.validate(),
            Err(ValidationError::TooManyParticipants { .. })
        ));
    }

    #[test]
    fn kind_follows_variant() {
        let fields: AudioFields = podcast().into();
        assert_eq!(fields.kind(), AudioKind::Podcast);
    }
}
