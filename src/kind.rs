use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

////////////////////////////////////////////// AudioKind ///////////////////////////////////////////////

/// The three catalog entity kinds.
///
/// Kinds are addressed on the wire by a case-insensitive token: `song`, `podcast` or
/// `audiobook`.  Every other token is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    /// A song: name and duration.
    Song,
    /// A podcast: name, duration, host and participants.
    Podcast,
    /// An audiobook: title, author, narrator and duration.
    Audiobook,
}

impl AudioKind {
    /// All kinds, in a stable order.
    pub const ALL: [AudioKind; 3] = [AudioKind::Song, AudioKind::Podcast, AudioKind::Audiobook];

    /// The lowercase wire token for this kind.
    pub fn token(&self) -> &'static str {
        match self {
            AudioKind::Song => "song",
            AudioKind::Podcast => "podcast",
            AudioKind::Audiobook => "audiobook",
        }
    }

    /// The capitalized name used in confirmation messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            AudioKind::Song => "Song",
            AudioKind::Podcast => "Podcast",
            AudioKind::Audiobook => "Audiobook",
        }
    }

    /// The complete field set a create request must carry, and the only fields an
    /// update request may carry.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            AudioKind::Song => &["name", "duration"],
            AudioKind::Podcast => &["name", "duration", "host", "participants"],
            AudioKind::Audiobook => &["title", "author", "narrator", "duration"],
        }
    }
}

impl Display for AudioKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.token())
    }
}

/// Error returned when a path segment does not name a known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioKindParseError {
    token: String,
}

impl AudioKindParseError {
    /// The token that failed to parse.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Display for AudioKindParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "unknown audio kind {:?}; expected song, podcast or audiobook",
            self.token
        )
    }
}

impl std::error::Error for AudioKindParseError {}

impl FromStr for AudioKind {
    type Err = AudioKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "song" => Ok(AudioKind::Song),
            "podcast" => Ok(AudioKind::Podcast),
            "audiobook" => Ok(AudioKind::Audiobook),
            _ => Err(AudioKindParseError {
                token: s.to_string(),
            }),
        }
    }
}
