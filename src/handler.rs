//! # Per-Kind Handlers
//!
//! Each audio kind is served by a small handler object implementing [`AudioHandler`].
//! A handler only knows how to turn submitted form fields into that kind's record and how
//! to lay submitted fields over a stored record; the lifecycle operations (create, update,
//! read, list, delete) are provided once, as default methods, in terms of those two hooks
//! and the [`DataStore`].
//!
//! ## Field-set rules
//!
//! - **Create** requires the submitted names to equal the kind's field set exactly.
//! - **Update** accepts any subset of the kind's field set.  Submitted values that are
//!   non-empty replace the stored value; empty values are treated as omitted.  The merged
//!   record is validated as a whole before anything is written.

use async_trait::async_trait;

use crate::validate::{FieldSet, ValidationError, parse_duration};
use crate::{
    AudioFields, AudioKind, Audiobook, CatalogError, DataStore, DataStoreError, Participants,
    Podcast, Song, StoredAudio,
};

/// Validation and persistence rules for one audio kind.
#[async_trait]
pub trait AudioHandler: Send + Sync {
    /// The kind this handler serves.
    fn kind(&self) -> AudioKind;

    /// Turns a complete field set into a record without checking bounds.
    ///
    /// Fails only when a field is missing or cannot be parsed at all.
    fn parse(&self, fields: &FieldSet) -> Result<AudioFields, ValidationError>;

    /// Lays the non-empty submitted values over `current`.
    fn merge(&self, current: AudioFields, fields: &FieldSet)
    -> Result<AudioFields, CatalogError>;

    /// The field names this kind accepts.
    fn fields(&self) -> &'static [&'static str] {
        self.kind().fields()
    }

    /// Parses and checks a complete field set.
    fn validate(&self, fields: &FieldSet) -> Result<AudioFields, ValidationError> {
        let record = self.parse(fields)?;
        record.validate()?;
        Ok(record)
    }

    /// Validates a create submission and stores it, returning the new id.
    async fn create(&self, store: &dyn DataStore, fields: &FieldSet) -> Result<i64, CatalogError> {
        if !fields.is_exactly(self.fields()) {
            return Err(CatalogError::MalformedRequest(format!(
                "{} create expects exactly {:?}, got {:?}",
                self.kind(),
                self.fields(),
                fields.names().collect::<Vec<_>>()
            )));
        }
        let record = self.validate(fields)?;
        let id = store.insert(&record).await?;
        tracing::info!(kind = %self.kind(), id, "created");
        Ok(id)
    }

    /// Merges an update submission into the stored record and writes it back.
    async fn update(
        &self,
        store: &dyn DataStore,
        id: i64,
        fields: &FieldSet,
    ) -> Result<(), CatalogError> {
        let unknown = fields.unknown_fields(self.fields());
        if !unknown.is_empty() {
            return Err(CatalogError::MalformedRequest(format!(
                "{} update does not accept {:?}",
                self.kind(),
                unknown
            )));
        }
        let current = self.read(store, id).await?;
        let merged = self.merge(current.fields, fields)?;
        merged.validate()?;
        if !store.update(id, &merged).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(kind = %self.kind(), id, "updated");
        Ok(())
    }

    /// Fetches one record.
    async fn read(&self, store: &dyn DataStore, id: i64) -> Result<StoredAudio, CatalogError> {
        store
            .get(self.kind(), id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    /// Fetches every record of this kind in creation order.
    async fn list(&self, store: &dyn DataStore) -> Result<Vec<StoredAudio>, CatalogError> {
        Ok(store.list(self.kind()).await?)
    }

    /// Removes one record.
    async fn delete(&self, store: &dyn DataStore, id: i64) -> Result<(), CatalogError> {
        if !store.delete(self.kind(), id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(kind = %self.kind(), id, "deleted");
        Ok(())
    }
}

fn wrong_kind(expected: AudioKind, found: &AudioFields) -> CatalogError {
    CatalogError::Internal(DataStoreError::Internal(format!(
        "store returned a {} record for a {} lookup",
        found.kind(),
        expected
    )))
}

fn replace_text(target: &mut String, fields: &FieldSet, name: &str) {
    if let Some(value) = fields.non_empty(name) {
        *target = value.to_string();
    }
}

fn replace_duration(target: &mut i64, fields: &FieldSet) -> Result<(), ValidationError> {
    if let Some(value) = fields.non_empty("duration") {
        *target = parse_duration(value)?;
    }
    Ok(())
}

///////////////////////////////////////////////// Song /////////////////////////////////////////////////

/// Handler for [`Song`] records.
pub struct SongHandler;

#[async_trait]
impl AudioHandler for SongHandler {
    fn kind(&self) -> AudioKind {
        AudioKind::Song
    }

    fn parse(&self, fields: &FieldSet) -> Result<AudioFields, ValidationError> {
        Ok(Song {
            name: fields.require("name")?.to_string(),
            duration: parse_duration(fields.require("duration")?)?,
        }
        .into())
    }

    fn merge(
        &self,
        current: AudioFields,
        fields: &FieldSet,
    ) -> Result<AudioFields, CatalogError> {
        let mut song = match current {
            AudioFields::Song(song) => song,
            other => return Err(wrong_kind(self.kind(), &other)),
        };
        replace_text(&mut song.name, fields, "name");
        replace_duration(&mut song.duration, fields)?;
        Ok(song.into())
    }
}

/////////////////////////////////////////////// Podcast ////////////////////////////////////////////////

/// Handler for [`Podcast`] records.
///
/// `participants` is submitted as one comma-separated value.
pub struct PodcastHandler;

#[async_trait]
impl AudioHandler for PodcastHandler {
    fn kind(&self) -> AudioKind {
        AudioKind::Podcast
    }

    fn parse(&self, fields: &FieldSet) -> Result<AudioFields, ValidationError> {
        Ok(Podcast {
            name: fields.require("name")?.to_string(),
            duration: parse_duration(fields.require("duration")?)?,
            host: fields.require("host")?.to_string(),
            participants: Participants::parse(fields.require("participants")?),
        }
        .into())
    }

    fn merge(
        &self,
        current: AudioFields,
        fields: &FieldSet,
    ) -> Result<AudioFields, CatalogError> {
        let mut podcast = match current {
            AudioFields::Podcast(podcast) => podcast,
            other => return Err(wrong_kind(self.kind(), &other)),
        };
        replace_text(&mut podcast.name, fields, "name");
        replace_duration(&mut podcast.duration, fields)?;
        replace_text(&mut podcast.host, fields, "host");
        if let Some(value) = fields.non_empty("participants") {
            podcast.participants = Participants::parse(value);
        }
        Ok(podcast.into())
    }
}

////////////////////////////////////////////// Audiobook ///////////////////////////////////////////////

/// Handler for [`Audiobook`] records.
pub struct AudiobookHandler;

#[async_trait]
impl AudioHandler for AudiobookHandler {
    fn kind(&self) -> AudioKind {
        AudioKind::Audiobook
    }

    fn parse(&self, fields: &FieldSet) -> Result<AudioFields, ValidationError> {
        Ok(Audiobook {
            title: fields.require("title")?.to_string(),
            author: fields.require("author")?.to_string(),
            narrator: fields.require("narrator")?.to_string(),
            duration: parse_duration(fields.require("duration")?)?,
        }
        .into())
    }

    fn merge(
        &self,
        current: AudioFields,
        fields: &FieldSet,
    ) -> Result<AudioFields, CatalogError> {
        let mut book = match current {
            AudioFields::Audiobook(book) => book,
            other => return Err(wrong_kind(self.kind(), &other)),
        };
        replace_text(&mut book.title, fields, "title");
        replace_text(&mut book.author, fields, "author");
        replace_text(&mut book.narrator, fields, "narrator");
        replace_duration(&mut book.duration, fields)?;
        Ok(book.into())
    }
}
