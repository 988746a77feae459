//! Request dispatch: turns a parsed request into a store operation through the handler
//! registered for its kind.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::{AudioHandler, AudiobookHandler, PodcastHandler, SongHandler};
use crate::validate::FieldSet;
use crate::{AudioKind, CatalogError, DataStore, StoredAudio};

/// The lifecycle operation a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a new record from a complete field set.
    Create,
    /// Update the record with the given id.
    Update(i64),
    /// Read the record with the given id.
    ReadOne(i64),
    /// Read every record of the kind.
    ReadAll,
    /// Delete the record with the given id.
    Delete(i64),
}

/// A transport-neutral request against the catalog.
///
/// `kind` is the raw token from the path; it is resolved by [`Dispatcher::dispatch`] so
/// that an unknown kind fails the same way as any other bad request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub operation: Operation,
    pub kind: String,
    pub fields: FieldSet,
}

impl CatalogRequest {
    pub fn new(operation: Operation, kind: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            operation,
            kind: kind.into(),
            fields,
        }
    }
}

/// What a successful request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { kind: AudioKind, id: i64 },
    Updated { kind: AudioKind },
    Deleted { kind: AudioKind },
    Found(StoredAudio),
    Listed(Vec<StoredAudio>),
}

/// Routes requests to per-kind handlers over a shared store.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn DataStore>,
    handlers: Arc<HashMap<AudioKind, Box<dyn AudioHandler>>>,
}

impl Dispatcher {
    /// Creates a dispatcher with a handler for every [`AudioKind`].
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        let mut handlers: HashMap<AudioKind, Box<dyn AudioHandler>> = HashMap::new();
        handlers.insert(AudioKind::Song, Box::new(SongHandler));
        handlers.insert(AudioKind::Podcast, Box::new(PodcastHandler));
        handlers.insert(AudioKind::Audiobook, Box::new(AudiobookHandler));
        Self {
            store,
            handlers: Arc::new(handlers),
        }
    }

    /// The store requests are served from.
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    fn handler(&self, token: &str) -> Result<&dyn AudioHandler, CatalogError> {
        let kind: AudioKind = token
            .parse()
            .map_err(|_| CatalogError::UnknownKind(token.to_string()))?;
        self.handlers
            .get(&kind)
            .map(|h| h.as_ref())
            .ok_or_else(|| CatalogError::UnknownKind(token.to_string()))
    }

    /// Executes `request`, logging every failure.
    ///
    /// Client errors are logged at debug level; anything else at error level.
    pub async fn dispatch(&self, request: CatalogRequest) -> Result<Outcome, CatalogError> {
        let result = self.execute(&request).await;
        if let Err(err) = &result {
            if err.is_client_error() {
                tracing::debug!(
                    operation = ?request.operation,
                    kind = %request.kind,
                    category = err.category(),
                    "rejected request: {}",
                    err
                );
            } else {
                tracing::error!(
                    operation = ?request.operation,
                    kind = %request.kind,
                    "request failed: {}",
                    err
                );
            }
        }
        result
    }

    async fn execute(&self, request: &CatalogRequest) -> Result<Outcome, CatalogError> {
        let handler = self.handler(&request.kind)?;
        let kind = handler.kind();
        let store = self.store.as_ref();
        match request.operation {
            Operation::Create => {
                let id = handler.create(store, &request.fields).await?;
                Ok(Outcome::Created { kind, id })
            }
            Operation::Update(id) => {
                handler.update(store, id, &request.fields).await?;
                Ok(Outcome::Updated { kind })
            }
            Operation::ReadOne(id) => Ok(Outcome::Found(handler.read(store, id).await?)),
            Operation::ReadAll => Ok(Outcome::Listed(handler.list(store).await?)),
            Operation::Delete(id) => {
                handler.delete(store, id).await?;
                Ok(Outcome::Deleted { kind })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryDataStore;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(InMemoryDataStore::new()))
    }

    fn song_fields(name: &str, duration: &str) -> FieldSet {
        FieldSet::from_pairs([
            ("name".to_string(), name.to_string()),
            ("duration".to_string(), duration.to_string()),
        ])
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let d = dispatcher();
        let result = d
            .dispatch(CatalogRequest::new(Operation::ReadAll, "invalidtype", FieldSet::new()))
            .await;
        assert_eq!(
            result,
            Err(CatalogError::UnknownKind("invalidtype".to_string()))
        );
    }

    #[tokio::test]
    async fn kind_token_is_case_insensitive() {
        let d = dispatcher();
        let outcome = d
            .dispatch(CatalogRequest::new(
                Operation::Create,
                "Song",
                song_fields("song1", "100"),
            ))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Created {
                kind: AudioKind::Song,
                id: 1
            }
        );
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let d = dispatcher();
        let created = d
            .dispatch(CatalogRequest::new(
                Operation::Create,
                "song",
                song_fields("song1", "100"),
            ))
            .await
            .unwrap();
        let Outcome::Created { id, .. } = created else {
            panic!("unexpected outcome {:?}", created);
        };

        let updated = d
            .dispatch(CatalogRequest::new(
                Operation::Update(id),
                "song",
                song_fields("", "300"),
            ))
            .await
            .unwrap();
        assert_eq!(
            updated,
            Outcome::Updated {
                kind: AudioKind::Song
            }
        );

        let Outcome::Found(record) = d
            .dispatch(CatalogRequest::new(Operation::ReadOne(id), "song", FieldSet::new()))
            .await
            .unwrap()
        else {
            panic!("expected a single record");
        };
        assert_eq!(record.id, id);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"id": id, "name": "song1", "duration": 300})
        );

        let deleted = d
            .dispatch(CatalogRequest::new(Operation::Delete(id), "song", FieldSet::new()))
            .await
            .unwrap();
        assert_eq!(
            deleted,
            Outcome::Deleted {
                kind: AudioKind::Song
            }
        );

        let listed = d
            .dispatch(CatalogRequest::new(Operation::ReadAll, "song", FieldSet::new()))
            .await
            .unwrap();
        assert_eq!(listed, Outcome::Listed(Vec::new()));
    }

    #[tokio::test]
    async fn reads_are_scoped_to_kind() {
        let d = dispatcher();
        d.dispatch(CatalogRequest::new(
            Operation::Create,
            "song",
            song_fields("song1", "100"),
        ))
        .await
        .unwrap();
        let result = d
            .dispatch(CatalogRequest::new(Operation::ReadOne(1), "podcast", FieldSet::new()))
            .await;
        assert_eq!(result, Err(CatalogError::NotFound));
    }
}
