use std::sync::Arc;

use axum_test::TestServer;
use proptest::prelude::*;
use reqwest::StatusCode;
use serde_json::{Value, json};

use audio_catalog::{
    AudioKind, DataStore, FieldSet, InMemoryDataStore, MAX_PARTICIPANTS, Participants,
    create_catalog_router, parse_duration, validate_text,
};

/// Test infrastructure for property testing the catalog API
pub struct ApiTestServer {
    pub server: TestServer,
    pub data_store: Arc<InMemoryDataStore>,
}

impl Default for ApiTestServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTestServer {
    /// Create a new test server with a fresh in-memory data store
    pub fn new() -> Self {
        let data_store = Arc::new(InMemoryDataStore::new());
        let server = TestServer::new(create_catalog_router(data_store.clone())).unwrap();
        Self { server, data_store }
    }

    async fn create_podcast(&self, participants: &str) -> axum_test::TestResponse {
        self.server
            .post("/create/podcast/")
            .form(&[
                ("name", "podcast"),
                ("duration", "1200"),
                ("host", "host"),
                ("participants", participants),
            ])
            .await
    }
}

/// Property test strategies for generating test data
pub mod strategies {
    use super::*;
    use proptest::collection::vec;
    use proptest::string::string_regex;

    /// A participant name with no commas and no surrounding whitespace
    pub fn participant_strategy() -> impl Strategy<Value = String> {
        string_regex(r"[A-Za-z0-9_.\-]{1,100}").unwrap()
    }

    /// Whitespace that may surround a participant in the submitted list
    pub fn padding_strategy() -> impl Strategy<Value = String> {
        string_regex(r"[ \t]{0,3}").unwrap()
    }

    /// Between one and ten participants, each with its own padding
    pub fn padded_participants_strategy() -> impl Strategy<Value = Vec<(String, String, String)>> {
        vec(
            (
                padding_strategy(),
                participant_strategy(),
                padding_strategy(),
            ),
            1..=MAX_PARTICIPANTS,
        )
    }

    /// A subset of the song field names, as (include name, include duration, extra field)
    pub fn song_field_shape_strategy() -> impl Strategy<Value = (bool, bool, Option<String>)> {
        (
            any::<bool>(),
            any::<bool>(),
            proptest::option::of(string_regex(r"[a-z]{1,12}").unwrap()),
        )
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn participants_roundtrip_trimmed_and_ordered(
        items in strategies::padded_participants_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            let submitted = items
                .iter()
                .map(|(before, name, after)| format!("{}{}{}", before, name, after))
                .collect::<Vec<_>>()
                .join(",");
            let expected: Vec<&str> = items.iter().map(|(_, name, _)| name.as_str()).collect();

            let response = test_server.create_podcast(&submitted).await;
            response.assert_status_ok();

            let record: Value = test_server.server.get("/read/podcast/1/").await.json();
            prop_assert_eq!(&record["participants"], &json!(expected));
            Ok(())
        }).unwrap()
    }

    #[test]
    fn more_than_ten_participants_rejected(
        names in proptest::collection::vec(
            strategies::participant_strategy(),
            (MAX_PARTICIPANTS + 1)..(MAX_PARTICIPANTS * 3),
        )
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            let response = test_server.create_podcast(&names.join(", ")).await;
            prop_assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            prop_assert_eq!(test_server.data_store.count(AudioKind::Podcast).await.unwrap(), 0);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn participant_length_bound_counts_chars(len in 1usize..=150, accented in any::<bool>()) {
        let ch = if accented { 'é' } else { 'e' };
        let name: String = std::iter::repeat_n(ch, len).collect();
        let result = Participants::parse(&format!("first, {}", name)).validate();
        prop_assert_eq!(result.is_ok(), len <= 100);
    }

    #[test]
    fn duration_accepts_exactly_the_positive_i32_range(value in any::<i64>()) {
        let result = parse_duration(&value.to_string());
        let in_range = (0..=i32::MAX as i64).contains(&value);
        prop_assert_eq!(result.is_ok(), in_range);
        if in_range {
            prop_assert_eq!(result.unwrap(), value);
        }
    }

    #[test]
    fn text_fields_bounded_by_char_count(value in "\\PC{0,130}") {
        let chars = value.chars().count();
        let result = validate_text("name", &value);
        prop_assert_eq!(result.is_ok(), (1..=100).contains(&chars));
    }

    #[test]
    fn participants_codec_roundtrip(names in proptest::collection::vec(any::<String>(), 0..12)) {
        let participants = Participants::new(names);
        let stored = participants.encode().unwrap();
        prop_assert_eq!(Participants::decode(&stored).unwrap(), participants);
    }

    #[test]
    fn create_requires_exact_field_set(
        (with_name, with_duration, extra) in strategies::song_field_shape_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            let mut form = Vec::new();
            if with_name {
                form.push(("name".to_string(), "song".to_string()));
            }
            if with_duration {
                form.push(("duration".to_string(), "100".to_string()));
            }
            let mut has_name = with_name;
            let mut has_duration = with_duration;
            let mut has_unknown = false;
            if let Some(extra) = extra {
                match extra.as_str() {
                    "name" => has_name = true,
                    "duration" => has_duration = true,
                    _ => has_unknown = true,
                }
                // "100" is a valid value for either known field.
                form.push((extra, "100".to_string()));
            }
            let exact = FieldSet::from_pairs(form.clone()).is_exactly(AudioKind::Song.fields());
            prop_assert_eq!(exact, has_name && has_duration && !has_unknown);

            let response = test_server.server.post("/create/song/").form(&form).await;
            if exact {
                response.assert_status_ok();
            } else {
                prop_assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            }
            Ok(())
        }).unwrap()
    }

    #[test]
    fn list_length_matches_creations(count in 0usize..12) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            for i in 0..count {
                test_server.server
                    .post("/create/song/")
                    .form(&[("name", format!("song{}", i)), ("duration", i.to_string())])
                    .await
                    .assert_status_ok();
            }
            let records: Vec<Value> = test_server.server.get("/read/song/").await.json();
            prop_assert_eq!(records.len(), count);
            let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
            prop_assert_eq!(ids, (1..=count as i64).collect::<Vec<_>>());
            Ok(())
        }).unwrap()
    }

    #[test]
    fn update_with_subset_leaves_other_fields(
        new_author in "[A-Za-z ]{1,40}",
        new_duration in 0i64..=(i32::MAX as i64),
        touch_author in any::<bool>(),
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            test_server.server
                .post("/create/audiobook/")
                .form(&[
                    ("title", "title"),
                    ("author", "author"),
                    ("narrator", "narrator"),
                    ("duration", "10"),
                ])
                .await
                .assert_status_ok();

            let mut form = vec![("duration".to_string(), new_duration.to_string())];
            if touch_author {
                form.push(("author".to_string(), new_author.clone()));
            }
            test_server.server
                .post("/update/audiobook/1/")
                .form(&form)
                .await
                .assert_status_ok();

            let record: Value = test_server.server.get("/read/audiobook/1/").await.json();
            let expected_author = if touch_author {
                new_author.as_str()
            } else {
                "author"
            };
            prop_assert_eq!(&record["title"], "title");
            prop_assert_eq!(&record["narrator"], "narrator");
            prop_assert_eq!(&record["author"], expected_author);
            prop_assert_eq!(&record["duration"], &json!(new_duration));
            Ok(())
        }).unwrap()
    }
}
