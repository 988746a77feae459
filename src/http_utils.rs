use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt;

use crate::{AudioKind, cli_utils};

#[derive(Debug)]
pub struct HttpError {
    status: u16,
    message: String,
}

impl HttpError {
    /// HTTP status code returned by the server.
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status)
    }
}

impl Error for HttpError {}

/// Client for the catalog's form-based HTTP API.
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full URL from a path, keeping the trailing slash the server requires.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        format!("{}/{}/", self.base_url, path)
    }

    /// Creates a record; returns the server's confirmation text.
    pub async fn create(
        &self,
        kind: AudioKind,
        fields: &[(String, String)],
    ) -> Result<String, Box<dyn Error>> {
        self.post_form(&format!("create/{}", kind), fields).await
    }

    /// Updates a record; returns the server's confirmation text.
    pub async fn update(
        &self,
        kind: AudioKind,
        id: i64,
        fields: &[(String, String)],
    ) -> Result<String, Box<dyn Error>> {
        self.post_form(&format!("update/{}/{}", kind, id), fields)
            .await
    }

    /// Deletes a record; returns the server's confirmation text.
    pub async fn delete(&self, kind: AudioKind, id: i64) -> Result<String, Box<dyn Error>> {
        self.post_form(&format!("delete/{}/{}", kind, id), &[]).await
    }

    /// Reads one record.
    pub async fn read<T>(&self, kind: AudioKind, id: i64) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        self.get(&format!("read/{}/{}", kind, id)).await
    }

    /// Reads every record of a kind.
    pub async fn list<T>(&self, kind: AudioKind) -> Result<Vec<T>, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        self.get(&format!("read/{}", kind)).await
    }

    /// Makes a GET request and deserializes the JSON response
    pub async fn get<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Makes a form-encoded POST request and returns the response text
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(String, String)],
    ) -> Result<String, Box<dyn Error>> {
        let url = self.url(path);
        let response = self.client.post(&url).form(fields).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn check_status(response: Response) -> Result<Response, Box<dyn Error>> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let error = response.text().await.unwrap_or_default();
        let message = if error.is_empty() {
            "No error details".to_string()
        } else {
            error
        };
        Err(Box::new(HttpError { status, message }))
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, Box<dyn Error>>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}
