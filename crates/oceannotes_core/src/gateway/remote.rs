//! Remote note backend over an HTTP/JSON API.
//!
//! # Responsibility
//! - Map gateway calls onto `GET|POST|PUT|DELETE {base}/notes[/{id}]`.
//! - Convert non-success statuses into `GatewayError::Request`.
//!
//! # Invariants
//! - Ids, timestamps and merge semantics are owned by the server; responses
//!   are trusted as returned.
//! - Ids are percent-encoded as a single path segment.
//! - Every request carries `Content-Type: application/json`.

use super::{log_call, BackendKind, GatewayError, GatewayResult, NoteGateway};
use crate::model::note::{NewNote, Note, NoteUpdate};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

const NOTES_SEGMENT: &str = "notes";

/// Gateway talking to a notes HTTP API.
#[derive(Clone)]
pub struct RemoteGateway {
    client: Client,
    base_url: Url,
}

impl RemoteGateway {
    /// Builds a client for `base_url`, e.g. `https://notes.example.com/api`.
    ///
    /// # Errors
    /// - `Config` when the URL cannot be parsed or cannot carry a path.
    /// - `Transport` when the HTTP client cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let trimmed = base_url.trim();
        let base_url = Url::parse(trimmed)
            .map_err(|err| GatewayError::Config(format!("invalid api base url `{trimmed}`: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Config(format!(
                "api base url `{trimmed}` cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Resolves `{base}/notes` or `{base}/notes/{id}`.
    fn notes_url(&self, id: Option<&str>) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                GatewayError::Config(format!("api base url `{}` cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty().push(NOTES_SEGMENT);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(
            "event=remote_response module=gateway status=error http_status={} body_len={}",
            status.as_u16(),
            body.len()
        );
        Err(GatewayError::Request {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn list_remote(&self) -> GatewayResult<Vec<Note>> {
        let url = self.notes_url(None)?;
        self.send_json(self.client.get(url)).await
    }

    async fn get_remote(&self, id: &str) -> GatewayResult<Option<Note>> {
        let url = self.notes_url(Some(id))?;
        self.send_json(self.client.get(url)).await
    }

    async fn create_remote(&self, input: &NewNote) -> GatewayResult<Note> {
        let url = self.notes_url(None)?;
        self.send_json(self.client.post(url).json(input)).await
    }

    async fn update_remote(&self, id: &str, updates: &NoteUpdate) -> GatewayResult<Note> {
        let url = self.notes_url(Some(id))?;
        self.send_json(self.client.put(url).json(updates)).await
    }

    async fn delete_remote(&self, id: &str) -> GatewayResult<()> {
        let url = self.notes_url(Some(id))?;
        // 200 and 204 both count; any body is ignored.
        self.send(self.client.delete(url)).await.map(|_| ())
    }
}

#[async_trait]
impl NoteGateway for RemoteGateway {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn list(&self) -> GatewayResult<Vec<Note>> {
        let started_at = Instant::now();
        let result = self.list_remote().await;
        log_call("notes_list", BackendKind::Remote, started_at, &result);
        result
    }

    async fn get(&self, id: &str) -> GatewayResult<Option<Note>> {
        let started_at = Instant::now();
        let result = self.get_remote(id).await;
        log_call("note_get", BackendKind::Remote, started_at, &result);
        result
    }

    async fn create(&self, input: NewNote) -> GatewayResult<Note> {
        let started_at = Instant::now();
        let result = self.create_remote(&input).await;
        log_call("note_create", BackendKind::Remote, started_at, &result);
        result
    }

    async fn update(&self, id: &str, updates: NoteUpdate) -> GatewayResult<Note> {
        let started_at = Instant::now();
        let result = self.update_remote(id, &updates).await;
        log_call("note_update", BackendKind::Remote, started_at, &result);
        result
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        let started_at = Instant::now();
        let result = self.delete_remote(id).await;
        log_call("note_delete", BackendKind::Remote, started_at, &result);
        result
    }
}
