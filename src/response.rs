//! The outcome of one dispatch.
//!
//! A [`Response`] is created for every call, replays included. It holds the
//! fully read body, the status and headers when the transport answered, the
//! first error met along the way, and the [`Client`] that produced it.

use crate::{Client, Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// A JSON decoding target.
///
/// Implemented for every `T: DeserializeOwned + Send`, which lets targets of
/// different types travel together in one `&mut [&mut dyn Decode]`.
pub trait Decode: Send {
    /// Replaces `self` with the value decoded from `body`.
    fn decode(&mut self, body: &[u8]) -> serde_json::Result<()>;
}

impl<T: DeserializeOwned + Send> Decode for T {
    fn decode(&mut self, body: &[u8]) -> serde_json::Result<()> {
        *self = serde_json::from_slice(body)?;
        Ok(())
    }
}

/// Wrapper around the outcome of one call.
///
/// Accessors never fail: with no transport response the body is empty, the
/// headers are empty and [`status_into`](Response::status_into) leaves its
/// target alone.
///
/// # Examples
///
/// ```no_run
/// use rip::Client;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Default)]
/// struct Breeds {
///     status: String,
/// }
///
/// # async fn example() {
/// let client = Client::with_base_url("https://dog.ceo/api/");
///
/// let mut breeds = Breeds::default();
/// let mut status = 0u16;
///
/// let response = client.get(["breeds", "list", "all"]).send(&mut [&mut breeds]).await;
/// if response.status_into(&mut status).error().is_none() {
///     println!("{} {}", status, breeds.status);
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Response {
    body: Bytes,
    error: Option<Error>,
    status: Option<StatusCode>,
    headers: HeaderMap,
    client: Client,
}

impl Response {
    pub(crate) fn failed(client: Client, error: Error) -> Self {
        Self {
            body: Bytes::new(),
            error: Some(error),
            status: None,
            headers: HeaderMap::new(),
            client,
        }
    }

    pub(crate) fn received(
        client: Client,
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
        error: Option<Error>,
    ) -> Self {
        Self {
            body,
            error,
            status: Some(status),
            headers,
            client,
        }
    }

    /// Returns the raw response body, empty if nothing was received.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Copies the body into `into`, replacing its contents.
    pub fn raw_into(&self, into: &mut Vec<u8>) -> &Self {
        into.clear();
        into.extend_from_slice(&self.body);
        self
    }

    /// Writes the status code into `status`. No-op without a transport response.
    pub fn status_into(&self, status: &mut u16) -> &Self {
        if let Some(code) = self.status {
            *status = code.as_u16();
        }
        self
    }

    /// Returns the status code, if the transport answered.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the response headers, empty if nothing was received.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Decodes the JSON body into `target`.
    ///
    /// Errors are sticky: once the response carries an error this does
    /// nothing, and a decode failure becomes the response's error.
    pub fn decode_into(mut self, target: &mut dyn Decode) -> Self {
        if self.error.is_some() {
            return self;
        }

        if let Err(e) = target.decode(&self.body) {
            tracing::warn!(
                error = %e,
                body_len = self.body.len(),
                "Failed to deserialize response"
            );
            self.error = Some(Error::deserialization(&self.body, e));
        }

        self
    }

    /// Decodes the JSON body into a new value of type `T`.
    ///
    /// # Errors
    ///
    /// Returns the carried error if there is one, otherwise the decode error.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        if let Some(e) = self.error {
            return Err(e);
        }
        serde_json::from_slice(&self.body).map_err(|e| Error::deserialization(&self.body, e))
    }

    /// Returns the error captured during dispatch or decoding.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Converts into `Ok(self)` when no error was captured.
    pub fn into_result(mut self) -> Result<Self> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }

    /// Returns the client that produced this response.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns `true` if replaying the call may give a different outcome.
    ///
    /// Covers network failures and 5xx or 429 statuses. Nothing is retried
    /// automatically; see [`replay`](Response::replay).
    pub fn is_replayable(&self) -> bool {
        if let Some(e) = &self.error {
            if e.is_retryable() {
                return true;
            }
        }
        match self.status {
            Some(status) => {
                status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
            }
            None => false,
        }
    }

    /// Dispatches the originating client again.
    pub async fn replay(
        &self,
        cancel: &CancellationToken,
        targets: &mut [&mut dyn Decode],
    ) -> Response {
        self.client.call(cancel, targets).await
    }
}
