//! Outgoing request bodies.

use crate::{Error, Result};
use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::io::Read;

/// Data accepted by [`Client::with_data`](crate::Client::with_data).
///
/// Bytes and text are sent verbatim, a reader is drained once when the data is
/// set, and JSON values are serialized.
///
/// # Examples
///
/// ```
/// use rip::{Client, Payload};
/// use serde_json::json;
///
/// let client = Client::with_base_url("http://localhost/");
///
/// let raw = client.with_data("plain text");
/// let json = client.with_data(json!({ "name": "Alice" }));
/// let stream = client.with_data(Payload::reader(&b"streamed"[..]));
///
/// assert_eq!(raw.body(), b"plain text");
/// assert_eq!(json.body(), br#"{"name":"Alice"}"#);
/// assert_eq!(stream.body(), b"streamed");
/// ```
pub enum Payload {
    /// Raw bytes.
    Bytes(Bytes),
    /// Text, sent as its UTF-8 bytes.
    Text(String),
    /// A stream read to the end.
    Reader(Box<dyn Read + Send>),
    /// A JSON document.
    Json(serde_json::Value),
}

impl Payload {
    /// Wraps a reader.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Payload::Reader(Box::new(reader))
    }

    /// Serializes any value into a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    /// Converts the payload into the bytes sent on the wire.
    pub(crate) fn into_bytes(self) -> Result<Bytes> {
        match self {
            Payload::Bytes(bytes) => Ok(bytes),
            Payload::Text(text) => Ok(Bytes::from(text)),
            Payload::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader
                    .read_to_end(&mut buf)
                    .map_err(|e| Error::SerializationFailed(format!("reading body: {}", e)))?;
                Ok(Bytes::from(buf))
            }
            Payload::Json(value) => serde_json::to_vec(&value)
                .map(Bytes::from)
                .map_err(|e| Error::SerializationFailed(e.to_string())),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Payload::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Payload::Reader(_) => f.write_str("Reader(..)"),
            Payload::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}
