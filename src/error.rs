//! Error types for REST calls.
//!
//! Errors never cross the public API as panics. Configuration problems are
//! recorded on the [`Client`](crate::Client) and dispatch problems are carried
//! by the [`Response`](crate::Response), so callers check them after the fact.

/// The main error type for REST calls.
///
/// # Examples
///
/// ```no_run
/// use rip::{Client, Error};
///
/// # async fn example() {
/// let client = Client::with_base_url("https://api.example.com");
///
/// let response = client.get(["users", "1"]).send(&mut []).await;
/// match response.error() {
///     None => println!("status {:?}", response.status()),
///     Some(Error::DeserializationFailed { raw_response, serde_error }) => {
///         eprintln!("Failed to deserialize. Raw response: {}", raw_response);
///         eprintln!("Serde error: {}", serde_error);
///     }
///     Some(e) => eprintln!("Other error: {}", e),
/// }
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed,
    /// body could not be read, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The cancellation token fired before the call completed.
    #[error("Request cancelled")]
    Cancelled,

    /// Failed to decode the response body into a target.
    ///
    /// The raw body is kept so the failure can be inspected in production.
    #[error("Failed to deserialize response: {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// Invalid configuration was provided, such as a bad header name.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to turn the outgoing data into a request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// The base URL, or the URL resolved from it, is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The client has no base URL to resolve paths against.
    #[error("No base URL configured")]
    MissingBaseUrl,
}

impl Error {
    /// Returns `true` if replaying the same call might succeed.
    ///
    /// Network failures are retryable. Cancellation, configuration and
    /// decoding failures will fail the same way again.
    ///
    /// # Examples
    ///
    /// ```
    /// use rip::Error;
    ///
    /// assert!(!Error::Cancelled.is_retryable());
    /// assert!(!Error::MissingBaseUrl.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(e) => !e.is_builder(),
            Error::Cancelled => false,
            Error::DeserializationFailed { .. } => false,
            Error::ConfigurationError(_) => false,
            Error::SerializationFailed(_) => false,
            Error::InvalidUrl(_) => false,
            Error::MissingBaseUrl => false,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    pub(crate) fn deserialization(body: &[u8], err: serde_json::Error) -> Self {
        Error::DeserializationFailed {
            raw_response: String::from_utf8_lossy(body).into_owned(),
            serde_error: err.to_string(),
        }
    }
}

/// A specialized `Result` type for REST calls.
pub type Result<T> = std::result::Result<T, Error>;
