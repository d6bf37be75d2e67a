//! Pluggable transports.
//!
//! A [`Client`](crate::Client) does not own a connection. It holds a
//! [`TransportFactory`] and asks it for a transport on every dispatch, so one
//! configuration can be shared by many tasks without sharing connection state.
//! Pooling, if wanted, lives inside the factory.

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Performs one HTTP request.
///
/// Implemented for [`reqwest::Client`]. Custom transports can build their
/// responses from an [`http::Response`], which reqwest converts into a
/// [`reqwest::Response`].
///
/// # Implementing the trait
///
/// ```
/// use async_trait::async_trait;
/// use rip::Transport;
///
/// struct Canned;
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn perform(&self, _request: reqwest::Request) -> rip::Result<reqwest::Response> {
///         let response = http::Response::builder()
///             .status(200)
///             .body(r#"{"status":"success"}"#)
///             .expect("static response");
///         Ok(response.into())
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response with its body unread.
    async fn perform(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn perform(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        Ok(self.execute(request).await?)
    }
}

/// Produces a transport for a single dispatch.
pub type TransportFactory = Arc<dyn Fn() -> Arc<dyn Transport> + Send + Sync>;

/// A factory that builds a new `reqwest::Client` for every dispatch.
pub(crate) fn fresh_reqwest() -> TransportFactory {
    Arc::new(|| Arc::new(reqwest::Client::new()) as Arc<dyn Transport>)
}

/// A factory that hands out clones of one pooled `reqwest::Client`.
pub(crate) fn shared_reqwest(client: reqwest::Client) -> TransportFactory {
    Arc::new(move || Arc::new(client.clone()) as Arc<dyn Transport>)
}
