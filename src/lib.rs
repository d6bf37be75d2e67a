//! # rip - fluent REST calls over JSON
//!
//! `rip` builds HTTP calls out of immutable [`Client`] values. Each method
//! returns a new client, so a configured base can be reused for any number of
//! calls. Dispatching returns a [`Response`] that carries the body, status,
//! headers and any error, and that can replay the same call.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rip::Client;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! struct Product {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Client::with_base_url("http://localhost/api/v1")
//!         .with_header("Token", "secret")
//!         .with_append_slash(true);
//!
//!     let mut product = Product::default();
//!     let mut status = 0u16;
//!
//!     // GET http://localhost/api/v1/product/1/
//!     let response = api.get(["product", "1"]).send(&mut [&mut product]).await;
//!     match response.status_into(&mut status).error() {
//!         None => println!("{} {}: {}", status, product.id, product.name),
//!         Some(e) => eprintln!("call failed: {}", e),
//!     }
//! }
//! ```
//!
//! ## Errors
//!
//! Nothing in the public API panics or returns early on a bad call. Problems
//! while configuring a client are recorded and exposed by
//! [`Client::config_error`], or turned into an `Err` by [`Client::validate`].
//! Problems while dispatching land in [`Response::error`].
//!
//! ## Replay
//!
//! There is no automatic retry. A response remembers the client that made it,
//! so the caller decides when to try again:
//!
//! ```no_run
//! # async fn example() {
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let mut response = rip::Client::with_base_url("http://localhost/")
//!     .get(["health"])
//!     .call(&cancel, &mut [])
//!     .await;
//!
//! for _ in 0..3 {
//!     if !response.is_replayable() {
//!         break;
//!     }
//!     response = response.replay(&cancel, &mut []).await;
//! }
//! # }
//! ```

mod client;
mod error;
mod path;
mod payload;
mod query;
mod response;
pub mod transport;

pub use client::{BeforeSend, Client, DEFAULT_USER_AGENT};
pub use error::{Error, Result};
pub use path::NO_PATH;
pub use payload::Payload;
pub use query::QueryValues;
pub use response::{Decode, Response};
pub use transport::{Transport, TransportFactory};
