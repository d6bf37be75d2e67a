//! The immutable request builder.
//!
//! [`Client`] is a plain value. Every `with_*` method and every verb method
//! borrows the receiver and returns a new client, so a shared prefix can be
//! branched into any number of independent calls.

use crate::{
    path,
    payload::Payload,
    query::QueryValues,
    response::{Decode, Response},
    transport::{self, Transport, TransportFactory},
    Error, Result,
};
use bytes::Bytes;
use http::{header::USER_AGENT, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::fmt::{self, Display};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// User agent sent unless [`Client::with_user_agent`] overrides it.
pub const DEFAULT_USER_AGENT: &str = "rip-1.0";

/// Hook run on the built request right before it is handed to the transport.
pub type BeforeSend = Arc<dyn Fn(&mut reqwest::Request) + Send + Sync>;

/// A fluent, immutable description of one REST call.
///
/// # Examples
///
/// ```no_run
/// use rip::Client;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct CreateProduct {
///     name: String,
/// }
///
/// #[derive(Deserialize, Default)]
/// struct Product {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() {
/// let api = Client::with_base_url("http://localhost/api/v1")
///     .with_header("Token", "secret")
///     .with_append_slash(true);
///
/// // GET http://localhost/api/v1/product/1/
/// let mut product = Product::default();
/// let mut status = 0u16;
/// let response = api.get(["product", "1"]).send(&mut [&mut product]).await;
/// if let Some(e) = response.status_into(&mut status).error() {
///     eprintln!("lookup failed: {}", e);
/// }
///
/// // POST http://localhost/api/v1/product/
/// let new = CreateProduct { name: "Widget".to_string() };
/// let response = api.post(["product"]).with_json(&new).send(&mut []).await;
/// println!("created: {:?}", response.status());
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    base: Option<Url>,
    base_error: Option<url::ParseError>,
    segments: Vec<String>,
    method: Method,
    headers: HeaderMap,
    header_error: Option<String>,
    query: QueryValues,
    body: Bytes,
    data_error: Option<String>,
    append_slash: bool,
    user_agent: HeaderValue,
    transport: TransportFactory,
    before_send: Option<BeforeSend>,
}

impl Client {
    /// Creates a GET client without a base URL.
    ///
    /// Each dispatch builds a fresh `reqwest::Client`; use
    /// [`with_http_client`](Client::with_http_client) to share a pool.
    pub fn new() -> Self {
        Self {
            base: None,
            base_error: None,
            segments: Vec::new(),
            method: Method::GET,
            headers: HeaderMap::new(),
            header_error: None,
            query: QueryValues::new(),
            body: Bytes::new(),
            data_error: None,
            append_slash: false,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
            transport: transport::fresh_reqwest(),
            before_send: None,
        }
    }

    /// Creates a GET client rooted at `url`.
    ///
    /// Equivalent to `Client::new().with_base(url)`.
    pub fn with_base_url(url: impl AsRef<str>) -> Self {
        Self::new().with_base(url)
    }

    /// Sets the base URL every path is resolved against.
    ///
    /// A URL that fails to parse does not panic or return an error here. The
    /// failure is kept and reported by [`config_error`](Client::config_error)
    /// and by every dispatch.
    pub fn with_base(&self, url: impl AsRef<str>) -> Self {
        let mut next = self.clone();
        match Url::parse(url.as_ref()) {
            Ok(parsed) => {
                next.base = Some(parsed);
                next.base_error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, url = url.as_ref(), "Invalid base URL recorded");
                next.base = None;
                next.base_error = Some(e);
            }
        }
        next
    }

    /// Sets a header, replacing any previous value under the same name.
    ///
    /// Names are case-insensitive. An invalid name or value leaves the
    /// headers unchanged and is reported by [`config_error`](Client::config_error).
    pub fn with_header(&self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let mut next = self.clone();
        let name = HeaderName::try_from(key.as_ref())
            .map_err(|e| format!("Invalid header name {:?}: {}", key.as_ref(), e));
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| format!("Invalid header value for {:?}: {}", key.as_ref(), e));

        match name.and_then(|name| value.map(|value| (name, value))) {
            Ok((name, value)) => {
                next.headers.insert(name, value);
            }
            Err(message) => {
                tracing::debug!(error = %message, "Header skipped");
                next.header_error = Some(message);
            }
        }
        next
    }

    /// Merges query values into a copy of the current ones.
    ///
    /// `None` or an empty collection clears the query entirely.
    ///
    /// ```
    /// use rip::{Client, QueryValues};
    ///
    /// let client = Client::with_base_url("http://127.0.0.1/api/v1")
    ///     .with_append_slash(true)
    ///     .with_query_values(QueryValues::from([("key", "value"), ("oops", "oops")]));
    /// assert_eq!(
    ///     client.url().unwrap().as_str(),
    ///     "http://127.0.0.1/api/v1/?key=value&oops=oops"
    /// );
    ///
    /// let cleared = client.with_query_values(None);
    /// assert_eq!(cleared.url().unwrap().as_str(), "http://127.0.0.1/api/v1/");
    /// ```
    pub fn with_query_values(&self, values: impl Into<Option<QueryValues>>) -> Self {
        let mut next = self.clone();
        match values.into() {
            Some(values) if !values.is_empty() => next.query.merge(&values),
            _ => next.query = QueryValues::new(),
        }
        next
    }

    /// Appends a single query value.
    pub fn with_query(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.query.add(key, value);
        next
    }

    /// Sets the method and appends path parts.
    pub fn with_method<I>(&self, method: Method, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut next = self.with_path(parts);
        next.method = method;
        next
    }

    /// Appends path parts.
    ///
    /// Parts are formatted with `Display` and trimmed of whitespace and
    /// leading slashes. Parts left empty are dropped. Repeated calls extend
    /// the path.
    ///
    /// ```
    /// use rip::Client;
    /// use std::fmt::Display;
    ///
    /// let client = Client::with_base_url("http://127.0.0.1/api/v1/")
    ///     .with_path(["this", "is", "", "  "])
    ///     .with_path::<[&dyn Display; 2]>([&"product", &1])
    ///     .with_append_slash(true);
    /// assert_eq!(client.url().unwrap().path(), "/api/v1/this/is/product/1/");
    /// ```
    pub fn with_path<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut next = self.clone();
        path::extend_segments(&mut next.segments, parts);
        next
    }

    /// Sets the request body from bytes, text, a reader or a JSON value.
    ///
    /// If the data cannot be turned into bytes the body is left empty and the
    /// failure is reported by [`config_error`](Client::config_error).
    pub fn with_data(&self, data: impl Into<Payload>) -> Self {
        self.with_body(data.into().into_bytes())
    }

    /// Serializes `value` as the JSON request body.
    ///
    /// Failures are handled like [`with_data`](Client::with_data).
    pub fn with_json<T: Serialize + ?Sized>(&self, value: &T) -> Self {
        self.with_body(Payload::json(value).and_then(Payload::into_bytes))
    }

    fn with_body(&self, body: Result<Bytes>) -> Self {
        let mut next = self.clone();
        match body {
            Ok(body) => {
                next.body = body;
                next.data_error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Request body left empty");
                next.body = Bytes::new();
                next.data_error = Some(match e {
                    Error::SerializationFailed(message) => message,
                    other => other.to_string(),
                });
            }
        }
        next
    }

    /// Overrides the `User-Agent` header.
    ///
    /// This value wins over a `User-Agent` set with [`with_header`](Client::with_header).
    pub fn with_user_agent(&self, agent: impl AsRef<str>) -> Self {
        let mut next = self.clone();
        match HeaderValue::try_from(agent.as_ref()) {
            Ok(value) => next.user_agent = value,
            Err(e) => {
                let message = format!("Invalid user agent {:?}: {}", agent.as_ref(), e);
                tracing::debug!(error = %message, "User agent skipped");
                next.header_error = Some(message);
            }
        }
        next
    }

    /// Forces the resolved path to end with a slash.
    pub fn with_append_slash(&self, append: bool) -> Self {
        let mut next = self.clone();
        next.append_slash = append;
        next
    }

    /// Sets the factory asked for a transport on every dispatch.
    ///
    /// ```
    /// use rip::{Client, Transport};
    /// use std::sync::Arc;
    ///
    /// let pooled = reqwest::Client::new();
    /// let client = Client::with_base_url("http://localhost/")
    ///     .with_transport(move || Arc::new(pooled.clone()) as Arc<dyn Transport>);
    /// ```
    pub fn with_transport<F>(&self, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Transport> + Send + Sync + 'static,
    {
        let mut next = self.clone();
        next.transport = Arc::new(factory);
        next
    }

    /// Shares one `reqwest::Client`, and its connection pool, across dispatches.
    pub fn with_http_client(&self, client: reqwest::Client) -> Self {
        let mut next = self.clone();
        next.transport = transport::shared_reqwest(client);
        next
    }

    /// Runs `hook` on every built request just before it is sent.
    ///
    /// ```
    /// use rip::Client;
    ///
    /// let signed = Client::with_base_url("http://localhost/").with_before_send(|request| {
    ///     request
    ///         .headers_mut()
    ///         .insert("x-signature", http::HeaderValue::from_static("abc"));
    /// });
    /// ```
    pub fn with_before_send<F>(&self, hook: F) -> Self
    where
        F: Fn(&mut reqwest::Request) + Send + Sync + 'static,
    {
        let mut next = self.clone();
        next.before_send = Some(Arc::new(hook));
        next
    }

    /// Returns the configured method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the headers set so far, without `User-Agent`.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the query values set so far.
    pub fn query_values(&self) -> &QueryValues {
        &self.query
    }

    /// Returns the request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the parsed base URL, if one was set successfully.
    pub fn base_url(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Returns a configuration problem that was recorded and skipped.
    ///
    /// Problems are checked in a fixed order, not in the order they happened:
    /// an unparseable base URL, then an invalid header or user agent, then
    /// body data that could not be serialized. A later valid base URL or body
    /// replaces its problem; a skipped header stays reported because the
    /// header is still missing. The default flow ignores these; call this or
    /// [`validate`](Client::validate) to be strict.
    ///
    /// ```
    /// use rip::{Client, Error};
    ///
    /// let client = Client::with_base_url("asdf");
    /// assert!(matches!(client.config_error(), Some(Error::InvalidUrl(_))));
    ///
    /// let fixed = client.with_base("http://localhost/");
    /// assert!(fixed.config_error().is_none());
    /// ```
    pub fn config_error(&self) -> Option<Error> {
        if let Some(e) = self.base_error {
            return Some(Error::InvalidUrl(e));
        }
        if let Some(message) = &self.header_error {
            return Some(Error::ConfigurationError(message.clone()));
        }
        self.data_error
            .as_ref()
            .map(|message| Error::SerializationFailed(message.clone()))
    }

    /// Fails with [`config_error`](Client::config_error) if one was recorded.
    ///
    /// ```
    /// use rip::{Client, Error};
    ///
    /// let client = Client::with_base_url("http://localhost/").with_header("bad header", "x");
    /// assert!(matches!(client.validate(), Err(Error::ConfigurationError(_))));
    ///
    /// assert!(Client::with_base_url("http://localhost/").validate().is_ok());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the recorded configuration problem.
    pub fn validate(&self) -> Result<()> {
        match self.config_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Resolves the full request URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or invalid, or if the path
    /// cannot be joined onto it.
    pub fn url(&self) -> Result<Url> {
        if let Some(e) = self.base_error {
            return Err(Error::InvalidUrl(e));
        }
        let base = self.base.as_ref().ok_or(Error::MissingBaseUrl)?;
        path::resolve(base, &self.segments, self.append_slash, &self.query)
    }

    /// Builds the request handed to the transport.
    ///
    /// The headers are a copy of the configured ones plus `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be resolved.
    pub fn request(&self) -> Result<reqwest::Request> {
        let mut request = reqwest::Request::new(self.method.clone(), self.url()?);

        let headers = request.headers_mut();
        *headers = self.headers.clone();
        headers.insert(USER_AGENT, self.user_agent.clone());

        if !self.body.is_empty() {
            *request.body_mut() = Some(reqwest::Body::from(self.body.clone()));
        }

        Ok(request)
    }

    /// Performs the call and decodes the body into each target in turn.
    ///
    /// The body is fully read and the transport response released before this
    /// returns. Decoding stops at the first target that fails; that failure
    /// becomes the response's error and later targets are left untouched.
    /// Cancelling `cancel` ends the call with [`Error::Cancelled`].
    pub async fn call(
        &self,
        cancel: &CancellationToken,
        targets: &mut [&mut dyn Decode],
    ) -> Response {
        let mut request = match self.request() {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, method = %self.method, "Request could not be built");
                return Response::failed(self.clone(), e);
            }
        };

        if let Some(hook) = &self.before_send {
            hook(&mut request);
        }

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Executing HTTP request"
        );

        let transport = (self.transport)();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = transport.perform(request) => result,
        };

        let http_response = match result {
            Ok(http_response) => http_response,
            Err(e) => {
                tracing::warn!(error = %e, method = %self.method, "Request failed");
                return Response::failed(self.clone(), e);
            }
        };

        let mut response = self.receive(http_response, cancel).await;
        for target in targets.iter_mut() {
            response = response.decode_into(&mut **target);
        }
        response
    }

    /// Performs the call without a cancellation token.
    pub async fn send(&self, targets: &mut [&mut dyn Decode]) -> Response {
        self.call(&CancellationToken::new(), targets).await
    }

    /// Wraps a response obtained outside this client.
    ///
    /// The body is read the same way [`call`](Client::call) reads it, and the
    /// result replays through this client.
    pub async fn wrap_response(&self, response: reqwest::Response) -> Response {
        self.receive(response, &CancellationToken::new()).await
    }

    async fn receive(&self, response: reqwest::Response, cancel: &CancellationToken) -> Response {
        let status = response.status();
        let headers = response.headers().clone();

        // `bytes` consumes the response, so the connection is released on
        // every path out of this select
        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            body = response.bytes() => body.map_err(Error::from),
        };

        match body {
            Ok(body) => {
                tracing::info!(
                    status = status.as_u16(),
                    body_len = body.len(),
                    "Received HTTP response"
                );
                Response::received(self.clone(), status, headers, body, None)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    status = status.as_u16(),
                    "Failed to read response body"
                );
                Response::received(self.clone(), status, headers, Bytes::new(), Some(e))
            }
        }
    }

    /// `DELETE` with path parts.
    pub fn delete<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::DELETE, parts)
    }

    /// `GET` with path parts.
    pub fn get<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::GET, parts)
    }

    /// `HEAD` with path parts.
    pub fn head<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::HEAD, parts)
    }

    /// `OPTIONS` with path parts.
    pub fn options<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::OPTIONS, parts)
    }

    /// `PATCH` with path parts.
    pub fn patch<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::PATCH, parts)
    }

    /// `POST` with path parts.
    pub fn post<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::POST, parts)
    }

    /// `PUT` with path parts.
    pub fn put<I>(&self, parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.with_method(Method::PUT, parts)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("method", &self.method)
            .field("base", &self.base.as_ref().map(Url::as_str))
            .field("segments", &self.segments)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("append_slash", &self.append_slash)
            .field("user_agent", &self.user_agent)
            .field("before_send", &self.before_send.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NO_PATH;
    use serde_json::json;

    const BASE: &str = "http://127.0.0.1/api/v1/";

    #[test]
    fn url_paths() {
        let cases: [(&[&str], &str, bool); 3] = [
            (&["this", "is", "product", "1"], "/api/v1/this/is/product/1", false),
            (&["this", "is", "product", "1"], "/api/v1/this/is/product/1/", true),
            (
                &["this", "is", "", "", " ", "product", "1"],
                "/api/v1/this/is/product/1/",
                true,
            ),
        ];

        for (parts, expected, append_slash) in cases {
            let client = Client::with_base_url(BASE)
                .with_path(parts)
                .with_append_slash(append_slash);
            assert_eq!(client.url().unwrap().path(), expected);
        }
    }

    #[test]
    fn integer_parts() {
        let client = Client::with_base_url(BASE).get(["product"]).with_path([1]);
        assert_eq!(client.url().unwrap().as_str(), "http://127.0.0.1/api/v1/product/1");
    }

    #[test]
    fn query_merge_and_reset() {
        let client = Client::with_base_url("http://127.0.0.1/api/v1")
            .with_append_slash(true)
            .with_query_values(QueryValues::from([("key", "value"), ("oops", "oops")]));
        assert_eq!(
            client.url().unwrap().as_str(),
            "http://127.0.0.1/api/v1/?key=value&oops=oops"
        );

        let merged = client
            .with_query_values(QueryValues::from([("key", "second")]))
            .with_query("a", "b c");
        assert_eq!(
            merged.url().unwrap().as_str(),
            "http://127.0.0.1/api/v1/?a=b+c&key=value&key=second&oops=oops"
        );

        assert_eq!(
            client.with_query_values(None).url().unwrap().as_str(),
            "http://127.0.0.1/api/v1/"
        );
        assert!(merged.with_query_values(QueryValues::new()).query_values().is_empty());
    }

    #[test]
    fn methods() {
        let methods = [
            Method::DELETE,
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::PATCH,
            Method::POST,
            Method::PUT,
        ];
        let client = Client::with_base_url(BASE);

        for method in methods {
            let request = client.with_method(method.clone(), NO_PATH).request().unwrap();
            assert_eq!(request.method(), method);
        }
        assert_eq!(Client::new().method(), Method::GET);
    }

    #[test]
    fn verb_methods() {
        let client = Client::with_base_url(BASE);
        let cases = [
            (client.delete(NO_PATH), Method::DELETE),
            (client.get(NO_PATH), Method::GET),
            (client.head(NO_PATH), Method::HEAD),
            (client.options(NO_PATH), Method::OPTIONS),
            (client.patch(NO_PATH), Method::PATCH),
            (client.post(NO_PATH), Method::POST),
            (client.put(NO_PATH), Method::PUT),
        ];

        for (client, method) in cases {
            assert_eq!(client.request().unwrap().method(), method);
        }
    }

    #[test]
    fn user_agent_wins_over_header() {
        for agent in ["user-agent", "test-agent"] {
            let request = Client::with_base_url(BASE)
                .with_header("User-Agent", "from-header")
                .with_user_agent(agent)
                .request()
                .unwrap();
            assert_eq!(request.headers()[USER_AGENT], agent);
        }

        let request = Client::with_base_url(BASE).request().unwrap();
        assert_eq!(request.headers()[USER_AGENT], DEFAULT_USER_AGENT);
    }

    #[test]
    fn request_carries_headers_and_body() {
        let client = Client::with_base_url(BASE)
            .delete(NO_PATH)
            .with_header("key", "value")
            .with_data(json!({ "id": 1 }));
        let request = client.request().unwrap();

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.url(), &client.url().unwrap());
        assert_eq!(request.headers()["KEY"], "value");
        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(&br#"{"id":1}"#[..])
        );

        let empty = Client::with_base_url(BASE).request().unwrap();
        assert!(empty.body().is_none());
    }

    #[test]
    fn mutators_leave_receiver_untouched() {
        let base = Client::with_base_url(BASE)
            .with_header("Token", "secret")
            .with_query("page", "1");
        let url = base.url().unwrap();
        let headers = base.headers().clone();

        let _ = base.with_header("Token", "other");
        let _ = base.with_header("Extra", "1");
        let _ = base.with_query_values(None);
        let _ = base.with_query("page", "2");
        let _ = base.post(["products", "7"]);
        let _ = base.with_append_slash(true);
        let _ = base.with_data("body");
        let _ = base.with_base("http://other/");

        assert_eq!(base.url().unwrap(), url);
        assert_eq!(base.headers(), &headers);
        assert_eq!(base.method(), Method::GET);
        assert!(base.body().is_empty());
    }

    #[test]
    fn branches_are_independent() {
        let api = Client::with_base_url(BASE);
        let users = api.get(["users"]);
        let orders = api.post(["orders"]).with_json(&json!({ "qty": 2 }));

        assert_eq!(users.url().unwrap().path(), "/api/v1/users");
        assert_eq!(orders.url().unwrap().path(), "/api/v1/orders");
        assert!(users.body().is_empty());
        assert_eq!(api.url().unwrap().path(), "/api/v1/");
    }

    #[test]
    fn invalid_base_is_recorded() {
        let client = Client::with_base_url("asdf");

        assert!(client.base_url().is_none());
        assert!(matches!(client.config_error(), Some(Error::InvalidUrl(_))));
        assert!(matches!(client.url(), Err(Error::InvalidUrl(_))));
        assert!(matches!(Client::new().url(), Err(Error::MissingBaseUrl)));
    }

    #[test]
    fn invalid_header_is_recorded_and_skipped() {
        let client = Client::with_base_url(BASE).with_header("bad header", "x");

        assert!(client.headers().is_empty());
        assert!(matches!(client.config_error(), Some(Error::ConfigurationError(_))));
        assert!(client.request().is_ok());
    }

    #[test]
    fn config_errors_are_reported_in_fixed_order() {
        let client = Client::with_base_url(BASE)
            .with_header("bad header", "x")
            .with_data(Payload::reader(BrokenReader))
            .with_base("zz");

        assert!(matches!(client.config_error(), Some(Error::InvalidUrl(_))));
        assert!(matches!(client.validate(), Err(Error::InvalidUrl(_))));

        let rebased = client.with_base(BASE);
        assert!(matches!(rebased.validate(), Err(Error::ConfigurationError(_))));

        let header_only = Client::with_base_url(BASE)
            .with_header("bad header", "x")
            .with_header("good", "y");
        assert!(matches!(header_only.validate(), Err(Error::ConfigurationError(_))));

        let body_only = Client::with_base_url(BASE).with_data(Payload::reader(BrokenReader));
        assert!(matches!(body_only.validate(), Err(Error::SerializationFailed(_))));
        assert!(body_only.with_data("ok").validate().is_ok());
    }

    struct BrokenReader;

    impl std::io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        }
    }

    #[test]
    fn failed_serialization_leaves_body_empty() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1], "not a string key");

        let client = Client::with_base_url(BASE).with_data("old").with_json(&map);
        assert!(client.body().is_empty());
        assert!(matches!(client.config_error(), Some(Error::SerializationFailed(_))));

        let recovered = client.with_data(vec![1u8, 2]);
        assert_eq!(recovered.body(), [1u8, 2]);
        assert!(recovered.config_error().is_none());
    }
}
