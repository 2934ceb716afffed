//! Request execution facade using hyper-util.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tracing::debug;

use crate::{
    Body, ClientConfig, Context, HeaderSetter, Method, Request, Response,
    body::BodyInner,
    error::{Error, Result},
};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Thin request/response facade over a shared, pooled hyper-util client.
///
/// Each operation performs exactly one HTTP round trip and returns a
/// [`Response`] rather than a `Result`: failures are recorded inside the
/// response and surface from its decode calls. Only statuses 200 and 201
/// count as success; every other status is reported as an error carrying the
/// status code and the raw response text.
///
/// The client is built once at construction and reused across calls, so
/// connections are pooled (see [`ClientConfig`]). `Api` is cheap to clone and
/// safe to use from many tasks concurrently.
///
/// # Example
///
/// ```ignore
/// use remora::Api;
///
/// let api = Api::new();
/// let user: User = api.get("https://api.example.com/users/1").await.parse_json()?;
/// ```
#[derive(Clone)]
pub struct Api {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    setter: Option<Arc<dyn HeaderSetter>>,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("header_setter", &self.setter.is_some())
            .finish_non_exhaustive()
    }
}

impl Api {
    /// Create a facade with default pool configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a facade with custom pool configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(https_connector());

        Self {
            client,
            setter: None,
        }
    }

    /// Install a [`HeaderSetter`] invoked once per outgoing request.
    #[must_use]
    pub fn header_setter(mut self, setter: impl HeaderSetter + 'static) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }

    // ========================================================================
    // Operations (background context)
    // ========================================================================

    /// Execute a GET request.
    pub async fn get(&self, url: &str) -> Response {
        self.get_ctx(Context::background(), url).await
    }

    /// Execute a POST request.
    pub async fn post(&self, url: &str, body: Body) -> Response {
        self.post_ctx(Context::background(), url, body).await
    }

    /// Execute a PUT request.
    pub async fn put(&self, url: &str, body: Body) -> Response {
        self.put_ctx(Context::background(), url, body).await
    }

    /// Execute a PATCH request.
    pub async fn patch(&self, url: &str, body: Body) -> Response {
        self.patch_ctx(Context::background(), url, body).await
    }

    /// Execute a DELETE request.
    pub async fn delete(&self, url: &str, body: Body) -> Response {
        self.delete_ctx(Context::background(), url, body).await
    }

    // ========================================================================
    // Operations (explicit context)
    // ========================================================================

    /// Execute a GET request under the given context.
    pub async fn get_ctx(&self, ctx: Context, url: &str) -> Response {
        self.send(ctx, Method::Get, url, Body::none()).await
    }

    /// Execute a POST request under the given context.
    pub async fn post_ctx(&self, ctx: Context, url: &str, body: Body) -> Response {
        self.send(ctx, Method::Post, url, body).await
    }

    /// Execute a PUT request under the given context.
    pub async fn put_ctx(&self, ctx: Context, url: &str, body: Body) -> Response {
        self.send(ctx, Method::Put, url, body).await
    }

    /// Execute a PATCH request under the given context.
    pub async fn patch_ctx(&self, ctx: Context, url: &str, body: Body) -> Response {
        self.send(ctx, Method::Patch, url, body).await
    }

    /// Execute a DELETE request under the given context.
    pub async fn delete_ctx(&self, ctx: Context, url: &str, body: Body) -> Response {
        self.send(ctx, Method::Delete, url, body).await
    }

    // ========================================================================
    // Send pipeline
    // ========================================================================

    async fn send(&self, ctx: Context, method: Method, url: &str, body: Body) -> Response {
        match self.round_trip(ctx, method, url, body).await {
            Ok(bytes) => Response::ok(bytes),
            Err(err) => {
                debug!(%method, url, error = %err, "request failed");
                Response::from_error(err)
            }
        }
    }

    async fn round_trip(
        &self,
        ctx: Context,
        method: Method,
        url: &str,
        body: Body,
    ) -> Result<Bytes> {
        let url = url::Url::parse(url).map_err(|err| Error::invalid_request(err.to_string()))?;

        let payload = match body.inner {
            BodyInner::None => None,
            BodyInner::Raw(bytes) => Some(bytes),
            BodyInner::Json(Ok(bytes)) => Some(bytes),
            BodyInner::Json(Err(message)) => return Err(Error::serialize(message)),
        };

        let mut request = match payload {
            Some(bytes) => Request::builder(method, url).body(bytes).build(),
            None => Request::builder(method, url).build(),
        };

        // Default content type, visible to (and overridable by) the setter
        if request.body().is_some() && request.header(CONTENT_TYPE).is_none() {
            request.headers_mut().insert(CONTENT_TYPE, APPLICATION_JSON);
        }

        if let Some(setter) = &self.setter {
            setter.set_headers(&mut request);
        }

        debug!(%method, url = %request.url(), "sending request");

        let hyper_request = build_hyper_request(request)?;

        // The timeout bounds the whole exchange: a server that returns
        // headers and then stalls the body still gets aborted.
        let exchange = async {
            let response = self
                .client
                .request(hyper_request)
                .await
                .map_err(map_hyper_error)?;

            let status = response.status().as_u16();

            // Drain the body fully before classifying the status
            let bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|err| Error::connection(err.to_string()))?
                .to_bytes();

            Ok::<_, Error>((status, bytes))
        };

        let (status, bytes) = match ctx.timeout() {
            Some(timeout) => tokio::time::timeout(timeout, exchange)
                .await
                .map_err(|_| Error::Timeout)?,
            None => exchange.await,
        }?;

        if status != 200 && status != 201 {
            debug!(status, "non-success status");
            return Err(Error::http(status, String::from_utf8_lossy(&bytes)));
        }

        Ok(bytes)
    }
}

impl Default for Api {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a hyper request from a facade request.
fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
    let (method, url, headers, body) = request.into_parts();

    let mut builder = http::Request::builder()
        .method(http::Method::from(method))
        .uri(url.as_str());

    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }

    let body = body.map_or_else(Full::default, Full::new);
    builder
        .body(body)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
    let msg = err.to_string();

    if err.is_connect() {
        return Error::connection(msg);
    }

    if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
        return Error::tls(msg);
    }

    Error::connection(msg)
}

/// HTTPS connector with rustls and the Mozilla root certificates, speaking
/// HTTP/1.1 and HTTP/2 over plain or TLS connections.
fn https_connector() -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}
