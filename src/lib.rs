//! Thin convenience layer over an HTTP client.
//!
//! [`Api`] exposes `get`/`post`/`put`/`patch`/`delete` plus `*_ctx` variants
//! taking a [`Context`] timeout. Request bodies are either serialized to
//! JSON or passed through verbatim ([`Body`]), a caller-supplied
//! [`HeaderSetter`] injects headers before transmission, and every operation
//! returns a [`Response`] with deferred, format-specific decoding: JSON, XML,
//! protobuf, raw bytes, or text.
//!
//! # Example
//!
//! ```ignore
//! use remora::{Api, Body};
//!
//! let api = Api::new().header_setter(|req: &mut remora::Request| {
//!     req.headers_mut()
//!         .insert("Authorization".to_string(), "Bearer token".to_string());
//! });
//!
//! let created: User = api.post(url, Body::json(&new_user)).await.parse_json()?;
//! ```

mod body;
mod client;
mod config;
mod context;
mod error;
mod header;
mod method;
mod request;
mod response;

pub use body::Body;
pub use client::Api;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::Context;
pub use error::{Error, ParseError, Result};
pub use header::HeaderSetter;
pub use method::Method;
pub use request::{Headers, Request, RequestBuilder};
pub use response::Response;
