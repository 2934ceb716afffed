//! Request payload variants.

use bytes::Bytes;

/// Request payload accepted by the body-carrying operations.
///
/// [`Body::raw`] bytes are transmitted verbatim with no re-encoding, e.g. a
/// pre-built multipart payload. [`Body::json`] serializes the value up front;
/// a serialization failure is carried until the request is sent so it surfaces
/// through the returned [`crate::Response`] without a network call.
#[derive(Debug, Clone, Default)]
pub struct Body {
    pub(crate) inner: BodyInner,
}

#[derive(Debug, Clone, Default)]
pub(crate) enum BodyInner {
    #[default]
    None,
    Raw(Bytes),
    Json(Result<Bytes, String>),
}

impl Body {
    /// No request body.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Pre-encoded bytes, sent verbatim.
    #[must_use]
    pub fn raw(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: BodyInner::Raw(bytes.into()),
        }
    }

    /// A value serialized to JSON.
    #[must_use]
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let inner = match serde_json::to_vec(value) {
            Ok(bytes) => BodyInner::Json(Ok(Bytes::from(bytes))),
            Err(err) => BodyInner::Json(Err(err.to_string())),
        };
        Self { inner }
    }
}
