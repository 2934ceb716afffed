//! Header injection capability.

use crate::Request;

/// Caller-supplied strategy that mutates outgoing request headers.
///
/// The setter is invoked exactly once per request, after the request is fully
/// constructed and before transmission, so it sees (and may override) every
/// header including the default `Content-Type: application/json` set when a
/// body is present. It is trusted to succeed and must not block: no timeout
/// wraps the invocation itself.
///
/// Closures work directly:
///
/// ```
/// use remora::Api;
///
/// let api = Api::new().header_setter(|req: &mut remora::Request| {
///     req.headers_mut()
///         .insert("Authorization".to_string(), "Bearer token".to_string());
/// });
/// ```
pub trait HeaderSetter: Send + Sync {
    /// Inspect the outgoing request and adjust its headers.
    fn set_headers(&self, request: &mut Request);
}

impl<F> HeaderSetter for F
where
    F: Fn(&mut Request) + Send + Sync,
{
    fn set_headers(&self, request: &mut Request) {
        self(request);
    }
}
