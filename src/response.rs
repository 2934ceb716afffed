//! Deferred-decoding HTTP response.
//!
//! [`Response`] holds either the full response bytes or the error that
//! prevented them from arriving. Decoding happens on demand, one call per
//! wire format, and every call is independently repeatable.

use bytes::Bytes;

use crate::error::{Error, ParseError, Result};

/// Immutable holder of a successful byte payload or a recorded failure.
///
/// A `Response` never carries both meaningfully: once an error is recorded,
/// every decode call short-circuits and returns that error without touching
/// the stored bytes.
#[derive(Debug, Clone)]
pub struct Response {
    body: Bytes,
    err: Option<Error>,
}

impl Response {
    /// A successful response holding the full body.
    pub(crate) fn ok(body: Bytes) -> Self {
        Self { body, err: None }
    }

    /// A failed response; the body stays empty.
    pub(crate) fn from_error(err: Error) -> Self {
        Self {
            body: Bytes::new(),
            err: Some(err),
        }
    }

    /// The recorded failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Returns `true` if the request succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.err.is_none()
    }

    fn stored_error(&self) -> Result<()> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Decode the stored bytes as JSON.
    ///
    /// Decode failures report the path to the offending field and the raw
    /// body text.
    pub fn parse_json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        self.stored_error()?;
        let mut deserializer = serde_json::Deserializer::from_slice(&self.body);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            ParseError::new("JSON decode failed")
                .with_source(err)
                .with_detail("body", String::from_utf8_lossy(&self.body))
                .into()
        })
    }

    /// Decode the stored bytes as XML.
    pub fn parse_xml<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        self.stored_error()?;
        let text = std::str::from_utf8(&self.body)
            .map_err(|err| ParseError::new("XML decode failed").with_source(err))?;
        quick_xml::de::from_str(text).map_err(|err| {
            ParseError::new("XML decode failed")
                .with_source(err)
                .with_detail("body", text)
                .into()
        })
    }

    /// Decode the stored bytes as a protobuf message.
    ///
    /// The payload is binary, so decode failures report only the body length.
    pub fn parse_protobuf<T: prost::Message + Default>(&self) -> Result<T> {
        self.stored_error()?;
        T::decode(self.body.clone()).map_err(|err| {
            ParseError::new("protobuf decode failed")
                .with_source(err)
                .with_detail("body length", self.body.len())
                .into()
        })
    }

    /// The stored bytes as a fresh copy.
    ///
    /// The returned vector never aliases the internal buffer, so mutating it
    /// cannot affect later decode calls.
    pub fn parse_bytes(&self) -> Result<Vec<u8>> {
        self.stored_error()?;
        Ok(self.body.to_vec())
    }

    /// The stored bytes as a UTF-8 string.
    pub fn parse_string(&self) -> Result<String> {
        self.stored_error()?;
        String::from_utf8(self.body.to_vec()).map_err(|err| {
            ParseError::new("response body is not valid UTF-8")
                .with_source(err)
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    #[test]
    fn parse_json_success() {
        let response = Response::ok(Bytes::from(r#"{"id":1,"name":"Alice"}"#));
        let user: User = response.parse_json().expect("decode");
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn parse_json_failure_includes_body_text() {
        let response = Response::ok(Bytes::from("not json"));
        let err = response.parse_json::<User>().expect_err("decode failure");
        let msg = err.to_string();
        assert!(msg.contains("JSON decode failed"), "got: {msg}");
        assert!(msg.contains("not json"), "raw body in message: {msg}");
    }

    #[test]
    fn parse_json_is_repeatable() {
        let response = Response::ok(Bytes::from(r#"{"id":1,"name":"Alice"}"#));
        let first: User = response.parse_json().expect("first decode");
        let second: User = response.parse_json().expect("second decode");
        assert_eq!(first, second);
    }

    #[test]
    fn parse_xml_success() {
        let response =
            Response::ok(Bytes::from("<User><id>1</id><name>Alice</name></User>"));
        let user: User = response.parse_xml().expect("decode");
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn parse_xml_failure_includes_body_text() {
        let response = Response::ok(Bytes::from("<unclosed>"));
        let err = response.parse_xml::<User>().expect_err("decode failure");
        let msg = err.to_string();
        assert!(msg.contains("XML decode failed"), "got: {msg}");
        assert!(msg.contains("<unclosed>"), "raw body in message: {msg}");
    }

    #[test]
    fn parse_protobuf_failure_reports_length_not_bytes() {
        #[derive(Clone, PartialEq, prost::Message)]
        struct Ping {
            #[prost(string, tag = "1")]
            name: String,
        }

        // A lone 0xFF is a truncated varint key
        let response = Response::ok(Bytes::from_static(&[0xFF]));
        let err = response.parse_protobuf::<Ping>().expect_err("decode failure");
        let msg = err.to_string();
        assert!(msg.contains("protobuf decode failed"), "got: {msg}");
        assert!(msg.contains("body length, 1") || msg.contains("body length: 1"), "got: {msg}");
        assert!(!msg.contains('\u{FFFD}'), "no raw binary in message: {msg}");
    }

    #[test]
    fn parse_bytes_copies() {
        let response = Response::ok(Bytes::from_static(b"payload"));
        let mut first = response.parse_bytes().expect("decode");
        first.clear();
        first.extend_from_slice(b"mutated");

        let second = response.parse_bytes().expect("decode again");
        assert_eq!(second, b"payload");
    }

    #[test]
    fn parse_string_success() {
        let response = Response::ok(Bytes::from_static(b"hello"));
        assert_eq!(response.parse_string().expect("decode"), "hello");
    }

    #[test]
    fn parse_string_rejects_invalid_utf8() {
        let response = Response::ok(Bytes::from_static(&[0xFF, 0xFE]));
        let err = response.parse_string().expect_err("decode failure");
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn stored_error_short_circuits_every_decoder() {
        let response = Response::from_error(Error::http(404, "not found"));

        let err = response.parse_json::<User>().expect_err("stored error");
        assert_eq!(err.to_string(), "request failed with status 404: not found");

        let err = response.parse_bytes().expect_err("stored error");
        assert_eq!(err.status(), Some(404));

        let err = response.parse_string().expect_err("stored error");
        assert_eq!(err.status(), Some(404));

        let err = response.parse_xml::<User>().expect_err("stored error");
        assert_eq!(err.status(), Some(404));
    }
}
