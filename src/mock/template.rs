//! Logical response descriptions and their transport-shaped construction

use bytes::Bytes;

use crate::http::{Body, TransportResponse};
use crate::{Result, WaylayError};

/// Default content type when none is set
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A logical response: what the test author describes, before it is shaped
/// into the client's native response type
///
/// Textual bodies are converted to UTF-8 bytes at construction, so
/// everything downstream sees a byte sequence.
#[derive(Debug, Clone)]
pub struct ResponseTemplate {
    status: u16,
    body: Bytes,
    extra_headers: Vec<(String, String)>,
    content_type: String,
    stream: bool,
}

impl ResponseTemplate {
    /// Create a template with an empty `text/plain` body
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: Bytes::new(),
            extra_headers: Vec::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            stream: false,
        }
    }

    /// Set the response body
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header on top of the base `Content-Type`
    ///
    /// Extra headers override the base content type on name collision.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Set the base content type
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Leave the body in streaming mode instead of preloading it
    #[must_use]
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Response status code
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Shape this template into a transport response
    ///
    /// Merges the base `Content-Type` with the extra headers; an extra
    /// header with the same name (case-insensitive) wins. Header values are
    /// validated here since a bad one is a test-authoring bug that must
    /// surface immediately.
    ///
    /// # Errors
    ///
    /// Returns [`WaylayError::InvalidHeaderValue`] if an extra header value
    /// contains control bytes
    pub fn build(&self) -> Result<TransportResponse> {
        let mut headers = vec![("Content-Type".to_string(), self.content_type.clone())];

        for (name, value) in &self.extra_headers {
            validate_header_value(name, value)?;
            if let Some(existing) = headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name))
            {
                existing.1.clone_from(value);
            } else {
                headers.push((name.clone(), value.clone()));
            }
        }

        let body = if self.stream {
            Body::Streamed(self.body.clone())
        } else {
            Body::Buffered(self.body.clone())
        };

        Ok(TransportResponse::new(self.status, headers, body))
    }
}

/// Reject header values that cannot travel in an HTTP header
fn validate_header_value(name: &str, value: &str) -> Result<()> {
    if let Some(bad) = value
        .bytes()
        .find(|&b| matches!(b, b'\r' | b'\n' | 0x00..=0x08 | 0x0b | 0x0c | 0x0e..=0x1f | 0x7f))
    {
        return Err(WaylayError::InvalidHeaderValue {
            name: name.to_string(),
            reason: format!("contains control byte {bad:#04x}"),
        });
    }
    Ok(())
}
