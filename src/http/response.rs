//! Transport-shaped responses handed back to the host client

use std::io::Read;

use bytes::{Buf, Bytes};

use crate::{Result, WaylayError};

/// Response body delivery mode
///
/// A `Buffered` body is fully materialized up front; callers can read it
/// after the interception session has ended. A `Streamed` body defers
/// consumption to an explicit reader, mirroring a client's un-preloaded
/// streaming mode.
#[derive(Debug, Clone)]
pub enum Body {
    /// Eagerly materialized body
    Buffered(Bytes),
    /// Lazily consumed body
    Streamed(Bytes),
}

impl Body {
    fn bytes(&self) -> &Bytes {
        match self {
            Self::Buffered(b) | Self::Streamed(b) => b,
        }
    }
}

/// A synthesized response shaped like the host client's native response type
#[derive(Debug, Clone)]
pub struct TransportResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Body,
}

impl TransportResponse {
    /// Assemble a response from raw parts
    #[must_use]
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Body) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response status code
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// All response headers in insertion order
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with the given name, compared case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the body was left in streaming mode
    #[must_use]
    pub fn is_streamed(&self) -> bool {
        matches!(self.body, Body::Streamed(_))
    }

    /// Body bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.body.bytes()
    }

    /// Body decoded as UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns error if the body is not valid UTF-8
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.bytes().to_vec())
            .map_err(|e| WaylayError::Other(format!("Response body is not valid UTF-8: {e}")))
    }

    /// Consume the response and read the body as a stream
    #[must_use]
    pub fn into_reader(self) -> impl Read {
        match self.body {
            Body::Buffered(b) | Body::Streamed(b) => b.reader(),
        }
    }
}
