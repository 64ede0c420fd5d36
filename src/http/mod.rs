//! Host-client collaborator types
//!
//! The interception engine does not ship a real HTTP client. This module
//! defines the minimal shapes the engine requires from one: a prepared
//! request, a transport response, and a client with a settable transport
//! hook the engine installs itself into.

mod client;
mod response;

pub use client::{HttpClient, TransportHook};
pub use response::{Body, TransportResponse};

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::WaylayError;

/// HTTP methods an expectation can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl Method {
    /// Uppercase wire name of the method
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = WaylayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(WaylayError::Other(format!("Unknown HTTP method: {other}"))),
        }
    }
}

/// An outgoing request as the host client would hand it to its transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: Method,
    /// Full request URL, query string included
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Request body
    pub body: Bytes,
}

impl PreparedRequest {
    /// Create a request with no headers and an empty body
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Append a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request body
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}
