//! Expectation registry: ordered rules mapping method + URL to a resolution

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use super::request::CapturedRequest;
use super::template::ResponseTemplate;
use crate::http::{Method, TransportResponse};
use crate::Result;

/// What a callback hands back to the dispatcher
pub enum CallbackReply {
    /// A logical response, still to be shaped by the builder
    Template(ResponseTemplate),
    /// A ready transport response, used as-is
    Transport(TransportResponse),
}

impl From<ResponseTemplate> for CallbackReply {
    fn from(template: ResponseTemplate) -> Self {
        Self::Template(template)
    }
}

impl From<TransportResponse> for CallbackReply {
    fn from(response: TransportResponse) -> Self {
        Self::Transport(response)
    }
}

/// Boxed callback invoked with a request snapshot
pub type CallbackFn = Box<dyn Fn(&CapturedRequest) -> Result<CallbackReply>>;

/// How a matched expectation produces its response
pub enum Resolution {
    /// The same pre-built response for every match
    Fixed(ResponseTemplate),
    /// Computed per match from a request snapshot
    Callback(CallbackFn),
    /// A finite queue consumed one response per match
    Sequence(RefCell<VecDeque<ResponseTemplate>>),
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(template) => f.debug_tuple("Fixed").field(template).finish(),
            Self::Callback(_) => f.debug_tuple("Callback").finish(),
            Self::Sequence(queue) => f
                .debug_struct("Sequence")
                .field("remaining", &queue.borrow().len())
                .finish(),
        }
    }
}

/// A registered rule: method + URL pattern bound to a resolution strategy
///
/// Immutable once registered, except for the sequence cursor.
#[derive(Debug)]
pub struct Expectation {
    method: Method,
    url: String,
    match_querystring: bool,
    resolution: Resolution,
}

/// Builder for an [`Expectation`], finished by choosing a resolution
#[derive(Debug)]
pub struct ExpectationBuilder {
    method: Method,
    url: String,
    match_querystring: bool,
}

impl Expectation {
    /// Start building an expectation for a method + URL pattern
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            match_querystring: false,
        }
    }

    /// Method this expectation applies to
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// URL pattern, after host-only normalization
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the query string participates in matching
    #[must_use]
    pub fn match_querystring(&self) -> bool {
        self.match_querystring
    }

    /// Resolution strategy
    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }
}

impl ExpectationBuilder {
    /// Make the query string participate in matching
    #[must_use]
    pub fn match_querystring(mut self) -> Self {
        self.match_querystring = true;
        self
    }

    /// Finish with a fixed response, reused for every match
    #[must_use]
    pub fn respond_with(self, template: ResponseTemplate) -> Expectation {
        self.finish(Resolution::Fixed(template))
    }

    /// Finish with a callback computed per match
    #[must_use]
    pub fn respond_with_fn<F, R>(self, callback: F) -> Expectation
    where
        F: Fn(&CapturedRequest) -> Result<R> + 'static,
        R: Into<CallbackReply>,
    {
        self.finish(Resolution::Callback(Box::new(move |request| {
            callback(request).map(Into::into)
        })))
    }

    /// Finish with a finite sequence, consumed one response per match
    #[must_use]
    pub fn respond_with_sequence(
        self,
        responses: impl IntoIterator<Item = ResponseTemplate>,
    ) -> Expectation {
        self.finish(Resolution::Sequence(RefCell::new(
            responses.into_iter().collect(),
        )))
    }

    fn finish(self, resolution: Resolution) -> Expectation {
        Expectation {
            method: self.method,
            url: normalize_url(&self.url, self.match_querystring),
            match_querystring: self.match_querystring,
            resolution,
        }
    }
}

/// Ordered list of expectations; registration order is match priority
#[derive(Debug, Default)]
pub struct Registry {
    expectations: Vec<Expectation>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expectation
    ///
    /// Duplicate or overlapping patterns are legal; the first registered
    /// wins at match time.
    pub fn register(&mut self, expectation: Expectation) {
        debug!(
            "Registering expectation: {} {}",
            expectation.method, expectation.url
        );
        self.expectations.push(expectation);
    }

    /// Expectations in registration order
    #[must_use]
    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    /// Number of registered expectations
    #[must_use]
    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Remove all expectations
    pub fn reset(&mut self) {
        self.expectations.clear();
    }
}

/// Give host-only URL patterns a default path
///
/// A pattern with exactly two `/` characters names a bare host. Appending a
/// trailing slash (or inserting one before the first `?` in query-matching
/// mode) makes `http://x.test` and `http://x.test/` interchangeable.
fn normalize_url(url: &str, match_querystring: bool) -> String {
    if url.matches('/').count() != 2 {
        return url.to_string();
    }

    if match_querystring {
        url.replacen('?', "/?", 1)
    } else {
        format!("{url}/")
    }
}
