//! Immutable request snapshots passed to callbacks

use std::collections::HashMap;

use crate::http::{Method, PreparedRequest};

/// Snapshot of an in-flight request, built once at match time
///
/// Callbacks receive a reference to this snapshot instead of the live
/// request, so a callback cannot mutate what the client is sending.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// HTTP method
    pub method: Method,
    /// Full request URL, query string included
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Decoded query-string parameters
    pub query_params: HashMap<String, String>,
    /// Decoded form-urlencoded body parameters
    pub body_params: HashMap<String, String>,
}

impl CapturedRequest {
    /// Snapshot a prepared request
    #[must_use]
    pub fn from_prepared(request: &PreparedRequest) -> Self {
        let query = request.url.split_once('?').map_or("", |(_, q)| q);
        let body = std::str::from_utf8(&request.body).unwrap_or("");

        Self {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            query_params: parse_qsl(query),
            body_params: parse_qsl(body),
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` string into a map
///
/// Pairs with a missing or empty value are dropped and a later duplicate
/// key wins, matching the common client-library behavior test authors see
/// when they inspect request parameters.
fn parse_qsl(input: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in input.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.is_empty() || value.is_empty() {
            continue;
        }
        params.insert(decode_component(key), decode_component(value));
    }

    params
}

fn decode_component(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map_or_else(|_| plus_decoded.clone(), |decoded| decoded.into_owned())
}
