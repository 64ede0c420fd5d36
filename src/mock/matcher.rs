//! Registration-order matching of requests against the registry

use tracing::debug;

use super::registry::Expectation;
use crate::http::PreparedRequest;

/// Find the first expectation satisfied by the request
///
/// Expectations are scanned in registration order, so overlapping patterns
/// resolve deterministically to the earliest one. Two comparison modes:
///
/// - query-insensitive: the expectation URL must equal the request URL with
///   any `?query` stripped;
/// - query-sensitive: the expectation URL must be a literal prefix of the
///   full request URL. The expectation may omit trailing query parameters
///   and still require the request to start with what it does name. The
///   exact/prefix asymmetry is long-standing, relied-upon behavior.
#[must_use]
pub fn find_match<'a>(
    expectations: &'a [Expectation],
    request: &PreparedRequest,
) -> Option<&'a Expectation> {
    let url_without_query = request
        .url
        .split_once('?')
        .map_or(request.url.as_str(), |(base, _)| base);

    for expectation in expectations {
        if expectation.method() != request.method {
            continue;
        }

        let satisfied = if expectation.match_querystring() {
            request.url.starts_with(expectation.url())
        } else {
            expectation.url() == url_without_query
        };

        if satisfied {
            debug!(
                "Matched {} {} against expectation {}",
                request.method,
                request.url,
                expectation.url()
            );
            return Some(expectation);
        }
    }

    None
}
