//! Resolving matched expectations into transport responses

use tracing::{debug, warn};

use super::calls::{CallLog, CallOutcome};
use super::matcher::find_match;
use super::registry::{CallbackReply, Registry, Resolution};
use super::request::CapturedRequest;
use crate::http::{PreparedRequest, TransportResponse};
use crate::{Result, WaylayError};

/// Dispatch one request: match, resolve, record, return
///
/// The single-shot simulation of a network call. An unmatched request is
/// recorded and raised as a connection failure; sequence exhaustion and
/// callback failures propagate unwrapped. Nothing retries.
///
/// # Errors
///
/// Returns [`WaylayError::ConnectionRefused`] when no expectation matches,
/// [`WaylayError::SequenceExhausted`] when a finite sequence is matched past
/// its end, and any failure a callback or the response builder produces
pub fn dispatch(
    registry: &Registry,
    calls: &mut CallLog,
    request: &PreparedRequest,
) -> Result<TransportResponse> {
    let Some(expectation) = find_match(registry.expectations(), request) else {
        warn!("No expectation for {} {}", request.method, request.url);
        let failure = WaylayError::ConnectionRefused {
            url: request.url.clone(),
        };
        calls.record(request.clone(), CallOutcome::Failure(failure.clone()));
        return Err(failure);
    };

    let response = match expectation.resolution() {
        Resolution::Fixed(template) => template.build()?,
        Resolution::Callback(callback) => {
            let snapshot = CapturedRequest::from_prepared(request);
            match callback(&snapshot)? {
                CallbackReply::Template(template) => template.build()?,
                CallbackReply::Transport(response) => response,
            }
        }
        Resolution::Sequence(queue) => {
            let next = queue.borrow_mut().pop_front();
            let template = next.ok_or_else(|| WaylayError::SequenceExhausted {
                method: expectation.method().to_string(),
                url: expectation.url().to_string(),
            })?;
            template.build()?
        }
    };

    debug!(
        "Dispatched {} {} -> {}",
        request.method,
        request.url,
        response.status()
    );

    calls.record(request.clone(), CallOutcome::Response(response.clone()));
    Ok(response)
}
