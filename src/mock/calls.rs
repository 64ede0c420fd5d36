//! Append-only log of intercepted calls

use crate::http::{PreparedRequest, TransportResponse};
use crate::WaylayError;

/// What a dispatch produced: a synthesized response or a failure
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// A synthesized transport response
    Response(TransportResponse),
    /// The failure raised for this call
    Failure(WaylayError),
}

/// One recorded (request, outcome) pair; never mutated after append
#[derive(Debug, Clone)]
pub struct Call {
    /// The request as it was dispatched
    pub request: PreparedRequest,
    /// The response or failure it produced
    pub outcome: CallOutcome,
}

/// Append-only, index-readable record of every dispatch in a session
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Vec<Call>,
}

impl CallLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call
    pub fn record(&mut self, request: PreparedRequest, outcome: CallOutcome) {
        self.calls.push(Call { request, outcome });
    }

    /// Number of recorded calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether anything has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Call at the given index, in dispatch order
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Call> {
        self.calls.get(index)
    }

    /// Iterate calls in dispatch order
    pub fn iter(&self) -> std::slice::Iter<'_, Call> {
        self.calls.iter()
    }

    /// Clear the log
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl<'a> IntoIterator for &'a CallLog {
    type Item = &'a Call;
    type IntoIter = std::slice::Iter<'a, Call>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Body, Method};
    use bytes::Bytes;

    fn response(status: u16) -> TransportResponse {
        TransportResponse::new(status, vec![], Body::Buffered(Bytes::new()))
    }

    #[test]
    fn records_in_dispatch_order() {
        let mut log = CallLog::new();
        for (i, status) in [200u16, 404, 500].iter().enumerate() {
            let request =
                PreparedRequest::new(Method::Get, format!("http://example.test/{i}"));
            log.record(request, CallOutcome::Response(response(*status)));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.get(1).unwrap().request.url, "http://example.test/1");
        match &log.get(2).unwrap().outcome {
            CallOutcome::Response(r) => assert_eq!(r.status(), 500),
            CallOutcome::Failure(_) => panic!("expected a response outcome"),
        }
    }

    #[test]
    fn records_failures() {
        let mut log = CallLog::new();
        let request = PreparedRequest::new(Method::Get, "http://example.test/missing");
        log.record(
            request,
            CallOutcome::Failure(WaylayError::ConnectionRefused {
                url: "http://example.test/missing".to_string(),
            }),
        );

        assert!(matches!(
            log.get(0).unwrap().outcome,
            CallOutcome::Failure(WaylayError::ConnectionRefused { .. })
        ));
    }

    #[test]
    fn reset_empties_the_log() {
        let mut log = CallLog::new();
        log.record(
            PreparedRequest::new(Method::Get, "http://example.test/"),
            CallOutcome::Response(response(200)),
        );
        log.reset();

        assert!(log.is_empty());
        assert!(log.get(0).is_none());
    }

    #[test]
    fn iteration_walks_all_calls() {
        let mut log = CallLog::new();
        for i in 0..4 {
            log.record(
                PreparedRequest::new(Method::Get, format!("http://example.test/{i}")),
                CallOutcome::Response(response(200)),
            );
        }

        assert_eq!(log.iter().count(), 4);
    }
}
