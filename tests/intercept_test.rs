//! End-to-end tests for the interception engine through the client surface

use std::panic::{catch_unwind, AssertUnwindSafe};

use waylay::http::{HttpClient, Method, PreparedRequest};
use waylay::{CallOutcome, Expectation, InterceptMock, ResponseTemplate, WaylayError};

fn setup() -> (InterceptMock, HttpClient) {
    (InterceptMock::new(), HttpClient::new())
}

#[test]
fn fixed_response_round_trips_exactly() {
    let (mock, client) = setup();
    mock.add(
        Method::Get,
        "http://example.test/api",
        ResponseTemplate::new(202)
            .body("payload")
            .content_type("application/json")
            .header("X-Token", "abc"),
    );

    mock.activate(&client, || {
        let response = client
            .send(&PreparedRequest::new(Method::Get, "http://example.test/api"))
            .unwrap();

        assert_eq!(response.status(), 202);
        assert_eq!(response.bytes(), b"payload");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("X-Token"), Some("abc"));
    })
    .unwrap();
}

#[test]
fn first_match_wins_for_overlapping_expectations() {
    let (mock, client) = setup();
    mock.add(
        Method::Get,
        "http://example.test/dup",
        ResponseTemplate::new(200).body("first"),
    );
    mock.add(
        Method::Get,
        "http://example.test/dup",
        ResponseTemplate::new(200).body("second"),
    );

    mock.activate(&client, || {
        let response = client
            .send(&PreparedRequest::new(Method::Get, "http://example.test/dup"))
            .unwrap();
        assert_eq!(response.bytes(), b"first");
    })
    .unwrap();
}

#[test]
fn host_only_registration_matches_slash_request() {
    let (mock, client) = setup();
    mock.add(Method::Get, "http://example.test", ResponseTemplate::new(200));

    mock.activate(&client, || {
        let response = client
            .send(&PreparedRequest::new(Method::Get, "http://example.test/"))
            .unwrap();
        assert_eq!(response.status(), 200);
    })
    .unwrap();
}

#[test]
fn query_string_sensitivity() {
    let (mock, client) = setup();
    mock.register(
        Expectation::new(Method::Get, "http://example.test/?a=1")
            .match_querystring()
            .respond_with(ResponseTemplate::new(200).body("qs")),
    );

    mock.activate(&client, || {
        let hit = client
            .send(&PreparedRequest::new(
                Method::Get,
                "http://example.test/?a=1",
            ))
            .unwrap();
        assert_eq!(hit.bytes(), b"qs");

        // Extra trailing parameters still satisfy the registered prefix.
        let prefix_hit = client
            .send(&PreparedRequest::new(
                Method::Get,
                "http://example.test/?a=1&b=2",
            ))
            .unwrap();
        assert_eq!(prefix_hit.bytes(), b"qs");

        let miss = client
            .send(&PreparedRequest::new(
                Method::Get,
                "http://example.test/?a=2",
            ))
            .unwrap_err();
        assert!(matches!(miss, WaylayError::ConnectionRefused { .. }));
    })
    .unwrap();
}

#[test]
fn sequence_consumes_in_order_then_exhausts() {
    let (mock, client) = setup();
    mock.register(
        Expectation::new(Method::Get, "http://example.test/seq").respond_with_sequence(vec![
            ResponseTemplate::new(200).body("r1"),
            ResponseTemplate::new(503).body("r2"),
        ]),
    );

    mock.activate(&client, || {
        let request = PreparedRequest::new(Method::Get, "http://example.test/seq");

        assert_eq!(client.send(&request).unwrap().bytes(), b"r1");

        let second = client.send(&request).unwrap();
        assert_eq!(second.status(), 503);
        assert_eq!(second.bytes(), b"r2");

        let err = client.send(&request).unwrap_err();
        assert!(matches!(err, WaylayError::SequenceExhausted { .. }));
    })
    .unwrap();
}

#[test]
fn callback_inspects_method() {
    let (mock, client) = setup();
    for method in [Method::Get, Method::Post] {
        mock.register(
            Expectation::new(method, "http://example.test/guard").respond_with_fn(|request| {
                let status = if request.method == Method::Get { 200 } else { 404 };
                Ok(ResponseTemplate::new(status))
            }),
        );
    }

    mock.activate(&client, || {
        let get = client
            .send(&PreparedRequest::new(
                Method::Get,
                "http://example.test/guard",
            ))
            .unwrap();
        assert_eq!(get.status(), 200);

        let post = client
            .send(&PreparedRequest::new(
                Method::Post,
                "http://example.test/guard",
            ))
            .unwrap();
        assert_eq!(post.status(), 404);
    })
    .unwrap();
}

#[test]
fn unregistered_url_is_refused_and_logged_once() {
    let (mock, client) = setup();

    mock.start(&client).unwrap();

    let err = client
        .send(&PreparedRequest::new(
            Method::Get,
            "http://example.test/unregistered",
        ))
        .unwrap_err();

    assert!(matches!(err, WaylayError::ConnectionRefused { .. }));
    assert!(err.to_string().contains("http://example.test/unregistered"));

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        calls.get(0).unwrap().outcome,
        CallOutcome::Failure(WaylayError::ConnectionRefused { .. })
    ));

    mock.stop(&client);
    mock.reset();
}

#[test]
fn call_log_preserves_dispatch_order() {
    let (mock, client) = setup();
    mock.add(
        Method::Get,
        "http://example.test/known",
        ResponseTemplate::new(200),
    );

    mock.activate(&client, || {
        let known = PreparedRequest::new(Method::Get, "http://example.test/known");
        let unknown = PreparedRequest::new(Method::Get, "http://example.test/unknown");

        let _ = client.send(&known);
        let _ = client.send(&unknown);
        let _ = client.send(&known);

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls.get(0).unwrap().request.url, "http://example.test/known");
        assert_eq!(
            calls.get(1).unwrap().request.url,
            "http://example.test/unknown"
        );
        assert!(matches!(
            calls.get(1).unwrap().outcome,
            CallOutcome::Failure(_)
        ));
        assert!(matches!(
            calls.get(2).unwrap().outcome,
            CallOutcome::Response(_)
        ));
    })
    .unwrap();
}

#[test]
fn activate_cleans_up_after_a_panicking_test() {
    let (mock, client) = setup();
    mock.add(
        Method::Get,
        "http://example.test/doomed",
        ResponseTemplate::new(200),
    );

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        mock.activate(&client, || {
            let _ = client.send(&PreparedRequest::new(
                Method::Get,
                "http://example.test/doomed",
            ));
            panic!("test body failed");
        })
    }));

    assert!(outcome.is_err());
    assert!(!mock.is_active());
    assert!(!client.has_hook());
    assert_eq!(mock.call_count(), 0);

    // The registry was reset too: the old expectation is gone.
    mock.start(&client).unwrap();
    let err = client
        .send(&PreparedRequest::new(
            Method::Get,
            "http://example.test/doomed",
        ))
        .unwrap_err();
    assert!(matches!(err, WaylayError::ConnectionRefused { .. }));
    mock.stop(&client);
}

#[test]
fn activate_cleans_up_after_a_normal_return() {
    let (mock, client) = setup();
    mock.add(Method::Get, "http://example.test/", ResponseTemplate::new(200));

    let value = mock
        .activate(&client, || {
            client
                .send(&PreparedRequest::new(Method::Get, "http://example.test/"))
                .unwrap()
                .status()
        })
        .unwrap();

    assert_eq!(value, 200);
    assert!(!client.has_hook());
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn fixed_response_reuse_is_structurally_identical() {
    let (mock, client) = setup();
    mock.add(
        Method::Get,
        "http://example.test/stable",
        ResponseTemplate::new(200).body("constant"),
    );

    mock.activate(&client, || {
        let request = PreparedRequest::new(Method::Get, "http://example.test/stable");
        let bodies: Vec<Vec<u8>> = (0..3)
            .map(|_| client.send(&request).unwrap().bytes().to_vec())
            .collect();

        assert_eq!(bodies[0], b"constant");
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
    })
    .unwrap();
}

#[test]
fn streamed_response_reads_after_session_via_reader() {
    use std::io::Read;

    let (mock, client) = setup();
    mock.add(
        Method::Get,
        "http://example.test/stream",
        ResponseTemplate::new(200).body("drip").stream(true),
    );

    let response = mock
        .activate(&client, || {
            client
                .send(&PreparedRequest::new(
                    Method::Get,
                    "http://example.test/stream",
                ))
                .unwrap()
        })
        .unwrap();

    assert!(response.is_streamed());
    let mut body = String::new();
    response.into_reader().read_to_string(&mut body).unwrap();
    assert_eq!(body, "drip");
}
