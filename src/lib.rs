//! Waylay - In-process HTTP interception and mocking for deterministic tests
//!
//! Intercepts outgoing HTTP calls at the client's transport seam, matches
//! them against registered expectations, and synthesizes responses (or
//! connection failures) without touching the network.
//!
//! ```
//! use waylay::http::{HttpClient, Method, PreparedRequest};
//! use waylay::{Expectation, InterceptMock, ResponseTemplate};
//!
//! let mock = InterceptMock::new();
//! let client = HttpClient::new();
//!
//! mock.register(
//!     Expectation::new(Method::Get, "http://example.test/hello")
//!         .respond_with(ResponseTemplate::new(200).body("world")),
//! );
//!
//! mock.activate(&client, || {
//!     let request = PreparedRequest::new(Method::Get, "http://example.test/hello");
//!     let response = client.send(&request).unwrap();
//!     assert_eq!(response.status(), 200);
//!     assert_eq!(response.text().unwrap(), "world");
//! })
//! .unwrap();
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions
)]

pub mod error;
pub mod http;
pub mod mock;

pub use error::{Result, WaylayError};
pub use mock::{
    Call, CallLog, CallOutcome, CallbackReply, CapturedRequest, Expectation, InterceptMock,
    ResponseTemplate,
};
