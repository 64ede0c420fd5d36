//! Interception engine: registration, matching, dispatch, and sessions

mod calls;
mod dispatch;
mod matcher;
mod registry;
mod request;
mod template;

pub use calls::{Call, CallLog, CallOutcome};
pub use matcher::find_match;
pub use registry::{CallbackFn, CallbackReply, Expectation, ExpectationBuilder, Resolution};
pub use request::CapturedRequest;
pub use template::{ResponseTemplate, DEFAULT_CONTENT_TYPE};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::info;

use crate::http::{HttpClient, Method, PreparedRequest, TransportHook, TransportResponse};
use crate::{Result, WaylayError};

/// Session-scoped state shared between the handle and the installed hook
#[derive(Default)]
struct MockState {
    registry: RefCell<registry::Registry>,
    calls: RefCell<CallLog>,
    active: Cell<bool>,
}

impl TransportHook for MockState {
    fn handle(&self, request: &PreparedRequest) -> Result<TransportResponse> {
        dispatch::dispatch(
            &self.registry.borrow(),
            &mut self.calls.borrow_mut(),
            request,
        )
    }
}

/// The interception service object: registry, call log, and session control
///
/// One explicit instance per test (or one shared sequentially across tests);
/// there is no implicit global. Cloning yields another handle to the same
/// session state.
///
/// The model is single-threaded by design: expectations are registered,
/// requests dispatched, and calls read back from the one thread that
/// installed the hook.
#[derive(Clone, Default)]
pub struct InterceptMock {
    state: Rc<MockState>,
}

impl InterceptMock {
    /// Create an inactive mock with an empty registry and call log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an expectation; first registered, first matched
    pub fn register(&self, expectation: Expectation) {
        self.state.registry.borrow_mut().register(expectation);
    }

    /// Register a fixed response for a method + URL
    ///
    /// Shorthand for the common case; use [`InterceptMock::register`] with
    /// an [`Expectation`] for query-string matching, callbacks, or
    /// sequences.
    pub fn add(&self, method: Method, url: impl Into<String>, template: ResponseTemplate) {
        self.register(Expectation::new(method, url).respond_with(template));
    }

    /// Install the transport hook, entering the ACTIVE state
    ///
    /// # Errors
    ///
    /// Fails with [`WaylayError::AlreadyActive`] when a session is already
    /// running; exactly one active session is permitted at a time
    pub fn start(&self, client: &HttpClient) -> Result<()> {
        if self.state.active.get() {
            return Err(WaylayError::AlreadyActive);
        }

        info!("Starting interception session");
        client.install_hook(Rc::clone(&self.state) as Rc<dyn TransportHook>);
        self.state.active.set(true);
        Ok(())
    }

    /// Uninstall the transport hook, returning the client to its original
    /// behavior
    ///
    /// Idempotent: stopping an inactive session is a no-op, which lets
    /// cleanup paths call it unconditionally.
    pub fn stop(&self, client: &HttpClient) {
        if self.state.active.replace(false) {
            info!("Stopping interception session");
            client.clear_hook();
        }
    }

    /// Clear the registry and call log; callable in either state
    pub fn reset(&self) {
        info!("Resetting registry and call log");
        self.state.registry.borrow_mut().reset();
        self.state.calls.borrow_mut().reset();
    }

    /// Run a test body with interception active
    ///
    /// Starts the session, runs `test`, and on every exit path — normal
    /// return or panic — stops the session and resets all state before the
    /// outcome propagates. No intercepted state leaks between tests.
    ///
    /// # Errors
    ///
    /// Fails with [`WaylayError::AlreadyActive`] when a session is already
    /// running; the test body is not invoked in that case
    pub fn activate<T>(&self, client: &HttpClient, test: impl FnOnce() -> T) -> Result<T> {
        self.start(client)?;

        struct SessionGuard<'a> {
            mock: &'a InterceptMock,
            client: &'a HttpClient,
        }

        impl Drop for SessionGuard<'_> {
            fn drop(&mut self) {
                self.mock.stop(self.client);
                self.mock.reset();
            }
        }

        let _guard = SessionGuard { mock: self, client };
        Ok(test())
    }

    /// Whether a session is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.active.get()
    }

    /// Read-only snapshot of the calls recorded so far
    #[must_use]
    pub fn calls(&self) -> CallLog {
        self.state.calls.borrow().clone()
    }

    /// Number of calls recorded so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.calls.borrow().len()
    }
}
