//! Minimal host client with a settable transport hook
//!
//! The engine never patches client internals. Instead the client exposes a
//! transport-override slot; the session controller installs the dispatcher
//! into it and clears it when the session ends.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::{PreparedRequest, TransportResponse};
use crate::{Result, WaylayError};

/// The seam a client's send path can be redirected through
pub trait TransportHook {
    /// Handle a prepared request and produce a transport response
    fn handle(&self, request: &PreparedRequest) -> Result<TransportResponse>;
}

/// A stand-in HTTP client exposing the collaborator surface the engine needs
///
/// `send` routes every request through the installed hook. Without a hook
/// there is nowhere for a request to go; a real client would open a socket
/// here, this one fails with [`WaylayError::NoTransport`].
#[derive(Default)]
pub struct HttpClient {
    hook: RefCell<Option<Rc<dyn TransportHook>>>,
}

impl HttpClient {
    /// Create a client with no hook installed
    #[must_use]
    pub fn new() -> Self {
        Self {
            hook: RefCell::new(None),
        }
    }

    /// Send a prepared request through the transport
    ///
    /// # Errors
    ///
    /// Returns whatever the installed hook produces, or
    /// [`WaylayError::NoTransport`] when no hook is installed
    pub fn send(&self, request: &PreparedRequest) -> Result<TransportResponse> {
        let hook = self.hook.borrow().clone();
        match hook {
            Some(hook) => hook.handle(request),
            None => Err(WaylayError::NoTransport(request.url.clone())),
        }
    }

    /// Install a transport override, replacing any previous one
    pub fn install_hook(&self, hook: Rc<dyn TransportHook>) {
        debug!("Installing transport hook");
        *self.hook.borrow_mut() = Some(hook);
    }

    /// Remove the transport override, restoring default behavior
    pub fn clear_hook(&self) {
        debug!("Clearing transport hook");
        *self.hook.borrow_mut() = None;
    }

    /// Whether a transport override is currently installed
    #[must_use]
    pub fn has_hook(&self) -> bool {
        self.hook.borrow().is_some()
    }
}
