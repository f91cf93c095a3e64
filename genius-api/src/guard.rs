//! The operation guard every public resource operation runs through.
//!
//! For each call the guard:
//!
//! 1. resolves the credential: an explicit token is validated in full,
//!    otherwise the session is asked whether it is authorized (advisory only,
//!    the call proceeds either way and the session credential, if any, is
//!    handed to the operation);
//! 2. runs the operation;
//! 3. turns a [`DomainError`] into exactly one diagnostic on the configured
//!    [`DiagnosticSink`] and an `Ok(None)` result. Every other error
//!    propagates unchanged.

use crate::error::{DomainError, GeniusError, Result};
use crate::session::{Credential, SessionManager};
use std::sync::Arc;
use tracing::{debug, warn};

/// Destination for intercepted domain errors.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, operation: &str, error: &DomainError);
}

/// Writes diagnostics as two `warn` events: description, then kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, operation: &str, error: &DomainError) {
        warn!(operation, "Error description: {}", error.message());
        warn!(operation, "Exception type: {}", error.kind());
    }
}

pub struct OperationGuard {
    session: Arc<SessionManager>,
    sink: Arc<dyn DiagnosticSink>,
}

impl OperationGuard {
    pub fn new(session: Arc<SessionManager>, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { session, sink }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Run `operation` under the guard.
    ///
    /// `name` identifies the operation in diagnostics (e.g. `Songs.song`).
    /// `token` overrides the session credential for this call only.
    pub fn run<T, F>(&self, name: &str, token: Option<&str>, operation: F) -> Result<Option<T>>
    where
        F: FnOnce(Option<Credential>) -> Result<T>,
    {
        let outcome = self
            .resolve(name, token)
            .map_err(GeniusError::from)
            .and_then(operation);
        self.intercept(name, outcome)
    }

    fn resolve(&self, name: &str, token: Option<&str>) -> std::result::Result<Option<Credential>, DomainError> {
        if let Some(token) = token {
            let credential = Credential::new(token);
            self.session.validate(Some(&credential), name)?;
            return Ok(Some(credential));
        }
        if !self.session.authorized(name) {
            debug!(operation = name, "Proceeding without an authorized session");
        }
        Ok(self.session.credential())
    }

    fn intercept<T>(&self, name: &str, outcome: Result<T>) -> Result<Option<T>> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(GeniusError::Domain(e)) => {
                self.sink.report(name, &e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
