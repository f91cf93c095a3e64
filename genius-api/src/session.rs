//! Session management: holds the access token for the lifetime of a client.
//!
//! A token is accepted only if it is exactly 64 characters long **and** the
//! account-status probe (`GET /account?access_token=...`) reports
//! `meta.status == 200`. The token lives in memory only; it is never written
//! to disk.
//!
//! Transport failures during the probe are reported as
//! [`DomainError::CredentialInvalid`], the same as a rejected token.

use crate::error::{DomainError, Result};
use parking_lot::RwLock;
use reqwest::blocking::Client;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Required token length.
pub const CREDENTIAL_LEN: usize = 64;

/// An API access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token has the expected shape (does not contact the server).
    pub fn is_well_formed(&self) -> bool {
        self.0.chars().count() == CREDENTIAL_LEN
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Remote check of a token.
///
/// Returns the `meta.status` value the service reported, or `None` if the
/// response carried no status.
pub trait StatusProbe: Send + Sync {
    fn status(&self, credential: &Credential) -> Result<Option<u64>>;
}

/// [`StatusProbe`] backed by `GET {api_base}/account`.
pub struct AccountProbe {
    http: Client,
    endpoint: String,
}

impl AccountProbe {
    pub fn new(http: Client, api_base: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/account", api_base.trim_end_matches('/')),
        }
    }
}

impl StatusProbe for AccountProbe {
    fn status(&self, credential: &Credential) -> Result<Option<u64>> {
        let body = self
            .http
            .get(&self.endpoint)
            .query(&[("access_token", credential.as_str())])
            .send()?
            .text()?;
        let json: Value = serde_json::from_str(&body)?;
        Ok(json.pointer("/meta/status").and_then(Value::as_u64))
    }
}

/// Owns the current credential and answers "is this session authorized?".
///
/// The credential sits behind a lock so a manager can be shared between
/// threads; the probe runs without holding it.
pub struct SessionManager {
    credential: RwLock<Option<Credential>>,
    probe: Arc<dyn StatusProbe>,
}

impl SessionManager {
    pub fn new(probe: Arc<dyn StatusProbe>) -> Self {
        Self {
            credential: RwLock::new(None),
            probe,
        }
    }

    /// Validate `token` and make it the session credential.
    ///
    /// On failure the previous credential, if any, is kept.
    pub fn login(&self, token: impl Into<String>) -> std::result::Result<(), DomainError> {
        let candidate = Credential::new(token);
        self.validate(Some(&candidate), "Auth.login")?;
        *self.credential.write() = Some(candidate);
        info!("Logged in");
        Ok(())
    }

    /// Whether the current credential passes validation. Never fails.
    ///
    /// `operation` only feeds diagnostics.
    pub fn authorized(&self, operation: &str) -> bool {
        let current = self.credential();
        match self.validate(current.as_ref(), operation) {
            Ok(()) => true,
            Err(e) => {
                debug!(operation, kind = %e.kind(), "Session not authorized");
                false
            }
        }
    }

    /// Drop the credential. Idempotent.
    pub fn logout(&self) {
        if self.credential.write().take().is_some() {
            info!("Logged out");
        }
    }

    /// A copy of the current credential.
    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    /// Check a credential's shape and have the remote service confirm it.
    pub fn validate(
        &self,
        credential: Option<&Credential>,
        operation: &str,
    ) -> std::result::Result<(), DomainError> {
        let Some(credential) = credential else {
            return Err(DomainError::credential_missing().with_operation(operation));
        };
        if !credential.is_well_formed() {
            return Err(DomainError::credential_invalid().with_operation(operation));
        }
        match self.probe.status(credential) {
            Ok(Some(200)) => Ok(()),
            Ok(status) => {
                debug!(operation, ?status, "Token rejected by account probe");
                Err(DomainError::credential_invalid().with_operation(operation))
            }
            Err(e) => {
                debug!(operation, error = %e, "Account probe failed");
                Err(DomainError::credential_invalid().with_operation(operation))
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{ErrorKind, GeniusError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Token the fake probe accepts.
    pub(crate) fn good() -> String {
        "a".repeat(CREDENTIAL_LEN)
    }

    /// Token the fake probe answers with 401.
    pub(crate) fn revoked() -> String {
        "r".repeat(CREDENTIAL_LEN)
    }

    /// Token for which the fake probe fails at the transport level.
    pub(crate) fn offline() -> String {
        "o".repeat(CREDENTIAL_LEN)
    }

    #[derive(Default)]
    pub(crate) struct FakeProbe {
        pub(crate) calls: AtomicUsize,
    }

    impl StatusProbe for FakeProbe {
        fn status(&self, credential: &Credential) -> Result<Option<u64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match credential.as_str().chars().next() {
                Some('a') => Ok(Some(200)),
                Some('r') => Ok(Some(401)),
                Some('o') => Err(GeniusError::Other("connection refused".into())),
                _ => Ok(None),
            }
        }
    }

    fn manager() -> (SessionManager, Arc<FakeProbe>) {
        let probe = Arc::new(FakeProbe::default());
        (SessionManager::new(probe.clone()), probe)
    }

    #[test]
    fn lifecycle() {
        let (session, _) = manager();
        assert!(!session.authorized("test"));

        session.login(good()).unwrap();
        assert!(session.authorized("test"));

        session.logout();
        assert!(!session.authorized("test"));
        assert!(session.credential().is_none());
    }

    #[test]
    fn wrong_length_fails_without_probing() {
        let (session, probe) = manager();
        let err = session.login("invalid_token").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert_eq!(err.operation(), Some("Auth.login"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_login_keeps_previous_credential() {
        let (session, _) = manager();
        session.login(good()).unwrap();

        assert!(session.login("short").is_err());
        assert!(session.login(revoked()).is_err());

        assert_eq!(session.credential(), Some(Credential::new(good())));
        assert!(session.authorized("test"));
    }

    #[test]
    fn rejected_and_statusless_tokens_are_invalid() {
        let (session, _) = manager();
        let err = session.login(revoked()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);

        let unknown = "u".repeat(CREDENTIAL_LEN);
        let err = session.login(unknown).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    // A network failure is indistinguishable from a bad token here; callers
    // that need to tell them apart must inspect logs, not the error kind.
    #[test]
    fn probe_transport_failure_reads_as_invalid_credential() {
        let (session, _) = manager();
        let err = session.login(offline()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert_ne!(err.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn missing_credential_names_the_operation() {
        let (session, _) = manager();
        let err = session.validate(None, "Account.account").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialMissing);
        assert_eq!(err.operation(), Some("Account.account"));
    }

    #[test]
    fn logout_twice_is_fine() {
        let (session, _) = manager();
        session.logout();
        session.login(good()).unwrap();
        session.logout();
        session.logout();
        assert!(session.credential().is_none());
    }

    #[test]
    fn length_counts_characters() {
        let token = "é".repeat(CREDENTIAL_LEN);
        assert!(Credential::new(token).is_well_formed());
        assert!(!Credential::new("x".repeat(CREDENTIAL_LEN + 1)).is_well_formed());
    }

    #[test]
    fn debug_hides_secret() {
        let c = Credential::new(good());
        assert_eq!(format!("{c:?}"), "Credential(***)");
    }
}
