//! HTTP client for the Genius API.
//!
//! Every public operation is registered through [`GeniusClient::guarded`],
//! which runs it under the [`OperationGuard`] and hands it a [`Call`]. `Call`
//! is the only way an operation reaches the credential or the network.
//!
//! # Response format
//!
//! API responses share this envelope:
//!
//! ```json
//! {
//!   "meta": { "status": 200 },
//!   "response": { ...endpoint-specific fields... }
//! }
//! ```
//!
//! `meta.status` 401 maps to a credential error, other values >= 400 to
//! [`GeniusError::Api`]. A body that is markup or not a JSON object (e.g. a
//! CDN error page) maps to `ServiceUnavailable`.

use crate::config::ClientConfig;
use crate::error::{DomainError, GeniusError, Result, excerpt};
use crate::guard::{DiagnosticSink, OperationGuard, TracingSink};
use crate::retry;
use crate::session::{AccountProbe, Credential, SessionManager};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Query parameters of a single request.
pub(crate) type Query = Vec<(&'static str, String)>;

/// Blocking client for the Genius API.
///
/// Holds a [`reqwest::blocking::Client`], the configuration and the operation
/// guard (which owns the [`SessionManager`]). Resource operations are
/// implemented in separate modules (`account`, `search`, `songs`,
/// `annotations`, `referents`, `artists`, `web_pages`) as `impl GeniusClient`
/// blocks.
pub struct GeniusClient {
    http: Client,
    config: ClientConfig,
    guard: OperationGuard,
}

impl GeniusClient {
    /// Create a client with the default configuration and an empty session.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client whose session validates tokens against
    /// `{api_base}/account` and whose diagnostics go to `tracing`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = build_http(&config)?;
        let probe = Arc::new(AccountProbe::new(http.clone(), &config.api_base));
        let session = Arc::new(SessionManager::new(probe));
        let guard = OperationGuard::new(session, Arc::new(TracingSink));
        Ok(Self { http, config, guard })
    }

    /// Create a client around an existing session and diagnostic sink.
    pub fn from_parts(
        config: ClientConfig,
        session: Arc<SessionManager>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        let http = build_http(&config)?;
        let guard = OperationGuard::new(session, sink);
        Ok(Self { http, config, guard })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        self.guard.session()
    }

    /// Validate `token` and store it in the session.
    pub fn login(&self, token: impl Into<String>) -> std::result::Result<(), DomainError> {
        self.session().login(token)
    }

    pub fn logout(&self) {
        self.session().logout();
    }

    pub fn authorized(&self) -> bool {
        self.session().authorized("Auth.authorized")
    }

    /// Run `operation` under the guard.
    ///
    /// Domain errors become `Ok(None)` plus one diagnostic; other errors
    /// propagate.
    pub fn guarded<T, F>(&self, operation: &str, token: Option<&str>, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&Call<'_>) -> Result<T>,
    {
        self.guard.run(operation, token, |credential| {
            f(&Call {
                client: self,
                operation,
                credential,
            })
        })
    }
}

fn build_http(config: &ClientConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .build()?)
}

/// Context of one guarded operation.
pub struct Call<'a> {
    client: &'a GeniusClient,
    operation: &'a str,
    credential: Option<Credential>,
}

impl Call<'_> {
    pub fn operation(&self) -> &str {
        self.operation
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// The credential, or `CredentialMissing` naming this operation.
    pub fn require_credential(&self) -> Result<&Credential> {
        self.credential
            .as_ref()
            .ok_or_else(|| DomainError::credential_missing().with_operation(self.operation).into())
    }

    pub(crate) fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.send(Method::GET, path, query, None)
    }

    /// Send a request to `{api_base}{path}`, attaching `access_token` when a
    /// credential is present.
    pub(crate) fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.client.config.api_base);
        debug!(operation = self.operation, %method, %url, "API request");

        let mut req = self.client.http.request(method, &url).query(query);
        if let Some(credential) = &self.credential {
            req = req.query(&[("access_token", credential.as_str())]);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let text = req.send()?.text()?;
        interpret(self.operation, self.credential.is_some(), &text)
    }

    /// Fetch `{web_base}{path}` as text. A 404 is `PageNotFound`.
    pub(crate) fn fetch_page(&self, path: &str) -> Result<String> {
        let url = format!("{}{path}", self.client.config.web_base);
        debug!(operation = self.operation, %url, "Page request");
        let resp = self.client.http.get(&url).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(DomainError::page_not_found(Some(url)).into());
        }
        Ok(resp.text()?)
    }

    /// Fetch `{web_base}{path}` and extract from it under the retry policy.
    pub(crate) fn scrape<T, E>(&self, path: &str, extract: E) -> Result<T>
    where
        E: Fn(&str) -> Result<Option<T>>,
    {
        let config = &self.client.config;
        retry::scrape(
            &config.retry,
            self.operation,
            &config.not_found_marker,
            || self.fetch_page(path),
            extract,
        )
    }
}

/// Turn a raw API body into JSON, mapping error envelopes.
pub(crate) fn interpret(operation: &str, has_credential: bool, body: &str) -> Result<Value> {
    if body.trim_start().starts_with('<') {
        return Err(DomainError::service_unavailable(Some(excerpt(body, 200))).into());
    }
    let json: Value = serde_json::from_str(body)?;
    if !json.is_object() {
        return Err(DomainError::service_unavailable(Some(excerpt(body, 200))).into());
    }

    match json.pointer("/meta/status").and_then(Value::as_u64) {
        Some(401) => {
            let err = if has_credential {
                DomainError::credential_invalid()
            } else {
                DomainError::credential_missing()
            };
            Err(err.with_operation(operation).into())
        }
        Some(status) if status >= 400 => Err(GeniusError::Api {
            status,
            message: json
                .pointer("/meta/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned(),
        }),
        _ => Ok(json),
    }
}
