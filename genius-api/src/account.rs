//! Account API.
//!
//! Endpoint: `GET /account` (requires a token).
//!
//! Response:
//! ```json
//! {
//!   "meta": { "status": 200 },
//!   "response": {
//!     "user": {
//!       "id": 100033,
//!       "name": "Foo Bar",
//!       "login": "foobar",
//!       "url": "https://genius.com/foobar",
//!       "about_me": { "dom": { "tag": "root" } },
//!       ...
//!     }
//!   }
//! }
//! ```
//!
//! Fields repeat at several depths (`id`, `url`), which is what
//! [`deep_find`](crate::deep_find) is for.

use crate::client::GeniusClient;
use crate::deep_find::{DeepFind, Found};
use crate::error::Result;
use serde_json::Value;

impl GeniusClient {
    /// Account of the token owner.
    ///
    /// Without a session credential or `token` this reports
    /// `token_missing` and returns `Ok(None)`.
    pub fn account(&self, token: Option<&str>) -> Result<Option<Value>> {
        self.guarded("Account.account", token, |call| {
            call.require_credential()?;
            call.get("/account", &[])
        })
    }

    /// Alias of [`account`](Self::account).
    pub fn me(&self, token: Option<&str>) -> Result<Option<Value>> {
        self.account(token)
    }

    /// Every value stored under `field` in the account document.
    ///
    /// ```no_run
    /// # let client = genius_api::GeniusClient::new().unwrap();
    /// // e.g. Found::Many([100033, 234411]) for "id"
    /// let ids = client.account_field(None, "id").unwrap();
    /// ```
    pub fn account_field(&self, token: Option<&str>, field: &str) -> Result<Option<Found>> {
        Ok(self.account(token)?.map(|doc| doc.deep_find(field)))
    }
}
