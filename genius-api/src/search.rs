//! Search API.
//!
//! Endpoint: `GET /search?q={query}`
//!
//! Response JSON:
//! ```json
//! {
//!   "meta": { "status": 200 },
//!   "response": {
//!     "hits": [
//!       {
//!         "type": "song",
//!         "result": {
//!           "id": 3949,
//!           "title": "thank u, next",
//!           "full_title": "thank u, next by Ariana Grande",
//!           "primary_artist": { "id": 26507, "name": "Ariana Grande", ... },
//!           ...
//!         }
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Genius documents the endpoint as token-only, but it answers anonymous
//! requests too, so no credential is required here.

use crate::client::GeniusClient;
use crate::deep_find::DeepFind;
use crate::error::Result;
use serde_json::Value;

impl GeniusClient {
    /// Search songs, artists and lyrics.
    ///
    /// With `search_by`, the response is reduced to the values found under
    /// that key anywhere in it (see [`deep_find`](crate::deep_find::deep_find)):
    ///
    /// ```no_run
    /// # let client = genius_api::GeniusClient::new().unwrap();
    /// // ["Dirt", "HDMI", "RestInPeace", "Sodium"]
    /// let titles = client.search(None, "Bones", Some("title")).unwrap();
    /// ```
    pub fn search(
        &self,
        token: Option<&str>,
        query: &str,
        search_by: Option<&str>,
    ) -> Result<Option<Value>> {
        self.guarded("Search.search", token, |call| {
            let resp = call.get("/search", &[("q", query.to_owned())])?;
            Ok(narrow(resp, search_by))
        })
    }
}

/// Reduce a search response to the values under `key`; `[]` when none.
fn narrow(resp: Value, key: Option<&str>) -> Value {
    match key {
        Some(key) => resp.deep_find(key).into_value(),
        None => resp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "meta": { "status": 200 },
            "response": {
                "hits": [
                    { "type": "song", "result": { "id": 1, "title": "Dirt", "primary_artist": { "id": 9 } } },
                    { "type": "song", "result": { "id": 2, "title": "HDMI", "primary_artist": { "id": 9 } } }
                ]
            }
        })
    }

    #[test]
    fn without_key_the_response_is_untouched() {
        assert_eq!(narrow(response(), None), response());
    }

    #[test]
    fn key_collects_values_across_hits() {
        assert_eq!(narrow(response(), Some("title")), json!(["Dirt", "HDMI"]));
        assert_eq!(narrow(response(), Some("id")), json!([1, 9, 2]));
    }

    #[test]
    fn single_value_is_unwrapped() {
        assert_eq!(narrow(response(), Some("primary_artist")), json!({ "id": 9 }));
    }

    #[test]
    fn missing_key_is_an_empty_list() {
        assert_eq!(narrow(response(), Some("lyrics_state")), json!([]));
    }
}
