//! Referents API.
//!
//! Endpoint: `GET /referents`
//!
//! Referents are the sections of a document annotations are attached to.
//! They can be listed by the document (`song_id` or `web_page_id`, not both)
//! or by the user who annotated them (`created_by_id`).

use crate::client::GeniusClient;
use crate::error::Result;
use crate::types::ReferentsQuery;
use serde_json::Value;

impl GeniusClient {
    /// Referents by content item or by annotating user.
    ///
    /// # Errors
    ///
    /// [`GeniusError::InvalidArgument`](crate::GeniusError::InvalidArgument)
    /// if both `song_id` and `web_page_id` are set. This is a caller error and
    /// is not intercepted.
    pub fn referents(&self, token: Option<&str>, query: &ReferentsQuery) -> Result<Option<Value>> {
        self.guarded("Referents.referents", token, |call| {
            let params = query.to_query()?;
            call.get("/referents", &params)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::offline_client;
    use crate::error::GeniusError;
    use crate::types::ReferentsQuery;

    #[test]
    fn conflicting_documents_propagate() {
        let (client, sink) = offline_client();
        let query = ReferentsQuery {
            song_id: Some(1),
            web_page_id: Some(2),
            ..Default::default()
        };
        let err = client.referents(None, &query).unwrap_err();
        assert!(matches!(err, GeniusError::InvalidArgument(_)));
        assert!(sink.reports.lock().is_empty());
    }
}
