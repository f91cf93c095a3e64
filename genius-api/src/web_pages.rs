//! Web page API.
//!
//! Endpoint: `GET /web_pages/lookup`
//!
//! A web page is a single, publicly accessible page annotations may be
//! attached to; pages map 1-to-1 with canonical URLs. Data is only available
//! for pages that already carry at least one annotation. The returned ID can
//! be fed to [`referents`](crate::GeniusClient::referents) as `web_page_id`.

use crate::client::GeniusClient;
use crate::error::Result;
use crate::types::WebPageQuery;
use serde_json::Value;

impl GeniusClient {
    /// Look a web page up by any of its URL variants.
    pub fn web_page_lookup(&self, token: Option<&str>, query: &WebPageQuery) -> Result<Option<Value>> {
        self.guarded("WebPages.lookup", token, |call| {
            let params = query.to_query()?;
            call.get("/web_pages/lookup", &params)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::offline_client;
    use crate::error::GeniusError;
    use crate::types::WebPageQuery;

    #[test]
    fn lookup_without_urls_is_rejected_before_sending() {
        let (client, _) = offline_client();
        let err = client.web_page_lookup(None, &WebPageQuery::default()).unwrap_err();
        assert!(matches!(err, GeniusError::InvalidArgument(_)));
    }
}
