//! Annotation APIs.
//!
//! An annotation is a piece of content about a part of a document (a song
//! hosted on Genius, or any web page). The part it is attached to is a
//! referent.
//!
//! | Method                                   | Request                          | Scope               |
//! |------------------------------------------|----------------------------------|---------------------|
//! | [`GeniusClient::annotation`]             | `GET /annotations/:id`           |                     |
//! | [`GeniusClient::create_annotation`]      | `POST /annotations`              | `create_annotation` |
//! | [`GeniusClient::update_annotation`]      | `PUT /annotations/:id`           | `manage_annotation` |
//! | [`GeniusClient::delete_annotation`]      | `DELETE /annotations/:id`        | `manage_annotation` |
//! | [`GeniusClient::vote_annotation`]        | `PUT /annotations/:id/{vote}`    | `vote`              |
//!
//! Everything except `annotation` needs a token.

use crate::client::GeniusClient;
use crate::error::Result;
use crate::types::{AnnotationPayload, Vote};
use reqwest::Method;
use serde_json::Value;

impl GeniusClient {
    /// Data for a specific annotation.
    pub fn annotation(&self, token: Option<&str>, id: u64) -> Result<Option<Value>> {
        self.guarded("Annotations.annotation", token, |call| {
            call.get(&format!("/annotations/{id}"), &[])
        })
    }

    /// Create an annotation on a public web page. Returns the new
    /// annotation in the same form as [`annotation`](Self::annotation).
    pub fn create_annotation(
        &self,
        token: Option<&str>,
        payload: &AnnotationPayload,
    ) -> Result<Option<Value>> {
        self.guarded("Annotations.create_annotation", token, |call| {
            call.require_credential()?;
            call.send(Method::POST, "/annotations", &[], Some(&payload.to_body()))
        })
    }

    /// Update an annotation created by the authenticated user.
    pub fn update_annotation(
        &self,
        token: Option<&str>,
        id: u64,
        payload: &AnnotationPayload,
    ) -> Result<Option<Value>> {
        self.guarded("Annotations.update_annotation", token, |call| {
            call.require_credential()?;
            call.send(
                Method::PUT,
                &format!("/annotations/{id}"),
                &[],
                Some(&payload.to_body()),
            )
        })
    }

    /// Delete an annotation created by the authenticated user.
    pub fn delete_annotation(&self, token: Option<&str>, id: u64) -> Result<Option<Value>> {
        self.guarded("Annotations.delete_annotation", token, |call| {
            call.require_credential()?;
            call.send(Method::DELETE, &format!("/annotations/{id}"), &[], None)
        })
    }

    /// Vote on an annotation on behalf of the authenticated user.
    pub fn vote_annotation(&self, token: Option<&str>, id: u64, vote: Vote) -> Result<Option<Value>> {
        self.guarded("Annotations.vote_annotation", token, |call| {
            call.require_credential()?;
            call.send(
                Method::PUT,
                &format!("/annotations/{id}/{}", vote.action()),
                &[],
                None,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::offline_client;
    use crate::error::ErrorKind;
    use crate::types::{AnnotationPayload, Vote};

    #[test]
    fn mutations_need_a_credential() {
        let (client, sink) = offline_client();
        let payload = AnnotationPayload::new("hello **world!**", "https://example.com", "world");

        assert!(client.create_annotation(None, &payload).unwrap().is_none());
        assert!(client.update_annotation(None, 1, &payload).unwrap().is_none());
        assert!(client.delete_annotation(None, 1).unwrap().is_none());
        assert!(client.vote_annotation(None, 1, Vote::Up).unwrap().is_none());

        let reports = sink.reports.lock();
        let ops: Vec<&str> = reports.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(
            ops,
            [
                "Annotations.create_annotation",
                "Annotations.update_annotation",
                "Annotations.delete_annotation",
                "Annotations.vote_annotation",
            ]
        );
        assert!(reports.iter().all(|r| r.1 == ErrorKind::CredentialMissing));
    }
}
