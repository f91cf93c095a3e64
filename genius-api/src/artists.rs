//! Artist APIs.
//!
//! An artist is how Genius represents the creator of one or more songs,
//! usually a musician or group of musicians.
//!
//! - `artist`: `GET /artists/:id`
//! - `artist_songs`: `GET /artists/:id/songs?sort=&per_page=&page=`

use crate::client::GeniusClient;
use crate::error::Result;
use crate::types::ArtistSongsQuery;
use serde_json::Value;

impl GeniusClient {
    /// Data for a specific artist.
    pub fn artist(&self, token: Option<&str>, id: u64) -> Result<Option<Value>> {
        self.guarded("Artists.artist", token, |call| {
            call.get(&format!("/artists/{id}"), &[])
        })
    }

    /// Songs by an artist, 20 per page unless `query.per_page` says otherwise.
    pub fn artist_songs(
        &self,
        token: Option<&str>,
        id: u64,
        query: &ArtistSongsQuery,
    ) -> Result<Option<Value>> {
        self.guarded("Artists.artist_songs", token, |call| {
            call.get(&format!("/artists/{id}/songs"), &query.to_query())
        })
    }
}
