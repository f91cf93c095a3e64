//! Song APIs, plus lyrics scraped from the song page.
//!
//! # Endpoints
//!
//! ## `song`: `GET /songs/:id`
//!
//! ```json
//! {
//!   "meta": { "status": 200 },
//!   "response": { "song": { "id": 294649, "title": "...", "url": "https://genius.com/...", ... } }
//! }
//! ```
//!
//! ## `song_with_lyrics`: `GET /songs/:id` + `GET {web_base}/songs/:id`
//!
//! The API carries no lyrics. The song page embeds the web app's state as
//! `window.__PRELOADED_STATE__ = JSON.parse('...')`; that document is added
//! to the API response under `"lyrics"`.
//!
//! ## `lyrics`: `GET {web_base}/songs/:id`
//!
//! Plain text read from the page's lyrics containers.
//!
//! Both scraping operations retry when the page arrives without the expected
//! content, up to the configured [`RetryPolicy`](crate::RetryPolicy).

use crate::client::GeniusClient;
use crate::error::Result;
use crate::page;
use serde_json::Value;

impl GeniusClient {
    /// Song metadata by ID.
    pub fn song(&self, token: Option<&str>, id: u64) -> Result<Option<Value>> {
        self.guarded("Songs.song", token, |call| call.get(&format!("/songs/{id}"), &[]))
    }

    /// Song metadata with the page's preloaded state under `"lyrics"`.
    ///
    /// # Errors
    ///
    /// Reports `page_not_found` or, once retries are exhausted,
    /// `lyrics_not_found` and returns `Ok(None)`. A payload that is present
    /// but not valid JSON is a [`GeniusError::Json`](crate::GeniusError::Json).
    pub fn song_with_lyrics(&self, token: Option<&str>, id: u64) -> Result<Option<Value>> {
        self.guarded("Songs.song_with_lyrics", token, |call| {
            let song = call.get(&format!("/songs/{id}"), &[])?;
            let lyrics = call.scrape(&format!("/songs/{id}"), page::preloaded_state)?;
            Ok(attach_lyrics(song, lyrics))
        })
    }

    /// Plain-text lyrics of a song. Verses are separated by newlines.
    pub fn lyrics(&self, token: Option<&str>, id: u64) -> Result<Option<String>> {
        self.guarded("Songs.lyrics", token, |call| {
            call.scrape(&format!("/songs/{id}"), |html| Ok(page::lyrics_text(html)))
        })
    }
}

fn attach_lyrics(mut song: Value, lyrics: Value) -> Value {
    if let Some(map) = song.as_object_mut() {
        map.insert("lyrics".to_owned(), lyrics);
    }
    song
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ErrorKind;
    use crate::guard::tests::RecordingSink;
    use crate::retry::RetryPolicy;
    use crate::session::SessionManager;
    use crate::session::tests::FakeProbe;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    const SONG_JSON: &str = r#"{"meta":{"status":200},"response":{"song":{"id":1}}}"#;

    /// Serves `SONG_JSON` under `/api` and `page` everywhere else, one
    /// request per connection. Returns the base URL and a page-hit counter.
    fn serve(page_status: &'static str, page: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut header = String::new();
                loop {
                    header.clear();
                    if reader.read_line(&mut header).unwrap_or(0) <= 2 {
                        break;
                    }
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("/");
                let (status, content_type, body) = if path.starts_with("/api/") {
                    ("200 OK", "application/json", SONG_JSON)
                } else {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (page_status, "text/html", page)
                };
                let _ = write!(
                    stream,
                    "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
            }
        });

        (base, hits)
    }

    fn client_for(base: &str, max_attempts: u32) -> (GeniusClient, Arc<RecordingSink>) {
        let session = Arc::new(SessionManager::new(Arc::new(FakeProbe::default())));
        let sink = Arc::new(RecordingSink::default());
        let config = ClientConfig::default()
            .api_base(format!("{base}/api"))
            .web_base(base)
            .retry(RetryPolicy::new(max_attempts).with_delay(Duration::ZERO));
        let client = GeniusClient::from_parts(config, session, sink.clone()).unwrap();
        (client, sink)
    }

    #[test]
    fn missing_song_page_is_reported_once_without_retry() {
        let (base, pages) = serve("404 Not Found", "<html><body>gone</body></html>");
        let (client, sink) = client_for(&base, 3);

        assert!(client.song_with_lyrics(None, 1).unwrap().is_none());
        assert_eq!(pages.load(Ordering::SeqCst), 1);

        let reports = sink.reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "Songs.song_with_lyrics");
        assert_eq!(reports[0].1, ErrorKind::PageNotFound);
    }

    #[test]
    fn page_without_lyrics_is_fetched_max_attempts_times() {
        let (base, pages) = serve("200 OK", "<html><body><p>nothing</p></body></html>");
        let (client, sink) = client_for(&base, 3);

        assert!(client.lyrics(None, 1).unwrap().is_none());
        assert_eq!(pages.load(Ordering::SeqCst), 3);

        let reports = sink.reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "Songs.lyrics");
        assert_eq!(reports[0].1, ErrorKind::LyricsNotFound);
    }

    #[test]
    fn lyrics_are_read_from_the_page() {
        let (base, pages) = serve(
            "200 OK",
            r#"<html><body><div data-lyrics-container="true">Line one<br>Line two</div></body></html>"#,
        );
        let (client, sink) = client_for(&base, 3);

        assert_eq!(
            client.lyrics(None, 1).unwrap().as_deref(),
            Some("Line one\nLine two")
        );
        assert_eq!(pages.load(Ordering::SeqCst), 1);
        assert!(sink.reports.lock().is_empty());
    }

    #[test]
    fn lyrics_land_next_to_meta_and_response() {
        let song = json!({ "meta": { "status": 200 }, "response": { "song": { "id": 1 } } });
        let merged = attach_lyrics(song, json!({ "songPage": {} }));
        assert_eq!(merged["response"]["song"]["id"], json!(1));
        assert_eq!(merged["lyrics"], json!({ "songPage": {} }));
    }
}
