//! Genius API client library.
//!
//! Provides blocking access to the Genius REST API (search, account, songs,
//! annotations, referents, artists, web pages) plus lyrics scraped from
//! genius.com song pages, which the API does not expose.
//!
//! # Authentication
//!
//! Most endpoints accept an access token. Tokens are 64 characters long and
//! are checked against `GET /account` before being accepted. The token is
//! held in memory by the client's [`SessionManager`]; it is never written to
//! disk.
//!
//! ```no_run
//! use genius_api::GeniusClient;
//!
//! let client = GeniusClient::new().unwrap();
//! client.login(std::env::var("GENIUS_TOKEN").unwrap()).unwrap();
//! assert!(client.authorized());
//!
//! let hits = client.search(None, "Bones", Some("title")).unwrap();
//! client.logout();
//! ```
//!
//! Every operation also takes `token: Option<&str>` to override the session
//! token for a single call.
//!
//! # Errors
//!
//! Operations return `Result<Option<T>>`. Expected failures (a missing or
//! rejected token, a song page without lyrics, ...) are [`DomainError`]s:
//! they are reported once through the client's [`DiagnosticSink`] and the
//! operation returns `Ok(None)`. Transport and decoding failures come back
//! as `Err`.
//!
//! # API endpoint mapping
//!
//! | Method                                 | Endpoint                      | Description              |
//! |----------------------------------------|-------------------------------|--------------------------|
//! | [`GeniusClient::account`]              | `/account`                    | Token owner's account    |
//! | [`GeniusClient::search`]               | `/search`                     | Search                   |
//! | [`GeniusClient::song`]                 | `/songs/:id`                  | Song metadata            |
//! | [`GeniusClient::song_with_lyrics`]     | `/songs/:id` + song page      | Metadata + lyrics state  |
//! | [`GeniusClient::lyrics`]               | song page                     | Plain-text lyrics        |
//! | [`GeniusClient::annotation`]           | `/annotations/:id`            | Annotation (and CRUD)    |
//! | [`GeniusClient::referents`]            | `/referents`                  | Referents by doc or user |
//! | [`GeniusClient::artist`]               | `/artists/:id`                | Artist                   |
//! | [`GeniusClient::artist_songs`]         | `/artists/:id/songs`          | Artist's songs           |
//! | [`GeniusClient::web_page_lookup`]      | `/web_pages/lookup`           | Web page by URL          |

mod account;
mod annotations;
mod artists;
pub mod client;
pub mod config;
pub mod deep_find;
pub mod error;
pub mod guard;
mod page;
mod referents;
pub mod retry;
mod search;
pub mod session;
mod songs;
pub mod types;
mod web_pages;

pub use client::{Call, GeniusClient};
pub use config::ClientConfig;
pub use deep_find::{DeepFind, Found, deep_find};
pub use error::{DomainError, ErrorKind, GeniusError, Result};
pub use guard::{DiagnosticSink, OperationGuard, TracingSink};
pub use retry::RetryPolicy;
pub use session::{Credential, SessionManager, StatusProbe};
