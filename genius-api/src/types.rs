//! Request parameter types.
//!
//! Responses are returned as raw [`serde_json::Value`] documents (use
//! [`deep_find`](crate::deep_find) to dig into them). The types here describe
//! what goes *into* a request; invalid combinations the API would reject are
//! made unrepresentable where possible and checked before sending otherwise.

use crate::client::Query;
use crate::error::{GeniusError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Vote on an annotation, mapped to the `PUT /annotations/:id/{action}` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
    /// Remove a previous up- or down-vote.
    Clear,
}

impl Vote {
    pub fn action(self) -> &'static str {
        match self {
            Self::Up => "upvote",
            Self::Down => "downvote",
            Self::Clear => "unvote",
        }
    }
}

/// Body of `POST /annotations` and `PUT /annotations/:id`.
///
/// Serialized as:
///
/// ```json
/// {
///   "annotation": { "body": { "markdown": "hello **world!**" } },
///   "referent": {
///     "raw_annotatable_url": "http://seejohncode.com/2014/01/27/vim-commands-piping/",
///     "fragment": "execute commands",
///     "context_for_display": {
///       "before_html": "You may know that you can ",
///       "after_html": " from inside of vim, with a vim command:"
///     }
///   },
///   "web_page": { "canonical_url": null, "og_url": null, "title": "Secret of Mana" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationPayload {
    /// Note text, in Markdown. Required.
    pub markdown: String,
    /// Original URL of the annotated page. Required.
    pub raw_annotatable_url: String,
    /// Highlighted fragment. Required.
    pub fragment: String,
    /// HTML before the fragment (prefer up to 200 characters).
    pub before_html: Option<String>,
    /// HTML after the fragment (prefer up to 200 characters).
    pub after_html: Option<String>,
    /// `href` of the page's `<link rel="canonical">`.
    pub canonical_url: Option<String>,
    /// `content` of the page's `<meta property="og:url">`.
    pub og_url: Option<String>,
    pub title: Option<String>,
}

impl AnnotationPayload {
    pub fn new(
        markdown: impl Into<String>,
        raw_annotatable_url: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            markdown: markdown.into(),
            raw_annotatable_url: raw_annotatable_url.into(),
            fragment: fragment.into(),
            ..Self::default()
        }
    }

    pub(crate) fn to_body(&self) -> Value {
        json!({
            "annotation": { "body": { "markdown": self.markdown } },
            "referent": {
                "raw_annotatable_url": self.raw_annotatable_url,
                "fragment": self.fragment,
                "context_for_display": {
                    "before_html": self.before_html,
                    "after_html": self.after_html,
                },
            },
            "web_page": {
                "canonical_url": self.canonical_url,
                "og_url": self.og_url,
                "title": self.title,
            },
        })
    }
}

/// Text body format for referents, see <https://docs.genius.com/#response-format-h1>.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Dom,
    Plain,
    Html,
}

impl TextFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dom => "dom",
            Self::Plain => "plain",
            Self::Html => "html",
        }
    }
}

/// Parameters of `GET /referents`.
///
/// At most one of `song_id` and `web_page_id` may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferentsQuery {
    /// Only referents with annotations by this user.
    pub created_by_id: Option<u64>,
    pub song_id: Option<u64>,
    pub web_page_id: Option<u64>,
    /// Formats for text bodies; empty means the server default (`dom`).
    pub text_format: Vec<TextFormat>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl ReferentsQuery {
    pub(crate) fn to_query(&self) -> Result<Query> {
        if self.song_id.is_some() && self.web_page_id.is_some() {
            return Err(GeniusError::InvalidArgument(
                "you may pass only one of song_id and web_page_id, not both".into(),
            ));
        }
        let mut q = Query::new();
        push(&mut q, "created_by_id", self.created_by_id);
        push(&mut q, "song_id", self.song_id);
        push(&mut q, "web_page_id", self.web_page_id);
        if !self.text_format.is_empty() {
            let formats: Vec<&str> = self.text_format.iter().map(|f| f.as_str()).collect();
            q.push(("text_format", formats.join(",")));
        }
        push(&mut q, "per_page", self.per_page);
        push(&mut q, "page", self.page);
        Ok(q)
    }
}

/// Sort order of `GET /artists/:id/songs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongSort {
    Title,
    Popularity,
}

impl SongSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Popularity => "popularity",
        }
    }
}

/// Parameters of `GET /artists/:id/songs`. By default the server returns
/// 20 songs sorted by title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistSongsQuery {
    pub sort: Option<SongSort>,
    pub per_page: Option<u32>,
    /// 1-based page (e.g. `per_page=5, page=3` returns songs 11-15).
    pub page: Option<u32>,
}

impl ArtistSongsQuery {
    pub(crate) fn to_query(&self) -> Query {
        let mut q = Query::new();
        if let Some(sort) = self.sort {
            q.push(("sort", sort.as_str().to_owned()));
        }
        push(&mut q, "per_page", self.per_page);
        push(&mut q, "page", self.page);
        q
    }
}

/// Parameters of `GET /web_pages/lookup`. Provide as many URL variants as
/// possible; at least one is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebPageQuery {
    /// The URL as it would appear in a browser.
    pub raw_annotatable_url: Option<String>,
    /// The URL from the page's `<link rel="canonical">`.
    pub canonical_url: Option<String>,
    /// The URL from the page's `og:url` meta tag.
    pub og_url: Option<String>,
}

impl WebPageQuery {
    pub(crate) fn to_query(&self) -> Result<Query> {
        let mut q = Query::new();
        push(&mut q, "raw_annotatable_url", self.raw_annotatable_url.as_ref());
        push(&mut q, "canonical_url", self.canonical_url.as_ref());
        push(&mut q, "og_url", self.og_url.as_ref());
        if q.is_empty() {
            return Err(GeniusError::InvalidArgument(
                "web page lookup needs at least one URL".into(),
            ));
        }
        Ok(q)
    }
}

fn push<T: ToString>(q: &mut Query, key: &'static str, value: Option<T>) {
    if let Some(v) = value {
        q.push((key, v.to_string()));
    }
}
