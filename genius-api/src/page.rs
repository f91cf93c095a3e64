//! Extraction from genius.com song pages.
//!
//! Two things are mined from the HTML:
//!
//! - the `window.__PRELOADED_STATE__ = JSON.parse('...')` blob the web app
//!   boots from, which carries the full lyrics document;
//! - the visible lyrics, spread over one or more `data-lyrics-container` divs.

use crate::error::Result;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use std::sync::LazyLock;

static PRELOADED_STATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"window\.__PRELOADED_STATE__\s*=\s*JSON\.parse\('(?<json>(?:[^'\\]|\\.)*)'\);"#)
        .expect("valid preloaded state regex")
});

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid script selector"));

static LYRICS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[data-lyrics-container="true"]"#).expect("valid lyrics selector")
});

/// Locate and decode the preloaded state payload.
///
/// Returns `Ok(None)` when no script carries it and an error when it is
/// present but not valid JSON.
pub fn preloaded_state(html: &str) -> Result<Option<Value>> {
    let document = Html::parse_document(html);
    for script in document.select(&SCRIPT_SELECTOR) {
        let text: String = script.text().collect();
        let Some(caps) = PRELOADED_STATE_REGEX.captures(&text) else {
            continue;
        };
        let json = unescape_js(&caps["json"]);
        return Ok(Some(serde_json::from_str(&json)?));
    }
    Ok(None)
}

/// Plain-text lyrics from the lyrics containers, `None` if the page has none.
pub fn lyrics_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let blocks: Vec<String> = document
        .select(&LYRICS_SELECTOR)
        .map(container_text)
        .filter(|t| !t.trim().is_empty())
        .collect();
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n").trim().to_owned())
    }
}

fn container_text(container: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in container.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Decode the body of a single-quoted JavaScript string literal.
fn unescape_js(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('0') => out.push('\0'),
            Some('x') => push_code_unit(&mut out, &mut chars, 2, 'x'),
            Some('u') => push_code_unit(&mut out, &mut chars, 4, 'u'),
            // \\ \' \" \/ and any other escaped character map to themselves.
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn push_code_unit(out: &mut String, chars: &mut std::str::Chars<'_>, len: usize, tag: char) {
    let digits: String = chars.by_ref().take(len).collect();
    let decoded = (digits.len() == len)
        .then(|| u32::from_str_radix(&digits, 16).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(ch) => out.push(ch),
        None => {
            out.push('\\');
            out.push(tag);
            out.push_str(&digits);
        }
    }
}
