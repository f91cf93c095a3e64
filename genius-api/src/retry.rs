//! Bounded retry around page scraping.
//!
//! Song pages occasionally come back without the embedded lyrics payload
//! (served from a cold cache, A/B variants, ...). The fetch + extract cycle is
//! retried when extraction finds nothing, up to [`RetryPolicy::max_attempts`]
//! times. A page that reports "not found" is final and is never retried.

use crate::error::{DomainError, ErrorKind, GeniusError, Result, excerpt};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Values below 1 are
    /// treated as 1.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn ceiling(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Run `attempt` until it stops failing with `LyricsNotFound` or the policy's
/// ceiling is reached.
///
/// `attempt` receives the 1-based attempt number. Any other error, domain or
/// not, is returned immediately. After the last attempt the final
/// `LyricsNotFound` is returned.
pub fn retry_extraction<T, F>(policy: &RetryPolicy, operation: &str, mut attempt: F) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let max = policy.ceiling();
    let mut n = 1;
    loop {
        match attempt(n) {
            Err(GeniusError::Domain(e)) if e.kind() == ErrorKind::LyricsNotFound && n < max => {
                warn!(
                    operation,
                    attempt = n,
                    max,
                    delay_ms = u64::try_from(policy.delay.as_millis()).unwrap_or(u64::MAX),
                    "Lyrics payload missing, retrying"
                );
                if !policy.delay.is_zero() {
                    std::thread::sleep(policy.delay);
                }
                n += 1;
            }
            other => return other,
        }
    }
}

/// Fetch a page and extract a payload from it, retrying on a missing payload.
///
/// Each attempt runs `fetch`, fails with `PageNotFound` (not retried) if the
/// page contains `not_found_marker`, then runs `extract`. `extract` returning
/// `Ok(None)` means "payload absent" and triggers a retry; an `Err` from it
/// (e.g. a payload that is present but malformed) propagates immediately.
pub fn scrape<T, F, E>(
    policy: &RetryPolicy,
    operation: &str,
    not_found_marker: &str,
    mut fetch: F,
    extract: E,
) -> Result<T>
where
    F: FnMut() -> Result<String>,
    E: Fn(&str) -> Result<Option<T>>,
{
    retry_extraction(policy, operation, |n| {
        let page = fetch()?;
        debug!(operation, attempt = n, bytes = page.len(), "Fetched page");
        if !not_found_marker.is_empty() && page.contains(not_found_marker) {
            return Err(DomainError::page_not_found(Some(excerpt(&page, 200))).into());
        }
        extract(&page)?.ok_or_else(|| DomainError::lyrics_not_found().into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts).with_delay(Duration::ZERO)
    }

    #[test]
    fn always_failing_extraction_stops_at_ceiling() {
        let fetches = Cell::new(0);
        let result: Result<()> = scrape(
            &fast(4),
            "Songs.lyrics",
            "Page not found",
            || {
                fetches.set(fetches.get() + 1);
                Ok("<html><body>no payload</body></html>".to_owned())
            },
            |_| Ok(None),
        );

        assert_eq!(fetches.get(), 4);
        let err = result.unwrap_err();
        assert_eq!(err.as_domain().map(DomainError::kind), Some(ErrorKind::LyricsNotFound));
    }

    #[test]
    fn succeeds_once_payload_appears() {
        let fetches = Cell::new(0);
        let result = scrape(
            &fast(5),
            "Songs.lyrics",
            "Page not found",
            || {
                fetches.set(fetches.get() + 1);
                Ok(format!("page {}", fetches.get()))
            },
            |page| Ok((page == "page 3").then(|| page.to_owned())),
        );

        assert_eq!(result.unwrap(), "page 3");
        assert_eq!(fetches.get(), 3);
    }

    #[test]
    fn not_found_page_is_not_retried() {
        let fetches = Cell::new(0);
        let result: Result<()> = scrape(
            &fast(5),
            "Songs.lyrics",
            "Page not found",
            || {
                fetches.set(fetches.get() + 1);
                Ok("<title>Page not found</title>".to_owned())
            },
            |_| Ok(None),
        );

        assert_eq!(fetches.get(), 1);
        let err = result.unwrap_err();
        let domain = err.as_domain().unwrap();
        assert_eq!(domain.kind(), ErrorKind::PageNotFound);
        assert_eq!(domain.excerpt(), Some("<title>Page not found</title>"));
    }

    #[test]
    fn transport_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = retry_extraction(&fast(5), "Songs.lyrics", |_| {
            calls.set(calls.get() + 1);
            Err(GeniusError::Other("connection reset".into()))
        });
        assert_eq!(calls.get(), 1);
        assert!(matches!(result, Err(GeniusError::Other(_))));
    }

    #[test]
    fn malformed_payload_propagates_without_retry() {
        let fetches = Cell::new(0);
        let result: Result<serde_json::Value> = scrape(
            &fast(5),
            "Songs.song_with_lyrics",
            "Page not found",
            || {
                fetches.set(fetches.get() + 1);
                Ok("page".to_owned())
            },
            |_| Ok(Some(serde_json::from_str("{not json")?)),
        );
        assert_eq!(fetches.get(), 1);
        assert!(matches!(result, Err(GeniusError::Json(_))));
    }

    #[test]
    fn zero_ceiling_still_makes_one_attempt() {
        let calls = Cell::new(0);
        let result: Result<()> = retry_extraction(&fast(0), "Songs.lyrics", |n| {
            calls.set(calls.get() + 1);
            assert_eq!(n, 1);
            Err(DomainError::lyrics_not_found().into())
        });
        assert_eq!(calls.get(), 1);
        assert!(result.is_err());
    }
}
