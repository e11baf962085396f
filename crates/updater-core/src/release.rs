//! Upstream release lookup.
//!
//! A lookup either finds the latest published release or reports the status
//! the API answered with. Only transport and decoding failures are errors.

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

pub const GITHUB_URL: &str = "https://github.com/";

// ---------------------------------------------------------------------------
// ReleaseMetadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub repository: String,
    pub tag_name: String,
    pub html_url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ReleaseMetadata {
    /// One pull-request body line announcing this release.
    pub fn change_note(&self) -> String {
        let published = self
            .published_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "an unknown date".to_string());
        format!(
            "* **[{repo}]({GITHUB_URL}{repo})** published a new release [{tag}]({url}) on {published}",
            repo = self.repository,
            tag = self.tag_name,
            url = self.html_url,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseLookup {
    Found(ReleaseMetadata),
    /// The API answered with something other than 200, usually 404 for a
    /// repository that has never published a release.
    Missing { status: u16 },
}

// ---------------------------------------------------------------------------
// ReleaseSource
// ---------------------------------------------------------------------------

pub trait ReleaseSource {
    fn latest_release(&self, repository: &str) -> Result<ReleaseLookup>;
}

/// Resolves each repository at most once for the lifetime of the wrapper.
/// One wrapper is created per run; nothing is kept between runs.
pub struct MemoizedReleases<'a> {
    inner: &'a dyn ReleaseSource,
    seen: RefCell<HashMap<String, ReleaseLookup>>,
}

impl<'a> MemoizedReleases<'a> {
    pub fn new(inner: &'a dyn ReleaseSource) -> Self {
        Self {
            inner,
            seen: RefCell::new(HashMap::new()),
        }
    }
}

impl ReleaseSource for MemoizedReleases<'_> {
    fn latest_release(&self, repository: &str) -> Result<ReleaseLookup> {
        if let Some(hit) = self.seen.borrow().get(repository) {
            tracing::debug!(repository, "release lookup served from this run's cache");
            return Ok(hit.clone());
        }
        let lookup = self.inner.latest_release(repository)?;
        self.seen
            .borrow_mut()
            .insert(repository.to_string(), lookup.clone());
        Ok(lookup)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
