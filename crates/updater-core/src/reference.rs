use crate::error::{Result, UpdaterError};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ActionReference
// ---------------------------------------------------------------------------

/// A pinned action, `owner/repo[/subpath]@ref`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionReference {
    pub repository: String,
    pub git_ref: String,
}

impl ActionReference {
    /// Split on `@`. Anything other than exactly two non-empty parts is
    /// malformed, which includes local (`./path`) and `docker://` forms
    /// that carry no `@`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('@');
        let repository = parts.next()?;
        let git_ref = parts.next()?;
        if parts.next().is_some() || repository.is_empty() || git_ref.is_empty() {
            return None;
        }
        Some(Self {
            repository: repository.to_string(),
            git_ref: git_ref.to_string(),
        })
    }

    /// The same action pinned to `tag`.
    pub fn pinned_to(&self, tag: &str) -> ActionReference {
        ActionReference {
            repository: self.repository.clone(),
            git_ref: tag.to_string(),
        }
    }
}

impl fmt::Display for ActionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.repository, self.git_ref)
    }
}

// ---------------------------------------------------------------------------
// Repository identifiers
// ---------------------------------------------------------------------------

static REPOSITORY_RE: OnceLock<Regex> = OnceLock::new();

fn repository_re() -> &'static Regex {
    REPOSITORY_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?/[A-Za-z0-9._-]+$").unwrap()
    })
}

/// Check that `repository` is a plain `owner/name` pair.
pub fn validate_repository(repository: &str) -> Result<()> {
    if !repository_re().is_match(repository) {
        return Err(UpdaterError::InvalidRepository(repository.to_string()));
    }
    Ok(())
}

/// Replace every verbatim occurrence of `from` in `text` with `to`.
///
/// The substitution is literal: an occurrence inside a longer reference
/// (`owner/repo@v1` inside `owner/repo@v1.2`) is rewritten too.
pub fn replace_reference(text: &str, from: &str, to: &str) -> String {
    text.replace(from, to)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
