//! Per-document reconciliation of pinned actions against upstream releases.
//!
//! The document is parsed only to find references. Rewrites are textual
//! substitutions on the original text so comments and layout survive.

use crate::config::IgnoreSet;
use crate::document::Node;
use crate::error::Result;
use crate::extract::uses_values;
use crate::reference::{replace_reference, ActionReference};
use crate::release::{ReleaseLookup, ReleaseSource};
use serde::Serialize;
use std::collections::BTreeSet;

/// What happened to one distinct reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceOutcome {
    Updated {
        repository: String,
        from: String,
        to: String,
    },
    UpToDate {
        repository: String,
    },
    NoRelease {
        repository: String,
        status: u16,
    },
    Malformed {
        reference: String,
    },
    Ignored {
        reference: String,
    },
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub text: String,
    /// True only if `text` differs from the input.
    pub changed: bool,
    pub notes: BTreeSet<String>,
    pub outcomes: Vec<ReferenceOutcome>,
}

/// Raw `uses` values of a document, deduplicated. Values that are not
/// strings come back rendered, in the second set.
pub fn collect_references(document: &Node) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut references = BTreeSet::new();
    let mut non_strings = BTreeSet::new();
    for value in uses_values(document) {
        match value.as_str() {
            Some(s) => {
                references.insert(s.to_string());
            }
            None => {
                non_strings.insert(value.describe());
            }
        }
    }
    (references, non_strings)
}

pub fn reconcile(
    text: &str,
    ignore: &IgnoreSet,
    releases: &dyn ReleaseSource,
) -> Result<Reconciliation> {
    let document = Node::parse(text)?;
    let (references, non_strings) = collect_references(&document);

    let mut outcomes: Vec<ReferenceOutcome> = non_strings
        .into_iter()
        .map(|reference| ReferenceOutcome::Malformed { reference })
        .collect();
    let mut notes = BTreeSet::new();
    let mut updated = text.to_string();

    for raw in references {
        if ignore.matches(&raw) {
            outcomes.push(ReferenceOutcome::Ignored { reference: raw });
            continue;
        }
        let Some(reference) = ActionReference::parse(&raw) else {
            outcomes.push(ReferenceOutcome::Malformed { reference: raw });
            continue;
        };

        let release = match releases.latest_release(&reference.repository)? {
            ReleaseLookup::Found(release) => release,
            ReleaseLookup::Missing { status } => {
                outcomes.push(ReferenceOutcome::NoRelease {
                    repository: reference.repository,
                    status,
                });
                continue;
            }
        };

        let latest = reference.pinned_to(&release.tag_name).to_string();
        if latest == raw {
            outcomes.push(ReferenceOutcome::UpToDate {
                repository: reference.repository,
            });
            continue;
        }

        updated = replace_reference(&updated, &raw, &latest);
        notes.insert(release.change_note());
        outcomes.push(ReferenceOutcome::Updated {
            repository: reference.repository,
            from: raw,
            to: latest,
        });
    }

    Ok(Reconciliation {
        changed: updated != text,
        text: updated,
        notes,
        outcomes,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
