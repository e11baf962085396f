//! Offline inventory of the actions a repository's workflows pin.

use crate::document::Node;
use crate::error::Result;
use crate::reconcile::collect_references;
use crate::reference::ActionReference;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const WORKFLOWS_DIR: &str = ".github/workflows";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedReference {
    pub file: String,
    pub reference: String,
    /// `None` when the reference is malformed.
    pub repository: Option<String>,
    pub git_ref: Option<String>,
}

/// Workflow files under `.github/workflows`, sorted. A missing directory
/// yields an empty list.
pub fn discover_workflows(workspace: &Path) -> Result<Vec<PathBuf>> {
    let dir = workspace.join(WORKFLOWS_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yml" || e == "yaml");
        if is_yaml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Every distinct `uses` value in `text`, labelled with `file`.
pub fn scan_document(file: &str, text: &str) -> Result<Vec<ScannedReference>> {
    let document = Node::parse(text)?;
    let (references, non_strings) = collect_references(&document);
    let scanned = references
        .into_iter()
        .chain(non_strings)
        .map(|raw| {
            let parsed = ActionReference::parse(&raw);
            ScannedReference {
                file: file.to_string(),
                repository: parsed.as_ref().map(|r| r.repository.clone()),
                git_ref: parsed.map(|r| r.git_ref),
                reference: raw,
            }
        })
        .collect();
    Ok(scanned)
}
