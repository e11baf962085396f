use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::{Path, PathBuf};
use updater_core::annotations;
use updater_core::scan::{discover_workflows, scan_document, ScannedReference};

pub fn run(root: &Path, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let files = if files.is_empty() {
        discover_workflows(root).context("failed to list workflow files")?
    } else {
        files.to_vec()
    };

    let mut scanned: Vec<ScannedReference> = Vec::new();
    for file in &files {
        let label = file
            .strip_prefix(root)
            .unwrap_or(file)
            .display()
            .to_string();
        match scan_file(file, &label) {
            Ok(found) => scanned.extend(found),
            Err(e) => annotations::warning(&format!("Skipping \"{label}\": {e}")),
        }
    }

    if json {
        return print_json(&scanned);
    }

    if scanned.is_empty() {
        println!("No action references found.");
        return Ok(());
    }

    let rows = scanned
        .into_iter()
        .map(|s| {
            vec![
                s.file,
                s.reference,
                s.repository.unwrap_or_else(|| "malformed".to_string()),
                s.git_ref.unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["FILE", "REFERENCE", "REPOSITORY", "REF"], rows);
    Ok(())
}

fn scan_file(file: &Path, label: &str) -> anyhow::Result<Vec<ScannedReference>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(scan_document(label, &text)?)
}
