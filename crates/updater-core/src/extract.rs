//! Reference extraction: every value stored under a `uses` key, at any depth.

use crate::document::Node;

/// Key under which workflow steps and jobs name the action they run.
pub const USES_KEY: &str = "uses";

enum Frame<'a> {
    Visit(&'a Node),
    Emit(&'a Node),
}

/// Lazy walk over a document yielding the raw value of every `uses` entry.
///
/// Values are yielded whatever their shape; turning them into references is
/// the caller's job. Calling [`uses_values`] again restarts the walk.
pub struct UsesValues<'a> {
    stack: Vec<Frame<'a>>,
}

pub fn uses_values(document: &Node) -> UsesValues<'_> {
    UsesValues {
        stack: vec![Frame::Visit(document)],
    }
}

impl<'a> Iterator for UsesValues<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(value) => return Some(value),
                Frame::Visit(Node::Mapping(entries)) => {
                    for (key, value) in entries.iter().rev() {
                        if key.as_str() == Some(USES_KEY) {
                            self.stack.push(Frame::Emit(value));
                        } else if is_container(value) {
                            self.stack.push(Frame::Visit(value));
                        }
                    }
                }
                Frame::Visit(Node::Sequence(items)) => {
                    self.stack.extend(items.iter().rev().map(Frame::Visit));
                }
                Frame::Visit(Node::Scalar(_)) => {}
            }
        }
        None
    }
}

fn is_container(node: &Node) -> bool {
    match node {
        Node::Mapping(_) | Node::Sequence(_) => true,
        Node::Scalar(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(yaml: &str) -> Vec<String> {
        let doc = Node::parse(yaml).unwrap();
        uses_values(&doc)
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.describe()))
            .collect()
    }

    #[test]
    fn no_uses_keys_yields_nothing() {
        let yaml = "name: CI\non: push\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - run: make\n";
        assert!(strings(yaml).is_empty());
    }

    #[test]
    fn empty_and_scalar_documents_yield_nothing() {
        assert!(strings("").is_empty());
        assert!(strings("just a string").is_empty());
        assert!(strings("- 1\n- 2\n").is_empty());
    }

    #[test]
    fn finds_step_and_job_level_uses() {
        let yaml = r#"
jobs:
  reuse:
    uses: octo/workflows/.github/workflows/ci.yml@v1
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v3
      - name: setup
        uses: actions/setup-node@v3
        with:
          node-version: 18
"#;
        assert_eq!(
            strings(yaml),
            vec![
                "octo/workflows/.github/workflows/ci.yml@v1",
                "actions/checkout@v3",
                "actions/setup-node@v3",
            ]
        );
    }

    #[test]
    fn finds_uses_under_deep_mixed_nesting() {
        let yaml = r#"
- outer:
    - inner:
        - deeper:
            uses: owner/repo@v1
"#;
        assert_eq!(strings(yaml), vec!["owner/repo@v1"]);
    }

    #[test]
    fn non_string_values_pass_through() {
        let yaml = "steps:\n  - uses: 42\n  - uses:\n      nested: owner/repo@v1\n";
        let doc = Node::parse(yaml).unwrap();
        let values: Vec<&Node> = uses_values(&doc).collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].describe(), "42");
        assert!(matches!(values[1], Node::Mapping(_)));
    }

    #[test]
    fn walk_is_restartable() {
        let doc = Node::parse("a:\n  uses: x/y@v1\nb:\n  uses: x/z@v2\n").unwrap();
        let first: Vec<&Node> = uses_values(&doc).collect();
        let second: Vec<&Node> = uses_values(&doc).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
