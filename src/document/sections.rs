//! Section descriptors for level-2 headings.
//!
//! Each `##` heading gets a unique anchor id and becomes one entry of the
//! document's `sections` export, used by the site for its table of contents.

use super::tree::{Heading, Node, Tree};
use crate::utils::slug::{SlugCounter, slugify};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Heading level that produces sections
const SECTION_LEVEL: u8 = 2;

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub id: String,
    /// Heading annotation, flattened into the serialized descriptor
    pub annotation: Map<String, Value>,
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Annotation keys are applied last and may override `title`/`id`
        let mut map = Map::with_capacity(self.annotation.len() + 2);
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert("id".into(), Value::String(self.id.clone()));
        map.extend(self.annotation.clone());
        map.serialize(serializer)
    }
}

/// Give every level-2 heading without an id a unique slug id.
pub fn assign_heading_ids(tree: Tree) -> Tree {
    let mut counter = SlugCounter::new();
    Tree {
        children: tree
            .children
            .into_iter()
            .map(|node| assign(node, &mut counter))
            .collect(),
    }
}

fn assign(node: Node, counter: &mut SlugCounter) -> Node {
    match node {
        Node::Heading(mut heading) => {
            if heading.level == SECTION_LEVEL && heading.id.is_none() {
                heading.id = Some(counter.slug(&heading.text()));
            }
            Node::Heading(heading)
        }
        Node::Paragraph(children) => Node::Paragraph(assign_all(children, counter)),
        Node::Container(children) => Node::Container(assign_all(children, counter)),
        leaf => leaf,
    }
}

fn assign_all(children: Vec<Node>, counter: &mut SlugCounter) -> Vec<Node> {
    children
        .into_iter()
        .map(|node| assign(node, counter))
        .collect()
}

/// Level-2 headings in document order, at any nesting depth.
pub fn collect_sections(tree: &Tree) -> Vec<Section> {
    tree.descendants()
        .filter_map(|node| match node {
            Node::Heading(heading) if heading.level == SECTION_LEVEL => Some(section(heading)),
            _ => None,
        })
        .collect()
}

fn section(heading: &Heading) -> Section {
    let title = heading.text().trim().to_owned();
    let id = heading
        .id
        .clone()
        .unwrap_or_else(|| slugify(&title));
    Section {
        title,
        id,
        annotation: heading.annotation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tree::{default_options, parse};
    use serde_json::json;

    fn sections(markdown: &str) -> Vec<Section> {
        collect_sections(&assign_heading_ids(parse(markdown, default_options())))
    }

    #[test]
    fn test_duplicate_headings() {
        let ids: Vec<String> = sections("## Overview\n\ntext\n\n## Overview\n")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, ["overview", "overview-1"]);
    }

    #[test]
    fn test_only_level_two_in_order() {
        let found = sections("# Title\n\n## First\n\n### Sub\n\n- item\n\n  ## Nested\n\n## Last\n");
        let titles: Vec<&str> = found.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["First", "Nested", "Last"]);
    }

    #[test]
    fn test_ids_are_written_to_tree() {
        let tree = assign_heading_ids(parse("## Getting Started\n", default_options()));
        let Node::Heading(heading) = &tree.children[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.id.as_deref(), Some("getting-started"));
    }

    #[test]
    fn test_no_sections() {
        assert!(sections("# Only a title\n\ntext\n").is_empty());
    }

    #[test]
    fn test_serialize_flattens_annotation() {
        let found = sections("## List contacts {{ tag: 'GET', label: '/v1/contacts' }}\n");
        assert_eq!(
            serde_json::to_value(&found).unwrap(),
            json!([{
                "title": "List contacts",
                "id": "list-contacts",
                "tag": "GET",
                "label": "/v1/contacts"
            }])
        );
    }

    #[test]
    fn test_annotation_overrides_id() {
        let found = sections("## Intro {{ id: 'start' }}\n");
        assert_eq!(serde_json::to_value(&found[0]).unwrap()["id"], json!("start"));
    }
}
