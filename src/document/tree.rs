//! Owned markdown syntax tree.
//!
//! `pulldown-cmark` produces a flat event stream; the pipeline wants to walk,
//! transform and query a tree, so the events are folded into [`Node`]s once
//! per document. Only the distinctions the pipeline cares about survive:
//! headings, paragraphs, text, code and raw HTML. Every other block or inline
//! element (lists, quotes, tables, emphasis, links, ...) is a generic
//! [`Node::Container`].
//!
//! # Heading annotations
//!
//! A heading may end with a `{{ key: value }}` object literal that attaches
//! data to its section descriptor:
//!
//! ```text
//! ## Create a contact {{ tag: 'POST', label: '/v1/contacts' }}
//! ```
//!
//! The literal is removed from the heading text and kept in
//! [`Heading::annotation`].

use super::esm::parse_object_literal;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde_json::{Map, Value};

/// Parser extensions enabled for every document.
pub fn default_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Parsed document body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading(Heading),
    Paragraph(Vec<Node>),
    Text(String),
    /// Inline code or math
    Code(String),
    CodeBlock { lang: Option<String>, code: String },
    /// Raw HTML or JSX, never part of text content
    Html(String),
    Container(Vec<Node>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heading {
    pub level: u8,
    /// Anchor id, assigned after parsing
    pub id: Option<String>,
    pub annotation: Map<String, Value>,
    pub children: Vec<Node>,
}

// ============================================================================
// Text Content
// ============================================================================

impl Node {
    /// Concatenated text of this node and its descendants, HTML excluded.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(s) | Self::Code(s) => out.push_str(s),
            Self::CodeBlock { code, .. } => out.push_str(code),
            Self::Html(_) => {}
            Self::Heading(h) => h.children.iter().for_each(|c| c.push_text(out)),
            Self::Paragraph(children) | Self::Container(children) => {
                children.iter().for_each(|c| c.push_text(out))
            }
        }
    }

    /// Direct children, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Heading(h) => &h.children,
            Self::Paragraph(children) | Self::Container(children) => children,
            _ => &[],
        }
    }
}

impl Heading {
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.push_text(&mut out));
        out
    }
}

impl Tree {
    /// All nodes in depth-first document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over a [`Tree`].
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Open element while folding events.
enum Frame {
    Root,
    Heading(u8),
    Paragraph,
    CodeBlock(Option<String>),
    Container,
}

/// Parse a markdown body into a tree.
pub fn parse(markdown: &str, options: Options) -> Tree {
    let mut stack: Vec<(Frame, Vec<Node>)> = vec![(Frame::Root, Vec::new())];

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => stack.push((open(tag), Vec::new())),
            Event::End(TagEnd::HtmlBlock) => {
                // HTML block contents arrive as `Html` events and were pushed
                // onto this frame; the block itself collapses into one node.
                if let Some((_, children)) = stack.pop() {
                    let html = children
                        .into_iter()
                        .filter_map(|n| match n {
                            Node::Html(s) => Some(s),
                            _ => None,
                        })
                        .collect::<String>();
                    push(&mut stack, Node::Html(html));
                }
            }
            Event::End(_) => {
                if stack.len() > 1
                    && let Some((frame, children)) = stack.pop()
                {
                    let node = close(frame, children);
                    push(&mut stack, node);
                }
            }
            Event::Text(text) => push_text(&mut stack, &text),
            Event::SoftBreak | Event::HardBreak => push_text(&mut stack, " "),
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                push(&mut stack, Node::Code(code.into_string()))
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                push(&mut stack, Node::Html(html.into_string()))
            }
            _ => {}
        }
    }

    // Unbalanced events should not happen, but fold whatever is left
    while stack.len() > 1 {
        if let Some((frame, children)) = stack.pop() {
            let node = close(frame, children);
            push(&mut stack, node);
        }
    }

    Tree {
        children: stack.pop().map(|(_, children)| children).unwrap_or_default(),
    }
}

fn open(tag: Tag<'_>) -> Frame {
    match tag {
        Tag::Heading { level, .. } => Frame::Heading(level as u8),
        Tag::Paragraph => Frame::Paragraph,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
            let lang = info.split_whitespace().next().map(str::to_owned);
            Frame::CodeBlock(lang)
        }
        Tag::CodeBlock(CodeBlockKind::Indented) => Frame::CodeBlock(None),
        _ => Frame::Container,
    }
}

fn close(frame: Frame, mut children: Vec<Node>) -> Node {
    match frame {
        Frame::Heading(level) => {
            let annotation = take_annotation(&mut children);
            Node::Heading(Heading {
                level,
                id: None,
                annotation,
                children,
            })
        }
        Frame::Paragraph => Node::Paragraph(children),
        Frame::CodeBlock(lang) => Node::CodeBlock {
            lang,
            code: children.iter().map(Node::text).collect(),
        },
        Frame::Root | Frame::Container => Node::Container(children),
    }
}

fn push(stack: &mut [(Frame, Vec<Node>)], node: Node) {
    if let Some((_, children)) = stack.last_mut() {
        children.push(node);
    }
}

/// Append text, merging with a preceding text node.
fn push_text(stack: &mut [(Frame, Vec<Node>)], text: &str) {
    let Some((_, children)) = stack.last_mut() else {
        return;
    };
    match children.last_mut() {
        Some(Node::Text(prev)) => prev.push_str(text),
        _ => children.push(Node::Text(text.to_owned())),
    }
}

/// Strip a trailing `{{ ... }}` literal from heading content.
///
/// Text that does not parse as an object literal is left in the heading.
fn take_annotation(children: &mut Vec<Node>) -> Map<String, Value> {
    let Some(Node::Text(text)) = children.last_mut() else {
        return Map::new();
    };

    let trimmed = text.trim_end();
    let Some(start) = trimmed.strip_suffix("}}").and_then(|s| s.rfind("{{")) else {
        return Map::new();
    };
    // `{{ a: 1 }}` → `{ a: 1 }`
    let literal = &trimmed[start + 1..trimmed.len() - 1];
    let Some(annotation) = parse_object_literal(literal) else {
        return Map::new();
    };

    let rest = trimmed[..start].trim_end().to_owned();
    if rest.is_empty() {
        children.pop();
    } else {
        *text = rest;
    }
    annotation
}
