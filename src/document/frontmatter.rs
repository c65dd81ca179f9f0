//! Frontmatter extraction.
//!
//! A document may open with a YAML block fenced by `---` or a TOML block
//! fenced by `+++`. The block is split off before markdown parsing:
//!
//! ```text
//! ---
//! title: Terraform basics
//! date: 2024-03-02
//! ---
//! # Terraform basics
//! ```
//!
//! An opening fence without a matching closing fence is not frontmatter.

use super::Metadata;
use thiserror::Error;

/// Frontmatter syntax, decided by the fence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterKind {
    /// `---`
    Yaml,
    /// `+++`
    Toml,
}

impl FrontmatterKind {
    fn from_fence(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            _ => None,
        }
    }

    const fn fence(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Raw frontmatter block, fences excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    pub kind: FrontmatterKind,
    pub raw: &'a str,
}

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("invalid yaml frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid toml frontmatter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("frontmatter is not a key-value mapping")]
    NotMapping,
}

/// Split a document into its frontmatter block (if any) and body.
pub fn split(source: &str) -> (Option<Frontmatter<'_>>, &str) {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some((first, rest)) = split_line(text) else {
        return (None, text);
    };
    let Some(kind) = FrontmatterKind::from_fence(first) else {
        return (None, text);
    };

    let mut remaining = rest;
    while let Some((line, after)) = split_line(remaining) {
        if line.trim_end() == kind.fence() {
            let raw = &rest[..rest.len() - remaining.len()];
            return (Some(Frontmatter { kind, raw }), after);
        }
        remaining = after;
    }

    (None, text)
}

impl Frontmatter<'_> {
    /// Parse the block into a metadata record.
    pub fn parse(&self) -> Result<Metadata, FrontmatterError> {
        if self.raw.trim().is_empty() {
            return Ok(Metadata::default());
        }
        let value = match self.kind {
            FrontmatterKind::Yaml => serde_yaml::from_str::<serde_json::Value>(self.raw)?,
            FrontmatterKind::Toml => toml_to_json(toml::Value::Table(toml::from_str(self.raw)?)),
        };
        Metadata::from_value(value).ok_or(FrontmatterError::NotMapping)
    }
}

/// Split off the first line, without its `\n`.
fn split_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    Some(match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    })
}

/// TOML datetimes become their string form so `date = 2024-01-15` reads
/// the same as the YAML `date: 2024-01-15`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    match value {
        toml::Value::String(s) => Json::String(s),
        toml::Value::Integer(i) => Json::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Json::Null, Json::Number),
        toml::Value::Boolean(b) => Json::Bool(b),
        toml::Value::Datetime(dt) => Json::String(dt.to_string()),
        toml::Value::Array(items) => Json::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Json::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml() {
        let (fm, body) = split("---\ntitle: Hello\n---\n# Body\n");
        let fm = fm.unwrap();
        assert_eq!(fm.kind, FrontmatterKind::Yaml);
        assert_eq!(fm.raw, "title: Hello\n");
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_split_toml_crlf() {
        let (fm, body) = split("+++\r\ntitle = \"Hello\"\r\n+++\r\nBody");
        let fm = fm.unwrap();
        assert_eq!(fm.kind, FrontmatterKind::Toml);
        assert_eq!(fm.raw, "title = \"Hello\"\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_without_frontmatter() {
        let (fm, body) = split("# Title\n\ntext");
        assert!(fm.is_none());
        assert_eq!(body, "# Title\n\ntext");
    }

    #[test]
    fn test_split_unclosed_fence_is_body() {
        let source = "---\ntitle: Hello\n# Title\n";
        let (fm, body) = split(source);
        assert!(fm.is_none());
        assert_eq!(body, source);
    }

    #[test]
    fn test_split_empty_block_and_bom() {
        let (fm, body) = split("\u{feff}---\n---\ntext");
        assert_eq!(fm.unwrap().raw, "");
        assert_eq!(body, "text");
    }

    #[test]
    fn test_split_closing_fence_at_eof() {
        let (fm, body) = split("---\ntitle: x\n---");
        assert_eq!(fm.unwrap().raw, "title: x\n");
        assert_eq!(body, "");
    }

    #[test]
    fn test_parse_yaml() {
        let (fm, _) = split("---\ntitle: Hello\ndate: 2024-01-15\ntags: [a, b]\n---\n");
        let meta = fm.unwrap().parse().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.date.as_deref(), Some("2024-01-15"));
        assert!(meta.extra.contains_key("tags"));
    }

    #[test]
    fn test_parse_toml_datetime() {
        let (fm, _) = split("+++\ntitle = \"Hello\"\ndate = 2024-01-15\n+++\n");
        let meta = fm.unwrap().parse().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_parse_empty_yaml_is_empty_record() {
        let (fm, _) = split("---\n---\n");
        assert!(fm.unwrap().parse().unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let (fm, _) = split("---\ntitle: [unclosed\n---\n");
        assert!(matches!(fm.unwrap().parse(), Err(FrontmatterError::Yaml(_))));
    }

    #[test]
    fn test_parse_non_mapping() {
        let (fm, _) = split("---\n- a\n- b\n---\n");
        assert!(matches!(fm.unwrap().parse(), Err(FrontmatterError::NotMapping)));
    }
}
