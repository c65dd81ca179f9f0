//! MDX `import`/`export` statements.
//!
//! Top-level lines starting with `import` or `export` are module code, not
//! markdown. They are split out of the body before parsing and modelled as
//! [`Export`] values. The module text of a compiled document is always
//! rendered from that model, never edited as a string.
//!
//! # Metadata reconciliation
//!
//! | explicit `metadata` | frontmatter | canonical record       |
//! |---------------------|-------------|------------------------|
//! | yes                 | any         | explicit export        |
//! | no                  | yes         | frontmatter, renamed   |
//! | no                  | no          | none (synthesized)     |

use super::Metadata;
use crate::log;
use regex::Regex;
use serde_json::{Map, Value};
use std::{str::Chars, sync::LazyLock};

/// Export name of the canonical metadata record.
pub const METADATA: &str = "metadata";

/// Internal export name the frontmatter record is held under.
pub const FRONTMATTER_METADATA: &str = "frontmatterMetadata";

/// Export name of the derived section list.
pub const SECTIONS: &str = "sections";

/// `export const|let|var NAME = INIT`
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^export\s+(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*(.*?)\s*;?\s*$")
        .expect("valid declaration regex")
});

/// One top-level module statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Export {
    /// `export const metadata = {...}`
    Metadata(Metadata),
    /// Frontmatter record under its internal name
    FrontmatterMetadata(Metadata),
    /// Any other statement, kept verbatim. `name` is the declared export, if any.
    Verbatim { name: Option<String>, source: String },
}

impl Export {
    /// Classify one statement.
    ///
    /// An unreadable metadata initializer is treated as an empty record.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        let Some(caps) = DECLARATION.captures(source) else {
            return Self::Verbatim {
                name: None,
                source: source.to_owned(),
            };
        };

        let name = &caps[1];
        let init = &caps[2];
        match name {
            METADATA => Self::Metadata(parse_record(init)),
            FRONTMATTER_METADATA => Self::FrontmatterMetadata(parse_record(init)),
            _ => Self::Verbatim {
                name: Some(name.to_owned()),
                source: source.to_owned(),
            },
        }
    }

    /// Exported binding name, if the statement declares one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Metadata(_) => Some(METADATA),
            Self::FrontmatterMetadata(_) => Some(FRONTMATTER_METADATA),
            Self::Verbatim { name, .. } => name.as_deref(),
        }
    }

    /// Module text for this statement.
    pub fn render(&self) -> String {
        match self {
            Self::Metadata(meta) => format!("export const {METADATA} = {}", meta.to_literal()),
            Self::FrontmatterMetadata(meta) => {
                format!("export const {FRONTMATTER_METADATA} = {}", meta.to_literal())
            }
            Self::Verbatim { source, .. } => source.clone(),
        }
    }
}

fn parse_record(init: &str) -> Metadata {
    if matches!(init, "undefined" | "null" | "") {
        return Metadata::default();
    }
    match parse_object_literal(init) {
        Some(map) => Metadata::from_value(Value::Object(map)).unwrap_or_default(),
        None => {
            log!("warn"; "unreadable metadata export, using an empty record: {init}");
            Metadata::default()
        }
    }
}

/// Read a JS-style object literal (`{ tag: 'GET', label: "/v1" }`).
///
/// String literals are rewritten as JSON strings first, so JS escapes
/// (`'Don\'t'`) survive; the result is then read as a YAML flow mapping,
/// which accepts unquoted keys.
pub fn parse_object_literal(src: &str) -> Option<Map<String, Value>> {
    let src = src.trim();
    if !(src.starts_with('{') && src.ends_with('}')) {
        return None;
    }
    match serde_yaml::from_str::<Value>(&to_flow_mapping(src)?).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// `None` when a string literal is unterminated.
fn to_flow_mapping(src: &str) -> Option<String> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                let value = read_string(&mut chars, c)?;
                out.push_str(&serde_json::to_string(&value).ok()?);
            }
            // YAML needs a space after a key, JS does not
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }
    Some(out)
}

/// Unescape the rest of a string literal opened by `quote`.
fn read_string(chars: &mut Chars<'_>, quote: char) -> Option<String> {
    let mut value = String::new();
    loop {
        match chars.next()? {
            c if c == quote => return Some(value),
            '\\' => match chars.next()? {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '0' => value.push('\0'),
                'u' => {
                    let hex: String = chars.by_ref().take(4).collect();
                    value.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
                }
                '\n' => {}
                other => value.push(other),
            },
            c => value.push(c),
        }
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Split module statements out of a markdown body.
///
/// Returns the statements and the body with their lines blanked, so the
/// remaining markdown keeps its line structure. Statements inside fenced code
/// blocks are left alone. A statement runs until the next blank line or the
/// next line that starts another statement.
pub fn scan(body: &str) -> (Vec<Export>, String) {
    let mut exports = Vec::new();
    let mut markdown = String::with_capacity(body.len());
    let mut fence: Option<(char, usize)> = None;
    let mut statement: Option<String> = None;

    for line in body.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);

        if let Some(stmt) = statement.as_mut() {
            if content.trim().is_empty() {
                exports.push(Export::parse(stmt));
                statement = None;
                markdown.push_str(line);
            } else if is_statement_start(content) {
                let previous = std::mem::replace(stmt, content.to_owned());
                exports.push(Export::parse(&previous));
                markdown.push('\n');
            } else {
                stmt.push('\n');
                stmt.push_str(content);
                markdown.push('\n');
            }
            continue;
        }

        match fence {
            Some(open) => {
                if closes_fence(content, open) {
                    fence = None;
                }
            }
            None => {
                if let Some(open) = opens_fence(content) {
                    fence = Some(open);
                } else if is_statement_start(content) {
                    statement = Some(content.to_owned());
                    markdown.push('\n');
                    continue;
                }
            }
        }
        markdown.push_str(line);
    }

    if let Some(stmt) = statement {
        exports.push(Export::parse(&stmt));
    }

    (exports, markdown)
}

fn is_statement_start(line: &str) -> bool {
    ["import", "export"].iter().any(|kw| {
        line.strip_prefix(kw)
            .is_some_and(|rest| rest.starts_with([' ', '\t', '{', '*']))
    })
}

/// Fence char and length when `line` opens a fenced code block.
fn opens_fence(line: &str) -> Option<(char, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let trimmed = &line[indent..];
    let c = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&x| x == c).count();
    (len >= 3).then_some((c, len))
}

fn closes_fence(line: &str, (c, len): (char, usize)) -> bool {
    let trimmed = line.trim();
    trimmed.chars().take_while(|&x| x == c).count() >= len && trimmed.chars().all(|x| x == c)
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Promote the frontmatter record to the canonical `metadata` export when the
/// author did not write one.
pub fn reconcile(exports: Vec<Export>) -> Vec<Export> {
    let has_metadata = exports.iter().any(|e| matches!(e, Export::Metadata(_)));
    if has_metadata {
        return exports;
    }

    let mut promoted = false;
    exports
        .into_iter()
        .map(|export| match export {
            Export::FrontmatterMetadata(meta) if !promoted => {
                promoted = true;
                Export::Metadata(meta)
            }
            other => other,
        })
        .collect()
}

/// The canonical metadata record, if one is exported.
pub fn canonical(exports: &[Export]) -> Option<&Metadata> {
    exports.iter().find_map(|e| match e {
        Export::Metadata(meta) => Some(meta),
        _ => None,
    })
}

/// Replace the canonical record, or add it first when there is none.
///
/// An empty record is not added.
pub fn with_metadata(exports: Vec<Export>, metadata: Metadata) -> Vec<Export> {
    if canonical(&exports).is_none() {
        if metadata.is_empty() {
            return exports;
        }
        return std::iter::once(Export::Metadata(metadata))
            .chain(exports)
            .collect();
    }

    let mut slot = Some(metadata);
    exports
        .into_iter()
        .map(|export| match export {
            Export::Metadata(old) => Export::Metadata(slot.take().unwrap_or(old)),
            other => other,
        })
        .collect()
}

/// Whether the author already exports a binding called `name`.
pub fn declares(exports: &[Export], name: &str) -> bool {
    exports.iter().any(|e| e.name() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str) -> Metadata {
        Metadata {
            title: Some(title.into()),
            ..Metadata::default()
        }
    }

    #[test]
    fn test_parse_metadata_export() {
        let export = Export::parse("export const metadata = { title: 'Hello', date: \"2024-01-15\" }");
        let Export::Metadata(meta) = export else {
            panic!("expected metadata export");
        };
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.date.as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_parse_multiline_with_semicolon() {
        let export = Export::parse("export const metadata = {\n  title: 'Hello',\n  description: 'World'\n};");
        assert_eq!(
            export,
            Export::Metadata(Metadata {
                title: Some("Hello".into()),
                description: Some("World".into()),
                ..Metadata::default()
            })
        );
    }

    #[test]
    fn test_parse_undefined_and_unreadable_are_empty() {
        assert_eq!(
            Export::parse("export const metadata = undefined"),
            Export::Metadata(Metadata::default())
        );
        assert_eq!(
            Export::parse("export const metadata = buildMeta()"),
            Export::Metadata(Metadata::default())
        );
    }

    #[test]
    fn test_parse_other_statements() {
        assert_eq!(
            Export::parse("import { Note } from '@/components/Note'"),
            Export::Verbatim {
                name: None,
                source: "import { Note } from '@/components/Note'".into()
            }
        );
        let export = Export::parse("export const sections = []");
        assert_eq!(export.name(), Some(SECTIONS));
    }

    #[test]
    fn test_render_is_derived_from_record() {
        let export = Export::Metadata(meta("Hello"));
        assert_eq!(export.render(), r#"export const metadata = {"title":"Hello"}"#);
    }

    #[test]
    fn test_parse_object_literal() {
        let map = parse_object_literal("{ tag: 'GET', label: '/v1/contacts' }").unwrap();
        assert_eq!(map.get("tag"), Some(&Value::String("GET".into())));
        assert_eq!(map.get("label"), Some(&Value::String("/v1/contacts".into())));
        assert!(parse_object_literal("tag: GET").is_none());
        assert!(parse_object_literal("{ title: 'open }").is_none());
        assert!(parse_object_literal("{ [ }").is_none());
    }

    #[test]
    fn test_parse_object_literal_js_strings() {
        let map = parse_object_literal(
            r#"{ title: 'Don\'t panic', description: "Say \"hi\"", path:'/a:b', note: `x\ny` }"#,
        )
        .unwrap();
        assert_eq!(map["title"], Value::String("Don't panic".into()));
        assert_eq!(map["description"], Value::String("Say \"hi\"".into()));
        assert_eq!(map["path"], Value::String("/a:b".into()));
        assert_eq!(map["note"], Value::String("x\ny".into()));
    }

    #[test]
    fn test_scan_extracts_statements() {
        let body = "import { Note } from './note'\n\nexport const metadata = {\n  title: 'Hi'\n}\n\n# Heading\n";
        let (exports, markdown) = scan(body);

        assert_eq!(exports.len(), 2);
        assert!(matches!(exports[0], Export::Verbatim { .. }));
        assert_eq!(canonical(&exports).unwrap().title.as_deref(), Some("Hi"));
        assert_eq!(markdown.trim(), "# Heading");
        assert_eq!(markdown.lines().count(), body.lines().count());
    }

    #[test]
    fn test_scan_splits_adjacent_statements() {
        let body = "import { Note } from './note'\nexport const metadata = { title: 'Explicit' }\n\n# Heading\n";
        let (exports, markdown) = scan(body);

        assert_eq!(exports.len(), 2);
        assert_eq!(exports[0], Export::parse("import { Note } from './note'"));
        assert_eq!(canonical(&exports), Some(&meta("Explicit")));
        assert_eq!(markdown.trim(), "# Heading");
        assert_eq!(markdown.lines().count(), body.lines().count());
    }

    #[test]
    fn test_scan_keeps_multiline_import_together() {
        let body = "import {\n  Note,\n  Tip,\n} from './callouts'\nexport const answer = 42\n";
        let (exports, _) = scan(body);

        assert_eq!(exports.len(), 2);
        assert!(exports[0].render().ends_with("} from './callouts'"));
        assert_eq!(exports[1].name(), Some("answer"));
    }

    #[test]
    fn test_scan_ignores_code_fences_and_prose() {
        let body = "```js\nexport const metadata = {}\n```\n\nexporting data is fun\n";
        let (exports, markdown) = scan(body);

        assert!(exports.is_empty());
        assert_eq!(markdown, body);
    }

    #[test]
    fn test_scan_statement_at_eof() {
        let (exports, _) = scan("# Title\n\nexport const answer = 42");
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].name(), Some("answer"));
    }

    #[test]
    fn test_reconcile_promotes_frontmatter() {
        let exports = reconcile(vec![Export::FrontmatterMetadata(meta("Front"))]);
        assert_eq!(exports, vec![Export::Metadata(meta("Front"))]);
    }

    #[test]
    fn test_reconcile_keeps_explicit_export() {
        let exports = reconcile(vec![
            Export::FrontmatterMetadata(meta("Front")),
            Export::Metadata(meta("Explicit")),
        ]);
        assert_eq!(canonical(&exports), Some(&meta("Explicit")));
        assert!(declares(&exports, FRONTMATTER_METADATA));
    }

    #[test]
    fn test_with_metadata_replaces_in_place() {
        let exports = vec![
            Export::parse("import A from './a'"),
            Export::Metadata(meta("Old")),
        ];
        let exports = with_metadata(exports, meta("New"));
        assert_eq!(exports.len(), 2);
        assert_eq!(exports[1], Export::Metadata(meta("New")));
    }

    #[test]
    fn test_with_metadata_prepends_or_skips_empty() {
        let exports = with_metadata(vec![Export::parse("import A from './a'")], meta("New"));
        assert_eq!(exports[0], Export::Metadata(meta("New")));

        let exports = with_metadata(Vec::new(), Metadata::default());
        assert!(exports.is_empty());
    }
}
