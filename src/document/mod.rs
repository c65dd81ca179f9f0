//! Document compilation pipeline.
//!
//! # Architecture
//!
//! ```text
//! Compiler::compile()
//!     │
//!     ├── frontmatter::split()      ──► frontmatter block + body
//!     ├── esm::scan()               ──► import/export statements + markdown
//!     ├── esm::reconcile()          ──► canonical `metadata` export
//!     ├── tree::parse()             ──► owned syntax tree
//!     ├── normalize::normalize()    ──► title/description/dates filled in
//!     ├── sections::assign_heading_ids()
//!     └── sections::collect_sections()
//! ```
//!
//! Every step is a pure transform over owned values; the only I/O is reading
//! the source file and the [`FileStat`] lookup for dates.

pub mod esm;
pub mod frontmatter;
mod metadata;
pub mod normalize;
pub mod sections;
pub mod tree;

pub use metadata::Metadata;

use crate::config::{MetaConfig, SiteConfig};
use crate::log;
use crate::utils::fs::{FileStat, OsStat, matches_extension};
use esm::{Export, SECTIONS};
use normalize::{FileDates, normalize};
use pulldown_cmark::Options;
use sections::{Section, assign_heading_ids, collect_sections};
use serde::Serialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {0}")]
    Read(PathBuf, #[source] io::Error),
}

// ============================================================================
// Document
// ============================================================================

/// A compiled document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source path, `None` for in-memory sources
    pub path: Option<PathBuf>,
    /// Module statements, canonical `metadata` included
    pub exports: Vec<Export>,
    /// Final metadata record
    pub metadata: Metadata,
    pub sections: Vec<Section>,
}

/// Serialized form of a document: `{ path, metadata, sections }`.
#[derive(Debug, Serialize)]
pub struct DocumentOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a Path>,
    pub metadata: &'a Metadata,
    pub sections: &'a [Section],
}

impl Document {
    /// JSON view of the document, reported under `path`.
    pub fn output<'a>(&'a self, path: Option<&'a Path>) -> DocumentOutput<'a> {
        DocumentOutput {
            path,
            metadata: &self.metadata,
            sections: &self.sections,
        }
    }

    /// Render the document's module statements as ESM text.
    ///
    /// `sections` is appended unless the author already exports it.
    pub fn to_module(&self) -> String {
        let mut parts: Vec<String> = self.exports.iter().map(Export::render).collect();

        if !esm::declares(&self.exports, SECTIONS) {
            let sections =
                serde_json::to_string(&self.sections).unwrap_or_else(|_| "[]".to_owned());
            parts.push(format!("export const {SECTIONS} = {sections}"));
        }

        let mut module = parts.join("\n\n");
        module.push('\n');
        module
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles document sources. One instance serves a whole build and is shared
/// across worker threads.
pub struct Compiler<S: FileStat = OsStat> {
    options: Options,
    meta: MetaConfig,
    extensions: Vec<String>,
    stat: S,
}

impl Compiler<OsStat> {
    pub fn new(config: &SiteConfig) -> Self {
        Self::with_stat(config, OsStat)
    }
}

impl<S: FileStat> Compiler<S> {
    /// Compiler reading file dates through `stat`.
    pub fn with_stat(config: &SiteConfig, stat: S) -> Self {
        Self {
            options: tree::default_options(),
            meta: config.meta.clone(),
            extensions: config.build.extensions.clone(),
            stat,
        }
    }

    /// Whether `path` is a document this compiler handles.
    pub fn is_document(&self, path: &Path) -> bool {
        matches_extension(path, &self.extensions)
    }

    /// Read and compile a document file.
    pub fn compile_file(&self, path: &Path) -> Result<Document, DocumentError> {
        let source =
            fs::read_to_string(path).map_err(|err| DocumentError::Read(path.to_path_buf(), err))?;
        Ok(self.compile(&source, Some(path)))
    }

    /// Compile a document source. `path` is used for file dates and messages.
    ///
    /// Never fails: malformed frontmatter is logged and treated as empty.
    pub fn compile(&self, source: &str, path: Option<&Path>) -> Document {
        let (frontmatter, body) = frontmatter::split(source);
        let (mut exports, markdown) = esm::scan(body);

        if let Some(frontmatter) = frontmatter {
            let record = frontmatter.parse().unwrap_or_else(|err| {
                log!("warn"; "{}: {err}", display_path(path));
                Metadata::default()
            });
            exports.insert(0, Export::FrontmatterMetadata(record));
        }
        let exports = esm::reconcile(exports);

        let tree = tree::parse(&markdown, self.options);

        let dates = if self.meta.file_dates {
            FileDates::lookup(&self.stat, path)
        } else {
            FileDates::default()
        };
        let metadata = normalize(esm::canonical(&exports).cloned(), &tree, dates, &self.meta);
        let exports = esm::with_metadata(exports, metadata.clone());

        let tree = assign_heading_ids(tree);
        let sections = collect_sections(&tree);

        Document {
            path: path.map(Path::to_path_buf),
            exports,
            metadata,
            sections,
        }
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "<input>".to_owned(), |p| p.display().to_string())
}
