//! Metadata inference.
//!
//! Fills the gaps an author left in a document's metadata record. A key that
//! is already present is never replaced, so running the normalizer twice
//! yields the same record.
//!
//! | Key            | Inferred from                                         |
//! |----------------|-------------------------------------------------------|
//! | `title`        | first level-1 heading                                 |
//! | `description`  | first non-empty paragraph after that heading          |
//! | `date`         | file modification date, else creation date            |
//! | `dateCreated`  | file creation date                                    |
//! | `dateModified` | file modification date                                |

use super::Metadata;
use super::tree::{Node, Tree};
use crate::config::MetaConfig;
use crate::utils::date::IsoDate;
use crate::utils::fs::{FileStat, absolute};
use std::path::Path;

/// Calendar dates of a document's source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileDates {
    pub created: Option<IsoDate>,
    pub modified: Option<IsoDate>,
}

impl FileDates {
    /// Stat the source file. Any failure yields no dates.
    pub fn lookup<S: FileStat + ?Sized>(stat: &S, path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match stat.stat(&absolute(path)) {
            Ok(times) => Self {
                created: times.created.and_then(IsoDate::from_system_time),
                modified: times.modified.and_then(IsoDate::from_system_time),
            },
            Err(_) => Self::default(),
        }
    }

    /// Date used for the `date` key.
    pub fn primary(&self) -> Option<IsoDate> {
        self.modified.or(self.created)
    }
}

/// Title and description read from document content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inferred {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Read title and description from the tree.
///
/// Without a level-1 heading there is neither.
pub fn infer(tree: &Tree, config: &MetaConfig) -> Inferred {
    let mut nodes = tree.descendants();

    let Some(heading) = nodes.find_map(|node| match node {
        Node::Heading(h) if h.level == 1 => Some(h),
        _ => None,
    }) else {
        return Inferred::default();
    };

    let title = Some(heading.text().trim().to_owned()).filter(|t| !t.is_empty());

    // Continues after the heading
    let description = nodes.find_map(|node| match node {
        Node::Paragraph(_) => Some(node.text().trim().to_owned()).filter(|t| !t.is_empty()),
        _ => None,
    });

    Inferred {
        title,
        description: description
            .map(|d| truncate(&d, config.description_length, &config.ellipsis)),
    }
}

/// Cut `text` to `max` characters, appending `ellipsis` when anything was cut.
pub fn truncate(text: &str, max: usize, ellipsis: &str) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{ellipsis}", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Produce the final metadata record.
pub fn normalize(
    record: Option<Metadata>,
    tree: &Tree,
    dates: FileDates,
    config: &MetaConfig,
) -> Metadata {
    let mut meta = record.unwrap_or_default();

    if meta.title.is_none() || meta.description.is_none() {
        let inferred = infer(tree, config);
        fill(&mut meta.title, inferred.title);
        fill(&mut meta.description, inferred.description);
    }

    if config.file_dates {
        let iso = |d: Option<IsoDate>| d.map(|d| d.to_string());
        fill(&mut meta.date, iso(dates.primary()));
        fill(&mut meta.date_created, iso(dates.created));
        fill(&mut meta.date_modified, iso(dates.modified));
    }

    meta
}

#[inline]
fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}
