//! Filesystem access used by the document pipeline.
//!
//! Timestamp lookups go through the [`FileStat`] trait so that the metadata
//! normalizer can be driven by fixed times in tests.

use std::{
    io,
    path::{Path, PathBuf},
    time::SystemTime,
};
use walkdir::WalkDir;

/// Timestamps reported for a file. Either may be unsupported by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTimes {
    pub modified: Option<SystemTime>,
    pub created: Option<SystemTime>,
}

/// Source of file timestamps.
pub trait FileStat: Send + Sync {
    fn stat(&self, path: &Path) -> io::Result<FileTimes>;
}

/// [`FileStat`] backed by `std::fs::metadata`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsStat;

impl FileStat for OsStat {
    fn stat(&self, path: &Path) -> io::Result<FileTimes> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            ));
        }
        Ok(FileTimes {
            modified: meta.modified().ok(),
            created: meta.created().ok(),
        })
    }
}

/// Resolve a possibly relative path against the current directory.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    }
}

/// Whether `path` has one of `extensions`, compared case-insensitively.
pub fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Recursively collect files under `dir` accepted by `filter`, sorted by path.
///
/// Unreadable entries are skipped. A missing directory yields no files.
pub fn collect_files(dir: &Path, filter: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| filter(p))
        .collect();
    files.sort();
    files
}
