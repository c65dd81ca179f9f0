//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output()      ──► clean / create output directory
//!     │
//!     ├── compile_documents()   ──► <output>/<path>.json + <path>.mjs
//!     │       (parallel, failures counted)
//!     │
//!     └── write_listings()      ──► <output>/<folder>/page/<n>.json
//!                                   <output>/<folder>/articles.json
//! ```

use crate::{
    config::SiteConfig,
    document::{Compiler, Metadata},
    index::{ListingPage, articles_in},
    log,
    utils::{
        fs::{FileStat, collect_files},
        log::ProgressBars,
        slug::url_path,
    },
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Outcome of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Documents compiled and written
    pub documents: usize,
    /// Documents that could not be read or written
    pub failed: usize,
    /// Listing page files written
    pub pages: usize,
}

/// Build the entire site with file dates read from disk.
///
/// If `config.build.clean` is true, clears the entire output directory first.
pub fn build_site(config: &'static SiteConfig) -> Result<BuildReport> {
    build_with(config, &Compiler::new(config))
}

/// Build the site with an explicit compiler.
pub fn build_with<S: FileStat>(config: &SiteConfig, compiler: &Compiler<S>) -> Result<BuildReport> {
    let content = &config.build.content;
    let output = &config.build.output;

    prepare_output(output, config.build.clean)?;

    let files = collect_files(content, |path| compiler.is_document(path));
    let folders = listing_folders(config);

    log!("build"; "compiling {} documents", files.len());
    let progress = ProgressBars::new(&[("documents", files.len()), ("listings", folders.len())]);

    let (documents, failed) = compile_documents(&files, content, output, compiler, || {
        progress.inc_by_name("documents")
    });

    let mut pages = 0;
    for folder in &folders {
        pages += write_listings(config, folder, &documents)?;
        progress.inc_by_name("listings");
    }

    progress.finish();

    let report = BuildReport {
        documents: documents.len(),
        failed,
        pages,
    };
    log_build_result(&report, output);
    Ok(report)
}

/// Create the output directory, removing it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Configured listing folders, or the content root when none are set.
fn listing_folders(config: &SiteConfig) -> Vec<PathBuf> {
    if config.listing.folders.is_empty() {
        vec![PathBuf::new()]
    } else {
        config.listing.folders.clone()
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Compile and write every document. Returns the metadata of the documents
/// that succeeded and the number that failed.
fn compile_documents<S: FileStat>(
    files: &[PathBuf],
    content: &Path,
    output: &Path,
    compiler: &Compiler<S>,
    on_done: impl Fn() + Sync,
) -> (Vec<(PathBuf, Metadata)>, usize) {
    let failed = AtomicUsize::new(0);

    let documents = files
        .par_iter()
        .filter_map(|path| {
            let result = compile_document(path, content, output, compiler);
            on_done();
            match result {
                Ok(metadata) => Some((path.clone(), metadata)),
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    log!("error"; "{}: {:#}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    (documents, failed.into_inner())
}

fn compile_document<S: FileStat>(
    path: &Path,
    content: &Path,
    output: &Path,
    compiler: &Compiler<S>,
) -> Result<Metadata> {
    let doc = compiler.compile_file(path)?;
    let relative = path.strip_prefix(content).unwrap_or(path);

    let json = serde_json::to_string_pretty(&doc.output(Some(relative)))?;
    write_file(&output_path(output, relative, "json"), &json)?;
    write_file(&output_path(output, relative, "mjs"), &doc.to_module())?;

    Ok(doc.metadata)
}

/// `<output>/<relative without extension>.<ext>`
///
/// The extension is appended rather than substituted so `v1.2.mdx` maps to
/// `v1.2.json`.
fn output_path(output: &Path, relative: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(relative.with_extension("").as_os_str());
    name.push(".");
    name.push(ext);
    output.join(name)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

// ============================================================================
// Listings
// ============================================================================

/// Write the paginated listing of one folder. Returns the number of page
/// files written; an empty folder still gets its (empty) first page.
fn write_listings(
    config: &SiteConfig,
    folder: &Path,
    documents: &[(PathBuf, Metadata)],
) -> Result<usize> {
    let articles = articles_in(&config.build.content.join(folder), documents);
    let folder_name = url_path(folder);
    let base_path = config.listing.base_path_for(&folder_name);
    let page_size = config.listing.page_size;

    let dir = config.build.output.join(folder);
    write_json(&dir.join("articles.json"), &articles)?;

    let first = ListingPage::new(&articles, page_size, 1, &base_path);
    let total = first.total_pages.max(1);
    write_json(&dir.join("page").join("1.json"), &first)?;

    for n in 2..=total {
        let page = ListingPage::new(&articles, page_size, n, &base_path);
        write_json(&dir.join("page").join(format!("{n}.json")), &page)?;
    }

    log!("index"; "{}: {} articles, {} pages", display_folder(&folder_name), articles.len(), total);
    Ok(total)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_file(path, &serde_json::to_string_pretty(value)?)
}

fn display_folder(name: &str) -> &str {
    if name.is_empty() { "/" } else { name }
}

/// Log build result based on what was written
fn log_build_result(report: &BuildReport, output: &Path) {
    if report.documents == 0 && report.failed == 0 {
        log!("warn"; "output is empty, check that content has documents");
        return;
    }
    if report.failed > 0 {
        log!("warn"; "{} documents failed", report.failed);
    }
    log!("build"; "done: {} documents written to {}", report.documents, output.display());
}
