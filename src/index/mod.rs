//! Article index for a content folder.
//!
//! Every document under a folder becomes an [`ArticleSummary`]. Summaries are
//! ordered newest first and sliced into pages by [`paginate`].

mod listing;
mod paginate;

pub use listing::ListingPage;
pub use paginate::{PageLink, page_links, paginate, parse_page_param};

use crate::document::{Compiler, Metadata};
use crate::log;
use crate::utils::{
    date::IsoDate,
    fs::{FileStat, collect_files},
    slug::article_slug,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Read-only listing view of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    /// Source path relative to the listed folder
    pub path: PathBuf,
}

impl ArticleSummary {
    pub fn new(slug: String, path: PathBuf, metadata: Metadata) -> Self {
        Self {
            slug,
            title: metadata.title,
            description: metadata.description,
            date: metadata.date,
            path,
        }
    }

    /// Leading `YYYY-MM-DD` of `date`, if it parses.
    pub fn parsed_date(&self) -> Option<IsoDate> {
        self.date.as_deref().and_then(IsoDate::parse)
    }

    /// Date as shown on a listing card, e.g. `JAN 15 2024`.
    pub fn display_date(&self) -> Option<String> {
        self.parsed_date()
            .map(|d| format!("{} {} {}", d.month_abbr(), d.day, d.year))
    }

    /// Link to the article under a listing's base path.
    pub fn href(&self, base_path: &str) -> String {
        format!("{}/{}", base_path.trim_end_matches('/'), self.slug)
    }
}

/// Load every document under `folder` as a summary, newest first.
///
/// Documents that cannot be read are skipped with a warning.
pub fn list_articles<S: FileStat>(folder: &Path, compiler: &Compiler<S>) -> Vec<ArticleSummary> {
    let files = collect_files(folder, |path| compiler.is_document(path));

    let documents: Vec<(PathBuf, Metadata)> = files
        .into_par_iter()
        .filter_map(|path| match compiler.compile_file(&path) {
            Ok(doc) => Some((path, doc.metadata)),
            Err(err) => {
                log!("warn"; "skipped: {:#}", anyhow::Error::new(err));
                None
            }
        })
        .collect();

    articles_in(folder, &documents)
}

/// Summaries of the compiled documents located under `folder`, newest first.
///
/// The folder's own `page`/`index` document is not an article.
pub fn articles_in(folder: &Path, documents: &[(PathBuf, Metadata)]) -> Vec<ArticleSummary> {
    let mut articles: Vec<ArticleSummary> = documents
        .iter()
        .filter_map(|(path, metadata)| {
            let relative = path.strip_prefix(folder).ok()?;
            let slug = article_slug(relative);
            (!slug.is_empty())
                .then(|| ArticleSummary::new(slug, relative.to_path_buf(), metadata.clone()))
        })
        .collect();

    sort_articles(&mut articles);
    articles
}

/// Date descending, undated last, then slug and path ascending.
pub fn sort_articles(articles: &mut [ArticleSummary]) {
    articles.sort_by(|a, b| {
        b.parsed_date()
            .cmp(&a.parsed_date())
            .then_with(|| a.slug.cmp(&b.slug))
            .then_with(|| a.path.cmp(&b.path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    fn summary(slug: &str, date: Option<&str>) -> ArticleSummary {
        ArticleSummary {
            slug: slug.into(),
            title: None,
            description: None,
            date: date.map(Into::into),
            path: PathBuf::from(format!("{slug}.md")),
        }
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_sort_newest_first_undated_last() {
        let mut articles = vec![
            summary("b", None),
            summary("old", Some("2023-01-01")),
            summary("a", None),
            summary("new", Some("2024-06-15T08:00:00Z")),
            summary("bad", Some("someday")),
        ];
        sort_articles(&mut articles);

        let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "old", "a", "b", "bad"]);
    }

    #[test]
    fn test_sort_ties_by_slug() {
        let mut articles = vec![
            summary("zeta", Some("2024-01-01")),
            summary("alpha", Some("2024-01-01")),
        ];
        sort_articles(&mut articles);
        assert_eq!(articles[0].slug, "alpha");
    }

    #[test]
    fn test_display_date_and_href() {
        let article = summary("terraform-intro", Some("2024-01-05"));
        assert_eq!(article.display_date().as_deref(), Some("JAN 5 2024"));
        assert_eq!(article.href("/devops/terraform/"), "/devops/terraform/terraform-intro");
        assert_eq!(summary("x", None).display_date(), None);
    }

    #[test]
    fn test_list_articles() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "page.mdx", "# Terraform\n");
        write(
            dir.path(),
            "intro/page.mdx",
            "---\ntitle: Intro\ndate: 2024-01-15\n---\nFirst steps.\n",
        );
        write(
            dir.path(),
            "state.md",
            "---\ndate: 2024-03-02\n---\n# Remote state\n\nKeep state in a bucket.\n",
        );
        write(dir.path(), "notes.txt", "not a document");

        let compiler = Compiler::new(&SiteConfig::default());
        let articles = list_articles(dir.path(), &compiler);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].slug, "state");
        assert_eq!(articles[0].title.as_deref(), Some("Remote state"));
        assert_eq!(articles[0].description.as_deref(), Some("Keep state in a bucket."));
        assert_eq!(articles[1].slug, "intro");
        assert_eq!(articles[1].path, PathBuf::from("intro/page.mdx"));
    }

    #[test]
    fn test_articles_in_filters_by_folder() {
        let meta = |title: &str| Metadata {
            title: Some(title.into()),
            ..Metadata::default()
        };
        let documents = vec![
            (PathBuf::from("/c/devops/page.mdx"), meta("DevOps")),
            (PathBuf::from("/c/devops/terraform.mdx"), meta("Terraform")),
            (PathBuf::from("/c/linux/cron.mdx"), meta("Cron")),
        ];

        let articles = articles_in(Path::new("/c/devops"), &documents);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].slug, "terraform");

        assert_eq!(articles_in(Path::new("/c"), &documents).len(), 3);
    }

    #[test]
    fn test_list_articles_missing_folder() {
        let compiler = Compiler::new(&SiteConfig::default());
        assert!(list_articles(Path::new("/definitely/missing"), &compiler).is_empty());
    }
}
