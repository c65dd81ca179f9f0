//! URL slugification for heading ids and article slugs.
//!
//! Heading ids must be unique within a document, so every document owns a
//! [`SlugCounter`] that disambiguates repeated headings with a numeric suffix:
//!
//! | Heading      | id           |
//! |--------------|--------------|
//! | `Overview`   | `overview`   |
//! | `Overview`   | `overview-1` |
//! | `Overview`   | `overview-2` |

use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Fallback slug for text with no alphanumeric content
const EMPTY_SLUG: &str = "section";

/// Characters removed outright instead of becoming a separator
const DROPPED_CHARS: &[char] = &['\'', '\u{2019}', '`'];

// ============================================================================
// Slugification
// ============================================================================

/// Convert text to a lowercase ASCII slug.
///
/// Non-ASCII text is transliterated first ("Ünïcödé" → "unicode"), then every
/// run of non-alphanumeric characters becomes a single `-`.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars().filter(|c| !DROPPED_CHARS.contains(c)) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        EMPTY_SLUG.to_owned()
    } else {
        slug
    }
}

/// Per-document slug generator that never hands out the same id twice.
#[derive(Debug, Default)]
pub struct SlugCounter {
    /// Next suffix to try for each base slug
    counts: HashMap<String, usize>,
    /// Every id handed out so far
    used: HashSet<String>,
}

impl SlugCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text` and disambiguate it against earlier ids.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        self.reserve(base)
    }

    /// Claim `base` or the first free `base-N`.
    fn reserve(&mut self, base: String) -> String {
        let mut n = self.counts.get(&base).copied().unwrap_or(0);
        loop {
            let candidate = if n == 0 {
                base.clone()
            } else {
                format!("{base}-{n}")
            };
            n += 1;
            if self.used.insert(candidate.clone()) {
                self.counts.insert(base, n);
                return candidate;
            }
        }
    }
}

// ============================================================================
// Path Slugs
// ============================================================================

/// Article slug for a document path relative to its listing folder.
///
/// Extension is dropped and separators become `/`. A document named `page` or
/// `index` is addressed by its directory, so `terraform-intro/page.mdx`
/// becomes `terraform-intro`. The folder's own page yields an empty slug.
pub fn article_slug(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let is_dir_page = without_ext
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == "page" || n == "index");

    let path = if is_dir_page {
        without_ext.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        without_ext
    };

    url_path(&path)
}

/// Path joined with `/` regardless of platform, without leading or trailing
/// slash.
pub fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Overview"), "overview");
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
    }

    #[test]
    fn test_slugify_drops_apostrophes() {
        assert_eq!(slugify("Don't panic"), "dont-panic");
        assert_eq!(slugify("It\u{2019}s fine"), "its-fine");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Step 2: Install v1.2"), "step-2-install-v1-2");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "section");
        assert_eq!(slugify("!!!"), "section");
    }

    #[test]
    fn test_counter_disambiguates_duplicates() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.slug("Overview"), "overview");
        assert_eq!(counter.slug("Overview"), "overview-1");
        assert_eq!(counter.slug("overview"), "overview-2");
        assert_eq!(counter.slug("Setup"), "setup");
    }

    #[test]
    fn test_counter_skips_taken_suffix() {
        let mut counter = SlugCounter::new();
        assert_eq!(counter.slug("Overview 1"), "overview-1");
        assert_eq!(counter.slug("Overview"), "overview");
        assert_eq!(counter.slug("Overview"), "overview-2");
    }

    #[test]
    fn test_counters_are_independent() {
        let mut first = SlugCounter::new();
        let mut second = SlugCounter::new();
        assert_eq!(first.slug("Intro"), "intro");
        assert_eq!(second.slug("Intro"), "intro");
    }

    #[test]
    fn test_article_slug() {
        assert_eq!(article_slug(Path::new("hello.md")), "hello");
        assert_eq!(article_slug(Path::new("intro/page.mdx")), "intro");
        assert_eq!(article_slug(Path::new("a/b/index.md")), "a/b");
        assert_eq!(article_slug(Path::new("a/b/post.mdx")), "a/b/post");
        assert_eq!(article_slug(Path::new("page.mdx")), "");
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path(Path::new("")), "");
        assert_eq!(url_path(Path::new("devops/terraform/")), "devops/terraform");
    }
}
