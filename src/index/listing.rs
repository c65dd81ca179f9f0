//! Rendered listing pages.

use super::{ArticleSummary, PageLink, page_links, paginate};
use serde::Serialize;
use std::fmt::Write;

/// One listing page together with its pagination links.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage<'a> {
    pub items: &'a [ArticleSummary],
    pub total_pages: usize,
    pub current: usize,
    pub links: Vec<PageLink>,
    #[serde(skip)]
    base_path: String,
}

impl<'a> ListingPage<'a> {
    pub fn new(articles: &'a [ArticleSummary], page_size: usize, page: usize, base_path: &str) -> Self {
        let slice = paginate(articles, page_size, page);
        Self {
            items: slice.items,
            total_pages: slice.total_pages,
            current: slice.current,
            links: page_links(base_path, slice.total_pages, page),
            base_path: base_path.to_owned(),
        }
    }

    /// Plain-text rendering for the terminal.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if self.items.is_empty() {
            out.push_str("No articles found.\n");
        }

        for article in self.items {
            let date = article.display_date().unwrap_or_else(|| "UNDATED".to_owned());
            let title = article.title.as_deref().unwrap_or(&article.slug);
            writeln!(out, "{date:<12} {title}").ok();
            writeln!(out, "{:12} {}", "", article.href(&self.base_path)).ok();
            if let Some(description) = &article.description {
                writeln!(out, "{:12} {description}", "").ok();
            }
            out.push('\n');
        }

        if !self.links.is_empty() {
            let pages: Vec<String> = self
                .links
                .iter()
                .map(|link| {
                    if link.current {
                        format!("[{}]", link.number)
                    } else {
                        link.number.to_string()
                    }
                })
                .collect();
            writeln!(out, "page {}/{}: {}", self.current, self.total_pages, pages.join(" ")).ok();
        }

        out
    }
}
