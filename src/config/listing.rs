//! `[listing]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[listing]` section in docfold.toml - paginated article listings.
///
/// Each folder (relative to `[build].content`) gets its own listing.
/// With no folders configured, the whole content directory is listed.
///
/// # Example
/// ```toml
/// [listing]
/// page_size = 10
/// base_path = "/articles"
/// folders = ["devops/terraform", "career/general"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ListingConfig {
    /// Articles per page.
    #[serde(default = "defaults::listing::page_size")]
    #[educe(Default = defaults::listing::page_size())]
    pub page_size: usize,

    /// URL prefix for pagination links. Empty means "use the folder path".
    #[serde(default)]
    pub base_path: String,

    /// Folders that get a listing.
    #[serde(default)]
    pub folders: Vec<PathBuf>,
}

impl ListingConfig {
    /// Resolve the link base for a folder listing.
    ///
    /// `base_path` wins when set, otherwise `/{folder}`.
    pub fn base_path_for(&self, folder: &str) -> String {
        if !self.base_path.is_empty() {
            return self.base_path.trim_end_matches('/').to_owned();
        }
        if folder.is_empty() {
            String::new()
        } else {
            format!("/{}", folder.trim_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_listing_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.listing.page_size, 10);
        assert_eq!(config.listing.base_path, "");
        assert!(config.listing.folders.is_empty());
    }

    #[test]
    fn test_listing_config_folders() {
        let config = r#"
            [listing]
            page_size = 20
            folders = ["devops/terraform", "linux/administration"]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.listing.page_size, 20);
        assert_eq!(
            config.listing.folders,
            vec![
                PathBuf::from("devops/terraform"),
                PathBuf::from("linux/administration")
            ]
        );
    }

    #[test]
    fn test_base_path_for_folder() {
        let listing = ListingConfig::default();
        assert_eq!(listing.base_path_for("devops/terraform"), "/devops/terraform");
        assert_eq!(listing.base_path_for(""), "");
    }

    #[test]
    fn test_base_path_override() {
        let listing = ListingConfig {
            base_path: "/articles/".into(),
            ..ListingConfig::default()
        };
        assert_eq!(listing.base_path_for("devops"), "/articles");
    }
}
