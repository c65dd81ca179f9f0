//! Site configuration management for `docfold.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | `[build]`   | Content/output paths, extensions, clean builds  |
//! | `[meta]`    | Metadata inference (description length, dates)  |
//! | `[listing]` | Article listings (page size, folders, base URL) |
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"
//! output = "public"
//! extensions = ["md", "mdx"]
//!
//! [meta]
//! description_length = 160
//!
//! [listing]
//! page_size = 10
//! folders = ["devops/terraform", "linux/administration"]
//! ```

mod build;
pub mod defaults;
mod error;
mod listing;
mod meta;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use listing::ListingConfig;
pub use meta::MetaConfig;

use crate::cli::{Cli, Commands};
use crate::utils::fs::absolute;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing docfold.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Metadata inference settings
    #[serde(default)]
    pub meta: MetaConfig,

    /// Article listing settings
    #[serde(default)]
    pub listing: ListingConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        self.update_path_with_root(&root, cli);

        match &cli.command {
            Commands::Build { clean } => {
                if *clean {
                    self.build.clean = true;
                }
            }
            Commands::List {
                page_size,
                base_path,
                ..
            } => {
                Self::update_option(&mut self.listing.page_size, page_size.as_ref());
                Self::update_option(&mut self.listing.base_path, base_path.as_ref());
            }
            Commands::Show { .. } => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        let root = normalize_path(root);
        self.set_root(&root);

        self.build.content = normalize_path(&root.join(&self.build.content));
        self.build.output = normalize_path(&root.join(&self.build.output));
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if self.build.extensions.is_empty() {
            bail!(ConfigError::Validation(
                "[build.extensions] must have at least one element".into()
            ));
        }

        if self.meta.description_length == 0 {
            bail!(ConfigError::Validation(
                "[meta.description_length] must be greater than 0".into()
            ));
        }

        if self.listing.page_size == 0 {
            bail!(ConfigError::Validation(
                "[listing.page_size] must be greater than 0".into()
            ));
        }

        if let Some(folder) = self.listing.folders.iter().find(|f| f.is_absolute()) {
            bail!(ConfigError::Validation(format!(
                "[listing.folders] entry `{}` must be relative to [build.content]",
                folder.display()
            )));
        }

        if let Some(cli) = self.cli
            && matches!(cli.command, Commands::Build { .. } | Commands::List { .. })
            && !self.build.content.is_dir()
        {
            bail!(ConfigError::Validation(format!(
                "[build.content] `{}` is not a directory",
                self.build.content.display()
            )));
        }

        Ok(())
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
pub fn normalize_path(path: &Path) -> PathBuf {
    // Non-existent paths are made absolute without resolving links
    path.canonicalize().unwrap_or_else(|_| absolute(path))
}

// ============================================================================
// Tests
// ============================================================================
