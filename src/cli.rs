//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// docfold: metadata inference and article indexing for markdown sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: docfold.toml)
    #[arg(short = 'C', long, default_value = "docfold.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for `show`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// Metadata and sections as JSON
    #[default]
    Json,
    /// The derived `export const ...` module text
    Esm,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile every document and write metadata, sections and listings
    Build {
        /// Clean output directory completely before building
        #[arg(long)]
        clean: bool,
    },

    /// List the articles of a content folder, newest first
    List {
        /// Folder relative to the content directory
        #[arg(default_value = "")]
        folder: PathBuf,

        /// Page to show, 1-based. Values that are not a number show an empty page
        #[arg(short, long)]
        page: Option<String>,

        /// Articles per page
        #[arg(short = 's', long)]
        page_size: Option<usize>,

        /// URL prefix used for pagination links
        #[arg(short, long)]
        base_path: Option<String>,

        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a single document and print its metadata and sections
    Show {
        /// Path to the document
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: ShowFormat,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_list(&self) -> bool {
        matches!(self.command, Commands::List { .. })
    }
    pub const fn is_show(&self) -> bool {
        matches!(self.command, Commands::Show { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_clean() {
        let cli = Cli::try_parse_from(["docfold", "build", "--clean"]).unwrap();
        assert!(cli.is_build());
        assert!(matches!(cli.command, Commands::Build { clean: true }));
        assert_eq!(cli.config, PathBuf::from("docfold.toml"));
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["docfold", "list", "devops/terraform"]).unwrap();
        match cli.command {
            Commands::List {
                folder,
                page,
                page_size,
                base_path,
                json,
            } => {
                assert_eq!(folder, PathBuf::from("devops/terraform"));
                assert_eq!(page, None);
                assert_eq!(page_size, None);
                assert_eq!(base_path, None);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_show_esm() {
        let cli = Cli::try_parse_from(["docfold", "show", "a.mdx", "--format", "esm"]).unwrap();
        assert!(cli.is_show());
        match cli.command {
            Commands::Show { file, format } => {
                assert_eq!(file, PathBuf::from("a.mdx"));
                assert_eq!(format, ShowFormat::Esm);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_paths() {
        let cli = Cli::try_parse_from(["docfold", "-r", "site", "-c", "docs", "-o", "dist", "build"])
            .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert_eq!(cli.content, Some(PathBuf::from("docs")));
        assert_eq!(cli.output, Some(PathBuf::from("dist")));
    }
}
