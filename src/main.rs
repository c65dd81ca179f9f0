//! docfold - metadata inference and article indexing for markdown/mdx sites.

mod build;
mod cli;
mod config;
mod document;
mod index;
mod utils;

use anyhow::{Context, Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands, ShowFormat};
use config::SiteConfig;
use document::Compiler;
use index::{ListingPage, list_articles, parse_page_param};
use std::path::Path;
use utils::slug::url_path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => {
            let report = build_site(config)?;
            if report.failed > 0 {
                bail!("{} documents failed to build", report.failed);
            }
            Ok(())
        }
        Commands::List {
            folder, page, json, ..
        } => list(config, folder, page.as_deref(), *json),
        Commands::Show { file, format } => show(config, file, *format),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error; every setting has a default.
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Print one page of a folder's articles.
fn list(config: &'static SiteConfig, folder: &Path, page: Option<&str>, json: bool) -> Result<()> {
    let dir = config.build.content.join(folder);
    if !dir.is_dir() {
        bail!("not a content folder: {}", dir.display());
    }

    let compiler = Compiler::new(config);
    let articles = list_articles(&dir, &compiler);
    let base_path = config.listing.base_path_for(&url_path(folder));
    let listing = ListingPage::new(
        &articles,
        config.listing.page_size,
        parse_page_param(page),
        &base_path,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        print!("{}", listing.render_text());
    }
    Ok(())
}

/// Compile one document and print its metadata and sections or module text.
fn show(config: &'static SiteConfig, file: &Path, format: ShowFormat) -> Result<()> {
    let doc = Compiler::new(config)
        .compile_file(file)
        .with_context(|| format!("Failed to compile {}", file.display()))?;

    match format {
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&doc.output(Some(file)))?),
        ShowFormat::Esm => print!("{}", doc.to_module()),
    }
    Ok(())
}
