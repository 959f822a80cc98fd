//! newsletter-rs: static generator for a club website's newsletter section
//!
//! Newsletters are listed in a JSON manifest and written in Markdown with a small
//! front-matter block, or supplied as pre-rendered HTML. They are rendered into a
//! single accordion page with a table of contents per newsletter.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod widgets;

use anyhow::Result;
use chrono::Locale;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{SiteConfig, SourceKind};
use content::{
    Fetch, FsFetcher, HttpFetcher, ManifestSource, Markdown, MarkdownRenderer, NewsletterSource,
    SourceError, StaticSource,
};

/// The site being generated
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Locale used for dates
    pub fn locale(&self) -> Locale {
        content::date::locale_from_str(&self.config.language)
    }

    /// Where the newsletter page is written
    pub fn page_output_path(&self) -> PathBuf {
        self.public_dir.join(&self.config.page_path)
    }

    /// Local directory holding the Markdown files
    pub fn content_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.content_dir)
    }

    /// Local manifest file
    pub fn manifest_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.manifest)
    }

    /// Fetcher for manifest-based sources
    pub fn fetcher(&self) -> Result<Arc<dyn Fetch>, SourceError> {
        match &self.config.base_url {
            Some(url) => Ok(Arc::new(
                HttpFetcher::new(url).map_err(SourceError::Manifest)?,
            )),
            None => Ok(Arc::new(FsFetcher::new(&self.base_dir))),
        }
    }

    /// Build the configured newsletter source
    pub async fn source(&self) -> Result<Box<dyn NewsletterSource>, SourceError> {
        let locale = self.locale();
        match self.config.source {
            SourceKind::Manifest => {
                let renderer: Arc<dyn Markdown> =
                    Arc::new(MarkdownRenderer::with_config(&self.config.markdown));
                let source = ManifestSource::new(
                    self.fetcher()?,
                    Some(renderer),
                    &self.config.manifest,
                    &self.config.content_dir,
                    locale,
                )
                .with_timeout(self.config.fetch_timeout());
                Ok(Box::new(source))
            }
            SourceKind::Static => {
                let path = self.base_dir.join(&self.config.static_posts);
                Ok(Box::new(StaticSource::from_yaml_file(&path, locale).await?))
            }
        }
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Generate the newsletter page
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self, false).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
