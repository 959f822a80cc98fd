//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Where newsletters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `index.json` manifest plus Markdown files
    Manifest,
    /// Pre-rendered posts in a YAML file
    Static,
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Locale for dates, e.g. `en_US`
    pub language: String,
    /// IANA timezone for the footer year
    pub timezone: String,

    // Output
    pub public_dir: String,
    /// Newsletter page, relative to `public_dir`
    pub page_path: String,

    // Newsletters
    pub source: SourceKind,
    pub manifest: String,
    pub content_dir: String,
    /// Fetch over HTTP from this site instead of the local directory
    pub base_url: Option<String>,
    pub static_posts: String,
    /// Card that starts open; `null` keeps every card closed
    pub default_expanded: Option<usize>,
    /// `0` waits forever
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Navigation
    pub membership_url: Option<String>,
    #[serde(default)]
    pub menu: IndexMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Club Newsletters".to_string(),
            description: String::new(),
            language: "en_US".to_string(),
            timezone: String::new(),

            public_dir: "public".to_string(),
            page_path: "newsletters.html".to_string(),

            source: SourceKind::Manifest,
            manifest: "newsletters/index.json".to_string(),
            content_dir: "newsletters".to_string(),
            base_url: None,
            static_posts: "posts.yml".to_string(),
            default_expanded: Some(0),
            fetch_timeout_secs: 30,
            markdown: MarkdownConfig::default(),

            membership_url: None,
            menu: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        match self.fetch_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            smart_punctuation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.source, SourceKind::Manifest);
        assert_eq!(config.manifest, "newsletters/index.json");
        assert_eq!(config.default_expanded, Some(0));
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: McMaster Climbing Club
language: en_CA
source: static
default_expanded: null
fetch_timeout_secs: 0
membership_url: https://example.com/join
menu:
  Home: index.html
  Newsletters: newsletters.html
markdown:
  smart_punctuation: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "McMaster Climbing Club");
        assert_eq!(config.source, SourceKind::Static);
        assert_eq!(config.default_expanded, None);
        assert_eq!(config.fetch_timeout(), None);
        assert!(!config.markdown.smart_punctuation);
        let menu: Vec<_> = config.menu.keys().map(String::as_str).collect();
        assert_eq!(menu, vec!["Home", "Newsletters"]);
        // Unset fields keep their defaults
        assert_eq!(config.page_path, "newsletters.html");
    }
}
