//! Content sources
//!
//! A source produces the unsorted list of entries for the newsletter page.
//! Either a manifest of Markdown files, or a list of posts whose HTML was
//! prepared ahead of time.

use async_trait::async_trait;
use chrono::Locale;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::error::SourceError;
use super::fetch::{fetch_with_timeout, Fetch};
use super::loader::EntryLoader;
use super::manifest::parse_manifest;
use super::{Markdown, NewsletterEntry, StaticPost};

#[async_trait]
pub trait NewsletterSource: Send + Sync {
    /// Resolve every entry. An `Err` means nothing can be shown.
    async fn entries(&self) -> Result<Vec<NewsletterEntry>, SourceError>;
}

/// Manifest-driven source: `index.json` plus one Markdown file per entry
pub struct ManifestSource {
    fetcher: Arc<dyn Fetch>,
    renderer: Option<Arc<dyn Markdown>>,
    manifest_path: String,
    content_dir: String,
    locale: Locale,
    timeout: Option<Duration>,
}

impl ManifestSource {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        renderer: Option<Arc<dyn Markdown>>,
        manifest_path: &str,
        content_dir: &str,
        locale: Locale,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            manifest_path: manifest_path.to_string(),
            content_dir: content_dir.to_string(),
            locale,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl NewsletterSource for ManifestSource {
    async fn entries(&self) -> Result<Vec<NewsletterEntry>, SourceError> {
        let renderer = self
            .renderer
            .clone()
            .ok_or(SourceError::RendererUnavailable)?;

        tracing::info!(
            "Fetching manifest {} from {}",
            self.manifest_path,
            self.fetcher.describe()
        );
        let text = fetch_with_timeout(self.fetcher.as_ref(), &self.manifest_path, self.timeout)
            .await
            .map_err(SourceError::Manifest)?;
        let references = parse_manifest(&text)?;
        tracing::info!("Manifest lists {} newsletters", references.len());

        let loader = EntryLoader::new(
            self.fetcher.clone(),
            renderer,
            &self.content_dir,
            self.locale,
        )
        .with_timeout(self.timeout);

        Ok(loader.load_all(&references).await)
    }
}

/// Pre-rendered posts handed over explicitly
#[derive(Debug, Clone)]
pub struct StaticSource {
    posts: Vec<StaticPost>,
    locale: Locale,
}

impl StaticSource {
    pub fn new(posts: Vec<StaticPost>, locale: Locale) -> Self {
        Self { posts, locale }
    }

    /// Read posts from a YAML list
    pub async fn from_yaml_file(path: &Path, locale: Locale) -> Result<Self, SourceError> {
        let failed = |message: String| SourceError::StaticPosts {
            path: path.display().to_string(),
            message,
        };
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let posts: Vec<StaticPost> =
            serde_yaml::from_str(&content).map_err(|e| failed(e.to_string()))?;
        Ok(Self::new(posts, locale))
    }
}

#[async_trait]
impl NewsletterSource for StaticSource {
    async fn entries(&self) -> Result<Vec<NewsletterEntry>, SourceError> {
        Ok(self
            .posts
            .iter()
            .map(|post| NewsletterEntry::from_static(post, self.locale))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{FsFetcher, MarkdownRenderer};
    use std::fs;
    use tempfile::TempDir;

    fn site(manifest: &str, files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("newsletters")).unwrap();
        fs::write(dir.path().join("newsletters/index.json"), manifest).unwrap();
        for (name, body) in files {
            fs::write(dir.path().join("newsletters").join(name), body).unwrap();
        }
        dir
    }

    fn source(dir: &TempDir, with_renderer: bool) -> ManifestSource {
        let renderer: Option<Arc<dyn Markdown>> = if with_renderer {
            Some(Arc::new(MarkdownRenderer::new()))
        } else {
            None
        };
        ManifestSource::new(
            Arc::new(FsFetcher::new(dir.path())),
            renderer,
            "newsletters/index.json",
            "newsletters",
            Locale::en_US,
        )
    }

    #[tokio::test]
    async fn test_card_count_matches_accepted_references() {
        let dir = site(
            r#"["2026-01.md", {"file": "2026-02.md"}, 5, {"nope": true}]"#,
            &[("2026-01.md", "a"), ("2026-02.md", "b")],
        );
        let entries = source(&dir, true).entries().await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_manifest_is_terminal() {
        let dir = TempDir::new().unwrap();
        let result = source(&dir, true).entries().await;
        assert!(matches!(result, Err(SourceError::Manifest(_))));
    }

    #[tokio::test]
    async fn test_manifest_cannot_reach_outside_site() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        fs::create_dir_all(root.join("newsletters")).unwrap();
        fs::write(
            root.join("newsletters/index.json"),
            r#"["../../secret.md", "2026-01.md"]"#,
        )
        .unwrap();
        fs::write(root.join("newsletters/2026-01.md"), "## Hi").unwrap();
        fs::write(dir.path().join("secret.md"), "TOPSECRET").unwrap();

        let source = ManifestSource::new(
            Arc::new(FsFetcher::new(&root)),
            Some(Arc::new(MarkdownRenderer::new())),
            "newsletters/index.json",
            "newsletters",
            Locale::en_US,
        );
        let entries = source.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_degraded());
        assert!(!entries[0].html.contains("TOPSECRET"));
        assert!(!entries[1].is_degraded());
    }

    #[tokio::test]
    async fn test_missing_renderer_is_terminal() {
        let dir = site("[]", &[]);
        let result = source(&dir, false).entries().await;
        assert!(matches!(result, Err(SourceError::RendererUnavailable)));
    }

    #[tokio::test]
    async fn test_empty_manifest_is_not_an_error() {
        let dir = site("[]", &[]);
        assert!(source(&dir, true).entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_static_source_bypasses_markdown() {
        let posts = vec![StaticPost {
            id: "2026-01-newsletter".to_string(),
            title: "January 2026 Newsletter".to_string(),
            date: "2026-01-05".to_string(),
            content_html: "<h2>New Semester Launch</h2>".to_string(),
        }];
        let entries = StaticSource::new(posts, Locale::en_US).entries().await.unwrap();
        assert_eq!(entries[0].id, "2026-01-newsletter");
        assert_eq!(entries[0].html, "<h2>New Semester Launch</h2>");
        assert_eq!(entries[0].formatted_date, "January 5, 2026");
    }

    #[tokio::test]
    async fn test_static_source_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.yml");
        fs::write(
            &path,
            "- id: a\n  title: A\n  date: 2026-02-01\n  content_html: <p>a</p>\n- id: b\n  title: B\n  content_html: <p>b</p>\n",
        )
        .unwrap();
        let source = StaticSource::from_yaml_file(&path, Locale::en_US).await.unwrap();
        let entries = source.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].formatted_date, "Date not set");

        let missing = StaticSource::from_yaml_file(&dir.path().join("nope.yml"), Locale::en_US).await;
        assert!(matches!(missing, Err(SourceError::StaticPosts { .. })));
    }
}
