//! Entry loader - turns manifest references into newsletter entries

use anyhow::{Context, Result};
use chrono::Locale;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use super::date::{infer_from_filename, normalize_iso_date};
use super::fetch::{fetch_with_timeout, Fetch};
use super::{FrontMatter, Markdown, NewsletterEntry, PostReference};

/// Loads every referenced newsletter, degrading failures instead of propagating them
pub struct EntryLoader {
    fetcher: Arc<dyn Fetch>,
    renderer: Arc<dyn Markdown>,
    content_dir: String,
    locale: Locale,
    timeout: Option<Duration>,
}

impl EntryLoader {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        renderer: Arc<dyn Markdown>,
        content_dir: &str,
        locale: Locale,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            content_dir: content_dir.trim_matches('/').to_string(),
            locale,
            timeout: None,
        }
    }

    /// Give up on any single file after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load all references concurrently; the result keeps manifest order
    pub async fn load_all(&self, references: &[PostReference]) -> Vec<NewsletterEntry> {
        join_all(references.iter().map(|r| self.load_entry(r))).await
    }

    /// Load a single reference. Never fails: errors yield a degraded entry.
    pub async fn load_entry(&self, reference: &PostReference) -> NewsletterEntry {
        match self.try_load(&reference.file).await {
            Ok(entry) => {
                tracing::debug!("Loaded newsletter {}", reference.file);
                entry
            }
            Err(e) => {
                tracing::warn!("Failed to load newsletter file {}: {:#}", reference.file, e);
                NewsletterEntry::degraded(&reference.file, self.locale)
            }
        }
    }

    async fn try_load(&self, file: &str) -> Result<NewsletterEntry> {
        let path = self.content_path(file);
        let text = fetch_with_timeout(self.fetcher.as_ref(), &path, self.timeout).await?;

        let (fm, body) = FrontMatter::parse(&text);
        let fallback = infer_from_filename(file, self.locale);

        let title = fm
            .title()
            .map(str::to_string)
            .unwrap_or(fallback.title);
        let date_iso = Some(normalize_iso_date(fm.date().unwrap_or_default()))
            .filter(|d| !d.is_empty())
            .unwrap_or(fallback.date);

        let html = self
            .renderer
            .render(body)
            .with_context(|| format!("Failed to render {}", path))?;

        Ok(NewsletterEntry::loaded(file, title, date_iso, html, self.locale))
    }

    /// Conventional location of a manifest file
    pub fn content_path(&self, file: &str) -> String {
        let file = file.trim_start_matches('/');
        if self.content_dir.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.content_dir, file)
        }
    }
}
