//! Generator module - writes the newsletter page and its assets

use anyhow::{Context as _, Result};
use std::fs;
use std::path::PathBuf;
use tera::Context;

use crate::content::{sort_newest_first, NewsletterEntry, SourceError};
use crate::helpers::html_escape;
use crate::templates::{MenuItem, NewsletterPageData, SiteData, TemplateRenderer, ASSETS};
use crate::widgets::{Accordion, NavMenu};
use crate::Site;

pub const EMPTY_MESSAGE: &str = "No newsletters published yet. Check back soon.";
pub const FAILED_MESSAGE: &str = "Could not load newsletters right now. Please try again later.";
pub const RENDERER_UNAVAILABLE_MESSAGE: &str = "Markdown parser did not load. Please refresh.";

/// What the newsletter section shows
#[derive(Debug, Clone)]
pub enum PageState {
    /// Entries sorted newest first
    Ready(Vec<NewsletterEntry>),
    Empty,
    Failed,
    RendererUnavailable,
}

impl PageState {
    /// Classify the outcome of loading a source
    pub fn from_result(result: Result<Vec<NewsletterEntry>, SourceError>) -> Self {
        match result {
            Ok(entries) if entries.is_empty() => PageState::Empty,
            Ok(mut entries) => {
                sort_newest_first(&mut entries);
                PageState::Ready(entries)
            }
            Err(SourceError::RendererUnavailable) => PageState::RendererUnavailable,
            Err(_) => PageState::Failed,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageState::Ready(_) => "ready",
            PageState::Empty => "empty",
            PageState::Failed => "failed",
            PageState::RendererUnavailable => "renderer-unavailable",
        }
    }

    /// The single message shown instead of the accordion
    pub fn message(&self) -> Option<&'static str> {
        match self {
            PageState::Ready(_) => None,
            PageState::Empty => Some(EMPTY_MESSAGE),
            PageState::Failed => Some(FAILED_MESSAGE),
            PageState::RendererUnavailable => Some(RENDERER_UNAVAILABLE_MESSAGE),
        }
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, PageState::Failed | PageState::RendererUnavailable)
    }
}

/// Static page generator using Tera templates
pub struct Generator {
    site: Site,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Write the page and its assets; returns the page path
    pub fn generate(&self, state: &PageState) -> Result<PathBuf> {
        fs::create_dir_all(&self.site.public_dir)?;
        self.write_assets()?;

        let html = self.render_page(state)?;
        let output_path = self.site.page_output_path();
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok(output_path)
    }

    /// Render the full newsletter page for `state`
    pub fn render_page(&self, state: &PageState) -> Result<String> {
        let (body, count) = match state {
            PageState::Ready(entries) => {
                let accordion = Accordion::build(entries, self.site.config.default_expanded);
                (accordion.to_html(), accordion.len())
            }
            other => (
                format!("<p>{}</p>", html_escape(other.message().unwrap_or_default())),
                0,
            ),
        };

        let page = NewsletterPageData {
            state: state.name(),
            body,
            count,
        };

        let mut context = Context::new();
        context.insert("site", &self.build_site_data());
        context.insert("page", &page);
        context.insert("generator_version", env!("CARGO_PKG_VERSION"));

        self.renderer.render("newsletters.html", &context)
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        let config = &self.site.config;
        let root = "../".repeat(config.page_path.trim_start_matches('/').matches('/').count());

        SiteData {
            title: html_escape(&config.title),
            description: html_escape(&config.description),
            lang: html_escape(&config.language.replace('_', "-")),
            root,
            year: crate::content::date::current_year(&config.timezone),
            membership_url: config.membership_url.as_deref().map(html_escape),
            menu: config
                .menu
                .iter()
                .map(|(name, path)| MenuItem {
                    name: html_escape(name),
                    path: html_escape(path),
                })
                .collect(),
            nav: NavMenu::new().button_state(),
        }
    }

    fn write_assets(&self) -> Result<()> {
        for (path, content) in ASSETS {
            let target = self.site.public_dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, content)?;
        }
        Ok(())
    }
}
