//! Markdown rendering

use anyhow::Result;
use pulldown_cmark::{html, Options, Parser};

use crate::config::MarkdownConfig;

/// Converts a Markdown body into an HTML fragment
pub trait Markdown: Send + Sync {
    fn render(&self, markdown: &str) -> Result<String>;
}

/// pulldown-cmark backed renderer
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a renderer with every extension enabled
    pub fn new() -> Self {
        Self::with_config(&MarkdownConfig::default())
    }

    /// Create a renderer from the site's markdown settings
    pub fn with_config(config: &MarkdownConfig) -> Self {
        // Front matter is stripped before rendering, so YAML metadata blocks stay off
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        if config.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        Self { options }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Markdown for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        Ok(html_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let html = MarkdownRenderer::new()
            .render("## Key Dates\n\n- Feb 7: Orientation")
            .unwrap();
        assert!(html.contains("<h2>Key Dates</h2>"));
        assert!(html.contains("<li>Feb 7: Orientation</li>"));
    }

    #[test]
    fn test_render_table() {
        let html = MarkdownRenderer::new()
            .render("| Day | Event |\n|-----|-------|\n| Fri | Social |")
            .unwrap();
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_smart_punctuation_toggle() {
        let plain = MarkdownRenderer::with_config(&MarkdownConfig {
            smart_punctuation: false,
        });
        assert!(!plain.render("\"quoted\"").unwrap().contains('\u{201c}'));

        let smart = MarkdownRenderer::new();
        assert!(smart.render("\"quoted\"").unwrap().contains('\u{201c}'));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(MarkdownRenderer::new().render("").unwrap(), "");
    }
}
