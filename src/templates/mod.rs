//! Built-in page templates using the Tera template engine
//!
//! Templates and static assets are embedded in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::widgets::NavButtonState;

/// Static files copied into the public directory, keyed by relative path
pub const ASSETS: &[(&str, &str)] = &[
    ("css/newsletters.css", include_str!("site/css/newsletters.css")),
    ("js/newsletters.js", include_str!("site/js/newsletters.js")),
    ("js/site.js", include_str!("site/js/site.js")),
];

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped in Rust before they reach the templates
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("newsletters.html", include_str!("site/newsletters.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub lang: String,
    /// Prefix from the page to the public root, e.g. `""` or `"../"`
    pub root: String,
    pub year: i32,
    pub membership_url: Option<String>,
    pub menu: Vec<MenuItem>,
    pub nav: NavButtonState,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// The newsletter section
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterPageData {
    /// `ready`, `empty`, `failed` or `renderer-unavailable`
    pub state: &'static str,
    /// Accordion markup, or a single message paragraph
    pub body: String,
    pub count: usize,
}
