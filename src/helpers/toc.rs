//! Table of contents generation for rendered newsletters

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashSet;

use super::html::{html_escape, text_content};

/// Shown instead of a list when a newsletter has no headings
pub const NO_SECTIONS_MESSAGE: &str = "No sections in this newsletter yet.";

lazy_static! {
    static ref HEADING: Regex =
        Regex::new(r"(?is)<h([23])((?:\s[^>]*)?)>(.*?)</h[23]\s*>").unwrap();
    static ref ID_ATTR: Regex =
        Regex::new(r#"(?i)\sid\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap();
}

/// One heading linked from the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// 2 or 3
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Anchor ids already handed out on the page
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    used: HashSet<String>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base`, or the first free `base-2`, `base-3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut count = 2;
        while self.used.contains(&id) {
            id = format!("{}-{}", base, count);
            count += 1;
        }
        self.used.insert(id.clone());
        id
    }

    /// Mark an id as taken without generating one
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }
}

/// Headings found in a newsletter, plus its content with ids applied
#[derive(Debug, Clone)]
pub struct Toc {
    pub entries: Vec<TocEntry>,
    pub content: String,
}

impl Toc {
    /// Scan `html` for `h2`/`h3` headings in document order and give each a unique id.
    ///
    /// Ids are claimed from `anchors`, which is shared by every newsletter on the page.
    pub fn build(html: &str, anchors: &mut AnchorRegistry) -> Self {
        let mut entries = Vec::new();

        let content = HEADING
            .replace_all(html, |caps: &Captures| {
                let position = entries.len() + 1;
                let level: u8 = if &caps[1] == "3" { 3 } else { 2 };
                let attrs = ID_ATTR.replace_all(&caps[2], "");
                let inner = &caps[3];

                let text = text_content(inner).trim().to_string();
                let text = if text.is_empty() {
                    format!("Section {}", position)
                } else {
                    text
                };
                let base = match slug::slugify(&text) {
                    s if s.is_empty() => format!("section-{}", position),
                    s => s,
                };
                let id = anchors.claim(&base);

                let rewritten = format!(
                    r#"<h{level}{attrs} id="{id}">{inner}</h{level}>"#,
                    level = level,
                    attrs = attrs,
                    id = id,
                    inner = inner
                );
                entries.push(TocEntry { level, text, id });
                rewritten
            })
            .into_owned();

        Self { entries, content }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the navigation block for a newsletter titled `title`
    pub fn nav_html(&self, title: &str) -> String {
        let mut html = format!(
            r#"<nav class="toc" aria-label="Table of contents for {}">"#,
            html_escape(title)
        );

        if self.entries.is_empty() {
            html.push_str(&format!("<p>{}</p>", NO_SECTIONS_MESSAGE));
        } else {
            html.push_str("<h3>On this page</h3><ul>");
            for entry in &self.entries {
                let class = if entry.level == 3 {
                    r#" class="toc-subitem""#
                } else {
                    ""
                };
                html.push_str(&format!(
                    r##"<li{}><a href="#{}">{}</a></li>"##,
                    class,
                    entry.id,
                    html_escape(&entry.text)
                ));
            }
            html.push_str("</ul>");
        }

        html.push_str("</nav>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(html: &str) -> Toc {
        Toc::build(html, &mut AnchorRegistry::new())
    }

    #[test]
    fn test_collisions_get_numeric_suffixes() {
        let toc = build("<h2>Overview</h2><p>a</p><h2>Overview</h2><h3>Overview</h3>");
        let ids: Vec<_> = toc.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["overview", "overview-2", "overview-3"]);
        assert!(toc.content.contains(r#"<h2 id="overview">Overview</h2>"#));
        assert!(toc.content.contains(r#"<h2 id="overview-2">Overview</h2>"#));
    }

    #[test]
    fn test_levels_and_document_order() {
        let toc = build("<h2>Welcome Back Climbers</h2><h3>Key Dates</h3><h4>Skip</h4><h1>Skip</h1><h2>Safety Reminders</h2>");
        assert_eq!(
            toc.entries,
            vec![
                TocEntry { level: 2, text: "Welcome Back Climbers".into(), id: "welcome-back-climbers".into() },
                TocEntry { level: 3, text: "Key Dates".into(), id: "key-dates".into() },
                TocEntry { level: 2, text: "Safety Reminders".into(), id: "safety-reminders".into() },
            ]
        );
    }

    #[test]
    fn test_empty_heading_uses_position() {
        let toc = build("<h2>Intro</h2><h2>   </h2><h3>!!!</h3>");
        assert_eq!(toc.entries[1].id, "section-2");
        assert_eq!(toc.entries[1].text, "Section 2");
        assert_eq!(toc.entries[2].id, "section-3");
        assert_eq!(toc.entries[2].text, "!!!");
    }

    #[test]
    fn test_existing_ids_are_replaced_and_attrs_kept() {
        let toc = build(r#"<h2 class="big" id="custom">Member <em>Spotlight</em></h2>"#);
        assert_eq!(toc.entries[0].text, "Member Spotlight");
        assert_eq!(
            toc.content,
            r#"<h2 class="big" id="member-spotlight">Member <em>Spotlight</em></h2>"#
        );
    }

    #[test]
    fn test_anchor_registry_is_page_wide() {
        let mut anchors = AnchorRegistry::new();
        let first = Toc::build("<h2>Overview</h2>", &mut anchors);
        let second = Toc::build("<h2>Overview</h2><h2>Overview</h2>", &mut anchors);
        assert_eq!(first.entries[0].id, "overview");
        assert_eq!(second.entries[0].id, "overview-2");
        assert_eq!(second.entries[1].id, "overview-3");
    }

    #[test]
    fn test_nav_html() {
        let toc = build("<h2>Q&amp;A</h2><h3>Key Dates</h3>");
        let nav = toc.nav_html("February <2026>");
        assert!(nav.contains(r#"aria-label="Table of contents for February &lt;2026&gt;""#));
        assert!(nav.contains("<h3>On this page</h3>"));
        assert!(nav.contains(r##"<li><a href="#q-a">Q&amp;A</a></li>"##));
        assert!(nav.contains(r##"<li class="toc-subitem"><a href="#key-dates">Key Dates</a></li>"##));
    }

    #[test]
    fn test_no_headings_shows_placeholder() {
        let toc = build("<p>Just a paragraph.</p>");
        assert!(toc.is_empty());
        assert_eq!(toc.content, "<p>Just a paragraph.</p>");
        let nav = toc.nav_html("Empty");
        assert!(nav.contains(NO_SECTIONS_MESSAGE));
        assert!(!nav.contains("<ul>"));
    }
}
