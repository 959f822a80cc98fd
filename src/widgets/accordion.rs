//! Accordion cards for the newsletter page
//!
//! Each newsletter becomes a card with a toggle button and a collapsible panel.
//! [`Panel`] is the open/close state machine; the generated markup reflects its
//! initial state and the page script drives the same transitions in the browser.

use serde::Serialize;
use std::fmt;

use crate::content::NewsletterEntry;
use crate::helpers::{html_escape, safe_links, AnchorRegistry, Toc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Collapsed,
    Expanded,
}

/// Explicit `max-height` of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Height {
    /// No limit, content may reflow freely
    Auto,
    Px(u32),
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Height::Auto => f.write_str("none"),
            Height::Px(px) => write!(f, "{}px", px),
        }
    }
}

/// An animation started by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub generation: u64,
    pub from: Height,
    pub to: Height,
}

/// Collapsible panel state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    state: PanelState,
    hidden: bool,
    height: Height,
    generation: u64,
}

impl Panel {
    pub fn collapsed() -> Self {
        Self {
            state: PanelState::Collapsed,
            hidden: true,
            height: Height::Px(0),
            generation: 0,
        }
    }

    /// Open without animating
    pub fn expanded() -> Self {
        Self {
            state: PanelState::Expanded,
            hidden: false,
            height: Height::Auto,
            generation: 0,
        }
    }

    /// Flip the panel. `content_height` is the panel's full scroll height.
    ///
    /// The returned transition must be finished with [`Panel::finish_transition`];
    /// only the latest one takes effect.
    pub fn toggle(&mut self, content_height: u32) -> Transition {
        self.generation += 1;
        let from = match self.state {
            PanelState::Collapsed => {
                self.state = PanelState::Expanded;
                self.hidden = false;
                self.height = Height::Px(content_height);
                Height::Px(0)
            }
            PanelState::Expanded => {
                let current = match self.height {
                    Height::Auto => content_height,
                    Height::Px(px) => px,
                };
                self.state = PanelState::Collapsed;
                self.height = Height::Px(0);
                Height::Px(current)
            }
        };
        Transition {
            generation: self.generation,
            from,
            to: self.height,
        }
    }

    /// Complete a transition. Returns false (and changes nothing) for a superseded one.
    pub fn finish_transition(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.state {
            PanelState::Expanded => self.height = Height::Auto,
            PanelState::Collapsed => self.hidden = true,
        }
        true
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == PanelState::Expanded
    }

    /// Hidden panels are out of the accessibility tree and tab order
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn height(&self) -> Height {
        self.height
    }

    /// Value for the toggle button's `aria-expanded`
    pub fn aria_expanded(&self) -> &'static str {
        if self.is_expanded() {
            "true"
        } else {
            "false"
        }
    }
}

/// One newsletter card
#[derive(Debug, Clone)]
pub struct Card {
    pub panel_id: String,
    pub title: String,
    pub formatted_date: String,
    pub panel: Panel,
    /// Error message or table of contents plus content
    pub body: String,
}

impl Card {
    fn build(
        entry: &NewsletterEntry,
        panel_id: String,
        start_expanded: bool,
        anchors: &mut AnchorRegistry,
    ) -> Self {
        let body = match &entry.error {
            Some(error) => format!(r#"<p class="news-error">{}</p>"#, html_escape(error)),
            None => {
                let toc = Toc::build(&safe_links(&entry.html), anchors);
                format!(
                    r#"{}<article class="news-content">{}</article>"#,
                    toc.nav_html(&entry.title),
                    toc.content
                )
            }
        };

        Self {
            panel_id,
            title: entry.title.clone(),
            formatted_date: entry.formatted_date.clone(),
            panel: if start_expanded {
                Panel::expanded()
            } else {
                Panel::collapsed()
            },
            body,
        }
    }

    pub fn to_html(&self) -> String {
        let hidden = if self.panel.is_hidden() { " hidden" } else { "" };
        format!(
            concat!(
                r#"<article class="news-entry">"#,
                r#"<button class="news-summary" type="button" aria-expanded="{expanded}" aria-controls="{panel_id}">"#,
                r#"<div class="news-summary-text"><h2>{title}</h2><p class="news-date">{date}</p></div>"#,
                r#"<span class="news-chevron" aria-hidden="true">&#9662;</span>"#,
                r#"</button>"#,
                r#"<div class="news-panel" id="{panel_id}" style="max-height: {height}"{hidden}>"#,
                r#"<div class="news-body">{body}</div>"#,
                r#"</div>"#,
                r#"</article>"#
            ),
            expanded = self.panel.aria_expanded(),
            panel_id = self.panel_id,
            title = html_escape(&self.title),
            date = html_escape(&self.formatted_date),
            height = self.panel.height(),
            hidden = hidden,
            body = self.body,
        )
    }
}

/// All cards on the page, in display order
#[derive(Debug, Clone)]
pub struct Accordion {
    pub cards: Vec<Card>,
}

impl Accordion {
    /// Build cards for already sorted entries.
    ///
    /// The card at `default_expanded` starts open unless its newsletter failed to load.
    pub fn build(entries: &[NewsletterEntry], default_expanded: Option<usize>) -> Self {
        let mut anchors = AnchorRegistry::new();
        // Panel ids first so no heading can take one
        let panel_ids: Vec<String> = entries
            .iter()
            .map(|entry| anchors.claim(&format!("news-panel-{}", entry.id)))
            .collect();

        let cards = entries
            .iter()
            .zip(panel_ids)
            .enumerate()
            .map(|(index, (entry, panel_id))| {
                let start_expanded = Some(index) == default_expanded && !entry.is_degraded();
                Card::build(entry, panel_id, start_expanded, &mut anchors)
            })
            .collect();

        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn to_html(&self) -> String {
        self.cards.iter().map(Card::to_html).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Locale;

    fn entry(file: &str, date: &str, html: &str) -> NewsletterEntry {
        NewsletterEntry::loaded(
            file,
            format!("{} title", file),
            date.to_string(),
            html.to_string(),
            Locale::en_US,
        )
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut panel = Panel::collapsed();
        assert_eq!(panel.aria_expanded(), "false");
        assert!(panel.is_hidden());

        let open = panel.toggle(240);
        assert_eq!(panel.aria_expanded(), "true");
        assert!(!panel.is_hidden());
        assert_eq!(open.from, Height::Px(0));
        assert_eq!(open.to, Height::Px(240));
        assert!(panel.finish_transition(open.generation));
        assert_eq!(panel.height(), Height::Auto);

        let close = panel.toggle(240);
        assert_eq!(panel.aria_expanded(), "false");
        assert_eq!(close.from, Height::Px(240));
        assert!(!panel.is_hidden());
        assert!(panel.finish_transition(close.generation));
        assert!(panel.is_hidden());
        assert_eq!(panel.state(), PanelState::Collapsed);
    }

    #[test]
    fn test_stale_transition_is_ignored() {
        let mut panel = Panel::collapsed();
        let open = panel.toggle(100);
        let close = panel.toggle(100);

        // The open animation ends after the panel was closed again
        assert!(!panel.finish_transition(open.generation));
        assert_eq!(panel.height(), Height::Px(0));
        assert!(!panel.is_hidden());

        assert!(panel.finish_transition(close.generation));
        assert!(panel.is_hidden());
        assert_eq!(panel.aria_expanded(), "false");
    }

    #[test]
    fn test_close_mid_animation_starts_from_current_height() {
        let mut panel = Panel::collapsed();
        panel.toggle(300);
        let close = panel.toggle(300);
        assert_eq!(close.from, Height::Px(300));
        assert_eq!(close.to, Height::Px(0));
    }

    #[test]
    fn test_first_card_starts_expanded() {
        let entries = vec![
            entry("2026-02.md", "2026-02-01", "<h2>Welcome</h2>"),
            entry("2026-01.md", "2026-01-05", "<h2>Launch</h2>"),
        ];
        let accordion = Accordion::build(&entries, Some(0));
        assert_eq!(accordion.len(), 2);
        assert!(accordion.cards[0].panel.is_expanded());
        assert!(!accordion.cards[1].panel.is_expanded());

        let html = accordion.to_html();
        assert!(html.contains(
            r#"aria-expanded="true" aria-controls="news-panel-2026-02""#
        ));
        assert!(html.contains(
            r#"<div class="news-panel" id="news-panel-2026-01" style="max-height: 0px" hidden>"#
        ));
        assert!(html.contains(
            r#"<div class="news-panel" id="news-panel-2026-02" style="max-height: none">"#
        ));
    }

    #[test]
    fn test_degraded_first_card_stays_collapsed() {
        let entries = vec![
            NewsletterEntry::degraded("2026-03.md", Locale::en_US),
            entry("2026-02.md", "2026-02-01", "<h2>Welcome</h2>"),
        ];
        let accordion = Accordion::build(&entries, Some(0));
        assert!(!accordion.cards[0].panel.is_expanded());
        assert!(accordion.cards[0].panel.is_hidden());
        // The next card does not take over the default
        assert!(!accordion.cards[1].panel.is_expanded());
    }

    #[test]
    fn test_no_default_expanded() {
        let entries = vec![entry("a.md", "", "")];
        let accordion = Accordion::build(&entries, None);
        assert!(!accordion.cards[0].panel.is_expanded());
    }

    #[test]
    fn test_degraded_card_shows_error_only() {
        let entries = vec![NewsletterEntry::degraded("2026-02.md", Locale::en_US)];
        let accordion = Accordion::build(&entries, Some(0));
        assert!(!accordion.cards[0].panel.is_expanded());
        let html = accordion.to_html();
        assert!(html.contains(r#"aria-expanded="false" aria-controls="news-panel-2026-02""#));
        assert!(html.contains(r#"<p class="news-error">Could not load this newsletter."#));
        assert!(!html.contains("class=\"toc\""));
        assert!(html.contains("<h2>February 2026 Newsletter</h2>"));
        assert!(html.contains(r#"<p class="news-date">February 1, 2026</p>"#));
    }

    #[test]
    fn test_card_body_has_toc_and_safe_links() {
        let entries = vec![entry(
            "2026-02.md",
            "2026-02-01",
            r#"<h2>Overview</h2><p><a href="https://example.com">x</a></p><h2>Overview</h2>"#,
        )];
        let html = Accordion::build(&entries, Some(0)).to_html();
        assert!(html.contains(r##"<a href="#overview">Overview</a>"##));
        assert!(html.contains(r##"<a href="#overview-2">Overview</a>"##));
        assert!(html.contains(r#"<h2 id="overview-2">Overview</h2>"#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }

    #[test]
    fn test_ids_unique_across_cards() {
        let entries = vec![
            entry("2026-02.md", "2026-02-01", "<h2>Overview</h2>"),
            entry("2026-01.md", "2026-01-01", "<h2>Overview</h2>"),
            entry("2026-01.md", "2026-01-01", "<h2>News Panel 2026-02</h2>"),
        ];
        let accordion = Accordion::build(&entries, Some(0));
        assert_eq!(accordion.cards[1].panel_id, "news-panel-2026-01");
        assert_eq!(accordion.cards[2].panel_id, "news-panel-2026-01-2");
        let html = accordion.to_html();
        assert!(html.contains(r#"<h2 id="overview">"#));
        assert!(html.contains(r#"<h2 id="overview-2">"#));
        assert!(html.contains(r#"<h2 id="news-panel-2026-02-2">"#));
    }
}
