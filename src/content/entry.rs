//! Newsletter entry model

use chrono::{Locale, NaiveDate};
use serde::{Deserialize, Serialize};

use super::date::{self, infer_from_filename};

/// Shown on a card whose file could not be loaded
pub const LOAD_ERROR_MESSAGE: &str =
    "Could not load this newsletter. Please verify the file exists and is valid Markdown.";

/// A fully resolved newsletter, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsletterEntry {
    /// Identifier used for the panel id and heading anchors
    pub id: String,
    /// Source file name (empty for static posts)
    pub file: String,
    pub title: String,
    /// `YYYY-MM-DD` or empty
    pub date_iso: String,
    pub formatted_date: String,
    pub sort_date: NaiveDate,
    /// Rendered HTML body; empty for degraded entries
    pub html: String,
    /// Set only on degraded entries
    pub error: Option<String>,
}

impl NewsletterEntry {
    /// Build an entry from successfully loaded content
    pub fn loaded(
        file: &str,
        title: String,
        date_iso: String,
        html: String,
        locale: Locale,
    ) -> Self {
        Self {
            id: entry_id(file),
            file: file.to_string(),
            title,
            formatted_date: date::format_full_date(&date_iso, locale),
            sort_date: date::sort_key(&date_iso),
            date_iso,
            html,
            error: None,
        }
    }

    /// Build the fallback card for a file that failed to load
    pub fn degraded(file: &str, locale: Locale) -> Self {
        let fallback = infer_from_filename(file, locale);
        Self {
            id: entry_id(file),
            file: file.to_string(),
            title: fallback.title,
            formatted_date: date::format_full_date(&fallback.date, locale),
            sort_date: date::sort_key(&fallback.date),
            date_iso: fallback.date,
            html: String::new(),
            error: Some(LOAD_ERROR_MESSAGE.to_string()),
        }
    }

    /// Build an entry from a pre-rendered post
    pub fn from_static(post: &StaticPost, locale: Locale) -> Self {
        let date_iso = date::normalize_iso_date(&post.date);
        Self {
            id: slug::slugify(&post.id),
            file: String::new(),
            title: post.title.clone(),
            formatted_date: date::format_full_date(&date_iso, locale),
            sort_date: date::sort_key(&date_iso),
            date_iso,
            html: post.content_html.clone(),
            error: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// A newsletter whose HTML was prepared ahead of time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(alias = "contentHTML", alias = "html")]
    pub content_html: String,
}

/// Sort newest first; entries with the same date keep their relative order
pub fn sort_newest_first(entries: &mut [NewsletterEntry]) {
    entries.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
}

fn entry_id(file: &str) -> String {
    let stem = file
        .rsplit('/')
        .next()
        .unwrap_or(file)
        .trim_end_matches(".md")
        .trim_end_matches(".MD");
    let id = slug::slugify(stem);
    if id.is_empty() {
        "newsletter".to_string()
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_entry_uses_filename_fallback() {
        let entry = NewsletterEntry::degraded("2026-03-newsletter.md", Locale::en_US);
        assert_eq!(entry.title, "March 2026 Newsletter");
        assert_eq!(entry.date_iso, "2026-03-01");
        assert_eq!(entry.formatted_date, "March 1, 2026");
        assert_eq!(entry.html, "");
        assert_eq!(entry.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert!(entry.is_degraded());
    }

    #[test]
    fn test_loaded_entry_without_date() {
        let entry = NewsletterEntry::loaded(
            "notes.md",
            "Notes".to_string(),
            String::new(),
            "<p>x</p>".to_string(),
            Locale::en_US,
        );
        assert_eq!(entry.formatted_date, "Date not set");
        assert_eq!(entry.sort_date, NaiveDate::default());
        assert_eq!(entry.id, "notes");
        assert!(!entry.is_degraded());
    }

    #[test]
    fn test_entry_id_from_nested_file() {
        assert_eq!(entry_id("2026/2026-02 Winter.md"), "2026-02-winter");
        assert_eq!(entry_id(".md"), "newsletter");
    }

    #[test]
    fn test_sort_newest_first_puts_undated_last() {
        let make = |file: &str, date: &str| {
            NewsletterEntry::loaded(file, file.to_string(), date.to_string(), String::new(), Locale::en_US)
        };
        let mut entries = vec![
            make("undated.md", ""),
            make("jan.md", "2026-01-05"),
            make("feb.md", "2026-02-01"),
            make("bad.md", "2026-02-31"),
        ];
        sort_newest_first(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(order, vec!["feb.md", "jan.md", "undated.md", "bad.md"]);
    }

    #[test]
    fn test_static_post_deserializes_original_field_name() {
        let yaml = "id: 2026-02-newsletter\ntitle: February 2026 Newsletter\ndate: 2026-02-01\ncontentHTML: <h2>Hi</h2>\n";
        let post: StaticPost = serde_yaml::from_str(yaml).unwrap();
        let entry = NewsletterEntry::from_static(&post, Locale::en_US);
        assert_eq!(entry.id, "2026-02-newsletter");
        assert_eq!(entry.formatted_date, "February 1, 2026");
        assert_eq!(entry.html, "<h2>Hi</h2>");
    }
}
