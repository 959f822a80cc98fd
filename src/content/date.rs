//! Date helpers for newsletter entries
//!
//! Dates travel through the pipeline as `YYYY-MM-DD` strings; an empty string
//! means "no date".

use chrono::{Datelike, Locale, NaiveDate, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;

/// Shown in place of a missing date
pub const DATE_NOT_SET: &str = "Date not set";

lazy_static! {
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap();
    static ref YEAR_MONTH: Regex = Regex::new(r"(\d{4})-(\d{2})").unwrap();
}

/// Title and date derived from a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inferred {
    pub title: String,
    /// `YYYY-MM-01`, or empty when the name carries no month
    pub date: String,
}

/// Return `value` trimmed if it is a calendar-valid `YYYY-MM-DD` date, else an empty string
pub fn normalize_iso_date(value: &str) -> String {
    let trimmed = value.trim();
    match parse_iso_date(trimmed) {
        Some(_) => trimmed.to_string(),
        None => String::new(),
    }
}

/// Strictly parse `YYYY-MM-DD`
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(value)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Derive a fallback title and date from the first `YYYY-MM` in a file name
///
/// ```ignore
/// infer_from_filename("2026-03-newsletter.md", Locale::en_US)
/// // -> Inferred { title: "March 2026 Newsletter", date: "2026-03-01" }
/// ```
pub fn infer_from_filename(name: &str, locale: Locale) -> Inferred {
    let first_of_month = YEAR_MONTH.captures(name).and_then(|caps| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)
    });

    match first_of_month {
        Some(date) => Inferred {
            title: format!(
                "{} {} Newsletter",
                date.format_localized("%B", locale),
                date.year()
            ),
            date: date.format("%Y-%m-%d").to_string(),
        },
        None => Inferred {
            title: strip_md_extension(name).to_string(),
            date: String::new(),
        },
    }
}

/// Format a date as "Month Day, Year" in the given locale.
///
/// Empty and invalid dates both read "Date not set".
pub fn format_full_date(iso: &str, locale: Locale) -> String {
    match parse_iso_date(iso.trim()) {
        Some(date) => date.format_localized("%B %-d, %Y", locale).to_string(),
        None => DATE_NOT_SET.to_string(),
    }
}

/// Ordering key: the parsed date, or the epoch when missing or invalid
pub fn sort_key(iso: &str) -> NaiveDate {
    // NaiveDate's default is 1970-01-01
    parse_iso_date(iso).unwrap_or_default()
}

/// Resolve a locale name such as `en_US`, falling back to `en_US`
pub fn locale_from_str(name: &str) -> Locale {
    let normalized = name.replace('-', "_");
    Locale::try_from(normalized.as_str())
        .or_else(|_| match normalized.as_str() {
            "en" | "" => Ok(Locale::en_US),
            short => Locale::try_from(format!("{}_{}", short, short.to_uppercase()).as_str()),
        })
        .unwrap_or_else(|_| {
            tracing::warn!("Unknown locale {:?}, using en_US", name);
            Locale::en_US
        })
}

/// The current year in the given IANA timezone (UTC when empty or unknown)
pub fn current_year(timezone: &str) -> i32 {
    let now = Utc::now();
    match timezone.parse::<Tz>() {
        Ok(tz) => now.with_timezone(&tz).year(),
        Err(_) => now.year(),
    }
}

fn strip_md_extension(name: &str) -> &str {
    let len = name.len();
    if len >= 3 && name.is_char_boundary(len - 3) && name[len - 3..].eq_ignore_ascii_case(".md") {
        &name[..len - 3]
    } else {
        name
    }
}
