//! HTML helper functions

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ANCHOR_TAG: Regex = Regex::new(r"(?i)<a(\s[^>]*)?>").unwrap();
    static ref HREF_ATTR: Regex =
        Regex::new(r#"(?i)\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap();
    static ref TARGET_OR_REL_ATTR: Regex =
        Regex::new(r#"(?i)\s(?:target|rel)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap();
    static ref ENTITY: Regex = Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Decode character references back into text
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Visible text of an HTML fragment
pub fn text_content(html: &str) -> String {
    decode_entities(&strip_html(html))
}

/// Make every link open in a new browsing context without opener or referrer.
///
/// In-page fragment links (`href="#..."`) are left alone so tables of contents keep working.
pub fn safe_links(html: &str) -> String {
    ANCHOR_TAG
        .replace_all(html, |caps: &Captures| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let Some(href) = HREF_ATTR.captures(attrs) else {
                return caps[0].to_string();
            };
            let href = href
                .get(1)
                .or_else(|| href.get(2))
                .or_else(|| href.get(3))
                .map_or("", |m| m.as_str());
            if href.starts_with('#') {
                return caps[0].to_string();
            }

            let attrs = TARGET_OR_REL_ATTR.replace_all(attrs, "");
            format!(
                r#"<a{} target="_blank" rel="noopener noreferrer">"#,
                attrs.trim_end()
            )
        })
        .into_owned()
}
