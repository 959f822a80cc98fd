//! Front-matter parsing
//!
//! Newsletters carry a minimal `key: value` block between two `---` lines.
//! The block is not YAML: nested values, lists and comments are not
//! understood, and lines that do not look like `key: value` are skipped.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OPENING: Regex = Regex::new(r"\A---[ \t]*\r?\n").unwrap();
    static ref CLOSING: Regex = Regex::new(r"(?m)^---[ \t]*\r?$").unwrap();
    static ref KEY_VALUE: Regex = Regex::new(r"^([a-zA-Z0-9_-]+)\s*:\s*(.*)$").unwrap();
}

/// Metadata block at the top of a newsletter file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
}

impl FrontMatter {
    /// Split `content` into front matter and body.
    ///
    /// Text without an opening delimiter on its very first line, or without a
    /// closing delimiter, is all body.
    pub fn parse(content: &str) -> (Self, &str) {
        let Some(opening) = OPENING.find(content) else {
            return (Self::default(), content);
        };

        let rest = &content[opening.end()..];
        let Some(closing) = CLOSING.find(rest) else {
            return (Self::default(), content);
        };

        let block = &rest[..closing.start()];
        let mut body = &rest[closing.end()..];
        // Drop the newline that terminates the closing delimiter
        if let Some(stripped) = body.strip_prefix('\n') {
            body = stripped;
        }

        let mut fields = IndexMap::new();
        for line in block.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(caps) = KEY_VALUE.captures(line) {
                let key = caps[1].to_lowercase();
                fields.insert(key, unquote(caps[2].trim()).to_string());
            }
        }

        (Self { fields }, body)
    }

    /// Look up a key (keys are stored lowercase)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.to_lowercase()).map(String::as_str)
    }

    /// The `title` field, if present and not blank
    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|t| !t.is_empty())
    }

    /// The raw `date` field
    pub fn date(&self) -> Option<&str> {
        self.get("date")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Strip one matching pair of double quotes, or else one matching pair of single quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
