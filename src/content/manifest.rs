//! Newsletter manifest (`index.json`)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::SourceError;

/// A manifest entry naming one newsletter file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    pub file: String,
}

impl PostReference {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Normalize one manifest element: a bare string or an object with a string `file`
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(file) => Some(Self::new(file.clone())),
            Value::Object(map) => map
                .get("file")
                .and_then(Value::as_str)
                .map(Self::new),
            _ => None,
        }
    }
}

/// Parse manifest text into references, in manifest order.
///
/// Elements that are neither strings nor `{ "file": "..." }` objects are dropped.
pub fn parse_manifest(text: &str) -> Result<Vec<PostReference>, SourceError> {
    let raw: Value = serde_json::from_str(text)?;
    let Value::Array(items) = raw else {
        return Err(SourceError::ManifestNotArray);
    };

    let references: Vec<_> = items
        .iter()
        .filter_map(|item| {
            let reference = PostReference::from_value(item);
            if reference.is_none() {
                tracing::debug!("Skipping manifest element {}", item);
            }
            reference
        })
        .collect();

    Ok(references)
}

/// Serialize references back into manifest form (a pretty-printed array of file names)
pub fn to_manifest_json(references: &[PostReference]) -> serde_json::Result<String> {
    let files: Vec<&str> = references.iter().map(|r| r.file.as_str()).collect();
    serde_json::to_string_pretty(&files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_strings_and_file_objects() {
        let refs = parse_manifest(
            r#"["2026-02.md", {"file": "2026-01.md", "note": "x"}, 42, null, {"file": 7}, {"name": "a.md"}, ["nested.md"]]"#,
        )
        .unwrap();
        assert_eq!(
            refs,
            vec![PostReference::new("2026-02.md"), PostReference::new("2026-01.md")]
        );
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_manifest("[]").unwrap().is_empty());
    }

    #[test]
    fn test_non_array_is_rejected() {
        assert!(matches!(
            parse_manifest(r#"{"file": "2026-02.md"}"#),
            Err(SourceError::ManifestNotArray)
        ));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            parse_manifest("[\"2026-02.md\","),
            Err(SourceError::ManifestJson(_))
        ));
    }

    #[test]
    fn test_manifest_json_lists_file_names() {
        let json = to_manifest_json(&[PostReference::new("a.md"), PostReference::new("b.md")]).unwrap();
        assert_eq!(parse_manifest(&json).unwrap().len(), 2);
        assert!(json.contains("\"a.md\""));
    }
}
