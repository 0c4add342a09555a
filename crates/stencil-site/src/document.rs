//! Source documents: a JSON metadata block followed by content.
//!
//! ```text
//! {"layout": "base.html", "title": "Hi"}
//! ---
//! Hello world
//! ```
//!
//! Everything before the first line equal to `---` (ignoring surrounding
//! whitespace) is metadata; everything after it is content. Without a
//! delimiter line the whole file is metadata and the content is empty.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Line separating the metadata block from the content block.
pub const DELIMITER: &str = "---";

/// Metadata key naming the template used to render a document.
pub const LAYOUT_KEY: &str = "layout";

/// Metadata record parsed from a document's JSON header.
///
/// Keys keep the order they had in the source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Parse metadata from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(MetadataError::NotAnObject(json_kind(&other))),
        }
    }

    /// Template identifier from the `layout` key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is absent or not a string.
    pub fn layout(&self) -> Result<&str, MetadataError> {
        match self.0.get(LAYOUT_KEY) {
            Some(Value::String(layout)) => Ok(layout.as_str()),
            Some(other) => Err(MetadataError::LayoutNotString(json_kind(other))),
            None => Err(MetadataError::MissingLayout),
        }
    }

    /// Look up a metadata value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Borrow the underlying ordered map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying ordered map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Error type for metadata parsing.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The metadata block is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The metadata block is valid JSON but not an object.
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    /// No `layout` key.
    #[error("Missing required \"layout\" key")]
    MissingLayout,
    /// The `layout` key is not a string.
    #[error("\"layout\" must be a string, found {0}")]
    LayoutNotString(&'static str),
}

/// A parsed source document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Metadata header.
    pub metadata: Metadata,
    /// Raw content after the delimiter line, line endings preserved.
    pub content: String,
}

impl Document {
    /// Parse a document from its full text.
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata block is not a JSON object.
    pub fn parse(text: &str) -> Result<Self, MetadataError> {
        let (metadata, content) = split(text);
        Ok(Self {
            metadata: Metadata::from_json(metadata)?,
            content: content.to_owned(),
        })
    }
}

/// Split text into `(metadata, content)` at the first delimiter line.
///
/// The delimiter line, including its line ending, belongs to neither half.
pub fn split(text: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim() == DELIMITER {
            return (&text[..offset], &text[offset + line.len()..]);
        }
        offset += line.len();
    }
    (text, "")
}

/// List source documents directly inside `dir`.
///
/// Only regular files whose extension equals `extension` (without the dot)
/// are returned, sorted by path. Subdirectories, including the layout
/// directory, are never descended into.
///
/// # Errors
///
/// Returns the underlying I/O error if `dir` cannot be read (e.g. it does
/// not exist).
pub fn discover_documents(dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == extension) && path.is_file() {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    // Splitting

    #[test]
    fn test_split_at_delimiter() {
        let (meta, content) = split("{\"a\": 1}\n---\nHello world\n");
        assert_eq!(meta, "{\"a\": 1}\n");
        assert_eq!(content, "Hello world\n");
    }

    #[test]
    fn test_split_delimiter_with_whitespace() {
        let (meta, content) = split("{}\n  ---\t\nbody");
        assert_eq!(meta, "{}\n");
        assert_eq!(content, "body");
    }

    #[test]
    fn test_split_crlf() {
        let (meta, content) = split("{}\r\n---\r\nline\r\n");
        assert_eq!(meta, "{}\r\n");
        assert_eq!(content, "line\r\n");
    }

    #[test]
    fn test_split_uses_first_delimiter() {
        let (meta, content) = split("{}\n---\nabove\n---\nbelow\n");
        assert_eq!(meta, "{}\n");
        assert_eq!(content, "above\n---\nbelow\n");
    }

    #[test]
    fn test_split_without_delimiter() {
        let (meta, content) = split("{\"a\": 1}\nno delimiter\n");
        assert_eq!(meta, "{\"a\": 1}\nno delimiter\n");
        assert_eq!(content, "");
    }

    #[test]
    fn test_split_delimiter_on_last_line() {
        let (meta, content) = split("{}\n---");
        assert_eq!(meta, "{}\n");
        assert_eq!(content, "");
    }

    #[test]
    fn test_split_longer_dash_line_is_not_delimiter() {
        let (meta, content) = split("{}\n----\nx\n");
        assert_eq!(meta, "{}\n----\nx\n");
        assert_eq!(content, "");
    }

    // Parsing

    #[test]
    fn test_parse_document() {
        let doc = Document::parse("{\"layout\": \"base.html\", \"title\": \"Hi\"}\n---\nHello world\n")
            .unwrap();
        assert_eq!(doc.metadata.layout().unwrap(), "base.html");
        assert_eq!(doc.metadata.get("title"), Some(&json!("Hi")));
        assert_eq!(doc.content, "Hello world\n");
    }

    #[test]
    fn test_parse_multiline_metadata() {
        let text = "{\n  \"layout\": \"post.html\",\n  \"tags\": [\"a\", \"b\"]\n}\n---\n";
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.metadata.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(doc.content, "");
    }

    #[test]
    fn test_parse_keeps_key_order() {
        let doc = Document::parse("{\"z\": 1, \"a\": 2, \"m\": 3}\n---\n").unwrap();
        let keys: Vec<&str> = doc.metadata.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_without_delimiter_valid_json() {
        let doc = Document::parse("{\"layout\": \"base.html\"}").unwrap();
        assert_eq!(doc.metadata.layout().unwrap(), "base.html");
        assert_eq!(doc.content, "");
    }

    #[test]
    fn test_parse_without_delimiter_invalid_json() {
        let err = Document::parse("{\"layout\": \"base.html\"}\nHello\n").unwrap_err();
        assert!(matches!(err, MetadataError::Json(_)), "got {err:?}");
    }

    #[test]
    fn test_parse_empty_metadata_block() {
        let err = Document::parse("---\ncontent\n").unwrap_err();
        assert!(matches!(err, MetadataError::Json(_)));
    }

    #[test]
    fn test_parse_non_object_metadata() {
        let err = Document::parse("[1, 2]\n---\n").unwrap_err();
        assert!(matches!(err, MetadataError::NotAnObject("an array")));
        assert!(err.to_string().contains("JSON object"));
    }

    // Layout

    #[test]
    fn test_layout_missing() {
        let meta = Metadata::from_json("{\"title\": \"x\"}").unwrap();
        assert!(matches!(meta.layout(), Err(MetadataError::MissingLayout)));
    }

    #[test]
    fn test_layout_not_string() {
        let meta = Metadata::from_json("{\"layout\": 3}").unwrap();
        let err = meta.layout().unwrap_err();
        assert!(matches!(err, MetadataError::LayoutNotString("a number")));
    }

    #[test]
    fn test_contains_key() {
        let meta = Metadata::from_json("{\"content\": \"x\"}").unwrap();
        assert!(meta.contains_key("content"));
        assert!(!meta.contains_key("layout"));
    }

    // Discovery

    #[test]
    fn test_discover_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rst"), "").unwrap();
        fs::write(dir.path().join("a.rst"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("rst"), "").unwrap();
        fs::create_dir(dir.path().join("layout")).unwrap();
        fs::write(dir.path().join("layout/base.rst"), "").unwrap();
        fs::create_dir(dir.path().join("dir.rst")).unwrap();

        let docs = discover_documents(dir.path(), "rst").unwrap();

        assert_eq!(
            docs,
            vec![dir.path().join("a.rst"), dir.path().join("b.rst")]
        );
    }

    #[test]
    fn test_discover_custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rst"), "").unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();

        let docs = discover_documents(dir.path(), "md").unwrap();

        assert_eq!(docs, vec![dir.path().join("b.md")]);
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_documents(dir.path(), "rst").unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_documents(&dir.path().join("missing"), "rst").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
