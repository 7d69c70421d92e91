use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a document owned by the host document store.
///
/// The path is vault-relative and `/`-separated. It is normalized on
/// construction, so `/Journal/a.md`, `Journal/a.md` and `Journal\a.md`
/// all name the same document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentRef {
    path: String,
}

impl DocumentRef {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize_vault_path(path),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name without folder and without extension.
    pub fn basename(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match name.rfind('.') {
            Some(pos) if pos > 0 => &name[..pos],
            _ => name,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match name.rfind('.') {
            Some(pos) if pos > 0 => Some(&name[pos + 1..]),
            _ => None,
        }
    }

    pub fn is_markdown(&self) -> bool {
        self.extension()
            .map(|ext| ext.eq_ignore_ascii_case("md"))
            .unwrap_or(false)
    }

    /// Folder part of the path, empty for documents at the vault root.
    pub fn folder(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Normalize a vault path for comparison.
///
/// ```
/// use workflow_core::normalize_vault_path;
///
/// assert_eq!(normalize_vault_path("/Journal/2024-03-05.md"), "Journal/2024-03-05.md");
/// assert_eq!(normalize_vault_path("Journal\\note.md"), "Journal/note.md");
/// assert_eq!(normalize_vault_path("//a//b/"), "a/b");
/// assert_eq!(normalize_vault_path("/"), "");
/// ```
pub fn normalize_vault_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// A flat scalar stored under a frontmatter key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl FrontmatterValue {
    /// Plain text of the scalar as shown to a reader; null shows as empty.
    pub fn to_text(&self) -> String {
        match self {
            FrontmatterValue::Null => String::new(),
            FrontmatterValue::Bool(b) => b.to_string(),
            FrontmatterValue::Integer(n) => n.to_string(),
            FrontmatterValue::Float(f) => f.to_string(),
            FrontmatterValue::String(s) => s.clone(),
        }
    }
}

impl From<&str> for FrontmatterValue {
    fn from(value: &str) -> Self {
        FrontmatterValue::String(value.to_string())
    }
}

impl From<String> for FrontmatterValue {
    fn from(value: String) -> Self {
        FrontmatterValue::String(value)
    }
}

impl From<bool> for FrontmatterValue {
    fn from(value: bool) -> Self {
        FrontmatterValue::Bool(value)
    }
}

impl From<i64> for FrontmatterValue {
    fn from(value: i64) -> Self {
        FrontmatterValue::Integer(value)
    }
}

impl From<f64> for FrontmatterValue {
    fn from(value: f64) -> Self {
        FrontmatterValue::Float(value)
    }
}

impl<T: Into<FrontmatterValue>> From<Option<T>> for FrontmatterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FrontmatterValue::Null)
    }
}

/// Result of looking up a key in a parsed frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Missing,
    Present(&'a FrontmatterValue),
}

impl<'a> Field<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn value(&self) -> Option<&'a FrontmatterValue> {
        match self {
            Field::Missing => None,
            Field::Present(value) => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_ref_parts() {
        let doc = DocumentRef::new("/Journal/2024-03-05.md");
        assert_eq!(doc.path(), "Journal/2024-03-05.md");
        assert_eq!(doc.basename(), "2024-03-05");
        assert_eq!(doc.folder(), "Journal");
        assert_eq!(doc.extension(), Some("md"));
        assert!(doc.is_markdown());

        let root = DocumentRef::new("readme");
        assert_eq!(root.basename(), "readme");
        assert_eq!(root.folder(), "");
        assert!(!root.is_markdown());
    }

    #[test]
    fn test_document_ref_equality_ignores_leading_slash() {
        assert_eq!(
            DocumentRef::new("/2024-03-05.md"),
            DocumentRef::new("2024-03-05.md")
        );
    }

    #[test]
    fn test_dotfile_basename() {
        let doc = DocumentRef::new(".hidden");
        assert_eq!(doc.basename(), ".hidden");
        assert_eq!(doc.extension(), None);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(FrontmatterValue::Null.to_text(), "");
        assert_eq!(FrontmatterValue::Bool(false).to_text(), "false");
        assert_eq!(FrontmatterValue::Integer(-4).to_text(), "-4");
        assert_eq!(FrontmatterValue::Float(0.25).to_text(), "0.25");
        assert_eq!(FrontmatterValue::from("a: b").to_text(), "a: b");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(FrontmatterValue::from(None::<&str>), FrontmatterValue::Null);
        assert_eq!(
            FrontmatterValue::from(Some("x")),
            FrontmatterValue::String("x".to_string())
        );
    }
}
