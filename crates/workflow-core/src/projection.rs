//! Metadata projection: a fixed-shape summary of a note for the dashboard.

use log::error;
use serde::{Deserialize, Serialize};

use crate::frontmatter::Frontmatter;
use crate::messages::NO_ACTIVE_FILE_TITLE;
use crate::model::{DocumentRef, Field};
use crate::vfs::DocumentStore;

/// A frontmatter field as seen by the dashboard.
///
/// `NotSet` is distinct from a present but empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataField {
    NotSet,
    Set(String),
}

impl MetadataField {
    pub fn is_set(&self) -> bool {
        matches!(self, MetadataField::Set(_))
    }

    /// Set and not blank.
    pub fn is_filled(&self) -> bool {
        matches!(self, MetadataField::Set(value) if !value.trim().is_empty())
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            MetadataField::NotSet => None,
            MetadataField::Set(value) => Some(value),
        }
    }

    pub fn or_placeholder<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.as_deref().unwrap_or(placeholder)
    }
}

impl From<Option<String>> for MetadataField {
    fn from(value: Option<String>) -> Self {
        value.map(MetadataField::Set).unwrap_or(MetadataField::NotSet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub title: String,
    pub status: MetadataField,
    pub description: MetadataField,
    // Not derived from the note yet; stay at zero/false.
    pub source_count: u32,
    pub anki_card_count: u32,
    pub has_illustration: bool,
}

impl MetadataRecord {
    fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            status: MetadataField::NotSet,
            description: MetadataField::NotSet,
            source_count: 0,
            anki_card_count: 0,
            has_illustration: false,
        }
    }

    /// Record shown when no document is active.
    pub fn no_active_file() -> Self {
        Self::empty(NO_ACTIVE_FILE_TITLE)
    }
}

/// Derive the record for `doc` from its text.
pub fn project(doc: &DocumentRef, text: &str) -> MetadataRecord {
    let frontmatter = Frontmatter::parse(text).unwrap_or_default();
    MetadataRecord {
        status: metadata_field(&frontmatter, "status"),
        description: metadata_field(&frontmatter, "description"),
        ..MetadataRecord::empty(doc.basename())
    }
}

fn metadata_field(frontmatter: &Frontmatter, key: &str) -> MetadataField {
    match frontmatter.field(key) {
        Field::Missing => MetadataField::NotSet,
        Field::Present(value) => MetadataField::Set(value.to_text()),
    }
}

/// Read `doc` from the store and project it. An unreadable document
/// projects as if it had no frontmatter.
pub fn project_document(store: &dyn DocumentStore, doc: &DocumentRef) -> MetadataRecord {
    match store.read(doc) {
        Ok(text) => project(doc, &text),
        Err(e) => {
            error!("Could not read {} for projection: {}", doc, e);
            MetadataRecord::empty(doc.basename())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryStore;

    #[test]
    fn test_project_with_frontmatter() {
        let doc = DocumentRef::new("notes/Photosynthesis.md");
        let record = project(&doc, "---\nstatus: done\ndescription: ok\n---\nBody");

        assert_eq!(
            record,
            MetadataRecord {
                title: "Photosynthesis".to_string(),
                status: MetadataField::Set("done".to_string()),
                description: MetadataField::Set("ok".to_string()),
                source_count: 0,
                anki_card_count: 0,
                has_illustration: false,
            }
        );
    }

    #[test]
    fn test_project_without_frontmatter() {
        let doc = DocumentRef::new("plain.md");
        let record = project(&doc, "# Just a note");
        assert_eq!(record.status, MetadataField::NotSet);
        assert_eq!(record.description, MetadataField::NotSet);
        assert_eq!(record.status.or_placeholder("status is not set"), "status is not set");
    }

    #[test]
    fn test_empty_value_is_distinct_from_not_set() {
        let doc = DocumentRef::new("a.md");
        let record = project(&doc, "---\nstatus:\n---\n");
        assert_eq!(record.status, MetadataField::Set(String::new()));
        assert!(record.status.is_set());
        assert!(!record.status.is_filled());
    }

    #[test]
    fn test_project_typed_values() {
        let doc = DocumentRef::new("a.md");
        let record = project(
            &doc,
            "---\nStatus: 3\ndescription: \"Cells: the basics\"\nstatus: true\n---\n",
        );
        assert_eq!(record.status, MetadataField::Set("true".to_string()));
        assert_eq!(
            record.description,
            MetadataField::Set("Cells: the basics".to_string())
        );

        let record = project(&doc, "---\ndescription: null\n---\n");
        assert_eq!(record.description, MetadataField::Set(String::new()));
        assert_eq!(record.status, MetadataField::NotSet);
    }

    #[test]
    fn test_project_is_repeatable() {
        let doc = DocumentRef::new("a.md");
        let text = "---\nstatus: draft\n---\n";
        assert_eq!(project(&doc, text), project(&doc, text));
    }

    #[test]
    fn test_project_document_unreadable() {
        let store = MemoryStore::new();
        let record = project_document(&store, &DocumentRef::new("gone.md"));
        assert_eq!(record.title, "gone");
        assert_eq!(record.status, MetadataField::NotSet);
    }

    #[test]
    fn test_metadata_field_serializes_as_nullable_string() {
        let json = serde_json::to_value(MetadataRecord::no_active_file()).unwrap();
        assert_eq!(json["title"], "No active file?!?");
        assert!(json["status"].is_null());
        assert_eq!(json["sourceCount"], 0);
        assert_eq!(json["hasIllustration"], false);
    }
}
