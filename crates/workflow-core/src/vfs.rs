use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use walkdir::WalkDir;

use crate::model::{normalize_vault_path, DocumentRef};

/// Abstract interface for the host document store.
///
/// Every path is vault-relative. Reads and writes always move the full text
/// of a document; there is no partial patching.
pub trait DocumentStore: Send + Sync {
    /// List every markdown document in the vault.
    fn list_documents(&self) -> Vec<DocumentRef>;

    /// Read the entire contents of a document.
    fn read(&self, doc: &DocumentRef) -> io::Result<String>;

    /// Replace the entire contents of a document.
    fn write(&self, doc: &DocumentRef, text: &str) -> io::Result<()>;

    /// Resolve a path to an existing document.
    fn resolve(&self, path: &str) -> Option<DocumentRef>;

    /// Create a new document with initial text.
    /// Fails if the document already exists or its folder is missing.
    fn create(&self, path: &str, initial_text: &str) -> io::Result<DocumentRef>;
}

/// Disk-backed store rooted at a vault directory.
pub struct VaultFileSystem {
    root: PathBuf,
}

impl VaultFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn absolute_path(&self, doc: &DocumentRef) -> PathBuf {
        let mut path = self.root.clone();
        for segment in doc.path().split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Map an absolute path back into the vault, if it lives under the root.
    pub fn document_for(&self, abs_path: &Path) -> Option<DocumentRef> {
        let rel = abs_path.strip_prefix(&self.root).ok()?;
        Some(DocumentRef::new(&rel.to_string_lossy()))
    }
}

impl DocumentStore for VaultFileSystem {
    fn list_documents(&self) -> Vec<DocumentRef> {
        let mut docs = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "md" {
                        if let Some(doc) = self.document_for(path) {
                            docs.push(doc);
                        }
                    }
                }
            }
        }

        docs.sort();
        docs
    }

    fn read(&self, doc: &DocumentRef) -> io::Result<String> {
        std::fs::read_to_string(self.absolute_path(doc))
    }

    fn write(&self, doc: &DocumentRef, text: &str) -> io::Result<()> {
        std::fs::write(self.absolute_path(doc), text)
    }

    fn resolve(&self, path: &str) -> Option<DocumentRef> {
        let doc = DocumentRef::new(path);
        if doc.path().is_empty() {
            return None;
        }
        self.absolute_path(&doc).is_file().then_some(doc)
    }

    fn create(&self, path: &str, initial_text: &str) -> io::Result<DocumentRef> {
        let doc = DocumentRef::new(path);
        if doc.path().is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path"));
        }

        let abs_path = self.absolute_path(&doc);
        match abs_path.parent() {
            Some(parent) if parent.is_dir() => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("folder does not exist for {}", doc),
                ))
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&abs_path)?;
        file.write_all(initial_text.as_bytes())?;
        Ok(doc)
    }
}

/// In-process store with explicit folders.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, String>>,
    folders: RwLock<BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a folder (and its ancestors).
    pub fn add_folder(&self, path: &str) {
        let normalized = normalize_vault_path(path);
        let mut folders = self.folders.write().unwrap_or_else(PoisonError::into_inner);
        let mut current = String::new();
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            folders.insert(current.clone());
        }
    }

    /// Seed a document, creating its folders as needed.
    pub fn insert(&self, path: &str, text: &str) -> DocumentRef {
        let doc = DocumentRef::new(path);
        self.add_folder(doc.folder());
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(doc.path().to_string(), text.to_string());
        doc
    }

    /// Current text of a document, bypassing the trait.
    pub fn text_of(&self, path: &str) -> Option<String> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_vault_path(path))
            .cloned()
    }

    fn has_folder(&self, folder: &str) -> bool {
        folder.is_empty()
            || self
                .folders
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(folder)
    }
}

impl DocumentStore for MemoryStore {
    fn list_documents(&self) -> Vec<DocumentRef> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .map(|path| DocumentRef::new(path))
            .filter(DocumentRef::is_markdown)
            .collect()
    }

    fn read(&self, doc: &DocumentRef) -> io::Result<String> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(doc.path())
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, doc.to_string()))
    }

    fn write(&self, doc: &DocumentRef, text: &str) -> io::Result<()> {
        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        match documents.get_mut(doc.path()) {
            Some(existing) => {
                *existing = text.to_string();
                Ok(())
            }
            None => Err(io::Error::new(io::ErrorKind::NotFound, doc.to_string())),
        }
    }

    fn resolve(&self, path: &str) -> Option<DocumentRef> {
        let doc = DocumentRef::new(path);
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(doc.path())
            .then_some(doc)
    }

    fn create(&self, path: &str, initial_text: &str) -> io::Result<DocumentRef> {
        let doc = DocumentRef::new(path);
        if doc.path().is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty path"));
        }
        if !self.has_folder(doc.folder()) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("folder does not exist for {}", doc),
            ));
        }

        let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        if documents.contains_key(doc.path()) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                doc.to_string(),
            ));
        }
        documents.insert(doc.path().to_string(), initial_text.to_string());
        Ok(doc)
    }
}
