use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;
use workflow_core::{DocumentRef, DocumentStore, VaultFileSystem, WorkflowSettings};

use crate::config::LspSettings;

/// The opened vault: a disk store plus the location of the plugin settings.
///
/// Cheap to clone, so commands can move a copy onto a blocking thread.
#[derive(Clone)]
pub struct Vault {
    pub store: Arc<VaultFileSystem>,
    pub settings_file: PathBuf,
}

impl Vault {
    pub fn open(root: PathBuf, settings_path: &str) -> Self {
        let settings_file = root.join(settings_path);
        Self {
            store: Arc::new(VaultFileSystem::new(root)),
            settings_file,
        }
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    pub fn document_for_uri(&self, uri: &Url) -> Option<DocumentRef> {
        let path = uri.to_file_path().ok()?;
        self.store.document_for(&path)
    }

    pub fn uri_for(&self, doc: &DocumentRef) -> Option<Url> {
        Url::from_file_path(self.store.absolute_path(doc)).ok()
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

/// Global state for LSP server
/// Must be Send + Sync
#[derive(Clone)]
pub struct GlobalState {
    pub vault: Arc<RwLock<Option<Vault>>>,

    /// Plugin settings, persisted inside the vault
    pub settings: Arc<RwLock<WorkflowSettings>>,

    /// Client-side settings, including the host daily notes options
    pub config: Arc<RwLock<LspSettings>>,

    /// Text of open documents, which may be ahead of the disk
    pub document_cache: Arc<RwLock<HashMap<Url, String>>>,

    /// Last markdown document opened or edited in the editor
    pub active_document: Arc<RwLock<Option<Url>>>,
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            vault: Arc::new(RwLock::new(None)),
            settings: Arc::new(RwLock::new(WorkflowSettings::default())),
            config: Arc::new(RwLock::new(LspSettings::default())),
            document_cache: Arc::new(RwLock::new(HashMap::new())),
            active_document: Arc::new(RwLock::new(None)),
        }
    }
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}
