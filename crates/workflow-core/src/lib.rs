//! Workflow Core Library
//!
//! Frontmatter access, daily note location and note metadata for the
//! editorial workflow dashboard.
//! All host access goes through an explicit `HostContext`.
//!

pub mod config;
pub mod daily_note;
pub mod dashboard;
pub mod error;
pub mod frontmatter;
pub mod host;
pub mod messages;
pub mod model;
pub mod projection;
pub mod vfs;

pub use config::{HostDailyNotesOptions, WorkflowSettings};
pub use daily_note::{DailyNoteConfig, DailyNoteLocator, DateFormat};
pub use dashboard::{DashboardView, Panel, WorkflowDashboard};
pub use error::SettingsError;
pub use frontmatter::Frontmatter;
pub use host::{ActiveDocument, HostContext, LogNotifier, Notifier};
pub use model::{normalize_vault_path, DocumentRef, Field, FrontmatterValue};
pub use projection::{MetadataField, MetadataRecord};
pub use vfs::{DocumentStore, MemoryStore, VaultFileSystem};
