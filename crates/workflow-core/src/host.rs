//! Explicit host context.
//!
//! Everything that needs the host (document store, notices, settings) gets it
//! through a [`HostContext`] passed in by the caller. There is no global
//! application handle.

use log::{info, warn};

use crate::config::{HostDailyNotesOptions, WorkflowSettings};
use crate::daily_note::{DailyNoteConfig, DailyNoteLocator};
use crate::model::DocumentRef;
use crate::vfs::DocumentStore;

/// Transient user-visible messages.
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

/// Notifier for hosts without a UI; notices go to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, message: &str) {
        info!("Notice: {}", message);
    }
}

/// The document currently focused in the host editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDocument {
    pub doc: DocumentRef,
    /// Editor buffer when it may differ from the stored text
    pub buffer: Option<String>,
}

impl ActiveDocument {
    pub fn new(doc: DocumentRef) -> Self {
        Self { doc, buffer: None }
    }

    pub fn with_buffer(doc: DocumentRef, buffer: String) -> Self {
        Self {
            doc,
            buffer: Some(buffer),
        }
    }
}

pub struct HostContext<'a> {
    pub store: &'a dyn DocumentStore,
    pub notifier: &'a dyn Notifier,
    pub settings: &'a WorkflowSettings,
    pub host_daily_notes: Option<&'a HostDailyNotesOptions>,
    pub active: Option<ActiveDocument>,
}

impl<'a> HostContext<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        notifier: &'a dyn Notifier,
        settings: &'a WorkflowSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            settings,
            host_daily_notes: None,
            active: None,
        }
    }

    pub fn with_host_daily_notes(mut self, options: Option<&'a HostDailyNotesOptions>) -> Self {
        self.host_daily_notes = options;
        self
    }

    pub fn with_active(mut self, active: Option<ActiveDocument>) -> Self {
        self.active = active;
        self
    }

    pub fn daily_note_config(&self) -> DailyNoteConfig {
        DailyNoteConfig::effective(self.settings, self.host_daily_notes)
    }

    pub fn daily_notes(&self) -> DailyNoteLocator<'a> {
        DailyNoteLocator::new(self.store, self.daily_note_config())
    }

    /// Header for new daily notes taken from the host's template file, when
    /// the host daily notes options name one that exists.
    pub fn daily_note_template(&self) -> Option<String> {
        let options = self.host_daily_notes.filter(|options| options.enabled)?;
        let template = options.template.as_deref()?.trim();
        if template.is_empty() {
            return None;
        }

        let doc = self
            .store
            .resolve(template)
            .or_else(|| self.store.resolve(&format!("{}.md", template)))?;
        match self.store.read(&doc) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Could not read daily note template {}: {}", doc, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryStore;

    #[test]
    fn test_daily_note_template_from_host() {
        let store = MemoryStore::new();
        store.insert("Templates/Daily.md", "---\nmood:\n---\n\n");
        let settings = WorkflowSettings::default();
        let options = HostDailyNotesOptions {
            enabled: true,
            template: Some("Templates/Daily".to_string()),
            ..Default::default()
        };

        let ctx = HostContext::new(&store, &LogNotifier, &settings)
            .with_host_daily_notes(Some(&options));
        assert_eq!(
            ctx.daily_note_template().as_deref(),
            Some("---\nmood:\n---\n\n")
        );
    }

    #[test]
    fn test_daily_note_template_absent() {
        let store = MemoryStore::new();
        let settings = WorkflowSettings::default();
        let ctx = HostContext::new(&store, &LogNotifier, &settings);
        assert_eq!(ctx.daily_note_template(), None);

        let options = HostDailyNotesOptions {
            enabled: true,
            template: Some("Templates/Missing".to_string()),
            ..Default::default()
        };
        let ctx = ctx.with_host_daily_notes(Some(&options));
        assert_eq!(ctx.daily_note_template(), None);
    }

    #[test]
    fn test_daily_note_config_follows_host() {
        let store = MemoryStore::new();
        let settings = WorkflowSettings::default();
        let options = HostDailyNotesOptions {
            enabled: true,
            folder: Some("Daily".to_string()),
            ..Default::default()
        };
        let ctx = HostContext::new(&store, &LogNotifier, &settings)
            .with_host_daily_notes(Some(&options));
        assert_eq!(ctx.daily_note_config().folder, "Daily");
        assert_eq!(ctx.daily_note_config().format, "YYYY-MM-DD");
    }
}
