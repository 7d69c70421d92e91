use std::sync::{Mutex, PoisonError};
use tower_lsp::lsp_types::MessageType;
use tower_lsp::Client;
use workflow_core::Notifier;

/// Collects notices raised by core calls so they can be shown once the
/// call returns.
#[derive(Default)]
pub struct NoticeBuffer {
    messages: Mutex<Vec<String>>,
}

impl NoticeBuffer {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Show every pending notice in the editor.
    pub async fn flush(&self, client: &Client) {
        for message in self.take() {
            client.show_message(MessageType::WARNING, message).await;
        }
    }
}

impl Notifier for NoticeBuffer {
    fn notice(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains() {
        let notices = NoticeBuffer::default();
        notices.notice("one");
        notices.notice("two");
        assert_eq!(notices.take(), vec!["one", "two"]);
        assert!(notices.take().is_empty());
    }
}
