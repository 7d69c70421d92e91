use crate::state::GlobalState;
use tower_lsp::lsp_types::*;
use workflow_core::DocumentRef;

fn is_markdown_uri(uri: &Url) -> bool {
    DocumentRef::new(uri.path()).is_markdown()
}

async fn track(state: &GlobalState, uri: Url, text: String) {
    if is_markdown_uri(&uri) {
        *state.active_document.write().await = Some(uri.clone());
    }
    state.document_cache.write().await.insert(uri, text);
}

/// Handle "textDocument/didOpen" notification
pub async fn handle_did_open(state: &GlobalState, params: DidOpenTextDocumentParams) {
    let document = params.text_document;
    track(state, document.uri, document.text).await;
}

/// Handle "textDocument/didChange" notification
pub async fn handle_did_change(state: &GlobalState, params: DidChangeTextDocumentParams) {
    // Full sync: the last change carries the whole text.
    if let Some(last_change) = params.content_changes.into_iter().last() {
        track(state, params.text_document.uri, last_change.text).await;
    }
}

/// Handle "textDocument/didClose" notification
pub async fn handle_did_close(state: &GlobalState, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    state.document_cache.write().await.remove(&uri);

    let mut active = state.active_document.write().await;
    if active.as_ref() == Some(&uri) {
        *active = None;
    }
}
