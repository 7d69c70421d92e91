//! Workflow LSP Library
//!
//! Editor surface for the workflow core: commands for the dashboard,
//! frontmatter properties and daily notes over JSON-RPC.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};

use crate::state::GlobalState;

mod config;
mod handlers;
mod logging;
mod notices;
mod protocol;
mod state;

pub use config::{LogLevel, LspSettings};
pub use logging::{init_logging, logger_builder};

/// LSP backend implementation
pub struct Backend {
    pub(crate) client: Client,
    pub(crate) state: GlobalState,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: GlobalState::new(),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::handle_initialize(&self.client, &self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handlers::handle_initialized(&self.client, &self.state).await
    }

    async fn shutdown(&self) -> Result<()> {
        handlers::handle_shutdown(&self.client).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handlers::handle_did_open(&self.state, params).await
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handlers::handle_did_change(&self.state, params).await
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handlers::handle_did_close(&self.state, params).await
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::handle_did_change_configuration(&self.client, &self.state, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        handlers::handle_execute_command(&self.client, &self.state, params).await
    }
}

/// Create and return LSP service and client socket
pub fn create_lsp_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}
