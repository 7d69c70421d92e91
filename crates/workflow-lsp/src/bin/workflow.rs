//! Workflow LSP Server Binary Entry Point

use tower_lsp::Server;
use workflow_lsp::{create_lsp_service, init_logging};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the protocol.
    init_logging();

    log::info!("🚀 Workflow LSP Server starting, listening on stdin/stdout...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = create_lsp_service();
    log::info!("✅ LSP service created, waiting for client connection...");

    Server::new(stdin, stdout, socket).serve(service).await;
}
