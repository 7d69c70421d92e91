use crate::config::LspSettings;
use crate::protocol::ALL_COMMANDS;
use crate::state::{GlobalState, Vault};
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use workflow_core::{DocumentStore, WorkflowSettings};

/// Handle "initialize" request
pub async fn handle_initialize(
    client: &Client,
    state: &GlobalState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    let config = match params.initialization_options.as_ref() {
        Some(value) => match LspSettings::from_client_value(value) {
            Ok(config) => config,
            Err(e) => {
                client
                    .log_message(
                        MessageType::WARNING,
                        format!("⚠️ Invalid initialization options, using defaults: {}", e),
                    )
                    .await;
                LspSettings::default()
            }
        },
        None => LspSettings::default(),
    };
    log::set_max_level(config.log_level.to_filter());

    match params.root_uri.as_ref().and_then(|uri| uri.to_file_path().ok()) {
        Some(root_path) => {
            client
                .log_message(
                    MessageType::INFO,
                    format!("Initializing vault at: {:?}", root_path),
                )
                .await;

            let settings_path = config.settings_path.clone();
            let (vault, settings, count) = tokio::task::spawn_blocking(move || {
                let vault = Vault::open(root_path, &settings_path);
                let settings = WorkflowSettings::load(&vault.settings_file);
                let count = vault.store.list_documents().len();
                (vault, settings, count)
            })
            .await
            .map_err(|e| Error {
                code: ErrorCode::InternalError,
                message: format!("Failed to open vault: {}", e).into(),
                data: None,
            })?;

            client
                .log_message(
                    MessageType::INFO,
                    format!(
                        "Found {} markdown documents, daily notes in {:?} as {}",
                        count, settings.daily_note_folder, settings.daily_note_format
                    ),
                )
                .await;

            *state.settings.write().await = settings;
            *state.vault.write().await = Some(vault);
        }
        None => {
            client
                .log_message(MessageType::WARNING, "No rootUri provided!")
                .await;
        }
    }

    *state.config.write().await = config;

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: ALL_COMMANDS.iter().map(|c| c.to_string()).collect(),
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "workflow".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Handle "initialized" notification
pub async fn handle_initialized(client: &Client, state: &GlobalState) {
    let ready = state.vault.read().await.is_some();
    let message = if ready {
        "✅ Workflow server ready"
    } else {
        "⚠️ Workflow server running without a vault"
    };
    client.log_message(MessageType::INFO, message).await;
}

/// Handle "shutdown" request
pub async fn handle_shutdown(client: &Client) -> Result<()> {
    client
        .log_message(MessageType::INFO, "🛑 Shutdown requested")
        .await;
    Ok(())
}
