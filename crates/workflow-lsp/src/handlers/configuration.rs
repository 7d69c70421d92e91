use crate::config::LspSettings;
use crate::state::GlobalState;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;

/// Handle "workspace/didChangeConfiguration" notification
pub async fn handle_did_change_configuration(
    client: &Client,
    state: &GlobalState,
    params: DidChangeConfigurationParams,
) {
    client
        .log_message(MessageType::INFO, "⚙️ Configuration changed")
        .await;

    if !params.settings.is_object() {
        return;
    }

    match LspSettings::from_client_value(&params.settings) {
        Ok(new_settings) => {
            log::set_max_level(new_settings.log_level.to_filter());
            let mut config_lock = state.config.write().await;
            if config_lock.settings_path != new_settings.settings_path {
                client
                    .log_message(
                        MessageType::INFO,
                        "settingsPath takes effect on the next start",
                    )
                    .await;
            }
            *config_lock = new_settings;

            client
                .log_message(MessageType::INFO, "✅ LSP settings updated successfully")
                .await;
        }
        Err(e) => {
            client
                .log_message(
                    MessageType::ERROR,
                    format!("❌ Failed to parse updated settings: {}", e),
                )
                .await;
        }
    }
}
