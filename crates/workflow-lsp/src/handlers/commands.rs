use crate::notices::NoticeBuffer;
use crate::protocol::*;
use crate::state::{GlobalState, Vault};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use workflow_core::frontmatter;
use workflow_core::{
    ActiveDocument, DocumentRef, HostContext, HostDailyNotesOptions, Panel, WorkflowDashboard,
    WorkflowSettings,
};

/// Handle "workspace/executeCommand" request
pub async fn handle_execute_command(
    client: &Client,
    state: &GlobalState,
    params: ExecuteCommandParams,
) -> Result<Option<serde_json::Value>> {
    match params.command.as_str() {
        OPEN_DASHBOARD => {
            let args = optional_arg::<OpenDashboardParams>(&params)?;
            to_value(handle_open_dashboard(client, state, args).await?)
        }
        DEBUG => {
            handle_debug(client).await;
            Ok(None)
        }
        GET_PROPERTY => {
            let args = required_arg::<GetPropertyParams>(&params)?;
            to_value(handle_get_property(state, args).await?)
        }
        SET_PROPERTY => {
            let args = required_arg::<SetPropertyParams>(&params)?;
            to_value(handle_set_property(client, state, args).await?)
        }
        OPEN_DAILY_NOTE => {
            let args = optional_arg::<DailyNoteParams>(&params)?;
            to_value(handle_open_daily_note(client, state, args).await?)
        }
        TODAYS_THOUGHT => {
            let args = optional_arg::<DailyNoteParams>(&params)?;
            to_value(handle_todays_thought(client, state, args).await?)
        }
        UPDATE_SETTINGS => {
            let args = required_arg::<UpdateSettingsParams>(&params)?;
            to_value(handle_update_settings(client, state, args).await?)
        }
        other => Err(Error::invalid_params(format!("Unknown command: {}", other))),
    }
}

fn required_arg<T: DeserializeOwned>(params: &ExecuteCommandParams) -> Result<T> {
    let first_arg = params
        .arguments
        .first()
        .ok_or_else(|| Error::invalid_params("Missing params"))?;
    serde_json::from_value(first_arg.clone())
        .map_err(|e| Error::invalid_params(format!("Invalid params: {}", e)))
}

fn optional_arg<T: DeserializeOwned + Default>(params: &ExecuteCommandParams) -> Result<T> {
    match params.arguments.first() {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(_) => required_arg(params),
    }
}

fn to_value<T: Serialize>(result: T) -> Result<Option<serde_json::Value>> {
    serde_json::to_value(result).map(Some).map_err(|e| Error {
        code: ErrorCode::InternalError,
        message: format!("Failed to serialize results: {}", e).into(),
        data: None,
    })
}

fn vault_not_initialized() -> Error {
    Error {
        code: ErrorCode::InternalError,
        message: "Vault not initialized".into(),
        data: None,
    }
}

fn document_in_vault(vault: &Vault, uri: &Url) -> Result<DocumentRef> {
    vault
        .document_for_uri(uri)
        .ok_or_else(|| Error::invalid_params(format!("Not a document of this vault: {}", uri)))
}

/// Run blocking vault work off the async runtime.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| Error {
        code: ErrorCode::InternalError,
        message: format!("Vault task failed: {}", e).into(),
        data: None,
    })
}

async fn current_vault(state: &GlobalState) -> Result<Vault> {
    state
        .vault
        .read()
        .await
        .clone()
        .ok_or_else(vault_not_initialized)
}

/// Owned copies of everything a core call needs from the server state.
struct Snapshot {
    vault: Vault,
    settings: WorkflowSettings,
    host_daily_notes: Option<HostDailyNotesOptions>,
}

impl Snapshot {
    async fn take(state: &GlobalState) -> Result<Self> {
        let vault = current_vault(state).await?;
        let settings = state.settings.read().await.clone();
        let host_daily_notes = state.config.read().await.daily_notes.clone();
        Ok(Self {
            vault,
            settings,
            host_daily_notes,
        })
    }

    fn context<'a>(&'a self, notices: &'a NoticeBuffer) -> HostContext<'a> {
        HostContext::new(self.vault.store(), notices, &self.settings)
            .with_host_daily_notes(self.host_daily_notes.as_ref())
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|e| Error::invalid_params(format!("Invalid date {:?}: {}", text, e))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Handle "workflow/openDashboard": show the workflow checklist for the
/// active markdown document.
pub async fn handle_open_dashboard(
    client: &Client,
    state: &GlobalState,
    params: OpenDashboardParams,
) -> Result<OpenDashboardResult> {
    let uri = match params.uri {
        Some(uri) => uri,
        None => state
            .active_document
            .read()
            .await
            .clone()
            .ok_or_else(|| Error {
                code: ErrorCode::InvalidRequest,
                message: "No active markdown document".into(),
                data: None,
            })?,
    };

    let snapshot = Snapshot::take(state).await?;
    let doc = document_in_vault(&snapshot.vault, &uri)?;
    if !doc.is_markdown() {
        return Err(Error::invalid_params(format!(
            "The dashboard needs a markdown document: {}",
            doc
        )));
    }

    let buffer = state.document_cache.read().await.get(&uri).cloned();
    let active = match buffer {
        Some(text) => ActiveDocument::with_buffer(doc, text),
        None => ActiveDocument::new(doc),
    };

    let (view, notices) = blocking(move || {
        let notices = NoticeBuffer::default();
        let mut dashboard = WorkflowDashboard::new();
        dashboard.on_open(&snapshot.context(&notices).with_active(Some(active)));
        let view = dashboard.view().cloned();
        dashboard.on_close();
        (view, notices)
    })
    .await?;

    let view = view.ok_or_else(Error::internal_error)?;
    client
        .log_message(
            MessageType::INFO,
            format!(
                "📊 Dashboard for {}: {}/{} steps done",
                view.record.title,
                view.completed_steps(),
                view.checklist.len()
            ),
        )
        .await;
    notices.flush(client).await;

    let markdown = view.to_markdown();
    Ok(OpenDashboardResult {
        uri,
        view,
        markdown,
    })
}

/// Handle "workflow/debug"
pub async fn handle_debug(client: &Client) {
    client.log_message(MessageType::LOG, "🍅").await;
}

/// Handle "workflow/getProperty"
pub async fn handle_get_property(
    state: &GlobalState,
    params: GetPropertyParams,
) -> Result<GetPropertyResult> {
    let vault = current_vault(state).await?;
    let doc = document_in_vault(&vault, &params.uri)?;

    let value = blocking(move || {
        frontmatter::read_property(vault.store(), doc.path(), &params.key)
    })
    .await?;
    Ok(GetPropertyResult { value })
}

/// Handle "workflow/setProperty"
pub async fn handle_set_property(
    client: &Client,
    state: &GlobalState,
    params: SetPropertyParams,
) -> Result<SetPropertyResult> {
    let vault = current_vault(state).await?;
    let doc = document_in_vault(&vault, &params.uri)?;

    let SetPropertyParams { key, value, .. } = params;
    let (ok, key, doc) = blocking(move || {
        let ok = frontmatter::update_property(vault.store(), doc.path(), &key, &value);
        (ok, key, doc)
    })
    .await?;

    if !ok {
        client
            .show_message(
                MessageType::ERROR,
                format!("Could not update {} in {}", key, doc),
            )
            .await;
    }
    Ok(SetPropertyResult { ok })
}

/// Handle "workflow/openDailyNote": find or create the daily note.
pub async fn handle_open_daily_note(
    client: &Client,
    state: &GlobalState,
    params: DailyNoteParams,
) -> Result<DailyNoteResult> {
    let date = parse_date(params.date.as_deref())?;
    let snapshot = Snapshot::take(state).await?;

    let (doc, uri, notices) = blocking(move || {
        let notices = NoticeBuffer::default();
        let doc = {
            let ctx = snapshot.context(&notices);
            let template = ctx.daily_note_template();
            ctx.daily_notes().ensure(date, template.as_deref(), &notices)
        };
        let uri = doc.as_ref().and_then(|doc| snapshot.vault.uri_for(doc));
        (doc, uri, notices)
    })
    .await?;
    notices.flush(client).await;

    if let Some(doc) = &doc {
        client
            .log_message(MessageType::INFO, format!("📅 Daily note: {}", doc))
            .await;
    }
    Ok(DailyNoteResult { uri })
}

/// Handle "workflow/todaysThought"
pub async fn handle_todays_thought(
    client: &Client,
    state: &GlobalState,
    params: DailyNoteParams,
) -> Result<TodaysThoughtResult> {
    let date = parse_date(params.date.as_deref())?;
    let snapshot = Snapshot::take(state).await?;

    let (thought, notices) = blocking(move || {
        let notices = NoticeBuffer::default();
        let thought = snapshot
            .context(&notices)
            .daily_notes()
            .thought_for(date, &notices);
        (thought, notices)
    })
    .await?;
    notices.flush(client).await;

    Ok(TodaysThoughtResult { thought })
}

/// Handle "workflow/updateSettings": merge and persist plugin settings.
///
/// The in-memory settings change only once the file is written.
pub async fn handle_update_settings(
    client: &Client,
    state: &GlobalState,
    params: UpdateSettingsParams,
) -> Result<UpdateSettingsResult> {
    let vault = current_vault(state).await?;

    // Held across the save so concurrent updates are written in order.
    let mut settings = state.settings.write().await;
    let mut updated = settings.clone();
    if let Some(folder) = params.daily_note_folder {
        updated.daily_note_folder = folder;
    }
    if let Some(format) = params.daily_note_format {
        updated.daily_note_format = format;
    }

    let (saved, updated) = blocking(move || {
        let saved = updated.save(&vault.settings_file);
        (saved, updated)
    })
    .await?;

    if let Err(e) = saved {
        client
            .log_message(
                MessageType::ERROR,
                format!("❌ Failed to save settings: {}", e),
            )
            .await;
        return Err(Error {
            code: ErrorCode::InternalError,
            message: format!("Failed to save settings: {}", e).into(),
            data: None,
        });
    }
    *settings = updated;
    drop(settings);

    client
        .log_message(MessageType::INFO, "✅ Settings saved")
        .await;
    Ok(UpdateSettingsResult { ok: true })
}
