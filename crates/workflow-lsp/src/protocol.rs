use serde::{Deserialize, Serialize};
use url::Url;
use workflow_core::{DashboardView, FrontmatterValue};

pub const OPEN_DASHBOARD: &str = "workflow/openDashboard";
pub const DEBUG: &str = "workflow/debug";
pub const GET_PROPERTY: &str = "workflow/getProperty";
pub const SET_PROPERTY: &str = "workflow/setProperty";
pub const OPEN_DAILY_NOTE: &str = "workflow/openDailyNote";
pub const TODAYS_THOUGHT: &str = "workflow/todaysThought";
pub const UPDATE_SETTINGS: &str = "workflow/updateSettings";

pub const ALL_COMMANDS: [&str; 7] = [
    OPEN_DASHBOARD,
    DEBUG,
    GET_PROPERTY,
    SET_PROPERTY,
    OPEN_DAILY_NOTE,
    TODAYS_THOUGHT,
    UPDATE_SETTINGS,
];

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OpenDashboardParams {
    /// Document to show, defaults to the active editor document
    pub uri: Option<Url>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenDashboardResult {
    pub uri: Url,
    pub view: DashboardView,
    /// Ready-to-render markdown of the view
    pub markdown: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetPropertyParams {
    pub uri: Url,
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetPropertyResult {
    pub value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetPropertyParams {
    pub uri: Url,
    pub key: String,
    pub value: FrontmatterValue,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetPropertyResult {
    pub ok: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DailyNoteParams {
    /// ISO date (`2024-03-05`), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyNoteResult {
    pub uri: Option<Url>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodaysThoughtResult {
    pub thought: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsParams {
    pub daily_note_folder: Option<String>,
    pub daily_note_format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSettingsResult {
    pub ok: bool,
}
