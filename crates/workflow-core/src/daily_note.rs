//! Daily note locator.
//!
//! A daily note for date D lives at `<folder>/<D formatted>.md`, or at
//! `<D formatted>.md` in the vault root. The folder location wins when both
//! exist.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};
use log::{debug, error, info};

use crate::config::{HostDailyNotesOptions, WorkflowSettings, DEFAULT_DATE_FORMAT};
use crate::frontmatter;
use crate::host::Notifier;
use crate::model::{normalize_vault_path, DocumentRef};
use crate::vfs::DocumentStore;

/// Initial text of a daily note created without a template.
pub const EMPTY_FRONTMATTER: &str = "---\n---\n\n";

/// Frontmatter key holding the thought of the day.
pub const TODAYS_THOUGHT_KEY: &str = "todaysThought";

pub const CREATE_FAILED_NOTICE: &str = "Could not create daily note file";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    MonthName,
    MonthShort,
    Month2,
    Month,
    DayOfYear3,
    DayOfYear,
    DayOrdinal,
    Day2,
    Day,
    WeekdayName,
    WeekdayShort,
    WeekdayMin,
    WeekdayNumber,
    IsoWeek2,
    IsoWeek,
    Quarter,
    Literal(String),
}

// Longest patterns first.
const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("MMMM", Token::MonthName),
    ("DDDD", Token::DayOfYear3),
    ("dddd", Token::WeekdayName),
    ("MMM", Token::MonthShort),
    ("DDD", Token::DayOfYear),
    ("ddd", Token::WeekdayShort),
    ("YY", Token::Year2),
    ("MM", Token::Month2),
    ("Do", Token::DayOrdinal),
    ("DD", Token::Day2),
    ("dd", Token::WeekdayMin),
    ("WW", Token::IsoWeek2),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::WeekdayNumber),
    ("W", Token::IsoWeek),
    ("Q", Token::Quarter),
];

/// Moment-style date pattern such as `YYYY-MM-DD`.
///
/// Text inside `[brackets]` is copied literally.
///
/// ```
/// use chrono::NaiveDate;
/// use workflow_core::DateFormat;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(DateFormat::parse("YYYY-MM-DD").format(date), "2024-03-05");
/// assert_eq!(DateFormat::parse("dddd, MMMM Do").format(date), "Tuesday, March 5th");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    tokens: Vec<Token>,
}

impl DateFormat {
    pub fn parse(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                if let Some(end) = after.find(']') {
                    literal.push_str(&after[..end]);
                    rest = &after[end + 1..];
                    continue;
                }
            }

            if let Some((text, token)) = TOKENS.iter().find(|(text, _)| rest.starts_with(text)) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(token.clone());
                rest = &rest[text.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                literal.push(c);
            }
            rest = chars.as_str();
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            pattern: pattern.to_string(),
            tokens,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            // Writing into a String cannot fail.
            let _ = match token {
                Token::Year4 => write!(out, "{:04}", date.year()),
                Token::Year2 => write!(out, "{:02}", date.year().rem_euclid(100)),
                Token::MonthName => write!(out, "{}", date.format("%B")),
                Token::MonthShort => write!(out, "{}", date.format("%b")),
                Token::Month2 => write!(out, "{:02}", date.month()),
                Token::Month => write!(out, "{}", date.month()),
                Token::DayOfYear3 => write!(out, "{:03}", date.ordinal()),
                Token::DayOfYear => write!(out, "{}", date.ordinal()),
                Token::DayOrdinal => write!(out, "{}{}", date.day(), ordinal_suffix(date.day())),
                Token::Day2 => write!(out, "{:02}", date.day()),
                Token::Day => write!(out, "{}", date.day()),
                Token::WeekdayName => write!(out, "{}", date.format("%A")),
                Token::WeekdayShort => write!(out, "{}", date.format("%a")),
                Token::WeekdayMin => {
                    let short = date.format("%a").to_string();
                    write!(out, "{}", &short[..2])
                }
                Token::WeekdayNumber => {
                    write!(out, "{}", date.weekday().num_days_from_sunday())
                }
                Token::IsoWeek2 => write!(out, "{:02}", date.iso_week().week()),
                Token::IsoWeek => write!(out, "{}", date.iso_week().week()),
                Token::Quarter => write!(out, "{}", (date.month() - 1) / 3 + 1),
                Token::Literal(text) => write!(out, "{}", text),
            };
        }
        out
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Where daily notes live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNoteConfig {
    pub folder: String,
    pub format: String,
}

impl DailyNoteConfig {
    /// Merge plugin settings with the host's daily notes options.
    /// Enabled host options win.
    pub fn effective(
        settings: &WorkflowSettings,
        host: Option<&HostDailyNotesOptions>,
    ) -> Self {
        match host {
            Some(options) if options.enabled => Self {
                folder: options.folder.clone().unwrap_or_default(),
                format: options
                    .format
                    .clone()
                    .filter(|format| !format.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            },
            _ => Self {
                folder: settings.daily_note_folder.clone(),
                format: settings.daily_note_format.clone(),
            },
        }
    }
}

pub struct DailyNoteLocator<'a> {
    store: &'a dyn DocumentStore,
    config: DailyNoteConfig,
    format: DateFormat,
}

impl<'a> DailyNoteLocator<'a> {
    pub fn new(store: &'a dyn DocumentStore, config: DailyNoteConfig) -> Self {
        let format = DateFormat::parse(&config.format);
        Self {
            store,
            config,
            format,
        }
    }

    pub fn config(&self) -> &DailyNoteConfig {
        &self.config
    }

    pub fn date_key(&self, date: NaiveDate) -> String {
        self.format.format(date)
    }

    /// Folder path first, root path second.
    pub fn candidate_paths(&self, date: NaiveDate) -> (String, String) {
        let key = self.date_key(date);
        let folder = normalize_vault_path(&self.config.folder);
        let root_path = normalize_vault_path(&format!("{}.md", key));
        let folder_path = if folder.is_empty() {
            root_path.clone()
        } else {
            normalize_vault_path(&format!("{}/{}.md", folder, key))
        };
        (folder_path, root_path)
    }

    /// Find the existing daily note for `date`.
    pub fn resolve(&self, date: NaiveDate) -> Option<DocumentRef> {
        let (folder_path, root_path) = self.candidate_paths(date);
        let docs = self.store.list_documents();

        let found = docs
            .iter()
            .find(|doc| doc.path() == folder_path)
            .or_else(|| docs.iter().find(|doc| doc.path() == root_path))
            .cloned();

        debug!("Daily note for {} resolved to {:?}", date, found);
        found
    }

    /// Find or create the daily note for `date`.
    ///
    /// A new note starts with `template`, or an empty frontmatter block.
    /// Creation is tried in the folder first and at the vault root second;
    /// when both fail a notice is shown and `None` is returned.
    pub fn ensure(
        &self,
        date: NaiveDate,
        template: Option<&str>,
        notifier: &dyn Notifier,
    ) -> Option<DocumentRef> {
        if let Some(doc) = self.resolve(date) {
            return Some(doc);
        }

        let initial_text = template.unwrap_or(EMPTY_FRONTMATTER);
        let (folder_path, root_path) = self.candidate_paths(date);

        match self.store.create(&folder_path, initial_text) {
            Ok(doc) => {
                info!("Created daily note {}", doc);
                return Some(doc);
            }
            Err(e) => debug!("Could not create {}: {}", folder_path, e),
        }

        if root_path != folder_path {
            match self.store.create(&root_path, initial_text) {
                Ok(doc) => {
                    info!("Created daily note {} at vault root", doc);
                    return Some(doc);
                }
                Err(e) => error!("Could not create {}: {}", root_path, e),
            }
        }

        notifier.notice(CREATE_FAILED_NOTICE);
        None
    }

    /// The `todaysThought` property of the daily note for `date`,
    /// creating the note if needed.
    pub fn thought_for(&self, date: NaiveDate, notifier: &dyn Notifier) -> Option<String> {
        let doc = self.ensure(date, None, notifier)?;
        frontmatter::read_property(self.store, doc.path(), TODAYS_THOUGHT_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryStore, VaultFileSystem};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notice(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_string());
        }
    }

    fn march_5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn journal_config() -> DailyNoteConfig {
        DailyNoteConfig {
            folder: "/Journal".to_string(),
            format: "YYYY-MM-DD".to_string(),
        }
    }

    #[test]
    fn test_date_format_tokens() {
        let date = march_5();
        let cases = [
            ("YYYY-MM-DD", "2024-03-05"),
            ("YY/M/D", "24/3/5"),
            ("MMM DDD", "Mar 65"),
            ("DDDD", "065"),
            ("ddd dd d", "Tue Tu 2"),
            ("[Week] WW, [Q]Q", "Week 10, Q1"),
            ("YYYY/MM/YYYY-MM-DD", "2024/03/2024-03-05"),
        ];
        for (pattern, expected) in cases {
            assert_eq!(DateFormat::parse(pattern).format(date), expected, "{}", pattern);
        }
    }

    #[test]
    fn test_date_format_unclosed_bracket_is_literal() {
        assert_eq!(DateFormat::parse("[YYYY").format(march_5()), "[2024");
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(30), "th");
    }

    #[test]
    fn test_effective_config_host_wins() {
        let settings = WorkflowSettings::default();
        let host = HostDailyNotesOptions {
            enabled: true,
            folder: Some("Daily".to_string()),
            format: Some("DD-MM-YYYY".to_string()),
            ..Default::default()
        };
        let config = DailyNoteConfig::effective(&settings, Some(&host));
        assert_eq!(config.folder, "Daily");
        assert_eq!(config.format, "DD-MM-YYYY");
    }

    #[test]
    fn test_effective_config_disabled_host_ignored() {
        let settings = WorkflowSettings::default();
        let host = HostDailyNotesOptions {
            enabled: false,
            folder: Some("Daily".to_string()),
            ..Default::default()
        };
        let config = DailyNoteConfig::effective(&settings, Some(&host));
        assert_eq!(config.folder, "/Journal");
        assert_eq!(config.format, "YYYY-MM-DD");
    }

    #[test]
    fn test_effective_config_host_blank_format() {
        let host = HostDailyNotesOptions {
            enabled: true,
            format: Some(" ".to_string()),
            ..Default::default()
        };
        let config = DailyNoteConfig::effective(&WorkflowSettings::default(), Some(&host));
        assert_eq!(config.folder, "");
        assert_eq!(config.format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_resolve_prefers_folder() {
        let store = MemoryStore::new();
        store.insert("/2024-03-05.md", "root");
        store.insert("/Journal/2024-03-05.md", "folder");

        let locator = DailyNoteLocator::new(&store, journal_config());
        assert_eq!(
            locator.resolve(march_5()),
            Some(DocumentRef::new("Journal/2024-03-05.md"))
        );
    }

    #[test]
    fn test_resolve_falls_back_to_root() {
        let store = MemoryStore::new();
        store.insert("/2024-03-05.md", "root");

        let locator = DailyNoteLocator::new(&store, journal_config());
        assert_eq!(
            locator.resolve(march_5()),
            Some(DocumentRef::new("2024-03-05.md"))
        );
    }

    #[test]
    fn test_resolve_ignores_other_folders() {
        let store = MemoryStore::new();
        store.insert("Archive/2024-03-05.md", "elsewhere");

        let locator = DailyNoteLocator::new(&store, journal_config());
        assert_eq!(locator.resolve(march_5()), None);
    }

    #[test]
    fn test_ensure_creates_in_folder() {
        let store = MemoryStore::new();
        store.add_folder("Journal");
        let notifier = RecordingNotifier::default();

        let locator = DailyNoteLocator::new(&store, journal_config());
        let doc = locator.ensure(march_5(), None, &notifier).unwrap();

        assert_eq!(doc.path(), "Journal/2024-03-05.md");
        assert_eq!(store.text_of("Journal/2024-03-05.md").unwrap(), "---\n---\n\n");
        assert!(notifier.notices.lock().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_returns_existing() {
        let store = MemoryStore::new();
        store.insert("Journal/2024-03-05.md", "already here");
        let notifier = RecordingNotifier::default();

        let locator = DailyNoteLocator::new(&store, journal_config());
        let doc = locator
            .ensure(march_5(), Some("---\nx: 1\n---\n"), &notifier)
            .unwrap();
        assert_eq!(doc.path(), "Journal/2024-03-05.md");
        assert_eq!(store.text_of("Journal/2024-03-05.md").unwrap(), "already here");
    }

    #[test]
    fn test_ensure_falls_back_to_root_when_folder_missing() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();

        let locator = DailyNoteLocator::new(&store, journal_config());
        let doc = locator
            .ensure(march_5(), Some("---\nstatus: new\n---\n\n"), &notifier)
            .unwrap();

        assert_eq!(doc.path(), "2024-03-05.md");
        assert_eq!(
            store.text_of("2024-03-05.md").unwrap(),
            "---\nstatus: new\n---\n\n"
        );
        assert!(notifier.notices.lock().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let store = VaultFileSystem::new(temp_dir.path().join("does-not-exist"));
        let notifier = RecordingNotifier::default();

        let locator = DailyNoteLocator::new(&store, journal_config());
        assert_eq!(locator.ensure(march_5(), None, &notifier), None);
        assert_eq!(
            notifier.notices.lock().unwrap().as_slice(),
            &[CREATE_FAILED_NOTICE.to_string()]
        );
    }

    #[test]
    fn test_ensure_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("Journal")).unwrap();
        let store = VaultFileSystem::new(temp_dir.path());
        let notifier = RecordingNotifier::default();

        let locator = DailyNoteLocator::new(&store, journal_config());
        locator.ensure(march_5(), None, &notifier).unwrap();

        let written =
            std::fs::read_to_string(temp_dir.path().join("Journal/2024-03-05.md")).unwrap();
        assert_eq!(written, EMPTY_FRONTMATTER);
        assert!(locator.resolve(march_5()).is_some());
    }

    #[test]
    fn test_thought_for() {
        let store = MemoryStore::new();
        store.insert(
            "Journal/2024-03-05.md",
            "---\ntodaysThought: Keep going\n---\n",
        );
        let notifier = RecordingNotifier::default();

        let locator = DailyNoteLocator::new(&store, journal_config());
        assert_eq!(
            locator.thought_for(march_5(), &notifier),
            Some("Keep going".to_string())
        );

        let next_day = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(locator.thought_for(next_day, &notifier), None);
        assert!(store.text_of("Journal/2024-03-06.md").is_some());
    }

    #[test]
    fn test_root_folder_config() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::default();
        let config = DailyNoteConfig {
            folder: "/".to_string(),
            format: "YYYY-MM-DD".to_string(),
        };

        let locator = DailyNoteLocator::new(&store, config);
        assert_eq!(
            locator.candidate_paths(march_5()),
            ("2024-03-05.md".to_string(), "2024-03-05.md".to_string())
        );
        assert_eq!(
            locator.ensure(march_5(), None, &notifier),
            Some(DocumentRef::new("2024-03-05.md"))
        );
    }
}
