//! Workflow dashboard.
//!
//! The dashboard is a panel: the host calls [`Panel::on_open`] when it is
//! shown and [`Panel::on_close`] when it is dismissed. Each open builds a
//! fresh [`DashboardView`] that the host renders.

use serde::{Deserialize, Serialize};

use crate::host::HostContext;
use crate::messages::{
    Indicator, WorkflowStep, DESCRIPTION_NOT_SET, RECOMMENDED_ANKI_CARDS, RECOMMENDED_SOURCES,
    STATUS_NOT_SET,
};
use crate::projection::{project, project_document, MetadataRecord};

/// Lifecycle callbacks for a component shown by the host.
pub trait Panel {
    fn on_open(&mut self, ctx: &HostContext<'_>);
    fn on_close(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub step: WorkflowStep,
    pub guidance: String,
    pub indicator: Indicator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub record: MetadataRecord,
    pub heading: String,
    pub lines: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
}

impl DashboardView {
    pub fn build(record: MetadataRecord) -> Self {
        let heading = format!("Current note: {}", record.title);
        let lines = vec![
            format!(
                "Current status: {}",
                record.status.or_placeholder(STATUS_NOT_SET)
            ),
            format!(
                "Description: {}",
                record.description.or_placeholder(DESCRIPTION_NOT_SET)
            ),
            format!("No of sources: {}", record.source_count),
            format!("No of Anki cards: {}", record.anki_card_count),
        ];

        let checklist = WorkflowStep::ALL
            .iter()
            .map(|&step| ChecklistItem {
                step,
                guidance: step.guidance().to_string(),
                indicator: Indicator::from_found(step_done(step, &record)),
            })
            .collect();

        Self {
            record,
            heading,
            lines,
            checklist,
        }
    }

    pub fn completed_steps(&self) -> usize {
        self.checklist
            .iter()
            .filter(|item| item.indicator == Indicator::Found)
            .count()
    }

    pub fn to_markdown(&self) -> String {
        let mut out = format!("## {}\n\n", self.heading);
        for line in &self.lines {
            out.push_str(line);
            out.push_str("\n\n");
        }
        for item in &self.checklist {
            out.push_str(&format!("- {} {}\n", item.indicator, item.guidance));
        }
        out
    }
}

fn step_done(step: WorkflowStep, record: &MetadataRecord) -> bool {
    match step {
        WorkflowStep::UpdateStatus => record.status.is_filled(),
        WorkflowStep::AddDescription => record.description.is_filled(),
        WorkflowStep::VerifySources => record.source_count >= RECOMMENDED_SOURCES,
        WorkflowStep::CreateAnki => record.anki_card_count >= RECOMMENDED_ANKI_CARDS,
        WorkflowStep::AddVisual => record.has_illustration,
    }
}

#[derive(Debug, Default)]
pub struct WorkflowDashboard {
    view: Option<DashboardView>,
}

impl WorkflowDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }
}

impl Panel for WorkflowDashboard {
    fn on_open(&mut self, ctx: &HostContext<'_>) {
        let record = match &ctx.active {
            Some(active) => match &active.buffer {
                Some(text) => project(&active.doc, text),
                None => project_document(ctx.store, &active.doc),
            },
            None => MetadataRecord::no_active_file(),
        };
        self.view = Some(DashboardView::build(record));
    }

    fn on_close(&mut self) {
        self.view = None;
    }
}
