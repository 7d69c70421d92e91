use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_ACTIVE_FILE_TITLE: &str = "No active file?!?";
pub const STATUS_NOT_SET: &str = "status is not set";
pub const DESCRIPTION_NOT_SET: &str = "Description is not set";

pub const RECOMMENDED_SOURCES: u32 = 3;
pub const RECOMMENDED_ANKI_CARDS: u32 = 3;

/// The fixed editorial workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowStep {
    UpdateStatus,
    AddDescription,
    VerifySources,
    CreateAnki,
    AddVisual,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 5] = [
        WorkflowStep::UpdateStatus,
        WorkflowStep::AddDescription,
        WorkflowStep::VerifySources,
        WorkflowStep::CreateAnki,
        WorkflowStep::AddVisual,
    ];

    pub fn guidance(self) -> &'static str {
        match self {
            WorkflowStep::UpdateStatus => {
                "Review and update the status to reflect the current stage of the note"
            }
            WorkflowStep::AddDescription => {
                "Ensure the description succinctly captures the main idea of the note"
            }
            WorkflowStep::VerifySources => {
                "Verify all claims have proper sources cited (aim for at least 3 sources)"
            }
            WorkflowStep::CreateAnki => {
                "Create Anki cards for key concepts (minimum 3 recommended)"
            }
            WorkflowStep::AddVisual => {
                "Add a visual element to enhance understanding (diagram, chart, or image)"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Indicator {
    Found,
    Missing,
}

impl Indicator {
    pub fn from_found(found: bool) -> Self {
        if found {
            Indicator::Found
        } else {
            Indicator::Missing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Found => "✅ Found",
            Indicator::Missing => "❌ Missing",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
