pub mod table;
pub mod workflow_run;
pub mod workflow_suspension;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use table::{
    Database, Table, TableInsert, TableRow, TableUpdate, WorkflowRuns, WorkflowSuspensions,
};
pub use workflow_run::{WorkflowRun, WorkflowRunInsert, WorkflowRunUpdate};
pub use workflow_suspension::{
    WorkflowSuspension, WorkflowSuspensionInsert, WorkflowSuspensionUpdate,
};

/// Mirrors the `workflow_status` Postgres enum. Transitions between states are
/// enforced by the database, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "workflow_status", rename_all = "lowercase")]
pub enum WorkflowStatus {
    Running,
    Suspended,
    Completed,
    Failed,
    Rejected,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 5] = [
        WorkflowStatus::Running,
        WorkflowStatus::Suspended,
        WorkflowStatus::Completed,
        WorkflowStatus::Failed,
        WorkflowStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Running => "running",
            WorkflowStatus::Suspended => "suspended",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
