use serde::{de::DeserializeOwned, Serialize};

use super::workflow_run::{WorkflowRun, WorkflowRunInsert, WorkflowRunUpdate};
use super::workflow_suspension::{
    WorkflowSuspension, WorkflowSuspensionInsert, WorkflowSuspensionUpdate,
};

/// The hosted database schema the client talks to.
pub struct Database;

impl Database {
    pub const SCHEMA: &'static str = "public";
}

/// A table in [`Database`] together with its derived shapes.
pub trait Table {
    const NAME: &'static str;

    /// Full persisted record.
    type Row: DeserializeOwned + Serialize + Send + 'static;
    /// Row without server-generated columns.
    type Insert: Serialize + Send + Sync;
    /// Every insert column optional.
    type Update: Serialize + Default + Send + Sync;
}

pub type TableRow<T> = <T as Table>::Row;
pub type TableInsert<T> = <T as Table>::Insert;
pub type TableUpdate<T> = <T as Table>::Update;

pub struct WorkflowRuns;

impl Table for WorkflowRuns {
    const NAME: &'static str = "workflow_runs";
    type Row = WorkflowRun;
    type Insert = WorkflowRunInsert;
    type Update = WorkflowRunUpdate;
}

pub struct WorkflowSuspensions;

impl Table for WorkflowSuspensions {
    const NAME: &'static str = "workflow_suspensions";
    type Row = WorkflowSuspension;
    type Insert = WorkflowSuspensionInsert;
    type Update = WorkflowSuspensionUpdate;
}
