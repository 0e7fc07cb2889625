use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::WorkflowStatus;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowRun {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workflow_id: Uuid,
    pub status: WorkflowStatus,
    pub input_data: Value,
    pub output_data: Option<Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowRunInsert {
    pub user_id: Uuid,
    pub workflow_id: Uuid,
    pub status: WorkflowStatus,
    pub input_data: Value,
    #[serde(default)]
    pub output_data: Option<Value>,
}

/// Partial update. `None` leaves a column untouched; to clear `output_data`
/// set it to `Some(Value::Null)`.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowRunUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data: Option<Value>,
}

impl WorkflowRunUpdate {
    pub fn status(status: WorkflowStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn finished(status: WorkflowStatus, output: Value) -> Self {
        Self {
            status: Some(status),
            output_data: Some(output),
            ..Self::default()
        }
    }
}
