use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowSuspension {
    pub id: Uuid,
    pub run_id: Uuid,
    pub reason: String,
    pub data: Value,
    pub resolved: bool,
    pub resolution: Option<Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowSuspensionInsert {
    pub run_id: Uuid,
    pub reason: String,
    pub data: Value,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub resolution: Option<Value>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
}

impl WorkflowSuspensionInsert {
    /// An unresolved suspension for `run_id`.
    pub fn pending(run_id: Uuid, reason: impl Into<String>, data: Value) -> Self {
        Self {
            run_id,
            reason: reason.into(),
            data,
            resolved: false,
            resolution: None,
            resolved_at: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkflowSuspensionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub resolved_at: Option<OffsetDateTime>,
}

impl WorkflowSuspensionUpdate {
    /// Marks the suspension resolved. Keeping `resolution` and `resolved`
    /// consistent is the database's job; this just sets the three columns
    /// together.
    pub fn resolve(resolution: Value, resolved_at: OffsetDateTime) -> Self {
        Self {
            resolved: Some(true),
            resolution: Some(resolution),
            resolved_at: Some(resolved_at),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn insert_omits_id_and_created_at() {
        let run_id = Uuid::new_v4();
        let insert = WorkflowSuspensionInsert::pending(run_id, "approval", json!({ "step": 2 }));

        let json = serde_json::to_value(&insert).unwrap();

        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["run_id"], json!(run_id.to_string()));
        assert_eq!(json["resolved"], json!(false));
        assert_eq!(json["resolved_at"], Value::Null);
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let update = WorkflowSuspensionUpdate::default();
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({}));

        let parsed: WorkflowSuspensionUpdate = serde_json::from_value(json!({})).unwrap();
        assert_eq!(parsed, update);
    }

    #[test]
    fn resolve_sets_resolution_columns() {
        let update =
            WorkflowSuspensionUpdate::resolve(json!({ "approved": true }), datetime!(2024-05-01 12:00 UTC));

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "resolved": true,
                "resolution": { "approved": true },
                "resolved_at": "2024-05-01T12:00:00Z"
            })
        );
    }

    #[test]
    fn unresolved_row_parses_null_timestamps() {
        let payload = json!({
            "id": "6f1c1c1e-4a8e-4a47-9d53-8d2a1f0e6a11",
            "run_id": "0b5f2a4e-22ab-4f8b-8d1e-7d4f0f5c3a21",
            "reason": "awaiting approval",
            "data": {},
            "resolved": false,
            "resolution": null,
            "created_at": "2024-05-01T12:00:00Z",
            "resolved_at": null
        });

        let row: WorkflowSuspension = serde_json::from_value(payload).unwrap();
        assert!(!row.resolved);
        assert_eq!(row.resolution, None);
        assert_eq!(row.resolved_at, None);
    }
}
