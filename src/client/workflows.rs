use uuid::Uuid;

use super::{DatabaseError, SupabaseClient};
use crate::models::{
    WorkflowRun, WorkflowRunUpdate, WorkflowRuns, WorkflowStatus, WorkflowSuspension,
    WorkflowSuspensions,
};

impl SupabaseClient {
    /// Runs owned by `user_id`, newest first.
    pub async fn workflow_runs_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WorkflowRun>, DatabaseError> {
        self.from::<WorkflowRuns>()
            .eq("user_id", user_id)
            .order("created_at", false)
            .fetch()
            .await
    }

    pub async fn workflow_run(&self, run_id: Uuid) -> Result<Option<WorkflowRun>, DatabaseError> {
        self.from::<WorkflowRuns>()
            .eq("id", run_id)
            .fetch_optional()
            .await
    }

    pub async fn set_workflow_run_status(
        &self,
        run_id: Uuid,
        status: WorkflowStatus,
    ) -> Result<Option<WorkflowRun>, DatabaseError> {
        let rows = self
            .from::<WorkflowRuns>()
            .eq("id", run_id)
            .update(&WorkflowRunUpdate::status(status))
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Open suspensions for a run, oldest first.
    pub async fn unresolved_suspensions_for_run(
        &self,
        run_id: Uuid,
    ) -> Result<Vec<WorkflowSuspension>, DatabaseError> {
        self.from::<WorkflowSuspensions>()
            .eq("run_id", run_id)
            .eq("resolved", false)
            .order("created_at", true)
            .fetch()
            .await
    }
}
