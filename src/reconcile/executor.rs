// ABOUTME: Executes the head of a deployment's plan, one executor tick at a time.
// ABOUTME: Persists each step before moving on so a restart resumes where it stopped.

use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tracing::{Instrument, Span};

use super::actions::{Action, create_action};
use super::context::{ActionContext, Dependencies};
use super::error::{ActionError, ExecutorError};
use super::mutation::StatusMutation;
use crate::api::{ActionPhase, ActionRecord, ArangoDeployment};
use crate::config::ExecutorConfig;
use crate::store::{ResourceVersion, StoreError};

/// Drives the plan of one deployment.
///
/// Only one executor may run per deployment. The caller invokes
/// [`PlanExecutor::execute_plan`] repeatedly, requeueing when it returns
/// `true`.
pub struct PlanExecutor {
    deps: Dependencies,
    config: ExecutorConfig,
    deployment: ArangoDeployment,
    version: ResourceVersion,
}

impl PlanExecutor {
    /// Read the deployment from the store.
    pub async fn load(deps: Dependencies, config: ExecutorConfig) -> Result<Self, ExecutorError> {
        let current = deps.store.get().await.map_err(ExecutorError::Load)?;
        Ok(Self {
            deps,
            config,
            deployment: current.value,
            version: current.version,
        })
    }

    /// Deployment as of the last read or successful write.
    pub fn deployment(&self) -> &ArangoDeployment {
        &self.deployment
    }

    pub fn version(&self) -> ResourceVersion {
        self.version
    }

    /// Run one tick.
    ///
    /// Works through the plan until it is empty (`Ok(false)`) or the head
    /// action needs more time (`Ok(true)`, call again later). On error the
    /// plan is left as it was before the failing call.
    pub async fn execute_plan(&mut self) -> Result<bool, ExecutorError> {
        self.refresh().await?;

        loop {
            let Some(record) = self.deployment.status.plan.first().cloned() else {
                return Ok(false);
            };

            let span = tracing::debug_span!(
                "action",
                plan_len = self.deployment.status.plan.len(),
                action_id = %record.id,
                action_type = %record.action_type,
                group = record.group.as_role(),
                member_id = %record.member_id,
            );
            let action = create_action(&record, span.clone());

            let phase = record.phase();
            if phase == ActionPhase::Started && record.is_overdue(Utc::now()) {
                tracing::warn!(
                    parent: &span,
                    started = ?record.start_time,
                    "Action is taking longer than expected"
                );
            }

            let (ready, mut journal) = match self
                .run_step(phase, action.as_ref(), &span)
                .instrument(span.clone())
                .await
            {
                Ok(outcome) => outcome,
                Err(source) => {
                    tracing::debug!(parent: &span, error = %source, ?phase, "Action failed");
                    let action = Box::new(record);
                    return Err(match phase {
                        ActionPhase::Pending => ExecutorError::Start { action, source },
                        ActionPhase::Started => ExecutorError::CheckProgress { action, source },
                    });
                }
            };

            let step = match (ready, phase) {
                (true, _) => Some(StatusMutation::PopAction {
                    id: record.id.clone(),
                }),
                (false, ActionPhase::Pending) => Some(StatusMutation::StampStart {
                    id: record.id.clone(),
                    at: Utc::now(),
                }),
                (false, ActionPhase::Started) => None,
            };
            if let Some(step) = step {
                step.apply(&mut self.deployment.status);
                journal.push(step);
            }

            if !journal.is_empty() {
                self.persist(&record, &journal)
                    .instrument(span.clone())
                    .await?;
            }

            match phase {
                ActionPhase::Pending => {
                    tracing::debug!(parent: &span, ready, "Action Start completed")
                }
                ActionPhase::Started => {
                    tracing::debug!(parent: &span, ready, "Action CheckProgress completed")
                }
            }

            if !ready {
                return Ok(true);
            }
        }
    }

    /// Re-read the deployment; the plan may have been regenerated since
    /// the last tick.
    async fn refresh(&mut self) -> Result<(), ExecutorError> {
        let current = self.deps.store.get().await.map_err(ExecutorError::Load)?;
        self.deployment = current.value;
        self.version = current.version;
        Ok(())
    }

    /// Invoke Start or CheckProgress. On failure every status change the
    /// action made is rolled back.
    async fn run_step(
        &mut self,
        phase: ActionPhase,
        action: &dyn Action,
        span: &Span,
    ) -> Result<(bool, Vec<StatusMutation>), ActionError> {
        let snapshot = self.deployment.status.clone();
        let call_timeout = self.config.call_timeout;

        let mut ctx = ActionContext::new(&mut self.deployment, &self.deps, span.clone());
        let result = match phase {
            ActionPhase::Pending => bounded(call_timeout, action.start(&mut ctx)).await,
            ActionPhase::Started => bounded(call_timeout, action.check_progress(&mut ctx)).await,
        };
        let journal = ctx.into_journal();

        match result {
            Ok(ready) => Ok((ready, journal)),
            Err(e) => {
                self.deployment.status = snapshot;
                Err(e)
            }
        }
    }

    /// Write the status, replaying `journal` on a fresh read whenever the
    /// stored version moved underneath us.
    async fn persist(
        &mut self,
        record: &ActionRecord,
        journal: &[StatusMutation],
    ) -> Result<(), ExecutorError> {
        let persist_error = |source: StoreError| ExecutorError::Persist {
            action: Box::new(record.clone()),
            source,
        };

        let mut conflicts = 0u32;
        loop {
            match self
                .deps
                .store
                .update_status(&self.deployment.status, self.version)
                .await
            {
                Ok(version) => {
                    self.version = version;
                    return Ok(());
                }
                Err(e) if e.is_conflict() && conflicts < self.config.conflict_retries => {
                    conflicts += 1;
                    tracing::warn!(conflicts, "Status update conflicted, reapplying changes");
                    let current = self.deps.store.get().await.map_err(persist_error)?;
                    let mut deployment = current.value;
                    for mutation in journal {
                        mutation.apply(&mut deployment.status);
                    }
                    self.deployment = deployment;
                    self.version = current.version;
                }
                Err(e) => return Err(persist_error(e)),
            }
        }
    }
}

async fn bounded<F>(timeout: Duration, call: F) -> Result<bool, ActionError>
where
    F: Future<Output = Result<bool, ActionError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(ActionError::DeadlineExceeded(timeout)))
}
