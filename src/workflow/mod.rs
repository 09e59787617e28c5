// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build workflow orchestration.
//!
//! ```text
//! BuildService (live definition/request, RwLock)
//!   execute(progress)
//!     running? --> WorkflowError::AlreadyRunning
//!     BuildWorkflow::snapshot(tools, definition, request)   (deep copies)
//!       execute(progress) --> tokio::spawn("Workflow")
//!         try_activity (catch_unwind)
//!           Ok(true)  --> "WORKFLOW SUCCEEDED"
//!           Ok(false) --> "WORKFLOW FAILED"
//!           Err(e)    --> "ERROR: {e:#}", "WORKFLOW FAILED"
//!           panic     --> "ERROR: activity 'Workflow' panicked: ..", "WORKFLOW FAILED"
//!         drop(guard)
//!       --> WorkflowRun::wait() -> bool   (optional)
//! ```
//!
//! The banner is always the last line reported for a run, whether or not
//! anyone waits on it. Errors inside the activity never reach the caller;
//! only the boolean does.

mod service;


pub use service::BuildService;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::tools::ToolsLayout;
use crate::config::types::{BuildDefinition, BuildRequest};
use crate::error::{Result, WorkflowError};
use crate::progress::Progress;
use crate::script::{FakeInterpreter, ScriptExecutor};

/// Name of the single workflow activity.
pub const ACTIVITY: &str = "Workflow";

/// A frozen copy of everything one workflow run needs.
#[derive(Debug, Clone)]
pub struct BuildWorkflow {
    tools: ToolsLayout,
    definition: BuildDefinition,
    request: BuildRequest,
}

impl BuildWorkflow {
    /// Deep-copies the inputs. Later edits to the originals are not seen.
    #[must_use]
    pub fn snapshot(
        tools: &ToolsLayout,
        definition: &BuildDefinition,
        request: &BuildRequest,
    ) -> Self {
        Self {
            tools: tools.clone(),
            definition: definition.clone(),
            request: request.clone(),
        }
    }

    #[must_use]
    pub const fn definition(&self) -> &BuildDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn request(&self) -> &BuildRequest {
        &self.request
    }

    /// Workflow script this run will execute.
    #[must_use]
    pub fn script(&self) -> PathBuf {
        self.tools.workflow_script_path()
    }

    /// Starts the run on a background task and returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn execute(self, progress: Arc<dyn Progress>) -> WorkflowRun {
        self.start(progress, ())
    }

    /// Like [`execute`](Self::execute), holding `guard` until the banner
    /// has been reported.
    pub(crate) fn start<G>(self, progress: Arc<dyn Progress>, guard: G) -> WorkflowRun
    where
        G: Send + 'static,
    {
        spawn_activity(
            ACTIVITY,
            move |progress| async move { self.run(progress.as_ref()).await },
            progress,
            guard,
        )
    }

    async fn run(&self, progress: &dyn Progress) -> Result<bool> {
        let script = self.script();
        info!(
            script = %script.display(),
            target = %self.request.target,
            configuration = %self.definition.configuration,
            "starting workflow"
        );

        let mut executor = ScriptExecutor::new(FakeInterpreter::from_layout(&self.tools));
        if let Some(root) = self.definition.valid_repository_root() {
            executor = executor.with_working_dir(root);
        }
        executor
            .execute(
                &script,
                &self.request.target,
                &self.definition.common_properties(),
                &self.request.arguments,
                progress,
            )
            .await
    }
}

/// Handle to a running workflow activity.
pub struct WorkflowRun {
    activity: &'static str,
    handle: JoinHandle<bool>,
    progress: Arc<dyn Progress>,
}

impl std::fmt::Debug for WorkflowRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRun")
            .field("activity", &self.activity)
            .field("finished", &self.handle.is_finished())
            .finish_non_exhaustive()
    }
}

impl WorkflowRun {
    #[must_use]
    pub const fn activity(&self) -> &'static str {
        self.activity
    }

    /// Returns true once the activity has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the outcome.
    ///
    /// The activity reports its own lines, so waiting is optional. Only a
    /// task that was cancelled, or panicked outside the activity, is
    /// reported here.
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(success) => success,
            Err(e) => {
                let message = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    e.to_string()
                };
                let err = WorkflowError::TaskPanicked {
                    activity: self.activity.to_string(),
                    message,
                };
                error!(error = %err, "workflow task failed");
                self.progress.report(format!("ERROR: {err}"));
                self.progress.report(banner(self.activity, false));
                false
            }
        }
    }
}

/// Spawns `action` as a guarded activity.
pub(crate) fn spawn_activity<A, Fut, G>(
    activity: &'static str,
    action: A,
    progress: Arc<dyn Progress>,
    guard: G,
) -> WorkflowRun
where
    A: FnOnce(Arc<dyn Progress>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
    G: Send + 'static,
{
    let task_progress = Arc::clone(&progress);
    let handle = tokio::spawn(async move {
        let action_progress = Arc::clone(&task_progress);
        // Calling `action` inside the future puts a synchronous panic under
        // the same unwind guard.
        let success = try_activity(
            activity,
            async move { action(action_progress).await },
            task_progress.as_ref(),
        )
        .await;
        drop(guard);
        success
    });
    WorkflowRun {
        activity,
        handle,
        progress,
    }
}

/// Runs `action` and reports its outcome banner.
///
/// An error is reported as `ERROR: <message chain>` followed by the failure
/// banner and counts as a failed outcome. A panic is caught and reported
/// the same way as `WorkflowError::TaskPanicked`.
pub async fn try_activity<F>(activity: &str, action: F, progress: &dyn Progress) -> bool
where
    F: Future<Output = Result<bool>>,
{
    let outcome = AssertUnwindSafe(action)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            Err(WorkflowError::TaskPanicked {
                activity: activity.to_string(),
                message: panic_message(payload),
            }
            .into())
        });

    match outcome {
        Ok(success) => {
            info!(activity, success, "activity finished");
            progress.report(banner(activity, success));
            success
        }
        Err(e) => {
            error!(activity, error = %format!("{e:#}"), "activity failed");
            progress.report(format!("ERROR: {e:#}"));
            progress.report(banner(activity, false));
            false
        }
    }
}

/// `"<ACTIVITY> SUCCEEDED"` or `"<ACTIVITY> FAILED"`.
#[must_use]
pub fn banner(activity: &str, success: bool) -> String {
    let outcome = if success { "SUCCEEDED" } else { "FAILED" };
    format!("{} {outcome}", activity.to_uppercase())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
