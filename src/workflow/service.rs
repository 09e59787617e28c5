// plainci-rs: Check-in and Build Workflow Client
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Owner of the live build configuration.
//!
//! Readers get clones; writers go through `update_*`. A run only ever sees
//! the snapshot taken in [`BuildService::execute`], and at most one run is
//! in flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::{BuildWorkflow, WorkflowRun};
use crate::config::Config;
use crate::config::tools::ToolsLayout;
use crate::config::types::{BuildDefinition, BuildRequest};
use crate::error::{CiResult, WorkflowError};
use crate::progress::Progress;

/// Shared build configuration plus the single-run gate.
#[derive(Debug)]
pub struct BuildService {
    tools: ToolsLayout,
    definition: RwLock<BuildDefinition>,
    request: RwLock<BuildRequest>,
    running: Arc<AtomicBool>,
}

impl BuildService {
    pub fn new(tools: ToolsLayout, definition: BuildDefinition, request: BuildRequest) -> Self {
        Self {
            tools,
            definition: RwLock::new(definition),
            request: RwLock::new(request),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Builds the service from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InstallDir` if the tools home cannot be
    /// resolved.
    pub fn from_config(config: &Config) -> CiResult<Self> {
        let tools = ToolsLayout::resolve(&config.tools)?;
        Ok(Self::new(
            tools,
            config.definition.clone(),
            config.request.clone(),
        ))
    }

    #[must_use]
    pub const fn tools(&self) -> &ToolsLayout {
        &self.tools
    }

    /// Returns a copy of the current build definition.
    #[must_use]
    pub fn definition(&self) -> BuildDefinition {
        self.definition
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a copy of the current build request.
    #[must_use]
    pub fn request(&self) -> BuildRequest {
        self.request
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Edits the live build definition.
    pub fn update_definition(&self, f: impl FnOnce(&mut BuildDefinition)) {
        let mut definition = self
            .definition
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut definition);
        debug!(root = ?definition.repository_root, "build definition updated");
    }

    /// Edits the live build request.
    pub fn update_request(&self, f: impl FnOnce(&mut BuildRequest)) {
        let mut request = self.request.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut request);
        debug!(target = %request.target, "build request updated");
    }

    /// Returns true while a run started by this service is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Snapshots the live configuration and starts a workflow run.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::AlreadyRunning` if a previous run has not
    /// finished yet.
    pub fn execute(&self, progress: Arc<dyn Progress>) -> Result<WorkflowRun, WorkflowError> {
        let guard = RunGuard::acquire(&self.running)?;
        let workflow = BuildWorkflow::snapshot(&self.tools, &self.definition(), &self.request());
        Ok(workflow.start(progress, guard))
    }
}

/// Clears the running flag when dropped.
struct RunGuard(Arc<AtomicBool>);

impl RunGuard {
    fn acquire(running: &Arc<AtomicBool>) -> Result<Self, WorkflowError> {
        if running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("workflow already running, request rejected");
            return Err(WorkflowError::AlreadyRunning);
        }
        Ok(Self(Arc::clone(running)))
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
