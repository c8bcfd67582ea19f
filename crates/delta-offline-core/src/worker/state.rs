use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    #[default]
    Uninstalled,
    Installing,
    /// Installed and waiting for activation
    Installed,
    Activating,
    Active,
}

impl WorkerState {
    /// An install left `Installing` by a dropped future may be retried,
    /// and re-running a finished install is harmless.
    pub fn can_install(self) -> bool {
        matches!(
            self,
            WorkerState::Uninstalled | WorkerState::Installing | WorkerState::Installed
        )
    }

    pub fn can_activate(self) -> bool {
        matches!(self, WorkerState::Installed | WorkerState::Activating)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkerState::Uninstalled => "uninstalled",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Active => "active",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
