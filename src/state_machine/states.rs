use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the calling side of a batch job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    /// No job has been started, or the last one was cancelled
    Idle,
    /// A step is about to run or is running
    Running,
    /// The last step reported more pages; the next step is scheduled
    Continuing,
    /// The job finished, either on its final page or because data ran out
    Completed,
    /// The last step surfaced an error; the caller decides to retry or abandon
    Failed,
}

impl ProgressState {
    /// Check if a job is mid-walk
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Continuing)
    }

    /// States from which a new job may be started
    pub fn accepts_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Completed | Self::Failed)
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Continuing => write!(f, "continuing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ProgressState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "continuing" => Ok(Self::Continuing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid progress state: {s}")),
        }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::Idle
    }
}
