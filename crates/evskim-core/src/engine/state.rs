use super::error::EngineError;
use crate::core::histogram::Histogram;
use std::fmt;
use std::path::PathBuf;

/// The input files of one group, concatenated into a single event sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputGroup {
    pub label: String,
    pub files: Vec<PathBuf>,
}

impl InputGroup {
    pub fn new(label: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            label: label.into(),
            files,
        }
    }
}

/// Where the driver is in the lifecycle of the current output unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Scanning { group: String, output: PathBuf },
    SkippedExisting { output: PathBuf },
    Processing { group: String, output: PathBuf },
    Finalizing { output: PathBuf },
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Idle => write!(f, "idle"),
            DriverState::Scanning { group, .. } => write!(f, "scanning '{}'", group),
            DriverState::SkippedExisting { output } => {
                write!(f, "skipped existing {}", output.display())
            }
            DriverState::Processing { group, .. } => write!(f, "processing '{}'", group),
            DriverState::Finalizing { output } => write!(f, "finalizing {}", output.display()),
        }
    }
}

/// Result of a completed output unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    pub output: PathBuf,
    pub events_read: u64,
    pub events_accepted: u64,
    pub histogram: Option<Histogram>,
}

#[derive(Debug)]
pub enum GroupOutcome {
    Skipped { output: PathBuf },
    Completed(UnitSummary),
    Failed { output: PathBuf, error: EngineError },
}

impl GroupOutcome {
    pub fn output(&self) -> &PathBuf {
        match self {
            GroupOutcome::Skipped { output } | GroupOutcome::Failed { output, .. } => output,
            GroupOutcome::Completed(summary) => &summary.output,
        }
    }
}

/// Outcomes of a run, one per input group in processing order.
#[derive(Debug, Default)]
pub struct SkimReport {
    pub outcomes: Vec<GroupOutcome>,
}

impl SkimReport {
    pub fn completed(&self) -> impl Iterator<Item = &UnitSummary> {
        self.outcomes.iter().filter_map(|o| match o {
            GroupOutcome::Completed(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, GroupOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, GroupOutcome::Failed { .. }))
            .count()
    }

    pub fn events_read(&self) -> u64 {
        self.completed().map(|s| s.events_read).sum()
    }

    pub fn events_accepted(&self) -> u64 {
        self.completed().map(|s| s.events_accepted).sum()
    }
}
