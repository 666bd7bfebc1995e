/// Run phase definitions for tracking crawl progress
///
/// This module defines every phase a single crawl run can be in.
use serde::Serialize;
use std::fmt;

/// Represents the current phase of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    // ===== Active Phases =====
    /// Run has been created but the session has not been opened
    Ready,

    /// Pages are being crawled
    Running,

    // ===== Terminal Phases =====
    /// The frontier emptied before the page budget ran out
    Completed,

    /// The page budget ran out; unvisited frontier entries are reported
    BudgetExhausted,

    /// The run could not start or was abandoned
    Failed,
}

impl RunPhase {
    /// Returns true if this is a terminal phase
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ready | Self::Running)
    }

    /// Returns true if the run produced a report
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed | Self::BudgetExhausted)
    }

    /// Returns true if moving from this phase to `next` is allowed
    ///
    /// `Ready` may only start running or fail; `Running` may end in any terminal
    /// phase; terminal phases never change.
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        match self {
            Self::Ready => matches!(next, Self::Running | Self::Failed),
            Self::Running => next.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Failed => "failed",
        }
    }

    /// Parses a phase from its string representation
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "ready" => Some(Self::Ready),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "budget_exhausted" => Some(Self::BudgetExhausted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Ready,
            Self::Running,
            Self::Completed,
            Self::BudgetExhausted,
            Self::Failed,
        ]
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
