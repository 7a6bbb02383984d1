//! The triage state machine shared by alerts and policy violations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Abstract triage phase of an alert or policy violation.
///
/// Each entity keeps its own wire vocabulary and maps onto these phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Newly raised, nobody has looked at it yet.
    Open,

    /// Someone has taken ownership.
    Acknowledged,

    /// Fixed.
    Resolved,

    /// Closed without a fix.
    Dismissed,
}

impl Phase {
    /// Returns `true` for phases with no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Resolved | Phase::Dismissed)
    }

    /// Returns the phase reached by `transition`, or `None` when the move is
    /// not allowed from here.
    ///
    /// Allowed: open → {acknowledged, resolved, dismissed};
    /// acknowledged → {resolved, dismissed}.
    pub fn next(self, transition: Transition) -> Option<Phase> {
        match (self, transition) {
            (Phase::Open, Transition::Acknowledge) => Some(Phase::Acknowledged),
            (Phase::Open | Phase::Acknowledged, Transition::Resolve) => Some(Phase::Resolved),
            (Phase::Open | Phase::Acknowledged, Transition::Dismiss) => Some(Phase::Dismissed),
            _ => None,
        }
    }
}

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Take ownership
    Acknowledge,
    /// Mark fixed
    Resolve,
    /// Close without a fix
    Dismiss,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Acknowledge => write!(f, "acknowledge"),
            Transition::Resolve => write!(f, "resolve"),
            Transition::Dismiss => write!(f, "dismiss"),
        }
    }
}

impl FromStr for Transition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acknowledge" | "ack" => Ok(Transition::Acknowledge),
            "resolve" => Ok(Transition::Resolve),
            "dismiss" | "close" => Ok(Transition::Dismiss),
            other => Err(Error::validation(format!(
                "Unknown transition '{other}' (expected acknowledge, resolve or dismiss)"
            ))),
        }
    }
}
