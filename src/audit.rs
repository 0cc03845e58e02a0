//! Structured audit events for hook decisions.
//!
//! Emits `tracing` events with consistent field names so that log pipelines
//! can filter on `audit=true` and query by `hook`, `decision`, `category` and
//! `identity`.

use tracing::{info, warn};

/// Which hook made the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Add,
    Remove,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "on_device_add"),
            Self::Remove => write!(f, "on_device_remove"),
        }
    }
}

/// What the hook decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Device taken into the ledger.
    Accepted,
    /// Device dropped from the ledger.
    Released,
    /// Acceptance policy declined the device.
    Rejected,
    /// Payload failed validation.
    Invalid,
    /// Ledger precondition failed (duplicate add, remove of unowned).
    Conflict,
    /// Ledger could not be written.
    Failed,
}

impl Decision {
    /// Whether the decision ends the hook with a zero exit status.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted | Self::Released)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Released => write!(f, "released"),
            Self::Rejected => write!(f, "rejected"),
            Self::Invalid => write!(f, "invalid"),
            Self::Conflict => write!(f, "conflict"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Emit a structured audit event via `tracing`.
///
/// Successful decisions log at `info`, everything else at `warn`.
pub fn log_hook_decision(
    hook: HookKind,
    decision: Decision,
    category: Option<&str>,
    identity: Option<&str>,
    detail: &str,
) {
    let category = category.unwrap_or("-");
    let identity = identity.unwrap_or("-");
    if decision.is_success() {
        info!(
            audit = true,
            hook = %hook,
            decision = %decision,
            category = category,
            identity = identity,
            detail = detail,
            "hook decision"
        );
    } else {
        warn!(
            audit = true,
            hook = %hook,
            decision = %decision,
            category = category,
            identity = identity,
            detail = detail,
            "hook decision"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_kind_display() {
        assert_eq!(HookKind::Add.to_string(), "on_device_add");
        assert_eq!(HookKind::Remove.to_string(), "on_device_remove");
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(Decision::Accepted.to_string(), "accepted");
        assert_eq!(Decision::Released.to_string(), "released");
        assert_eq!(Decision::Rejected.to_string(), "rejected");
        assert_eq!(Decision::Invalid.to_string(), "invalid");
        assert_eq!(Decision::Conflict.to_string(), "conflict");
        assert_eq!(Decision::Failed.to_string(), "failed");
    }

    #[test]
    fn test_decision_is_success() {
        assert!(Decision::Accepted.is_success());
        assert!(Decision::Released.is_success());
        assert!(!Decision::Rejected.is_success());
        assert!(!Decision::Conflict.is_success());
    }

    #[test]
    fn test_log_hook_decision_does_not_panic() {
        log_hook_decision(
            HookKind::Add,
            Decision::Accepted,
            Some("serial"),
            Some("23410043ABC123"),
            "device owned",
        );
        log_hook_decision(HookKind::Remove, Decision::Invalid, None, None, "bad json");
    }
}
