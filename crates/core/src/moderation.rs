//! Pending-item moderation states and transition rules.
//!
//! A pending item starts as `pending` and is decided exactly once: the
//! collection creator either accepts it (materializing a real item) or
//! refuses it. Both decisions are terminal.

use crate::error::CoreError;

/// Client-facing message when accepting or refusing an already-decided item.
pub const ALREADY_DECIDED: &str = "This item has already been validated or refused";

/// Lifecycle state of a proposed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingItemStatus {
    Pending,
    Accepted,
    Refused,
}

impl PendingItemStatus {
    /// Database representation (the `pending_items.status` column).
    pub fn as_str(self) -> &'static str {
        match self {
            PendingItemStatus::Pending => "pending",
            PendingItemStatus::Accepted => "accepted",
            PendingItemStatus::Refused => "refused",
        }
    }

    /// Parse the database representation. An unknown value can only come
    /// from a broken migration, so it maps to an internal error.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "pending" => Ok(PendingItemStatus::Pending),
            "accepted" => Ok(PendingItemStatus::Accepted),
            "refused" => Ok(PendingItemStatus::Refused),
            other => Err(CoreError::Internal(format!(
                "Unknown pending item status '{other}'"
            ))),
        }
    }

    /// Whether a moderation decision can still be made.
    pub fn is_pending(self) -> bool {
        self == PendingItemStatus::Pending
    }
}

impl std::fmt::Display for PendingItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precondition for the accept/refuse transition: only a `pending` item may
/// be decided. Decided items fail with [`ALREADY_DECIDED`], which the API
/// layer surfaces as a 400 (the payload is well-formed; the state forbids
/// the operation).
pub fn ensure_pending(status: PendingItemStatus) -> Result<(), CoreError> {
    if status.is_pending() {
        Ok(())
    } else {
        Err(CoreError::Validation(ALREADY_DECIDED.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
