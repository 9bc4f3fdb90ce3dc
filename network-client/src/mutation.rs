/// Lifecycle of an optimistic change mirrored to the backend.
///
/// While `Pending`, further changes to the same entity are refused so at most
/// one request per entity and action is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Committed,
    /// The optimistic change was reverted; carries the user-facing reason.
    Failed(String),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            MutationStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

pub(crate) fn failure_reason(err: &crate::error::NetworkClientError, fallback: &str) -> String {
    err.detail().unwrap_or(fallback).to_string()
}
