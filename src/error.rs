use crate::models::SeatId;
use thiserror::Error;
use uuid::Uuid;

/// Ошибки движка рассадки.
///
/// `SeatUnavailable` и `HoldExpired` - штатные исходы конкуренции за места,
/// они отдаются пользователю как есть и не логируются как сбой.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("seats unavailable: {}", join_ids(.seat_ids))]
    SeatUnavailable { seat_ids: Vec<SeatId> },

    #[error("hold {hold_id} expired")]
    HoldExpired { hold_id: Uuid },

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound { resource, id: id.to_string() }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    /// Исход конкуренции за места, а не системная ошибка.
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::SeatUnavailable { .. } | Self::HoldExpired { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::SeatUnavailable { .. } => "seat_unavailable",
            Self::HoldExpired { .. } => "hold_expired",
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) => "storage_error",
        }
    }
}

fn join_ids(ids: &[SeatId]) -> String {
    ids.iter().map(SeatId::as_str).collect::<Vec<_>>().join(", ")
}

impl From<sqlx::Error> for EngineError {
    fn from(e: sqlx::Error) -> Self {
        EngineError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Storage(format!("serialization: {}", e))
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(e: validator::ValidationErrors) -> Self {
        EngineError::Validation(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contention_errors_are_flagged() {
        let unavailable = EngineError::SeatUnavailable {
            seat_ids: vec![SeatId::from_raw("z-A-1")],
        };
        assert!(unavailable.is_contention());
        assert!(EngineError::HoldExpired { hold_id: Uuid::new_v4() }.is_contention());
        assert!(!EngineError::validation("bad").is_contention());
        assert!(!EngineError::Storage("down".into()).is_contention());
    }

    #[test]
    fn unavailable_message_lists_seats() {
        let err = EngineError::SeatUnavailable {
            seat_ids: vec![SeatId::from_raw("z-A-2"), SeatId::from_raw("z-A-3")],
        };
        assert_eq!(err.to_string(), "seats unavailable: z-A-2, z-A-3");
    }
}
