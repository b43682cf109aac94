use thiserror::Error;
use uuid::Uuid;

use crate::model::StoreError;

pub type ProgressResult<T> = std::result::Result<T, ProgressError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Progress,
    Lesson,
    Course,
    Quiz,
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("ResourceNotFound: {kind:?} {id}")]
    NotFound { kind: ResourceKind, id: Uuid },

    #[error("InvalidScore: {0} is outside 0..=100")]
    InvalidScore(i64),

    #[error("InvalidTimeSpent: {0}")]
    InvalidTimeSpent(i64),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ProgressError {
    pub fn not_found(kind: ResourceKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Checked before any mutation; a failed validation leaves no partial writes.
pub(crate) fn validate_score(score: i64) -> ProgressResult<u32> {
    if (0..=100).contains(&score) {
        Ok(score as u32)
    } else {
        Err(ProgressError::InvalidScore(score))
    }
}

pub(crate) fn validate_minutes(minutes: i64) -> ProgressResult<u32> {
    if minutes < 0 {
        return Err(ProgressError::InvalidTimeSpent(minutes));
    }
    u32::try_from(minutes).map_err(|_| ProgressError::InvalidTimeSpent(minutes))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn score_range_is_inclusive() {
        assert_eq!(validate_score(0).unwrap(), 0);
        assert_eq!(validate_score(100).unwrap(), 100);
        assert!(matches!(validate_score(101), Err(ProgressError::InvalidScore(101))));
        assert!(matches!(validate_score(-1), Err(ProgressError::InvalidScore(-1))));
    }

    #[test]
    fn negative_minutes_are_rejected() {
        assert!(matches!(
            validate_minutes(-5),
            Err(ProgressError::InvalidTimeSpent(-5))
        ));
        assert_eq!(validate_minutes(0).unwrap(), 0);
    }
}
