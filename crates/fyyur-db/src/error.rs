//! Persistence error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("show references missing {entity} {id}")]
    MissingReference { entity: &'static str, id: i32 },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub(crate) fn required(field: &'static str) -> Self {
        StoreError::Validation {
            field,
            reason: "this field is required".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_not_found() {
        let err = StoreError::NotFound {
            entity: "venue",
            id: 7,
        };
        assert_eq!(err.to_string(), "venue 7 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_validation() {
        let err = StoreError::required("name");
        assert_eq!(err.to_string(), "invalid name: this field is required");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_display_missing_reference() {
        let err = StoreError::MissingReference {
            entity: "artist",
            id: 3,
        };
        assert_eq!(err.to_string(), "show references missing artist 3");
    }

    #[test]
    fn test_from_db_error() {
        let db_err = sea_orm::DbErr::Custom("test db error".into());
        let err: StoreError = db_err.into();
        assert!(matches!(err, StoreError::Database(_)));
        assert!(err.to_string().contains("test db error"));
    }
}
