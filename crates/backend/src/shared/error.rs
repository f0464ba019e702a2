use sea_orm::DbErr;
use thiserror::Error;

/// Error returned by domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Form problems the user can fix, one message per rule
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Messages safe to show to the user
    pub fn messages(&self) -> Vec<String> {
        match self {
            ServiceError::Validation(messages) => messages.clone(),
            ServiceError::NotFound(message) => vec![message.clone()],
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                vec!["Internal server error".to_string()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_details_hidden() {
        let err = ServiceError::Database(DbErr::Custom("disk I/O error".into()));
        assert_eq!(err.messages(), vec!["Internal server error"]);
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = ServiceError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "a; b");
        assert_eq!(err.messages().len(), 2);
    }
}
