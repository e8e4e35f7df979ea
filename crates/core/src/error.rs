use crate::types::DbId;

/// Domain failure, independent of transport.
///
/// The not-found variants render as the message clients see.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by a natural key (username, slug) rather than a numeric id.
    #[error("{entity} '{key}' not found")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_entity() {
        let by_id = CoreError::NotFound {
            entity: "Review",
            id: 9,
        };
        assert_eq!(by_id.to_string(), "Review with id 9 not found");

        let by_key = CoreError::NotFoundByKey {
            entity: "User",
            key: "ghost".into(),
        };
        assert_eq!(by_key.to_string(), "User 'ghost' not found");
    }
}
