// ABOUTME: Errors from orchestration platform operations.
// ABOUTME: Not-found is distinguished so deletes can be idempotent.

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("conflict updating {kind} {name}")]
    Conflict { kind: &'static str, name: String },

    #[error("platform error: {0}")]
    Api(String),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound { .. })
    }
}

/// Treat a not-found error as success (idempotent delete).
pub(crate) fn ignore_not_found(result: Result<(), PlatformError>) -> Result<(), PlatformError> {
    match result {
        Err(e) if e.is_not_found() => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_swallowed() {
        let err = PlatformError::NotFound {
            kind: "pod",
            name: "p".to_string(),
        };
        assert!(ignore_not_found(Err(err)).is_ok());
    }

    #[test]
    fn other_errors_propagate() {
        let err = PlatformError::Api("boom".to_string());
        assert!(ignore_not_found(Err(err)).is_err());
    }
}
