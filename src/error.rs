use thiserror::Error;

/// Unified error type for gowork-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version '{0}': expected vX.Y.Z or vX.Y.Z-<pre-release>")]
    InvalidVersion(String),

    #[error("Tag already exists: {}", .0.join(", "))]
    TagCollision(Vec<String>),

    #[error("Workspace manifest error: {0}")]
    Manifest(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Release publishing failed: {0}")]
    Publish(String),

    #[error("Test command '{command}' failed with exit code {code}")]
    TestFailed { command: String, code: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gowork-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create a publish error with context
    pub fn publish(msg: impl Into<String>) -> Self {
        ReleaseError::Publish(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_version_mentions_input() {
        let err = ReleaseError::InvalidVersion("1.2.3".to_string());
        assert!(err.to_string().contains("'1.2.3'"));
    }

    #[test]
    fn test_tag_collision_lists_every_tag() {
        let err = ReleaseError::TagCollision(vec![
            "v1.0.0".to_string(),
            "extra/sql/v1.0.0".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Tag already exists: v1.0.0, extra/sql/v1.0.0"
        );
    }

    #[test]
    fn test_test_failed_display() {
        let err = ReleaseError::TestFailed {
            command: "make ci".to_string(),
            code: 2,
        };
        assert_eq!(
            err.to_string(),
            "Test command 'make ci' failed with exit code 2"
        );
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::manifest("x"), "Workspace manifest error"),
            (ReleaseError::tag("x"), "Tag error"),
            (ReleaseError::remote("x"), "Remote operation failed"),
            (ReleaseError::publish("x"), "Release publishing failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
