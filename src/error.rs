use thiserror::Error;

/// Unified error type for git-describe-semver operations
#[derive(Error, Debug)]
pub enum DescribeError {
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(#[source] git2::Error),

    #[error("Commit graph traversal failed: {0}")]
    GraphTraversal(#[source] git2::Error),

    #[error("Version parsing error: {0}")]
    VersionParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-describe-semver
pub type Result<T> = std::result::Result<T, DescribeError>;

impl DescribeError {
    /// Create a version parse error with context
    pub fn version_parse(msg: impl Into<String>) -> Self {
        DescribeError::VersionParse(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DescribeError::Config(msg.into())
    }

    /// Wrap a git error raised while resolving the repository or its HEAD
    pub fn repository(err: git2::Error) -> Self {
        DescribeError::RepositoryUnavailable(err)
    }

    /// Wrap a git error raised while reading commits or tags
    pub fn traversal(err: git2::Error) -> Self {
        DescribeError::GraphTraversal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = DescribeError::version_parse("unable to parse tag");
        assert_eq!(err.to_string(), "Version parsing error: unable to parse tag");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DescribeError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_git_errors_keep_source() {
        let err = DescribeError::repository(git2::Error::from_str("reference 'HEAD' not found"));
        assert!(err.to_string().starts_with("Repository unavailable"));
        assert!(err.source().is_some());

        let err = DescribeError::traversal(git2::Error::from_str("object not found"));
        assert!(err.to_string().contains("object not found"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (DescribeError::config("x"), "Configuration error"),
            (DescribeError::version_parse("x"), "Version parsing error"),
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
