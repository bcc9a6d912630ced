use std::path::PathBuf;
use thiserror::Error;

/// A textual price token that is not a valid decimal number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to convert string to float: {token:?} at position {position}")]
pub struct ConversionError {
    pub token: String,
    pub position: usize,
}

#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to open the file {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read file content from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create file {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to convert data to JSON for {path}: {source}")]
    EncodeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure of a price job. Leaf errors pass through untouched.
#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Io(#[from] IoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_error_keeps_leaf_message() {
        let leaf = ConversionError {
            token: "abc".into(),
            position: 2,
        };
        let msg = leaf.to_string();
        let err: JobError = leaf.into();
        assert_eq!(err.to_string(), msg);
        assert!(msg.starts_with("failed to convert string to float"));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = IoError::OpenFailed {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = JobError::from(err).to_string();
        assert!(msg.contains("failed to open the file"));
        assert!(msg.contains("missing.txt"));
    }
}
