use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::IoError;
use crate::io_provider::IoProvider;

/// Latency observed before a result file is encoded.
pub const DEFAULT_WRITE_DELAY: Duration = Duration::from_secs(3);

/// Reads prices line by line from one file and writes results as JSON to
/// another.
#[derive(Debug, Clone)]
pub struct FileProvider {
    input_path: PathBuf,
    output_path: PathBuf,
    write_delay: Duration,
}

impl FileProvider {
    /// Returns a provider reading `input_path` and writing `output_path`,
    /// pausing [DEFAULT_WRITE_DELAY] before each write.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            write_delay: DEFAULT_WRITE_DELAY,
        }
    }

    /// Sets the pause between creating the output file and encoding into it.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }
}

#[async_trait]
impl IoProvider for FileProvider {
    async fn read_lines(&self) -> Result<Vec<String>, IoError> {
        let file = File::open(&self.input_path)
            .await
            .map_err(|source| IoError::OpenFailed {
                path: self.input_path.clone(),
                source,
            })?;

        let mut reader = BufReader::new(file).lines();
        let mut lines = Vec::new();
        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|source| IoError::ReadFailed {
                path: self.input_path.clone(),
                source,
            })?
        {
            lines.push(line);
        }

        tracing::debug!(path = %self.input_path.display(), count = lines.len(), "read price lines");
        Ok(lines)
    }

    async fn write_result<T>(&self, data: &T) -> Result<(), IoError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let mut file = File::create(&self.output_path)
            .await
            .map_err(|source| IoError::CreateFailed {
                path: self.output_path.clone(),
                source,
            })?;

        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }

        let encode_failed = |source: serde_json::Error| IoError::EncodeFailed {
            path: self.output_path.clone(),
            source,
        };
        let mut buf = serde_json::to_vec(data).map_err(encode_failed)?;
        buf.push(b'\n');
        file.write_all(&buf)
            .await
            .map_err(|e| encode_failed(serde_json::Error::io(e)))?;
        file.flush()
            .await
            .map_err(|e| encode_failed(serde_json::Error::io(e)))?;

        tracing::debug!(path = %self.output_path.display(), bytes = buf.len(), "wrote result");
        Ok(())
    }

    fn destination(&self) -> String {
        self.output_path.display().to_string()
    }
}
