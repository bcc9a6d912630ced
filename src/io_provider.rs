use async_trait::async_trait;
use either::Either;
use serde::Serialize;

use crate::error::IoError;

/// A source of raw price lines and a sink for a job's final state.
#[async_trait]
pub trait IoProvider: Send + Sync {
    /// Produces the ordered raw price entries.
    async fn read_lines(&self) -> Result<Vec<String>, IoError>;

    /// Persists or displays `data`. Either fully succeeds or fully fails.
    async fn write_result<T>(&self, data: &T) -> Result<(), IoError>
    where
        T: Serialize + Sync + ?Sized;

    /// Where results end up, for reporting.
    fn destination(&self) -> String;
}

#[async_trait]
impl<L, R> IoProvider for Either<L, R>
where
    L: IoProvider,
    R: IoProvider,
{
    async fn read_lines(&self) -> Result<Vec<String>, IoError> {
        match self {
            Either::Left(l) => l.read_lines().await,
            Either::Right(r) => r.read_lines().await,
        }
    }

    async fn write_result<T>(&self, data: &T) -> Result<(), IoError>
    where
        T: Serialize + Sync + ?Sized,
    {
        match self {
            Either::Left(l) => l.write_result(data).await,
            Either::Right(r) => r.write_result(data).await,
        }
    }

    fn destination(&self) -> String {
        match self {
            Either::Left(l) => l.destination(),
            Either::Right(r) => r.destination(),
        }
    }
}
