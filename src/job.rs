use async_trait::async_trait;

/// A job that can run asynchronously to completion.
#[async_trait]
pub trait Run {
    /// The type of output response from the job.
    type Response;

    /// The type of error that can occur when executing the work of the job.
    type Error;

    /// A short human-readable description of the job, used when reporting
    /// its outcome.
    fn name(&self) -> String;

    /// Runs the job.
    async fn run(&mut self) -> Result<Self::Response, Self::Error>;
}
