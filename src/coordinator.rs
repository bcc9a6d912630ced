use std::collections::BTreeMap;
use std::fmt::Display;
use tokio::{sync::mpsc, task};

use crate::{MpSender, Run};

/// Position of a job in the order it was handed to the [Coordinator].
pub type JobId = usize;

/// The single outcome signalled by one job.
#[derive(Debug)]
pub struct Completion<R, E> {
    /// The job that signalled.
    pub job_id: JobId,

    /// The job's [Run::name] at launch.
    pub name: String,

    /// What the job's run returned.
    pub outcome: Result<R, E>,
}

/// Everything the coordinator observed, in arrival order.
#[derive(Debug)]
pub struct Report<R, E> {
    /// One entry per job that signalled.
    pub completions: Vec<Completion<R, E>>,

    /// Jobs whose task ended without signalling, e.g. because it panicked.
    pub lost: Vec<(JobId, String)>,
}

impl<R, E> Report<R, E> {
    /// Number of jobs that signalled success.
    pub fn succeeded(&self) -> usize {
        self.completions.iter().filter(|c| c.outcome.is_ok()).count()
    }

    /// Number of jobs that signalled an error.
    pub fn failed(&self) -> usize {
        self.completions.iter().filter(|c| c.outcome.is_err()).count()
    }
}

/// Launches a set of independent jobs at once and fans their outcomes back
/// in over a single channel.
pub struct Coordinator<J> {
    jobs: Vec<J>,
}

impl<J> Coordinator<J>
where
    J: Run + Send + 'static,
    J::Response: Send + 'static,
    J::Error: Display + Send + 'static,
{
    /// Returns a coordinator for the given jobs. Each job's [JobId] is its
    /// position in `jobs`.
    pub fn new(jobs: impl IntoIterator<Item = J>) -> Self {
        Self {
            jobs: jobs.into_iter().collect(),
        }
    }

    /// Returns true if there is nothing to launch.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Spawns every job, then waits for all of them. `observe` is called for
    /// each completion as it arrives, whatever order the jobs finish in.
    pub async fn run<F>(self, mut observe: F) -> Report<J::Response, J::Error>
    where
        F: FnMut(&Completion<J::Response, J::Error>),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pending = BTreeMap::new();

        for (job_id, mut job) in self.jobs.into_iter().enumerate() {
            let name = job.name();
            tracing::debug!(job_id, job = %name, "launching job");
            pending.insert(job_id, name);

            let tx = tx.clone();
            task::spawn(async move {
                let outcome = job.run().await;
                signal(tx, (job_id, outcome)).await;
            });
        }
        // Only the job tasks hold senders now, so the channel closes once
        // every one of them has finished.
        drop(tx);

        let mut completions = Vec::with_capacity(pending.len());
        while let Some((job_id, outcome)) = rx.recv().await {
            let name = pending.remove(&job_id).unwrap_or_default();
            match &outcome {
                Ok(_) => tracing::info!(job_id, job = %name, "job completed"),
                Err(e) => tracing::error!(job_id, job = %name, error = %e, "job failed"),
            }

            let completion = Completion {
                job_id,
                name,
                outcome,
            };
            observe(&completion);
            completions.push(completion);
        }

        let lost: Vec<_> = pending.into_iter().collect();
        for (job_id, name) in &lost {
            tracing::error!(job_id, job = %name, "job ended without signalling");
        }

        Report { completions, lost }
    }
}

/// Sends a job's single outcome and releases its sender.
async fn signal<S>(tx: S, msg: S::Message)
where
    S: MpSender,
{
    if tx.send(msg).await.is_err() {
        tracing::warn!("coordinator stopped listening before job signalled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::prices::tests::MemoryProvider;
    use crate::prices::TaxIncludedPriceJob;
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    struct SleepJob {
        name: &'static str,
        delay: Duration,
        panic: bool,
    }

    impl SleepJob {
        fn new(name: &'static str, millis: u64) -> Self {
            Self {
                name,
                delay: Duration::from_millis(millis),
                panic: false,
            }
        }
    }

    #[async_trait]
    impl Run for SleepJob {
        type Response = &'static str;
        type Error = String;

        fn name(&self) -> String {
            self.name.to_owned()
        }

        async fn run(&mut self) -> Result<&'static str, String> {
            tokio::time::sleep(self.delay).await;
            if self.panic {
                panic!("{} blew up", self.name);
            }
            Ok(self.name)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn one_failing_job_does_not_stop_the_others() {
        let jobs = [0.0, 0.07, 0.10, 0.15].into_iter().map(|rate| {
            let mut provider = MemoryProvider::with_lines(&["10", "20", "30"]);
            provider.fail_read = rate == 0.10;
            TaxIncludedPriceJob::new(provider, rate)
        });

        let mut seen = Vec::new();
        let report = Coordinator::new(jobs)
            .run(|c| seen.push(c.job_id))
            .await;

        assert_eq!(report.completions.len(), 4);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 1);
        assert!(report.lost.is_empty());

        let failed = report
            .completions
            .iter()
            .find(|c| c.outcome.is_err())
            .unwrap();
        assert_eq!(failed.job_id, 2);
        assert!(matches!(failed.outcome, Err(JobError::Io(_))));

        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn completions_arrive_in_finishing_order() {
        let jobs = vec![SleepJob::new("slow", 300), SleepJob::new("fast", 0)];
        let report = Coordinator::new(jobs).run(|_| {}).await;

        let order: Vec<_> = report.completions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["fast", "slow"]);
        assert_eq!(report.completions[0].job_id, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn jobs_run_concurrently() {
        let jobs: Vec<_> = (0..4).map(|_| SleepJob::new("nap", 200)).collect();
        let started = Instant::now();
        let report = Coordinator::new(jobs).run(|_| {}).await;

        assert_eq!(report.succeeded(), 4);
        assert!(started.elapsed() < Duration::from_millis(700));
    }

    #[tokio::test]
    async fn panicking_job_is_reported_lost() {
        let mut boom = SleepJob::new("boom", 0);
        boom.panic = true;
        let report = Coordinator::new(vec![SleepJob::new("ok", 0), boom])
            .run(|_| {})
            .await;

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.lost, vec![(1, "boom".to_owned())]);
    }

    #[tokio::test]
    async fn no_jobs_yield_empty_report() {
        let coordinator = Coordinator::<SleepJob>::new(Vec::new());
        assert!(coordinator.is_empty());
        let report = coordinator.run(|_| {}).await;
        assert!(report.completions.is_empty());
        assert!(report.lost.is_empty());
    }
}
