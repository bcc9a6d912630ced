use clap::Parser;
use price_jobs::config::Args;
use price_jobs::{ConsoleProvider, Coordinator, TaxIncludedPriceJob};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    args.validate()?;

    let console = args.console.then(ConsoleProvider::stdio);
    if console.is_none() {
        tokio::fs::create_dir_all(&args.output_dir).await?;
    }

    let jobs = args
        .rates
        .iter()
        .map(|&rate| TaxIncludedPriceJob::new(args.provider_for(rate, console.as_ref()), rate));

    let report = Coordinator::new(jobs)
        .run(|completion| match &completion.outcome {
            Ok(()) => println!("Finished {}", completion.name),
            Err(e) => println!("{}: {e}", completion.name),
        })
        .await;

    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        lost = report.lost.len(),
        "all jobs reported"
    );
    Ok(())
}
