use clap::Parser;
use either::Either;
use std::path::PathBuf;
use std::time::Duration;

use crate::{ConsoleProvider, FileProvider};

/// Computes tax-included prices for several tax rates at once.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// File holding one price per line.
    #[arg(long, default_value = "prices.txt")]
    pub input: PathBuf,

    /// Directory receiving one result file per tax rate.
    #[arg(long, default_value = "results")]
    pub output_dir: PathBuf,

    /// Tax rates to compute, one job each.
    #[arg(long, value_delimiter = ',', default_value = "0,0.07,0.1,0.15")]
    pub rates: Vec<f64>,

    /// Prompt for prices and print results instead of using files.
    #[arg(long)]
    pub console: bool,

    /// Pause before each result file is encoded, in milliseconds.
    #[arg(long, default_value_t = 3000)]
    pub write_delay_ms: u64,
}

impl Args {
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }

    pub fn output_path(&self, tax_rate: f64) -> PathBuf {
        self.output_dir.join(output_file_name(tax_rate))
    }

    /// Picks the provider for the job computing `tax_rate`: a labelled clone
    /// of `console` when given, otherwise files under `output_dir`.
    pub fn provider_for(
        &self,
        tax_rate: f64,
        console: Option<&ConsoleProvider>,
    ) -> Either<FileProvider, ConsoleProvider> {
        match console {
            Some(console) => {
                Either::Right(console.clone().with_label(format!("tax rate {tax_rate}")))
            }
            None => Either::Left(
                FileProvider::new(&self.input, self.output_path(tax_rate))
                    .with_write_delay(self.write_delay()),
            ),
        }
    }

    /// Rejects rate sets that would make two jobs race on one file.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(rate) = self.rates.iter().find(|r| !r.is_finite()) {
            anyhow::bail!("tax rate {rate} is not a finite number");
        }
        let mut names: Vec<_> = self.rates.iter().map(|r| output_file_name(*r)).collect();
        names.sort();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            anyhow::bail!("several tax rates would write to {}", pair[0]);
        }
        Ok(())
    }
}

/// Result file name for a tax rate, tagged with the rate as a whole percent.
pub fn output_file_name(tax_rate: f64) -> String {
    format!("result_{:.0}.json", tax_rate * 100.0)
}
