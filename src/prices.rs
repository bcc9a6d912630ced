use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::conversion::strings_to_floats;
use crate::error::JobError;
use crate::io_provider::IoProvider;
use crate::job::Run;

/// Where a [TaxIncludedPriceJob] is in its read, compute, write pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Reading,
    Computing,
    Writing,
    Completed,
    Failed,
}

/// Computes tax-included prices for a single tax rate.
///
/// The job reads raw prices through its [IoProvider], multiplies each by
/// `1 + tax_rate` and hands itself back to the provider to be written. Only
/// `tax_rate`, `input_prices` and `tax_included_prices` are serialized.
#[derive(Debug, Serialize)]
pub struct TaxIncludedPriceJob<P> {
    tax_rate: f64,
    input_prices: Vec<f64>,
    tax_included_prices: BTreeMap<String, String>,
    #[serde(skip)]
    io_provider: P,
    #[serde(skip)]
    state: JobState,
}

impl<P> TaxIncludedPriceJob<P>
where
    P: IoProvider,
{
    pub fn new(io_provider: P, tax_rate: f64) -> Self {
        Self {
            tax_rate,
            input_prices: vec![10.0, 20.0, 30.0],
            tax_included_prices: BTreeMap::new(),
            io_provider,
            state: JobState::Created,
        }
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn input_prices(&self) -> &[f64] {
        &self.input_prices
    }

    pub fn tax_included_prices(&self) -> &BTreeMap<String, String> {
        &self.tax_included_prices
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Loads and converts the input prices. On failure `input_prices` is left
    /// untouched.
    pub async fn read_data(&mut self) -> Result<(), JobError> {
        let lines = self.io_provider.read_lines().await?;
        self.input_prices = strings_to_floats(&lines)?;
        Ok(())
    }

    /// Runs the whole pipeline once.
    pub async fn process(&mut self) -> Result<(), JobError> {
        let rslt = self.drive().await;
        self.state = match rslt {
            Ok(()) => JobState::Completed,
            Err(_) => JobState::Failed,
        };
        rslt
    }

    async fn drive(&mut self) -> Result<(), JobError> {
        self.enter(JobState::Reading);
        self.read_data().await?;

        self.enter(JobState::Computing);
        self.tax_included_prices = tax_included_prices(&self.input_prices, self.tax_rate);

        self.enter(JobState::Writing);
        self.io_provider.write_result(&*self).await?;
        Ok(())
    }

    fn enter(&mut self, state: JobState) {
        tracing::debug!(tax_rate = self.tax_rate, from = ?self.state, to = ?state, "job transition");
        self.state = state;
    }
}

/// Maps each price, rendered with one decimal, to its tax-included value
/// rendered with two. Prices that render to the same key keep the last value.
pub fn tax_included_prices(prices: &[f64], tax_rate: f64) -> BTreeMap<String, String> {
    prices
        .iter()
        .map(|price| {
            let with_tax = price * (1.0 + tax_rate);
            (format!("{price:.1}"), format!("{with_tax:.2}"))
        })
        .collect()
}

#[async_trait]
impl<P> Run for TaxIncludedPriceJob<P>
where
    P: IoProvider,
{
    type Response = ();
    type Error = JobError;

    fn name(&self) -> String {
        format!(
            "tax rate {} -> {}",
            self.tax_rate,
            self.io_provider.destination()
        )
    }

    async fn run(&mut self) -> Result<(), JobError> {
        self.process().await
    }
}
