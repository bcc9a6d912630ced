use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::error::IoError;
use crate::io_provider::IoProvider;

/// Token that ends an interactive price session.
pub const SENTINEL: &str = "0";

const INTRO: &str = "Please enter your prices.  Confirm every price with ENTER.\n";
const PROMPT: &str = "Price: ";

pub type ConsoleReader = Box<dyn AsyncBufRead + Unpin + Send>;
pub type ConsoleWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Prompts a human for prices and displays results on a console.
///
/// Clones share the same reader and writer. A whole prompt session holds the
/// reader, so jobs running side by side in console mode ask for their prices
/// one after another.
#[derive(Clone)]
pub struct ConsoleProvider {
    input: Arc<Mutex<ConsoleReader>>,
    output: Arc<Mutex<ConsoleWriter>>,
    label: Option<String>,
}

impl ConsoleProvider {
    /// Returns a provider prompting on `writer` and reading from `reader`.
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        Self {
            input: Arc::new(Mutex::new(Box::new(reader))),
            output: Arc::new(Mutex::new(Box::new(writer))),
            label: None,
        }
    }

    /// Tags this provider's prompt session and destination, so clones serving
    /// different jobs can be told apart.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// A provider bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }

    async fn show(&self, text: &str) {
        let mut out = self.output.lock().await;
        let rslt = match out.write_all(text.as_bytes()).await {
            Ok(()) => out.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = rslt {
            tracing::warn!(error = %e, "failed to write to console");
        }
    }
}

#[async_trait]
impl IoProvider for ConsoleProvider {
    async fn read_lines(&self) -> Result<Vec<String>, IoError> {
        let mut input = self.input.lock().await;
        match &self.label {
            Some(label) => self.show(&format!("[{label}] {INTRO}")).await,
            None => self.show(INTRO).await,
        }

        let mut prices = Vec::new();
        let mut line = String::new();
        'session: loop {
            self.show(PROMPT).await;
            line.clear();
            let n = input
                .read_line(&mut line)
                .await
                .map_err(|source| IoError::ReadFailed {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            if n == 0 {
                tracing::debug!("console input closed before sentinel");
                break;
            }
            for token in line.split_whitespace() {
                if token == SENTINEL {
                    break 'session;
                }
                prices.push(token.to_owned());
            }
        }

        Ok(prices)
    }

    async fn write_result<T>(&self, data: &T) -> Result<(), IoError>
    where
        T: Serialize + Sync + ?Sized,
    {
        match serde_json::to_string_pretty(data) {
            Ok(mut text) => {
                text.push('\n');
                self.show(&text).await;
            }
            Err(e) => tracing::warn!(error = %e, "failed to render result"),
        }
        Ok(())
    }

    fn destination(&self) -> String {
        match &self.label {
            Some(label) => format!("console ({label})"),
            None => "console".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{duplex, AsyncReadExt};

    fn provider_with_input(input: &'static str) -> (ConsoleProvider, tokio::io::DuplexStream) {
        let (writer, display) = duplex(64 * 1024);
        (ConsoleProvider::new(input.as_bytes(), writer), display)
    }

    #[tokio::test]
    async fn stops_at_sentinel_and_excludes_it() {
        let (provider, _display) = provider_with_input("10.0\n20.0\n0\n30.0\n");
        assert_eq!(provider.read_lines().await.unwrap(), vec!["10.0", "20.0"]);
    }

    #[tokio::test]
    async fn several_tokens_on_one_line_count_separately() {
        let (provider, _display) = provider_with_input("1 2\n3 0 4\n");
        assert_eq!(provider.read_lines().await.unwrap(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn end_of_input_ends_session() {
        let (provider, _display) = provider_with_input("5\n\n6");
        assert_eq!(provider.read_lines().await.unwrap(), vec!["5", "6"]);
    }

    #[tokio::test]
    async fn zero_point_zero_is_not_the_sentinel() {
        let (provider, _display) = provider_with_input("0.0\n0\n");
        assert_eq!(provider.read_lines().await.unwrap(), vec!["0.0"]);
    }

    #[tokio::test]
    async fn prompts_and_renders_result() {
        let (provider, mut display) = provider_with_input("7\n0\n");
        provider.read_lines().await.unwrap();
        provider.write_result(&json!({"tax_rate": 0.1})).await.unwrap();
        assert_eq!(provider.destination(), "console");
        drop(provider);

        let mut shown = String::new();
        display.read_to_string(&mut shown).await.unwrap();
        assert!(shown.starts_with(INTRO));
        assert_eq!(shown.matches(PROMPT).count(), 2);
        assert!(shown.contains("\"tax_rate\": 0.1"));
    }

    #[tokio::test]
    async fn labelled_clone_announces_its_label() {
        let (provider, mut display) = provider_with_input("3
0
");
        let labelled = provider.clone().with_label("tax rate 0.07");
        assert_eq!(labelled.destination(), "console (tax rate 0.07)");
        assert_eq!(provider.destination(), "console");

        assert_eq!(labelled.read_lines().await.unwrap(), vec!["3"]);
        drop((provider, labelled));

        let mut shown = String::new();
        display.read_to_string(&mut shown).await.unwrap();
        assert!(shown.starts_with(&format!("[tax rate 0.07] {INTRO}")));
    }
}
