mod channel;
pub mod config;
pub mod console_provider;
mod conversion;
pub mod coordinator;
pub mod error;
pub mod file_provider;
mod io_provider;
mod job;
pub mod prices;

pub use channel::MpSender;
pub use console_provider::ConsoleProvider;
pub use conversion::strings_to_floats;
pub use coordinator::{Completion, Coordinator, JobId, Report};
pub use error::{ConversionError, IoError, JobError};
pub use file_provider::FileProvider;
pub use io_provider::IoProvider;
pub use job::Run;
pub use prices::{JobState, TaxIncludedPriceJob};
