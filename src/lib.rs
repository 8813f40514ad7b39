pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod publish;
pub mod sink;

pub use config::Config;
pub use error::{FetchError, PipelineError, SendError, TableParseError};

#[cfg(test)]
pub(crate) mod test_support;
