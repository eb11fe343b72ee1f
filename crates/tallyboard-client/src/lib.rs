pub mod analytics;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod invalidation;
pub mod records;

pub use commands::common::BundleOptions;
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
