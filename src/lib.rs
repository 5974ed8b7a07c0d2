pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod normalization;
pub mod pipeline;
pub mod query;
pub mod sink;

pub use config::Config;
pub use error::LookupError;
pub use filter::{DenyList, filter_and_dedup};
pub use pipeline::{Command, CommandOutcome, LookupMetrics, Orchestrator, run_lookup};
