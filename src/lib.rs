pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{fixture::FixtureFilterSource, http::RestFilterSource, storage::LocalStorage};
pub use config::LookupConfig;
pub use core::{lookup::FilterLookup, report::OutputFormat};
pub use domain::model::{ContaminantId, LookupReport, WaterFilter};
pub use utils::error::{LookupError, Result};
