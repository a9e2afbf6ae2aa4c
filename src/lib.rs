pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use crate::core::{listing::ListingRenderer, store::TrackedItemStore, tracker::Tracker};
pub use utils::error::{RelayError, Result};
