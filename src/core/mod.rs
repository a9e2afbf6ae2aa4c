pub mod listing;
pub mod store;
pub mod tracker;

pub use crate::domain::model::{AnalyticsEvent, DisplayRow, ItemDetails, ItemId};
pub use crate::domain::ports::{AnalyticsSink, ItemEnricher, Storage};
pub use crate::utils::error::Result;
