// Adapters layer: concrete implementations of the domain ports against
// the filesystem, the analytics collector and the marketplace.

pub mod analytics;
pub mod marketplace;
pub mod storage;
