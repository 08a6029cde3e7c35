//! Listings, content and lead capture for a Dubai real-estate brokerage site.

pub mod config;
pub mod filters;
pub mod insights;
pub mod models;
pub mod server;
pub mod session;
pub mod sources;
pub mod store;
