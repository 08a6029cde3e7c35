//! API route handlers.

pub mod admin;
pub mod auth;
pub mod content;
pub mod leads;
pub mod properties;
