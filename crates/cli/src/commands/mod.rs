//! CLI command implementations.

pub mod admin;
pub mod inquiries;
pub mod migrate;
