//! Donghang Core - Shared domain types.
//!
//! This crate provides the types shared by every Donghang component:
//! - `site` - Public landing page, inquiry form, and admin inbox
//! - `cli` - Command-line tools for migrations and inbox inspection
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps the inquiry rules testable on their own
//! and usable from any binary.
//!
//! # Modules
//!
//! - [`types`] - Inquiry model, type-safe IDs, phone numbers, and validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
