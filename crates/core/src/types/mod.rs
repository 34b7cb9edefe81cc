//! Core types for Donghang.
//!
//! This module provides type-safe wrappers for the inquiry domain.

pub mod id;
pub mod inquiry;
pub mod phone;

pub use id::*;
pub use inquiry::{Inquiry, NewInquiry, ValidationError};
pub use phone::{PhoneError, PhoneNumber};
