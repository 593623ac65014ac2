//! # orderhub-core
//!
//! Core crate for OrderHub. Contains configuration schemas, typed
//! identifiers, order domain events, usage-limit types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other OrderHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
