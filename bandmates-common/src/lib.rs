//! # Bandmates Common Library
//!
//! Shared code for the bandmates workspace including:
//! - Error types (Error enum, Result alias)
//! - Engine tuning parameters
//! - Bootstrap configuration loading

pub mod config;
pub mod error;
pub mod params;

pub use error::{Error, Result};
pub use params::{EngineParams, SeedBudget};
