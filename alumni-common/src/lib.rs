//! # Alumni Map Common Library
//!
//! Shared code for the alumni map service:
//! - Student record models
//! - Service configuration loading
//! - Common error type
//! - Identifier generation

pub mod config;
pub mod error;
pub mod models;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::{Coordinates, StudentFields, StudentRecord};
