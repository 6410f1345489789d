//! Drift Core - Foundational types for the Drift particle field
//!
//! This crate provides the core types that all other Drift crates depend on:
//! - `FieldId` - Identifiers for simulators owned by a host
//! - `Color` - RGBA colors with CSS-style constructors
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{DriftError, Result};
pub use id::FieldId;
pub use types::Color;
