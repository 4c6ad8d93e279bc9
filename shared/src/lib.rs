//! Shared types and models for the MedChain inventory platform
//!
//! This crate contains the domain records, derived alert rules, and
//! validation helpers shared between the backend server and other
//! components of the system.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
