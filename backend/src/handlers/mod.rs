//! HTTP handlers for the MedChain inventory platform

pub mod advisory;
pub mod health;
pub mod inventory;
pub mod reorder;

pub use advisory::*;
pub use health::*;
pub use inventory::*;
pub use reorder::*;
