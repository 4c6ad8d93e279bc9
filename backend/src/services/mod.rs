//! Business logic services for the MedChain inventory platform

pub mod advisor;
pub mod inventory;
pub mod reorder;
pub mod summary;

pub use advisor::AdvisoryService;
pub use inventory::InventoryService;
pub use reorder::ReorderService;
pub use summary::SummaryService;
