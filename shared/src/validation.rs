//! Validation utilities for the MedChain inventory platform
//!
//! Input is rejected here before it ever reaches the store.

/// Validate a location identifier (non-empty after trimming).
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    if location.trim().is_empty() {
        return Err("Location must not be empty");
    }
    Ok(())
}

/// Validate a drug name (non-empty after trimming).
pub fn validate_drug_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Drug name must not be empty");
    }
    Ok(())
}

/// Validate a stock quantity (non-negative).
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity must be non-negative");
    }
    Ok(())
}

/// Validate a batch identifier (non-empty after trimming).
pub fn validate_batch_id(batch_id: &str) -> Result<(), &'static str> {
    if batch_id.trim().is_empty() {
        return Err("Batch id must not be empty");
    }
    Ok(())
}
