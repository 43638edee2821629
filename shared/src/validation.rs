//! Validation utilities for the Lobster Stock Inventory

use rust_decimal::Decimal;

use crate::stock::{CRATE_NUMBER_MAX, CRATE_NUMBER_MIN};
use crate::types::SizeCategory;

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate crate number is within the numbered crate range (1-300)
pub fn validate_crate_number(number: u32) -> Result<(), &'static str> {
    if !(CRATE_NUMBER_MIN..=CRATE_NUMBER_MAX).contains(&number) {
        return Err("Crate number must be between 1 and 300");
    }
    Ok(())
}

/// Validate a weight that may legitimately be zero (e.g. a recheck of an empty crate)
pub fn validate_weight(weight_kg: Decimal) -> Result<(), &'static str> {
    if weight_kg < Decimal::ZERO {
        return Err("Weight cannot be negative");
    }
    Ok(())
}

/// Validate a weight being moved or written off
pub fn validate_positive_weight(weight_kg: Decimal) -> Result<(), &'static str> {
    if weight_kg <= Decimal::ZERO {
        return Err("Weight must be greater than zero");
    }
    Ok(())
}

/// Validate size can be held in a tank (`M` is intake only)
pub fn validate_storage_size(size: SizeCategory) -> Result<(), &'static str> {
    if !size.is_storage() {
        return Err("Size M is only used at intake and cannot be stored");
    }
    Ok(())
}

// ============================================================================
// Offload Validations
// ============================================================================

/// Validate boat name is present and reasonably short
pub fn validate_boat_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Boat name is required");
    }
    if trimmed.chars().count() > 100 {
        return Err("Boat name must be at most 100 characters");
    }
    Ok(())
}

/// Validate trip number format (1-20 alphanumeric characters or dashes)
pub fn validate_trip_number(trip: &str) -> Result<(), &'static str> {
    if trip.is_empty() {
        return Err("Trip number is required");
    }
    if trip.len() > 20 {
        return Err("Trip number must be at most 20 characters");
    }
    if !trip.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err("Trip number must be alphanumeric");
    }
    Ok(())
}

/// Validate offload weight breakdown: dead, rotten and alive cannot exceed
/// what was offloaded
pub fn validate_offload_breakdown(
    offloaded: Decimal,
    dead: Decimal,
    rotten: Decimal,
    alive: Decimal,
) -> Result<(), &'static str> {
    for w in [offloaded, dead, rotten, alive] {
        validate_weight(w)?;
    }
    if dead + rotten + alive > offloaded {
        return Err("Dead, rotten and alive weights exceed the offloaded weight");
    }
    Ok(())
}
