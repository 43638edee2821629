//! Errors raised when an inventory mutation is rejected

use thiserror::Error;
use uuid::Uuid;

use crate::models::CrateStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InventoryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Tank not found: {0}")]
    TankNotFound(Uuid),

    #[error("Tank {0} is not active")]
    TankInactive(Uuid),

    #[error("Crate not found: {0}")]
    CrateNotFound(Uuid),

    #[error("Loose stock not found: {0}")]
    LooseStockNotFound(Uuid),

    #[error("Receiving batch not found: {0}")]
    BatchNotFound(Uuid),

    #[error("Crate number {0} is outside the range 1-300")]
    CrateNumberOutOfRange(u32),

    #[error("Crate number {0} is already allocated")]
    CrateNumberInUse(u32),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: CrateStatus, to: CrateStatus },

    #[error("Stock {0} has already been emptied or dispatched")]
    StockRetired(Uuid),

    #[error("Stock {0} appears on more than one dispatch line")]
    DuplicateStockReference(Uuid),

    #[error("Dispatch has no line items")]
    EmptyDispatch,

    #[error("A crate or loose stock reference is required")]
    MissingStockReference,
}

impl From<validator::ValidationErrors> for InventoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        InventoryError::Validation(errors.to_string())
    }
}

/// Result type alias for inventory mutations
pub type InventoryResult<T> = Result<T, InventoryError>;
