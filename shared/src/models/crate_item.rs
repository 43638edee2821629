//! Crate line item models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{deserialize_size_lenient, SizeCategory};

/// A numbered crate of live lobster received from a boat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrateLineItem {
    pub id: Uuid,
    /// Receiving batch the crate arrived in
    #[serde(default)]
    pub batch_id: Option<Uuid>,
    #[serde(default)]
    pub boat_name: Option<String>,
    #[serde(default)]
    pub offload_date: Option<NaiveDate>,
    #[serde(default)]
    pub product: Option<String>,
    pub crate_number: u32,
    #[serde(default, deserialize_with = "deserialize_size_lenient")]
    pub size: Option<SizeCategory>,
    #[serde(default)]
    pub weight_kg: Decimal,
    /// Weight recorded at receiving, kept for audit after a recheck
    #[serde(default)]
    pub original_weight_kg: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_size_lenient")]
    pub original_size: Option<SizeCategory>,
    pub status: CrateStatus,
    #[serde(default)]
    pub tank_id: Option<Uuid>,
}

impl CrateLineItem {
    /// Whether this crate currently contributes to tank stock
    pub fn is_in_storage(&self) -> bool {
        self.status == CrateStatus::Stored && self.weight_kg > Decimal::ZERO
    }

    /// Boat and offload date the stock came from, when both are known
    pub fn origin(&self) -> Option<(&str, NaiveDate)> {
        match (self.boat_name.as_deref(), self.offload_date) {
            (Some(boat), Some(date)) => Some((boat, date)),
            _ => None,
        }
    }
}

/// Lifecycle of a crate
///
/// `received -> rechecked -> stored | emptied`, `stored -> emptied | dispatched`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CrateStatus {
    Received,
    Rechecked,
    Stored,
    Emptied,
    Dispatched,
}

impl CrateStatus {
    /// A crate holds its number until it is emptied or dispatched
    pub fn is_allocated(self) -> bool {
        !matches!(self, CrateStatus::Emptied | CrateStatus::Dispatched)
    }

    pub fn can_transition_to(self, next: CrateStatus) -> bool {
        matches!(
            (self, next),
            (CrateStatus::Received, CrateStatus::Rechecked)
                | (CrateStatus::Rechecked, CrateStatus::Stored)
                | (CrateStatus::Rechecked, CrateStatus::Emptied)
                | (CrateStatus::Stored, CrateStatus::Emptied)
                | (CrateStatus::Stored, CrateStatus::Dispatched)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrateStatus::Received => "received",
            CrateStatus::Rechecked => "rechecked",
            CrateStatus::Stored => "stored",
            CrateStatus::Emptied => "emptied",
            CrateStatus::Dispatched => "dispatched",
        }
    }
}

impl std::fmt::Display for CrateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
