//! Receiving batch models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A boat's catch as it is taken into the facility in crates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingBatch {
    pub id: Uuid,
    pub boat_name: String,
    pub offload_date: NaiveDate,
    pub trip_number: String,
    pub received_date: NaiveDate,
    #[serde(default)]
    pub crate_count: u32,
    #[serde(default)]
    pub total_weight_kg: Decimal,
}
