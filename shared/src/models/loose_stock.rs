//! Loose stock models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{deserialize_size_lenient, SizeCategory};

/// Lobster held loose in a tank after its crate was emptied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LooseStock {
    pub id: Uuid,
    #[serde(default)]
    pub tank_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_size_lenient")]
    pub size: Option<SizeCategory>,
    #[serde(default)]
    pub weight_kg: Decimal,
    #[serde(default)]
    pub origin_crate_id: Option<Uuid>,
    #[serde(default)]
    pub boat_name: Option<String>,
    #[serde(default)]
    pub offload_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: LooseStockStatus,
}

impl LooseStock {
    /// Loose stock counts toward stock while it has weight, whatever its status
    pub fn has_stock(&self) -> bool {
        self.weight_kg > Decimal::ZERO
    }

    pub fn origin(&self) -> Option<(&str, NaiveDate)> {
        match (self.boat_name.as_deref(), self.offload_date) {
            (Some(boat), Some(date)) => Some((boat, date)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LooseStockStatus {
    #[default]
    Stored,
    Dispatched,
}
