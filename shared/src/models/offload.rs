//! Boat offload models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::SizeCategory;

/// Catch landed by a boat on one trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OffloadRecord {
    pub id: Uuid,
    pub boat_name: String,
    pub offload_date: NaiveDate,
    pub trip_number: String,
    #[serde(default)]
    pub total_offloaded_kg: Decimal,
    #[serde(default)]
    pub total_received_kg: Decimal,
    #[serde(default)]
    pub dead_kg: Decimal,
    #[serde(default)]
    pub rotten_kg: Decimal,
    #[serde(default)]
    pub alive_kg: Decimal,
    /// Found dead after the catch went into the tanks
    #[serde(default)]
    pub dead_on_tanks_kg: Decimal,
    #[serde(default)]
    pub rotten_on_tanks_kg: Decimal,
    /// Live weight graded at intake, including the intake-only `M` grade
    #[serde(default)]
    pub live_by_size: BTreeMap<SizeCategory, Decimal>,
}

impl OffloadRecord {
    pub fn trip_key(&self) -> TripKey {
        TripKey {
            boat_name: self.boat_name.clone(),
            offload_date: self.offload_date,
            trip_number: self.trip_number.clone(),
        }
    }

    pub fn baseline_dead_kg(&self) -> Decimal {
        self.dead_kg + self.dead_on_tanks_kg
    }

    pub fn baseline_rotten_kg(&self) -> Decimal {
        self.rotten_kg + self.rotten_on_tanks_kg
    }
}

/// Identity of a boat trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TripKey {
    pub boat_name: String,
    pub offload_date: NaiveDate,
    pub trip_number: String,
}
