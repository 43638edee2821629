//! Loss adjustment models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{deserialize_size_lenient, SizeCategory};

/// Weight written off from a crate or loose stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Loss {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub loss_type: LossType,
    #[serde(default)]
    pub tank_id: Option<Uuid>,
    #[serde(default)]
    pub crate_id: Option<Uuid>,
    #[serde(default)]
    pub loose_stock_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_size_lenient")]
    pub size: Option<SizeCategory>,
    #[serde(default)]
    pub weight_kg: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LossType {
    Dead,
    Rotten,
    Lost,
}

impl std::fmt::Display for LossType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossType::Dead => write!(f, "Dead"),
            LossType::Rotten => write!(f, "Rotten"),
            LossType::Lost => write!(f, "Lost"),
        }
    }
}
