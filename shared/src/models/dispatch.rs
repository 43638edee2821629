//! Dispatch models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{deserialize_size_lenient, SizeCategory, SizeSummary};

/// Stock leaving the facility, either exported or sent for regrading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub dispatch_type: DispatchType,
    #[serde(default)]
    pub client_name: Option<String>,
    /// Air waybill number for export shipments
    #[serde(default)]
    pub awb_number: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub line_items: Vec<DispatchLineItem>,
    #[serde(default)]
    pub size_totals: SizeSummary,
    #[serde(default)]
    pub total_weight_kg: Decimal,
}

/// One crate or loose-stock pick within a dispatch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchLineItem {
    #[serde(default)]
    pub crate_id: Option<Uuid>,
    #[serde(default)]
    pub loose_stock_id: Option<Uuid>,
    #[serde(default)]
    pub tank_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_size_lenient")]
    pub size: Option<SizeCategory>,
    #[serde(default)]
    pub weight_kg: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DispatchType {
    Export,
    Regrade,
}

/// Per-grade subtotals and overall weight of a set of dispatch lines
pub fn dispatch_totals(lines: &[DispatchLineItem]) -> (SizeSummary, Decimal) {
    let mut sizes = SizeSummary::new();
    let mut total = Decimal::ZERO;
    for line in lines {
        sizes.add(line.size, line.weight_kg);
        total += line.weight_kg.max(Decimal::ZERO);
    }
    (sizes, total)
}
