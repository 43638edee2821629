//! WebAssembly module for the Lobster Stock Inventory
//!
//! Provides client-side computation for:
//! - Per-tank and all-tanks stock summaries
//! - Facility stock by size
//! - Boat trip remaining stock
//! - Free crate numbers and weight formatting
//!
//! Every function takes the inventory as a JSON snapshot and returns JSON.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{InventorySnapshot, StockAggregator};
use uuid::Uuid;
use wasm_bindgen::prelude::*;

fn parse_snapshot(snapshot_json: &str) -> Result<InventorySnapshot, String> {
    serde_json::from_str(snapshot_json).map_err(|e| format!("Invalid snapshot JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

fn tank_stock_json(snapshot_json: &str, tank_id: &str) -> Result<String, String> {
    let tank_id = Uuid::parse_str(tank_id).map_err(|e| format!("Invalid tank id: {}", e))?;
    let snapshot = parse_snapshot(snapshot_json)?;
    to_json(&StockAggregator::new(&snapshot).tank_stock(tank_id))
}

fn all_tanks_stock_json(snapshot_json: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    to_json(&StockAggregator::new(&snapshot).all_tanks_stock())
}

fn stock_by_size_json(snapshot_json: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    to_json(&StockAggregator::new(&snapshot).stock_by_size())
}

fn boat_trip_json(snapshot_json: &str) -> Result<String, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    to_json(&StockAggregator::new(&snapshot).boat_trip_stock())
}

fn available_numbers(snapshot_json: &str) -> Result<Vec<u32>, String> {
    let snapshot = parse_snapshot(snapshot_json)?;
    Ok(StockAggregator::new(&snapshot).available_crate_numbers())
}

fn into_js_error(message: String) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Stock held in one tank, `null` when the tank is unknown
#[wasm_bindgen]
pub fn tank_stock_summary(snapshot_json: &str, tank_id: &str) -> Result<String, JsValue> {
    tank_stock_json(snapshot_json, tank_id).map_err(into_js_error)
}

/// Stock for every active tank
#[wasm_bindgen]
pub fn all_tanks_stock_summary(snapshot_json: &str) -> Result<String, JsValue> {
    all_tanks_stock_json(snapshot_json).map_err(into_js_error)
}

/// Facility-wide stock by size
#[wasm_bindgen]
pub fn stock_by_size_summary(snapshot_json: &str) -> Result<String, JsValue> {
    stock_by_size_json(snapshot_json).map_err(into_js_error)
}

/// Live, loss, dispatch and remaining totals per boat trip
#[wasm_bindgen]
pub fn boat_trip_summary(snapshot_json: &str) -> Result<String, JsValue> {
    boat_trip_json(snapshot_json).map_err(into_js_error)
}

/// Crate numbers free for a new crate
#[wasm_bindgen]
pub fn available_crate_numbers(snapshot_json: &str) -> Result<Vec<u32>, JsValue> {
    available_numbers(snapshot_json).map_err(into_js_error)
}

/// Format a weight with two decimal places
#[wasm_bindgen]
pub fn format_weight_kg(weight_kg: f64) -> String {
    let weight = Decimal::try_from(weight_kg).unwrap_or(Decimal::ZERO);
    shared::format_weight_kg(weight)
}

/// Check a crate number is within the numbered crate range
#[wasm_bindgen]
pub fn is_valid_crate_number(number: u32) -> bool {
    shared::validate_crate_number(number).is_ok()
}
