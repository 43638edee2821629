//! Stock aggregation
//!
//! Read-side views over the inventory collections: stock per tank, facility
//! stock by size, remaining stock per boat trip and free crate numbers. Each
//! function is a pure fold over borrowed slices and recomputes from scratch on
//! every call. Unknown references and missing sizes degrade to zero or to an
//! omitted entry, never to an error.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    CrateLineItem, Dispatch, LooseStock, Loss, LossType, OffloadRecord, Tank, TripKey,
};
use crate::store::InventoryStore;
use crate::types::SizeSummary;

/// Lowest crate number handed out
pub const CRATE_NUMBER_MIN: u32 = 1;
/// Highest crate number handed out
pub const CRATE_NUMBER_MAX: u32 = 300;

/// Stock held in one tank
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TankStock {
    pub tank_id: Uuid,
    pub tank_number: u32,
    pub tank_name: String,
    pub crates: Vec<CrateLineItem>,
    pub loose_stock: Vec<LooseStock>,
    pub summary: SizeSummary,
}

/// Running totals for one boat trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoatTripStock {
    #[serde(flatten)]
    pub trip: TripKey,
    pub total_live_kg: Decimal,
    pub total_dead_kg: Decimal,
    pub total_rotten_kg: Decimal,
    pub total_lost_kg: Decimal,
    pub total_dispatched_kg: Decimal,
    /// Stock from this trip still held in crates or loose in tanks
    pub remaining: SizeSummary,
}

impl BoatTripStock {
    fn new(trip: TripKey) -> Self {
        Self {
            trip,
            total_live_kg: Decimal::ZERO,
            total_dead_kg: Decimal::ZERO,
            total_rotten_kg: Decimal::ZERO,
            total_lost_kg: Decimal::ZERO,
            total_dispatched_kg: Decimal::ZERO,
            remaining: SizeSummary::new(),
        }
    }
}

/// Summarise the stock in a single tank
pub fn tank_stock(tank: &Tank, crates: &[CrateLineItem], loose_stock: &[LooseStock]) -> TankStock {
    let crates: Vec<CrateLineItem> = crates
        .iter()
        .filter(|c| c.tank_id == Some(tank.id) && c.is_in_storage())
        .cloned()
        .collect();
    let loose_stock: Vec<LooseStock> = loose_stock
        .iter()
        .filter(|l| l.tank_id == Some(tank.id) && l.has_stock())
        .cloned()
        .collect();

    let mut summary = SizeSummary::new();
    for c in &crates {
        summary.add(c.size, c.weight_kg);
    }
    for l in &loose_stock {
        summary.add(l.size, l.weight_kg);
    }

    TankStock {
        tank_id: tank.id,
        tank_number: tank.number,
        tank_name: tank.name.clone(),
        crates,
        loose_stock,
        summary,
    }
}

/// Summarise a tank looked up by id; an unknown id yields `None`
pub fn tank_stock_by_id(
    tank_id: Uuid,
    tanks: &[Tank],
    crates: &[CrateLineItem],
    loose_stock: &[LooseStock],
) -> Option<TankStock> {
    tanks
        .iter()
        .find(|t| t.id == tank_id)
        .map(|tank| tank_stock(tank, crates, loose_stock))
}

/// Summaries for every active tank, in collection order
pub fn all_tanks_stock(
    tanks: &[Tank],
    crates: &[CrateLineItem],
    loose_stock: &[LooseStock],
) -> Vec<TankStock> {
    tanks
        .iter()
        .filter(|t| t.active)
        .map(|tank| tank_stock(tank, crates, loose_stock))
        .collect()
}

/// Facility-wide stock by size, regardless of tank
pub fn stock_by_size(crates: &[CrateLineItem], loose_stock: &[LooseStock]) -> SizeSummary {
    let mut summary = SizeSummary::new();
    for c in crates.iter().filter(|c| c.is_in_storage()) {
        summary.add(c.size, c.weight_kg);
    }
    for l in loose_stock.iter().filter(|l| l.has_stock()) {
        summary.add(l.size, l.weight_kg);
    }
    summary
}

/// Crate numbers in `1..=300` not held by a crate that is still allocated
pub fn available_crate_numbers(crates: &[CrateLineItem]) -> Vec<u32> {
    let in_use: HashSet<u32> = crates
        .iter()
        .filter(|c| c.status.is_allocated())
        .map(|c| c.crate_number)
        .collect();

    (CRATE_NUMBER_MIN..=CRATE_NUMBER_MAX)
        .filter(|n| !in_use.contains(n))
        .collect()
}

/// Resolves crate and loose-stock references back to the boat and offload
/// date the stock came from.
struct OriginIndex<'a> {
    crates: HashMap<Uuid, &'a CrateLineItem>,
    loose_stock: HashMap<Uuid, &'a LooseStock>,
}

impl<'a> OriginIndex<'a> {
    fn new(crates: &'a [CrateLineItem], loose_stock: &'a [LooseStock]) -> Self {
        Self {
            crates: crates.iter().map(|c| (c.id, c)).collect(),
            loose_stock: loose_stock.iter().map(|l| (l.id, l)).collect(),
        }
    }

    fn resolve(
        &self,
        crate_id: Option<Uuid>,
        loose_stock_id: Option<Uuid>,
    ) -> Option<(&'a str, NaiveDate)> {
        let from_crate = crate_id
            .and_then(|id| self.crates.get(&id).copied())
            .and_then(CrateLineItem::origin);
        if from_crate.is_some() {
            return from_crate;
        }

        let loose = loose_stock_id.and_then(|id| self.loose_stock.get(&id).copied())?;
        loose.origin().or_else(|| {
            // loose stock emptied from a crate may only carry the crate link
            loose
                .origin_crate_id
                .and_then(|id| self.crates.get(&id).copied())
                .and_then(CrateLineItem::origin)
        })
    }
}

fn trip_index<'k>(
    by_origin: &HashMap<(&'k str, NaiveDate), usize>,
    origin: Option<(&'k str, NaiveDate)>,
) -> Option<usize> {
    origin.and_then(|key| by_origin.get(&key).copied())
}

/// Live, loss, dispatch and remaining totals per boat trip
///
/// Trips are seeded from the offload records in order, one per distinct
/// boat/date/trip-number triple. Stock, losses and dispatches are joined back
/// by boat name and offload date only; when one boat has two trips on the
/// same date, everything is attributed to the first of them.
pub fn boat_trip_stock(
    offloads: &[OffloadRecord],
    crates: &[CrateLineItem],
    loose_stock: &[LooseStock],
    losses: &[Loss],
    dispatches: &[Dispatch],
) -> Vec<BoatTripStock> {
    let mut trips: Vec<BoatTripStock> = Vec::new();
    let mut by_trip: HashMap<TripKey, usize> = HashMap::new();
    let mut by_origin: HashMap<(&str, NaiveDate), usize> = HashMap::new();

    for offload in offloads {
        let key = offload.trip_key();
        let index = match by_trip.get(&key) {
            Some(&index) => index,
            None => {
                trips.push(BoatTripStock::new(key.clone()));
                by_trip.insert(key, trips.len() - 1);
                trips.len() - 1
            }
        };

        let trip = &mut trips[index];
        trip.total_live_kg += offload.alive_kg;
        trip.total_dead_kg += offload.baseline_dead_kg();
        trip.total_rotten_kg += offload.baseline_rotten_kg();

        by_origin
            .entry((offload.boat_name.as_str(), offload.offload_date))
            .or_insert(index);
    }

    for c in crates.iter().filter(|c| c.is_in_storage()) {
        if let Some(index) = trip_index(&by_origin, c.origin()) {
            trips[index].remaining.add(c.size, c.weight_kg);
        }
    }
    for l in loose_stock.iter().filter(|l| l.has_stock()) {
        if let Some(index) = trip_index(&by_origin, l.origin()) {
            trips[index].remaining.add(l.size, l.weight_kg);
        }
    }

    let origins = OriginIndex::new(crates, loose_stock);

    for loss in losses {
        let origin = origins.resolve(loss.crate_id, loss.loose_stock_id);
        let Some(index) = trip_index(&by_origin, origin) else {
            continue;
        };
        let weight = loss.weight_kg.max(Decimal::ZERO);
        let trip = &mut trips[index];
        match loss.loss_type {
            LossType::Dead => trip.total_dead_kg += weight,
            LossType::Rotten => trip.total_rotten_kg += weight,
            LossType::Lost => trip.total_lost_kg += weight,
        }
    }

    for line in dispatches.iter().flat_map(|d| d.line_items.iter()) {
        let origin = origins.resolve(line.crate_id, line.loose_stock_id);
        if let Some(index) = trip_index(&by_origin, origin) {
            trips[index].total_dispatched_kg += line.weight_kg.max(Decimal::ZERO);
        }
    }

    trips
}

/// Aggregation views bound to an inventory store
pub struct StockAggregator<'a, S: InventoryStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: InventoryStore + ?Sized> StockAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn tank_stock(&self, tank_id: Uuid) -> Option<TankStock> {
        tank_stock_by_id(
            tank_id,
            self.store.tanks(),
            self.store.crates(),
            self.store.loose_stock(),
        )
    }

    pub fn all_tanks_stock(&self) -> Vec<TankStock> {
        all_tanks_stock(
            self.store.tanks(),
            self.store.crates(),
            self.store.loose_stock(),
        )
    }

    pub fn stock_by_size(&self) -> SizeSummary {
        stock_by_size(self.store.crates(), self.store.loose_stock())
    }

    pub fn boat_trip_stock(&self) -> Vec<BoatTripStock> {
        boat_trip_stock(
            self.store.offloads(),
            self.store.crates(),
            self.store.loose_stock(),
            self.store.losses(),
            self.store.dispatches(),
        )
    }

    pub fn available_crate_numbers(&self) -> Vec<u32> {
        available_crate_numbers(self.store.crates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dispatch_totals, CrateStatus, DispatchLineItem, DispatchType, LooseStockStatus};
    use crate::types::SizeCategory;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tank(name: &str, active: bool) -> Tank {
        Tank {
            id: Uuid::new_v4(),
            number: 1,
            name: name.to_string(),
            active,
        }
    }

    fn stored_crate(tank_id: Uuid, number: u32, size: SizeCategory, weight: &str) -> CrateLineItem {
        CrateLineItem {
            id: Uuid::new_v4(),
            batch_id: None,
            boat_name: None,
            offload_date: None,
            product: None,
            crate_number: number,
            size: Some(size),
            weight_kg: dec(weight),
            original_weight_kg: None,
            original_size: None,
            status: CrateStatus::Stored,
            tank_id: Some(tank_id),
        }
    }

    fn loose(tank_id: Uuid, size: SizeCategory, weight: &str) -> LooseStock {
        LooseStock {
            id: Uuid::new_v4(),
            tank_id: Some(tank_id),
            size: Some(size),
            weight_kg: dec(weight),
            origin_crate_id: None,
            boat_name: None,
            offload_date: None,
            status: LooseStockStatus::Stored,
        }
    }

    #[test]
    fn test_tank_stock_skips_unstored_and_empty_crates() {
        let t = tank("T1", true);
        let mut rechecked = stored_crate(t.id, 2, SizeCategory::B, "8");
        rechecked.status = CrateStatus::Rechecked;
        let empty = stored_crate(t.id, 3, SizeCategory::B, "0");
        let crates = vec![stored_crate(t.id, 1, SizeCategory::B, "4"), rechecked, empty];

        let stock = tank_stock(&t, &crates, &[]);
        assert_eq!(stock.crates.len(), 1);
        assert_eq!(stock.summary.get(SizeCategory::B), dec("4"));
    }

    #[test]
    fn test_unknown_tank_yields_none() {
        let t = tank("T1", true);
        assert!(tank_stock_by_id(Uuid::new_v4(), &[t], &[], &[]).is_none());
    }

    #[test]
    fn test_loose_stock_counts_by_weight_not_status() {
        let t = tank("T1", true);
        let mut dispatched = loose(t.id, SizeCategory::C, "2");
        dispatched.status = LooseStockStatus::Dispatched;

        let stock = tank_stock(&t, &[], &[dispatched]);
        assert_eq!(stock.summary.get(SizeCategory::C), dec("2"));
    }

    #[test]
    fn test_all_tanks_keeps_collection_order() {
        let first = tank("T2", true);
        let second = tank("T1", true);
        let tanks = vec![first.clone(), second.clone()];

        let stocks = all_tanks_stock(&tanks, &[], &[]);
        assert_eq!(stocks[0].tank_id, first.id);
        assert_eq!(stocks[1].tank_id, second.id);
    }

    fn offload(trip: &str, alive: &str) -> OffloadRecord {
        OffloadRecord {
            id: Uuid::new_v4(),
            boat_name: "Osprey".to_string(),
            offload_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            trip_number: trip.to_string(),
            total_offloaded_kg: dec(alive),
            total_received_kg: dec(alive),
            dead_kg: Decimal::ZERO,
            rotten_kg: Decimal::ZERO,
            alive_kg: dec(alive),
            dead_on_tanks_kg: Decimal::ZERO,
            rotten_on_tanks_kg: Decimal::ZERO,
            live_by_size: Default::default(),
        }
    }

    #[test]
    fn test_same_day_trips_attribute_stock_to_first() {
        let t = tank("T1", true);
        let mut c = stored_crate(t.id, 1, SizeCategory::A, "10");
        c.boat_name = Some("Osprey".to_string());
        c.offload_date = NaiveDate::from_ymd_opt(2024, 1, 5);

        let offloads = vec![offload("7", "100"), offload("8", "40"), offload("7", "5")];
        let trips = boat_trip_stock(&offloads, &[c], &[], &[], &[]);

        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].trip.trip_number, "7");
        assert_eq!(trips[0].total_live_kg, dec("105"));
        assert_eq!(trips[0].remaining.total_kg(), dec("10"));
        assert!(trips[1].remaining.is_empty());
    }

    fn osprey_crate(tank_id: Uuid, number: u32, weight: &str) -> CrateLineItem {
        let mut c = stored_crate(tank_id, number, SizeCategory::A, weight);
        c.boat_name = Some("Osprey".to_string());
        c.offload_date = NaiveDate::from_ymd_opt(2024, 1, 5);
        c
    }

    fn loss(loss_type: LossType, crate_id: Option<Uuid>, loose_stock_id: Option<Uuid>, weight: &str) -> Loss {
        Loss {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            loss_type,
            tank_id: None,
            crate_id,
            loose_stock_id,
            size: Some(SizeCategory::A),
            weight_kg: dec(weight),
            notes: None,
        }
    }

    fn dispatch_of(crate_id: Option<Uuid>, loose_stock_id: Option<Uuid>, weight: &str) -> Dispatch {
        let line_items = vec![DispatchLineItem {
            crate_id,
            loose_stock_id,
            tank_id: None,
            size: Some(SizeCategory::A),
            weight_kg: dec(weight),
        }];
        let (size_totals, total_weight_kg) = dispatch_totals(&line_items);
        Dispatch {
            id: Uuid::new_v4(),
            dispatch_type: DispatchType::Export,
            client_name: None,
            awb_number: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            line_items,
            size_totals,
            total_weight_kg,
        }
    }

    #[test]
    fn test_trip_baseline_includes_tank_mortality() {
        let mut record = offload("7", "100");
        record.dead_kg = dec("5");
        record.dead_on_tanks_kg = dec("1.5");
        record.rotten_kg = dec("2");
        record.rotten_on_tanks_kg = dec("0.25");

        let trips = boat_trip_stock(&[record], &[], &[], &[], &[]);

        assert_eq!(trips[0].total_dead_kg, dec("6.5"));
        assert_eq!(trips[0].total_rotten_kg, dec("2.25"));
        assert_eq!(trips[0].total_lost_kg, Decimal::ZERO);
    }

    #[test]
    fn test_lost_stock_counts_toward_trip() {
        let t = tank("T1", true);
        let c = osprey_crate(t.id, 1, "10");
        let losses = vec![
            loss(LossType::Lost, Some(c.id), None, "3"),
            loss(LossType::Dead, Some(c.id), None, "1"),
        ];

        let trips = boat_trip_stock(&[offload("7", "100")], &[c], &[], &losses, &[]);

        assert_eq!(trips[0].total_lost_kg, dec("3"));
        assert_eq!(trips[0].total_dead_kg, dec("1"));
    }

    #[test]
    fn test_loose_stock_traced_through_origin_crate() {
        let t = tank("T1", true);
        let mut emptied = osprey_crate(t.id, 1, "0");
        emptied.status = CrateStatus::Emptied;
        let mut remainder = loose(t.id, SizeCategory::A, "0");
        remainder.origin_crate_id = Some(emptied.id);

        let losses = vec![loss(LossType::Rotten, None, Some(remainder.id), "2")];
        let dispatches = vec![dispatch_of(None, Some(remainder.id), "6")];
        let trips = boat_trip_stock(&[offload("7", "100")], &[emptied], &[remainder], &losses, &dispatches);

        assert_eq!(trips[0].total_rotten_kg, dec("2"));
        assert_eq!(trips[0].total_dispatched_kg, dec("6"));
    }

    #[test]
    fn test_unknown_references_are_omitted() {
        let t = tank("T1", true);
        let c = osprey_crate(t.id, 1, "10");
        let losses = vec![
            loss(LossType::Dead, Some(Uuid::new_v4()), None, "4"),
            loss(LossType::Lost, None, Some(Uuid::new_v4()), "4"),
            loss(LossType::Rotten, None, None, "4"),
        ];
        let dispatches = vec![
            dispatch_of(Some(Uuid::new_v4()), None, "7"),
            dispatch_of(None, Some(Uuid::new_v4()), "7"),
        ];

        let trips = boat_trip_stock(&[offload("7", "100")], &[c], &[], &losses, &dispatches);

        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].total_dead_kg, Decimal::ZERO);
        assert_eq!(trips[0].total_rotten_kg, Decimal::ZERO);
        assert_eq!(trips[0].total_lost_kg, Decimal::ZERO);
        assert_eq!(trips[0].total_dispatched_kg, Decimal::ZERO);
        assert_eq!(trips[0].remaining.total_kg(), dec("10"));
    }

    #[test]
    fn test_available_crate_numbers_range() {
        let numbers = available_crate_numbers(&[]);
        assert_eq!(numbers.len(), 300);
        assert_eq!(numbers.first(), Some(&1));
        assert_eq!(numbers.last(), Some(&300));
    }
}
