//! Local inventory ledger
//!
//! Applies receiving, recheck, storage, loss and dispatch operations to an
//! [`InventorySnapshot`] while holding the stock invariants: weights never go
//! negative, crate numbers stay unique among allocated crates, and crates only
//! move forward through their lifecycle. Every operation validates before it
//! changes anything, so a rejected operation leaves the ledger untouched.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    dispatch_totals, CrateLineItem, CrateStatus, Dispatch, DispatchLineItem, DispatchType,
    LooseStock, LooseStockStatus, Loss, LossType, OffloadRecord, ReceivingBatch, Tank,
};
use crate::stock::StockAggregator;
use crate::store::{InventorySnapshot, InventoryStore};
use crate::types::SizeCategory;
use crate::validation;

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTank {
    #[validate(range(min = 1))]
    pub number: u32,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOffload {
    #[validate(custom = "boat_name_rule")]
    pub boat_name: String,
    pub offload_date: NaiveDate,
    #[validate(custom = "trip_number_rule")]
    pub trip_number: String,
    #[validate(custom = "non_negative_weight")]
    pub total_offloaded_kg: Decimal,
    #[validate(custom = "non_negative_weight")]
    pub total_received_kg: Decimal,
    #[validate(custom = "non_negative_weight")]
    pub dead_kg: Decimal,
    #[validate(custom = "non_negative_weight")]
    pub rotten_kg: Decimal,
    #[validate(custom = "non_negative_weight")]
    pub alive_kg: Decimal,
    #[serde(default)]
    pub live_by_size: BTreeMap<SizeCategory, Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReceivingBatch {
    #[validate(custom = "boat_name_rule")]
    pub boat_name: String,
    pub offload_date: NaiveDate,
    #[validate(custom = "trip_number_rule")]
    pub trip_number: String,
    pub received_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCrate {
    pub batch_id: Uuid,
    #[validate(length(max = 100))]
    pub product: Option<String>,
    #[validate(range(min = 1, max = 300))]
    pub crate_number: u32,
    #[validate(custom = "storage_size_rule")]
    pub size: SizeCategory,
    #[validate(custom = "non_negative_weight")]
    pub weight_kg: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Recheck {
    #[validate(custom = "storage_size_rule")]
    pub size: SizeCategory,
    #[validate(custom = "non_negative_weight")]
    pub weight_kg: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLoss {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub loss_type: LossType,
    #[serde(default)]
    pub crate_id: Option<Uuid>,
    #[serde(default)]
    pub loose_stock_id: Option<Uuid>,
    #[validate(custom = "positive_weight")]
    pub weight_kg: Decimal,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDispatch {
    #[serde(rename = "type")]
    pub dispatch_type: DispatchType,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub client_name: Option<String>,
    #[validate(length(max = 30))]
    #[serde(default)]
    pub awb_number: Option<String>,
    pub date: NaiveDate,
    #[validate]
    pub lines: Vec<NewDispatchLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDispatchLine {
    #[serde(default)]
    pub crate_id: Option<Uuid>,
    #[serde(default)]
    pub loose_stock_id: Option<Uuid>,
    #[validate(custom = "positive_weight")]
    pub weight_kg: Decimal,
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn non_negative_weight(weight: &Decimal) -> Result<(), ValidationError> {
    validation::validate_weight(*weight).map_err(|m| rule_error("weight", m))
}

fn positive_weight(weight: &Decimal) -> Result<(), ValidationError> {
    validation::validate_positive_weight(*weight).map_err(|m| rule_error("weight", m))
}

fn storage_size_rule(size: &SizeCategory) -> Result<(), ValidationError> {
    validation::validate_storage_size(*size).map_err(|m| rule_error("size", m))
}

fn boat_name_rule(name: &str) -> Result<(), ValidationError> {
    validation::validate_boat_name(name).map_err(|m| rule_error("boat_name", m))
}

fn trip_number_rule(trip: &str) -> Result<(), ValidationError> {
    validation::validate_trip_number(trip).map_err(|m| rule_error("trip_number", m))
}

// ============================================================================
// Ledger
// ============================================================================

/// Where a withdrawal is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StockRef {
    Crate(usize),
    Loose(usize),
}

/// In-memory inventory with mutation rules
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    snapshot: InventorySnapshot,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> InventorySnapshot {
        self.snapshot
    }

    pub fn aggregator(&self) -> StockAggregator<'_, Self> {
        StockAggregator::new(self)
    }

    pub fn receiving_batches(&self) -> &[ReceivingBatch] {
        &self.snapshot.receiving_batches
    }

    /// Add a new, active tank
    pub fn add_tank(&mut self, input: NewTank) -> InventoryResult<Tank> {
        input.validate()?;
        let tank = Tank {
            id: Uuid::new_v4(),
            number: input.number,
            name: input.name,
            active: true,
        };
        self.snapshot.tanks.push(tank.clone());
        Ok(tank)
    }

    pub fn set_tank_active(&mut self, tank_id: Uuid, active: bool) -> InventoryResult<()> {
        let tank = self
            .snapshot
            .tanks
            .iter_mut()
            .find(|t| t.id == tank_id)
            .ok_or(InventoryError::TankNotFound(tank_id))?;
        tank.active = active;
        Ok(())
    }

    /// Record a boat offload and its intake weight breakdown
    pub fn record_offload(&mut self, input: NewOffload) -> InventoryResult<OffloadRecord> {
        input.validate()?;
        validation::validate_offload_breakdown(
            input.total_offloaded_kg,
            input.dead_kg,
            input.rotten_kg,
            input.alive_kg,
        )
        .map_err(|m| InventoryError::Validation(m.to_string()))?;

        let record = OffloadRecord {
            id: Uuid::new_v4(),
            boat_name: input.boat_name.trim().to_string(),
            offload_date: input.offload_date,
            trip_number: input.trip_number,
            total_offloaded_kg: input.total_offloaded_kg,
            total_received_kg: input.total_received_kg,
            dead_kg: input.dead_kg,
            rotten_kg: input.rotten_kg,
            alive_kg: input.alive_kg,
            dead_on_tanks_kg: Decimal::ZERO,
            rotten_on_tanks_kg: Decimal::ZERO,
            live_by_size: input.live_by_size,
        };
        self.snapshot.offloads.push(record.clone());
        Ok(record)
    }

    /// Open a receiving batch that crates can be received into
    pub fn open_receiving_batch(
        &mut self,
        input: NewReceivingBatch,
    ) -> InventoryResult<ReceivingBatch> {
        input.validate()?;
        let batch = ReceivingBatch {
            id: Uuid::new_v4(),
            boat_name: input.boat_name.trim().to_string(),
            offload_date: input.offload_date,
            trip_number: input.trip_number,
            received_date: input.received_date,
            crate_count: 0,
            total_weight_kg: Decimal::ZERO,
        };
        self.snapshot.receiving_batches.push(batch.clone());
        Ok(batch)
    }

    /// Receive a numbered crate into a batch
    pub fn receive_crate(&mut self, input: NewCrate) -> InventoryResult<CrateLineItem> {
        if validation::validate_crate_number(input.crate_number).is_err() {
            return Err(InventoryError::CrateNumberOutOfRange(input.crate_number));
        }
        input.validate()?;

        let in_use = self
            .snapshot
            .crates
            .iter()
            .any(|c| c.status.is_allocated() && c.crate_number == input.crate_number);
        if in_use {
            return Err(InventoryError::CrateNumberInUse(input.crate_number));
        }

        let batch = self
            .snapshot
            .receiving_batches
            .iter_mut()
            .find(|b| b.id == input.batch_id)
            .ok_or(InventoryError::BatchNotFound(input.batch_id))?;
        batch.crate_count += 1;
        batch.total_weight_kg += input.weight_kg;

        let crate_item = CrateLineItem {
            id: Uuid::new_v4(),
            batch_id: Some(batch.id),
            boat_name: Some(batch.boat_name.clone()),
            offload_date: Some(batch.offload_date),
            product: input.product,
            crate_number: input.crate_number,
            size: Some(input.size),
            weight_kg: input.weight_kg,
            original_weight_kg: Some(input.weight_kg),
            original_size: Some(input.size),
            status: CrateStatus::Received,
            tank_id: None,
        };
        self.snapshot.crates.push(crate_item.clone());
        Ok(crate_item)
    }

    /// Re-weigh and re-grade a received crate; the receiving weight and size
    /// stay on the crate for audit
    pub fn recheck_crate(&mut self, crate_id: Uuid, input: Recheck) -> InventoryResult<CrateLineItem> {
        input.validate()?;
        let index = self.crate_index(crate_id)?;
        let crate_item = &mut self.snapshot.crates[index];
        transition(crate_item.status, CrateStatus::Rechecked)?;

        if crate_item.original_weight_kg.is_none() {
            crate_item.original_weight_kg = Some(crate_item.weight_kg);
        }
        if crate_item.original_size.is_none() {
            crate_item.original_size = crate_item.size;
        }
        crate_item.weight_kg = input.weight_kg;
        crate_item.size = Some(input.size);
        crate_item.status = CrateStatus::Rechecked;
        Ok(crate_item.clone())
    }

    /// Put a rechecked crate into an active tank
    pub fn store_crate(&mut self, crate_id: Uuid, tank_id: Uuid) -> InventoryResult<CrateLineItem> {
        self.active_tank(tank_id)?;
        let index = self.crate_index(crate_id)?;
        let crate_item = &mut self.snapshot.crates[index];
        transition(crate_item.status, CrateStatus::Stored)?;

        crate_item.tank_id = Some(tank_id);
        crate_item.status = CrateStatus::Stored;
        Ok(crate_item.clone())
    }

    /// Tip a crate out into its tank (or `tank_id`), moving its weight into a
    /// new loose-stock entry and freeing the crate number
    ///
    /// Returns `None` when the crate was already empty.
    pub fn empty_crate(
        &mut self,
        crate_id: Uuid,
        tank_id: Option<Uuid>,
    ) -> InventoryResult<Option<LooseStock>> {
        let index = self.crate_index(crate_id)?;
        let crate_item = &self.snapshot.crates[index];
        transition(crate_item.status, CrateStatus::Emptied)?;

        let target_tank = tank_id.or(crate_item.tank_id).ok_or_else(|| {
            InventoryError::Validation("A tank is required to hold loose stock".to_string())
        })?;
        self.active_tank(target_tank)?;

        let crate_item = &mut self.snapshot.crates[index];
        let weight = crate_item.weight_kg;
        crate_item.weight_kg = Decimal::ZERO;
        crate_item.status = CrateStatus::Emptied;

        if weight <= Decimal::ZERO {
            return Ok(None);
        }

        let loose = LooseStock {
            id: Uuid::new_v4(),
            tank_id: Some(target_tank),
            size: crate_item.size,
            weight_kg: weight,
            origin_crate_id: Some(crate_item.id),
            boat_name: crate_item.boat_name.clone(),
            offload_date: crate_item.offload_date,
            status: LooseStockStatus::Stored,
        };
        self.snapshot.loose_stock.push(loose.clone());
        Ok(Some(loose))
    }

    /// Write off weight from a crate or loose stock
    ///
    /// The stock weight is clamped at zero and the loss records what was
    /// actually written off. A crate written down to nothing is retired as
    /// emptied; loose stock written down to nothing is retired as dispatched.
    pub fn record_loss(&mut self, input: NewLoss) -> InventoryResult<Loss> {
        input.validate()?;
        let stock = self.resolve_stock(input.crate_id, input.loose_stock_id)?;
        let weight_kg = self.withdrawable(stock, input.weight_kg, CrateStatus::Emptied)?;
        let (tank_id, size) = self.stock_location(stock);

        self.withdraw(stock, weight_kg, CrateStatus::Emptied);

        let loss = Loss {
            id: Uuid::new_v4(),
            date: input.date,
            loss_type: input.loss_type,
            tank_id,
            crate_id: input.crate_id,
            loose_stock_id: input.loose_stock_id,
            size,
            weight_kg,
            notes: input.notes,
        };
        self.snapshot.losses.push(loss.clone());
        Ok(loss)
    }

    /// Dispatch stock from stored crates and loose stock
    ///
    /// All lines are checked before any stock moves, and each stock entry may
    /// appear on one line only. Each withdrawal is clamped at zero, the line
    /// records what was actually taken, and stock emptied by the dispatch is
    /// retired as dispatched.
    pub fn dispatch(&mut self, input: NewDispatch) -> InventoryResult<Dispatch> {
        input.validate()?;
        if input.lines.is_empty() {
            return Err(InventoryError::EmptyDispatch);
        }

        let mut seen = HashSet::with_capacity(input.lines.len());
        let mut picks = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let stock = self.resolve_stock(line.crate_id, line.loose_stock_id)?;
            if !seen.insert(stock) {
                return Err(InventoryError::DuplicateStockReference(self.stock_id(stock)));
            }
            if let StockRef::Crate(index) = stock {
                let status = self.snapshot.crates[index].status;
                if status != CrateStatus::Stored {
                    return Err(InventoryError::InvalidStateTransition {
                        from: status,
                        to: CrateStatus::Dispatched,
                    });
                }
            }
            let weight_kg = self.withdrawable(stock, line.weight_kg, CrateStatus::Dispatched)?;
            let (tank_id, size) = self.stock_location(stock);
            picks.push((
                stock,
                DispatchLineItem {
                    crate_id: line.crate_id,
                    loose_stock_id: line.loose_stock_id,
                    tank_id,
                    size,
                    weight_kg,
                },
            ));
        }

        for (stock, line) in &picks {
            self.withdraw(*stock, line.weight_kg, CrateStatus::Dispatched);
        }

        let line_items: Vec<DispatchLineItem> = picks.into_iter().map(|(_, line)| line).collect();
        let (size_totals, total_weight_kg) = dispatch_totals(&line_items);
        let dispatch = Dispatch {
            id: Uuid::new_v4(),
            dispatch_type: input.dispatch_type,
            client_name: input.client_name,
            awb_number: input.awb_number,
            date: input.date,
            line_items,
            size_totals,
            total_weight_kg,
        };
        self.snapshot.dispatches.push(dispatch.clone());
        Ok(dispatch)
    }

    fn crate_index(&self, crate_id: Uuid) -> InventoryResult<usize> {
        self.snapshot
            .crates
            .iter()
            .position(|c| c.id == crate_id)
            .ok_or(InventoryError::CrateNotFound(crate_id))
    }

    fn loose_index(&self, loose_stock_id: Uuid) -> InventoryResult<usize> {
        self.snapshot
            .loose_stock
            .iter()
            .position(|l| l.id == loose_stock_id)
            .ok_or(InventoryError::LooseStockNotFound(loose_stock_id))
    }

    fn active_tank(&self, tank_id: Uuid) -> InventoryResult<&Tank> {
        let tank = self
            .snapshot
            .tanks
            .iter()
            .find(|t| t.id == tank_id)
            .ok_or(InventoryError::TankNotFound(tank_id))?;
        if !tank.active {
            return Err(InventoryError::TankInactive(tank_id));
        }
        Ok(tank)
    }

    /// Crate takes precedence when both references are given
    fn resolve_stock(
        &self,
        crate_id: Option<Uuid>,
        loose_stock_id: Option<Uuid>,
    ) -> InventoryResult<StockRef> {
        if let Some(crate_id) = crate_id {
            let index = self.crate_index(crate_id)?;
            if !self.snapshot.crates[index].status.is_allocated() {
                return Err(InventoryError::StockRetired(crate_id));
            }
            return Ok(StockRef::Crate(index));
        }
        if let Some(loose_stock_id) = loose_stock_id {
            let index = self.loose_index(loose_stock_id)?;
            if self.snapshot.loose_stock[index].status == LooseStockStatus::Dispatched {
                return Err(InventoryError::StockRetired(loose_stock_id));
            }
            return Ok(StockRef::Loose(index));
        }
        Err(InventoryError::MissingStockReference)
    }

    fn stock_location(&self, stock: StockRef) -> (Option<Uuid>, Option<SizeCategory>) {
        match stock {
            StockRef::Crate(index) => {
                let c = &self.snapshot.crates[index];
                (c.tank_id, c.size)
            }
            StockRef::Loose(index) => {
                let l = &self.snapshot.loose_stock[index];
                (l.tank_id, l.size)
            }
        }
    }

    fn stock_id(&self, stock: StockRef) -> Uuid {
        match stock {
            StockRef::Crate(index) => self.snapshot.crates[index].id,
            StockRef::Loose(index) => self.snapshot.loose_stock[index].id,
        }
    }

    /// Weight a withdrawal can actually take, checking that a crate it would
    /// empty may be retired
    fn withdrawable(
        &self,
        stock: StockRef,
        requested_kg: Decimal,
        crate_retired_as: CrateStatus,
    ) -> InventoryResult<Decimal> {
        match stock {
            StockRef::Crate(index) => {
                let c = &self.snapshot.crates[index];
                if requested_kg >= c.weight_kg {
                    transition(c.status, crate_retired_as)?;
                }
                Ok(requested_kg.min(c.weight_kg))
            }
            StockRef::Loose(index) => Ok(requested_kg.min(self.snapshot.loose_stock[index].weight_kg)),
        }
    }

    fn withdraw(&mut self, stock: StockRef, weight_kg: Decimal, crate_retired_as: CrateStatus) {
        match stock {
            StockRef::Crate(index) => {
                let c = &mut self.snapshot.crates[index];
                c.weight_kg = (c.weight_kg - weight_kg).max(Decimal::ZERO);
                if c.weight_kg.is_zero() {
                    c.status = crate_retired_as;
                }
            }
            StockRef::Loose(index) => {
                let l = &mut self.snapshot.loose_stock[index];
                l.weight_kg = (l.weight_kg - weight_kg).max(Decimal::ZERO);
                if l.weight_kg.is_zero() {
                    l.status = LooseStockStatus::Dispatched;
                }
            }
        }
    }
}

fn transition(from: CrateStatus, to: CrateStatus) -> InventoryResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(InventoryError::InvalidStateTransition { from, to })
    }
}

impl InventoryStore for Inventory {
    fn tanks(&self) -> &[Tank] {
        &self.snapshot.tanks
    }

    fn crates(&self) -> &[CrateLineItem] {
        &self.snapshot.crates
    }

    fn loose_stock(&self) -> &[LooseStock] {
        &self.snapshot.loose_stock
    }

    fn losses(&self) -> &[Loss] {
        &self.snapshot.losses
    }

    fn dispatches(&self) -> &[Dispatch] {
        &self.snapshot.dispatches
    }

    fn offloads(&self) -> &[OffloadRecord] {
        &self.snapshot.offloads
    }
}
