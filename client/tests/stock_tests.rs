//! Stock view tests
//!
//! Tests for the aggregated stock views including:
//! - Per-tank and facility-wide size summaries
//! - Boat trip live, loss, dispatch and remaining totals
//! - Crate number availability

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    all_tanks_stock, available_crate_numbers, stock_by_size, tank_stock, CrateLineItem,
    CrateStatus, LooseStock, LooseStockStatus, SizeCategory, Tank,
};
use std::str::FromStr;
use uuid::Uuid;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn tank(number: u32, active: bool) -> Tank {
    Tank {
        id: Uuid::new_v4(),
        number,
        name: format!("T{}", number),
        active,
    }
}

fn crate_in(tank_id: Uuid, number: u32, size: SizeCategory, weight: Decimal, status: CrateStatus) -> CrateLineItem {
    CrateLineItem {
        id: Uuid::new_v4(),
        batch_id: None,
        boat_name: Some("Osprey".to_string()),
        offload_date: Some(date("2024-01-05")),
        product: None,
        crate_number: number,
        size: Some(size),
        weight_kg: weight,
        original_weight_kg: Some(weight),
        original_size: Some(size),
        status,
        tank_id: Some(tank_id),
    }
}

fn loose_in(tank_id: Uuid, size: SizeCategory, weight: Decimal) -> LooseStock {
    LooseStock {
        id: Uuid::new_v4(),
        tank_id: Some(tank_id),
        size: Some(size),
        weight_kg: weight,
        origin_crate_id: None,
        boat_name: Some("Osprey".to_string()),
        offload_date: Some(date("2024-01-05")),
        status: LooseStockStatus::Stored,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// One crate and one loose entry of the same size in T1
    #[test]
    fn test_tank_summary_combines_crates_and_loose_stock() {
        let t1 = tank(1, true);
        let crates = vec![crate_in(t1.id, 1, SizeCategory::A, dec("12.5"), CrateStatus::Stored)];
        let loose = vec![loose_in(t1.id, SizeCategory::A, dec("3.0"))];

        let stock = tank_stock(&t1, &crates, &loose);

        assert_eq!(stock.summary.get(SizeCategory::A), dec("15.5"));
        assert_eq!(stock.summary.total_kg(), dec("15.5"));
        assert_eq!(stock.crates.len(), 1);
        assert_eq!(stock.loose_stock.len(), 1);
        assert_eq!(stock.tank_number, 1);
    }

    #[test]
    fn test_tank_summary_ignores_other_tanks_and_unstored_crates() {
        let t1 = tank(1, true);
        let t2 = tank(2, true);
        let crates = vec![
            crate_in(t1.id, 1, SizeCategory::B, dec("10"), CrateStatus::Stored),
            crate_in(t1.id, 2, SizeCategory::B, dec("7"), CrateStatus::Rechecked),
            crate_in(t1.id, 3, SizeCategory::B, dec("0"), CrateStatus::Stored),
            crate_in(t2.id, 4, SizeCategory::B, dec("9"), CrateStatus::Stored),
        ];

        let stock = tank_stock(&t1, &crates, &[]);

        assert_eq!(stock.crates.len(), 1);
        assert_eq!(stock.summary.total_kg(), dec("10"));
    }

    /// Facility: crates {A:10, B:5}, loose {A:2}
    #[test]
    fn test_stock_by_size_across_facility() {
        let t1 = tank(1, true);
        let t2 = tank(2, true);
        let crates = vec![
            crate_in(t1.id, 1, SizeCategory::A, dec("10"), CrateStatus::Stored),
            crate_in(t2.id, 2, SizeCategory::B, dec("5"), CrateStatus::Stored),
        ];
        let loose = vec![loose_in(t2.id, SizeCategory::A, dec("2"))];

        let summary = stock_by_size(&crates, &loose);

        assert_eq!(summary.get(SizeCategory::A), dec("12"));
        assert_eq!(summary.get(SizeCategory::B), dec("5"));
        assert_eq!(summary.get(SizeCategory::C), Decimal::ZERO);
        assert_eq!(summary.total_kg(), dec("17"));
    }

    #[test]
    fn test_all_tanks_skips_inactive_and_zeroes_empty() {
        let t1 = tank(1, true);
        let t2 = tank(2, false);
        let t3 = tank(3, true);
        let crates = vec![crate_in(t2.id, 1, SizeCategory::A, dec("4"), CrateStatus::Stored)];
        let tanks = vec![t1.clone(), t2, t3.clone()];

        let stock = all_tanks_stock(&tanks, &crates, &[]);

        assert_eq!(stock.len(), 2);
        assert_eq!(stock[0].tank_id, t1.id);
        assert_eq!(stock[1].tank_id, t3.id);
        assert!(stock.iter().all(|s| s.summary.is_empty()));
        assert!(stock.iter().all(|s| s.summary.total_kg().is_zero()));
    }

    #[test]
    fn test_intake_size_not_counted_in_stock() {
        let t1 = tank(1, true);
        let crates = vec![crate_in(t1.id, 1, SizeCategory::M, dec("6"), CrateStatus::Stored)];

        let summary = stock_by_size(&crates, &[]);

        assert!(summary.is_empty());
    }

    #[test]
    fn test_available_crate_numbers_excludes_allocated() {
        let t1 = tank(1, true);
        let crates = vec![
            crate_in(t1.id, 1, SizeCategory::A, dec("5"), CrateStatus::Received),
            crate_in(t1.id, 2, SizeCategory::A, dec("5"), CrateStatus::Rechecked),
            crate_in(t1.id, 3, SizeCategory::A, dec("5"), CrateStatus::Stored),
            crate_in(t1.id, 4, SizeCategory::A, dec("0"), CrateStatus::Emptied),
            crate_in(t1.id, 5, SizeCategory::A, dec("0"), CrateStatus::Dispatched),
        ];

        let available = available_crate_numbers(&crates);

        assert_eq!(available.len(), 297);
        assert_eq!(available[0], 4);
        assert_eq!(available[1], 5);
        assert_eq!(*available.last().unwrap(), 300);
        assert!(!available.contains(&3));
    }

    #[test]
    fn test_emptied_crate_number_becomes_available() {
        let t1 = tank(1, true);
        let mut crates = vec![crate_in(t1.id, 17, SizeCategory::C, dec("11"), CrateStatus::Stored)];
        assert!(!available_crate_numbers(&crates).contains(&17));

        crates[0].status = CrateStatus::Emptied;
        crates[0].weight_kg = Decimal::ZERO;

        assert!(available_crate_numbers(&crates).contains(&17));
        assert_eq!(available_crate_numbers(&crates).len(), 300);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating weights (0.01 to 1000.00 kg)
    fn weight_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating size grades, including the intake-only grade
    fn size_strategy() -> impl Strategy<Value = SizeCategory> {
        prop_oneof![
            Just(SizeCategory::U),
            Just(SizeCategory::A),
            Just(SizeCategory::B),
            Just(SizeCategory::C),
            Just(SizeCategory::D),
            Just(SizeCategory::E),
            Just(SizeCategory::M),
        ]
    }

    fn status_strategy() -> impl Strategy<Value = CrateStatus> {
        prop_oneof![
            Just(CrateStatus::Received),
            Just(CrateStatus::Rechecked),
            Just(CrateStatus::Stored),
            Just(CrateStatus::Emptied),
            Just(CrateStatus::Dispatched),
        ]
    }

    fn build(
        tank_id: Uuid,
        crates: &[(SizeCategory, Decimal, CrateStatus)],
        loose: &[(SizeCategory, Decimal)],
    ) -> (Vec<CrateLineItem>, Vec<LooseStock>) {
        let crates = crates
            .iter()
            .enumerate()
            .map(|(i, (size, weight, status))| crate_in(tank_id, i as u32 + 1, *size, *weight, *status))
            .collect();
        let loose = loose
            .iter()
            .map(|(size, weight)| loose_in(tank_id, *size, *weight))
            .collect();
        (crates, loose)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total always equals the sum of the six buckets
        #[test]
        fn prop_total_equals_bucket_sum(
            crates in prop::collection::vec((size_strategy(), weight_strategy(), status_strategy()), 0..30),
            loose in prop::collection::vec((size_strategy(), weight_strategy()), 0..10)
        ) {
            let t1 = tank(1, true);
            let (crates, loose) = build(t1.id, &crates, &loose);

            let facility = stock_by_size(&crates, &loose);
            let bucket_sum: Decimal = facility.iter().map(|(_, kg)| kg).sum();
            prop_assert_eq!(facility.total_kg(), bucket_sum);

            let per_tank = tank_stock(&t1, &crates, &loose);
            let bucket_sum: Decimal = per_tank.summary.iter().map(|(_, kg)| kg).sum();
            prop_assert_eq!(per_tank.summary.total_kg(), bucket_sum);
            prop_assert_eq!(per_tank.summary, facility);
        }

        /// Buckets are never negative
        #[test]
        fn prop_buckets_non_negative(
            crates in prop::collection::vec((size_strategy(), weight_strategy(), status_strategy()), 0..30)
        ) {
            let t1 = tank(1, true);
            let (crates, loose) = build(t1.id, &crates, &[]);

            let summary = stock_by_size(&crates, &loose);
            for (_, kg) in summary.iter() {
                prop_assert!(kg >= Decimal::ZERO);
            }
        }

        /// Adding a stored crate never decreases any bucket
        #[test]
        fn prop_adding_stock_is_monotonic(
            crates in prop::collection::vec((size_strategy(), weight_strategy(), status_strategy()), 0..20),
            extra_size in size_strategy(),
            extra_weight in weight_strategy()
        ) {
            let t1 = tank(1, true);
            let (mut crates, loose) = build(t1.id, &crates, &[]);
            let before = stock_by_size(&crates, &loose);

            crates.push(crate_in(t1.id, 299, extra_size, extra_weight, CrateStatus::Stored));
            let after = stock_by_size(&crates, &loose);

            for ((_, b), (_, a)) in before.iter().zip(after.iter()) {
                prop_assert!(a >= b);
            }
            prop_assert!(after.total_kg() >= before.total_kg());
        }

        /// Repeated calls over the same data give the same result
        #[test]
        fn prop_views_are_idempotent(
            crates in prop::collection::vec((size_strategy(), weight_strategy(), status_strategy()), 0..20),
            loose in prop::collection::vec((size_strategy(), weight_strategy()), 0..5)
        ) {
            let tanks = vec![tank(1, true), tank(2, false)];
            let (crates, loose) = build(tanks[0].id, &crates, &loose);

            prop_assert_eq!(stock_by_size(&crates, &loose), stock_by_size(&crates, &loose));
            prop_assert_eq!(all_tanks_stock(&tanks, &crates, &loose), all_tanks_stock(&tanks, &crates, &loose));
            prop_assert_eq!(available_crate_numbers(&crates), available_crate_numbers(&crates));
        }

        /// Available numbers are ascending, in range, and never allocated
        #[test]
        fn prop_available_numbers_exclude_allocated(
            statuses in prop::collection::vec(status_strategy(), 0..50)
        ) {
            let t1 = tank(1, true);
            let crates: Vec<CrateLineItem> = statuses
                .iter()
                .enumerate()
                .map(|(i, status)| crate_in(t1.id, i as u32 * 3 + 1, SizeCategory::A, dec("1"), *status))
                .collect();

            let available = available_crate_numbers(&crates);

            prop_assert!(available.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(available.iter().all(|n| (1..=300).contains(n)));
            for c in crates.iter().filter(|c| c.status.is_allocated()) {
                prop_assert!(!available.contains(&c.crate_number));
            }
        }
    }
}
