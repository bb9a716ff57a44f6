//! Property tests for the cost model evaluator

use proptest::prelude::*;
use rust_decimal::Decimal;
use solwind_common::money::round_money;
use solwind_common::{CostCatalog, Technology, UnitLabel};
use solwind_costing::{CostModelEvaluator, UnitPolicy};

/// Decimal with 2 places in [0, max_cents / 100]
fn amount(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

/// Capacity with 1 decimal place in (0, 1000] MW
fn capacity() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000).prop_map(|tenths| Decimal::new(tenths, 1))
}

fn catalog(unit: UnitLabel, costs: &[Decimal]) -> CostCatalog {
    costs
        .iter()
        .enumerate()
        .fold(CostCatalog::new(Technology::CentralizedPv, unit), |c, (i, cost)| {
            c.with_item(format!("category-{}", i), *cost)
        })
}

proptest! {
    #[test]
    fn yuan_per_watt_matches_formula(
        costs in prop::collection::vec(amount(500), 1..8),
        capacity in capacity(),
    ) {
        let evaluator = CostModelEvaluator::default();
        let total = evaluator.total_cost(&catalog(UnitLabel::YuanPerWatt, &costs), capacity).unwrap();

        let sum: Decimal = costs.iter().copied().sum();
        let expected = round_money(capacity * Decimal::new(1_000_000, 0) * sum / Decimal::new(10_000, 0));
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn wan_yuan_per_mw_matches_formula(
        costs in prop::collection::vec(amount(100_000), 1..8),
        capacity in capacity(),
    ) {
        let evaluator = CostModelEvaluator::default();
        let total = evaluator.total_cost(&catalog(UnitLabel::WanYuanPerMw, &costs), capacity).unwrap();

        let sum: Decimal = costs.iter().copied().sum();
        prop_assert_eq!(total, round_money(capacity * sum));
    }

    #[test]
    fn breakdown_drift_is_bounded(
        costs in prop::collection::vec(amount(100_000), 1..12),
        capacity in (1i64..=1_000_000).prop_map(|n| Decimal::new(n, 3)),
        per_watt in any::<bool>(),
    ) {
        let unit = if per_watt { UnitLabel::YuanPerWatt } else { UnitLabel::WanYuanPerMw };
        let catalog = catalog(unit, &costs);
        let evaluator = CostModelEvaluator::default();

        let total = evaluator.total_cost(&catalog, capacity).unwrap();
        let parts: Decimal = evaluator.breakdown(&catalog, capacity).unwrap().values().copied().sum();

        // Each rounded part is off by at most half a cent, plus half a cent on the total
        let bound = Decimal::new(5, 3) * Decimal::from(costs.len() + 1);
        prop_assert!((parts - total).abs() <= bound, "parts {} total {}", parts, total);
    }

    #[test]
    fn unrecognized_unit_policies(
        costs in prop::collection::vec(amount(1_000), 1..4),
        capacity in capacity(),
        label in "[a-z]{1,6}",
    ) {
        let catalog = catalog(UnitLabel::from(label.as_str()), &costs);
        prop_assume!(!catalog.unit.is_catalog_unit());

        let lenient = CostModelEvaluator::new(UnitPolicy::Lenient);
        prop_assert_eq!(lenient.total_cost(&catalog, capacity).unwrap(), Decimal::ZERO);

        let strict = CostModelEvaluator::new(UnitPolicy::Strict);
        prop_assert!(strict.total_cost(&catalog, capacity).is_err());
    }
}
