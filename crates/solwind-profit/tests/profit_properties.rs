//! Property tests for the profit calculator

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use solwind_common::{ProfitInputs, Roi};
use solwind_profit::{ProfitCalculator, TierSchedule};

/// Decimal with 2 places in [0, max_cents / 100]
fn amount(max_cents: i64) -> impl Strategy<Value = Decimal> {
    (0..=max_cents).prop_map(|cents| Decimal::new(cents, 2))
}

fn capacity() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000).prop_map(|tenths| Decimal::new(tenths, 1))
}

/// Explicit fee rate in (0, 1.00]; zero selects the configured default
fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..=100).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn share_is_monotonic(a in amount(2_000_000), b in amount(2_000_000)) {
        let schedule = TierSchedule::contractual();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(schedule.raw_share(low).unwrap() <= schedule.raw_share(high).unwrap());
        prop_assert!(schedule.share(low).unwrap() <= schedule.share(high).unwrap());
    }

    #[test]
    fn share_never_exceeds_total(total in amount(2_000_000)) {
        let share = TierSchedule::contractual().share(total).unwrap();
        prop_assert!(share >= Decimal::ZERO);
        prop_assert!(share <= total);
    }

    #[test]
    fn commission_is_never_negative(
        capacity in capacity(),
        rate in rate(),
        extra in amount(10_000_000),
    ) {
        let calc = ProfitCalculator::default();
        let commission = calc.commission_revenue(capacity, Some(rate), extra).unwrap();
        prop_assert!(commission >= Decimal::ZERO);
    }

    #[test]
    fn commission_is_monotonic(
        c1 in capacity(),
        c2 in capacity(),
        r1 in rate(),
        r2 in rate(),
        e1 in amount(1_000_000),
        e2 in amount(1_000_000),
    ) {
        let calc = ProfitCalculator::default();
        let (c_lo, c_hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        let (r_lo, r_hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        let (e_lo, e_hi) = if e1 <= e2 { (e1, e2) } else { (e2, e1) };

        let commission = |c, r, e| calc.commission_revenue(c, Some(r), e).unwrap();
        prop_assert!(commission(c_lo, r1, e1) <= commission(c_hi, r1, e1));
        prop_assert!(commission(c1, r_lo, e1) <= commission(c1, r_hi, e1));
        prop_assert!(commission(c1, r1, e_lo) >= commission(c1, r1, e_hi));
    }

    #[test]
    fn results_are_consistent(
        capacity in capacity(),
        extra in amount(100_000),
        fee in amount(2_000_000),
        own in amount(1_000_000),
    ) {
        let calc = ProfitCalculator::default();
        let inputs = ProfitInputs::new(capacity)
            .with_extra_investment(extra)
            .with_resource_fee_total(fee)
            .with_own_cost(own);
        let result = calc.analyze(&inputs).unwrap();

        prop_assert_eq!(result.total_revenue, result.commission_revenue + result.resource_share_revenue);
        prop_assert_eq!(result.total_revenue.scale(), 2);
        prop_assert_eq!(result.net_profit.scale(), 2);
        if own.is_zero() {
            prop_assert_eq!(result.roi, Roi::NotApplicable);
            prop_assert_eq!(result.net_profit, result.total_revenue);
        } else {
            prop_assert!(result.roi.is_applicable());
            prop_assert_eq!(result.net_profit, result.total_revenue - own);
        }

        // Same inputs, same outputs
        prop_assert_eq!(calc.analyze(&inputs).unwrap(), result);
    }
}

#[test]
fn test_reference_scenarios() {
    let calc = ProfitCalculator::default();

    let result = calc
        .analyze(&ProfitInputs::new(dec!(50)).with_resource_fee_total(dec!(8000)))
        .unwrap();
    assert_eq!(result.commission_revenue, dec!(500.00));
    assert_eq!(result.resource_share_revenue, dec!(4000.00));
    assert_eq!(result.total_revenue, dec!(4500.00));
    assert_eq!(result.roi, Roi::NotApplicable);

    let result = calc
        .analyze(
            &ProfitInputs::new(dec!(50))
                .with_extra_investment(dec!(600))
                .with_resource_fee_total(dec!(10000))
                .with_own_cost(dec!(2000)),
        )
        .unwrap();
    assert_eq!(result.commission_revenue, dec!(0.00));
    assert_eq!(result.resource_share_revenue, dec!(5333.40));
    // (5333.40 − 2000) / 2000 × 100 = 166.67
    assert_eq!(result.roi, Roi::Percent(dec!(166.67)));
    assert_eq!(result.net_profit, dec!(3333.40));
}

#[test]
fn test_concurrent_callers_agree() {
    let calc = ProfitCalculator::default();
    let inputs = ProfitInputs::new(dec!(88.8))
        .with_extra_investment(dec!(12.34))
        .with_resource_fee_total(dec!(9876.54))
        .with_own_cost(dec!(3210));
    let expected = calc.analyze(&inputs).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| calc.analyze(&inputs).unwrap())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
