use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::MONEY_DECIMAL_PRECISION;

fn one_cent() -> Decimal {
    Decimal::new(1, MONEY_DECIMAL_PRECISION)
}

/// Regular per-period share of `total`, truncated to cents.
///
/// Returns zero when `period_count` is zero.
pub fn regular_share(total: Decimal, period_count: u32) -> Decimal {
    if period_count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(period_count))
        .round_dp_with_strategy(MONEY_DECIMAL_PRECISION, RoundingStrategy::ToZero)
}

/// Amount emitted for the 1-based `period` of an `period_count`-period plan.
///
/// Every period pays the regular share. The cents left over after truncation
/// (always fewer than `period_count`) go one each to the final periods, and any
/// sub-cent residue to the very last one, so amounts never go negative and add
/// up to a non-negative `total` exactly.
pub fn period_amount(total: Decimal, period_count: u32, period: u32) -> Decimal {
    let share = regular_share(total, period_count);
    if period_count == 0 {
        return share;
    }
    let count = Decimal::from(period_count);
    let leftover = total - share * count;
    let extra_cents = (leftover / one_cent()).trunc();

    let mut amount = share;
    if Decimal::from(period_count.saturating_sub(period)) < extra_cents {
        amount += one_cent();
    }
    if period >= period_count {
        amount += leftover - extra_cents * one_cent();
    }
    amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_even_split() {
        assert_eq!(regular_share(dec!(1200), 12), dec!(100));
        assert_eq!(period_amount(dec!(1200), 12, 1), dec!(100));
        assert_eq!(period_amount(dec!(1200), 12, 12), dec!(100));
    }

    #[test]
    fn test_last_period_absorbs_remainder() {
        assert_eq!(regular_share(dec!(100), 3), dec!(33.33));
        assert_eq!(period_amount(dec!(100), 3, 1), dec!(33.33));
        assert_eq!(period_amount(dec!(100), 3, 2), dec!(33.33));
        assert_eq!(period_amount(dec!(100), 3, 3), dec!(33.34));
    }

    #[test]
    fn test_leftover_cents_spread_over_final_periods() {
        // 200 / 3 leaves two cents after truncating to 66.66
        assert_eq!(regular_share(dec!(200), 3), dec!(66.66));
        assert_eq!(period_amount(dec!(200), 3, 1), dec!(66.66));
        assert_eq!(period_amount(dec!(200), 3, 2), dec!(66.67));
        assert_eq!(period_amount(dec!(200), 3, 3), dec!(66.67));
    }

    #[test]
    fn test_tiny_total_never_goes_negative() {
        // 0.10 over 20 periods: ten periods of zero, ten of one cent
        let amounts: Vec<_> = (1..=20).map(|p| period_amount(dec!(0.10), 20, p)).collect();
        assert!(amounts.iter().all(|a| *a >= Decimal::ZERO));
        assert_eq!(amounts[0], dec!(0));
        assert_eq!(amounts[19], dec!(0.01));
        assert_eq!(amounts.iter().sum::<Decimal>(), dec!(0.10));

        let amounts: Vec<_> = (1..=100).map(|p| period_amount(dec!(1.50), 100, p)).collect();
        assert!(amounts.iter().all(|a| *a == dec!(0.01) || *a == dec!(0.02)));
        assert_eq!(amounts.iter().sum::<Decimal>(), dec!(1.50));
    }

    #[test]
    fn test_sub_cent_residue_lands_on_last_period() {
        assert_eq!(period_amount(dec!(10.005), 2, 1), dec!(5.00));
        assert_eq!(period_amount(dec!(10.005), 2, 2), dec!(5.005));
    }

    #[test]
    fn test_amounts_sum_to_total() {
        for (total, count) in [(dec!(999.99), 7), (dec!(0.05), 3), (dec!(12345.67), 120)] {
            let sum: Decimal = (1..=count).map(|p| period_amount(total, count, p)).sum();
            assert_eq!(sum, total, "total {} over {} periods", total, count);
        }
    }

    #[test]
    fn test_single_period() {
        assert_eq!(period_amount(dec!(49.99), 1, 1), dec!(49.99));
    }
}
