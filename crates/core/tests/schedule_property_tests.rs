//! Property-based integration tests for schedule math and plan progress.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use ledgerline_core::installments::{advance_one, advance_to, InstallmentPlan, InstallmentStatus};
use ledgerline_core::schedule::{days_in_month, elapsed_periods, period_amount, period_date};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Generates a date between 1990 and 2089.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2090, 1u32..=12, 1u32..=31).prop_map(|(year, month, day)| {
        let day = day.min(days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    })
}

/// Generates a positive amount with two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn plan(period_count: u32, paid_count: u32, start_date: NaiveDate, payment_day: u32) -> InstallmentPlan {
    InstallmentPlan {
        id: "plan".to_string(),
        owner_id: "owner".to_string(),
        group_id: None,
        description: "Plan".to_string(),
        category: "OTHER".to_string(),
        total_amount: Decimal::new(100_000, 2),
        period_count,
        start_date,
        payment_day,
        paid_count,
        status: InstallmentStatus::for_progress(paid_count, period_count),
        is_shared: false,
        paid_by_member_id: None,
        created_at: NaiveDateTime::default(),
        updated_at: NaiveDateTime::default(),
    }
}

// =============================================================================
// Period arithmetic
// =============================================================================

proptest! {
    /// The computed day never exceeds the length of the resulting month.
    #[test]
    fn prop_period_date_is_clamped(start in arb_date(), day in 1u32..=31, index in 0u32..240) {
        let date = period_date(start, day, index).unwrap();
        prop_assert!(date.day() <= days_in_month(date.year(), date.month()));
        prop_assert_eq!(date.day(), day.min(days_in_month(date.year(), date.month())));
    }

    /// Period `i` lands exactly `i` calendar months after the start month.
    #[test]
    fn prop_period_date_month_offset(start in arb_date(), day in 1u32..=31, index in 0u32..240) {
        let date = period_date(start, day, index).unwrap();
        let offset = (date.year() - start.year()) * 12 + date.month() as i32 - start.month() as i32;
        prop_assert_eq!(offset, index as i32);
    }
}

// =============================================================================
// Elapsed-period calculator
// =============================================================================

proptest! {
    /// The count is bounded by `[0, period_count]`.
    #[test]
    fn prop_elapsed_is_bounded(
        start in arb_date(),
        now in arb_date(),
        day in 1u32..=31,
        count in 1u32..=120,
    ) {
        let elapsed = elapsed_periods(start, day, count, now);
        prop_assert!(elapsed <= count);
        if start > now {
            prop_assert_eq!(elapsed, 0);
        }
    }

    /// The count never decreases as `now` advances.
    #[test]
    fn prop_elapsed_is_monotonic(
        start in arb_date(),
        now in arb_date(),
        step in 0i64..800,
        day in 1u32..=31,
        count in 1u32..=120,
    ) {
        let later = now + chrono::Duration::days(step);
        prop_assert!(elapsed_periods(start, day, count, now) <= elapsed_periods(start, day, count, later));
    }

    /// Every counted period has a scheduled date on or before `now`.
    #[test]
    fn prop_elapsed_periods_are_due(
        start in arb_date(),
        now in arb_date(),
        day in 1u32..=31,
        count in 1u32..=120,
    ) {
        let elapsed = elapsed_periods(start, day, count, now);
        if elapsed > 0 {
            prop_assert!(period_date(start, day, elapsed - 1).unwrap() <= now);
        }
    }
}

// =============================================================================
// Amortization and progress
// =============================================================================

proptest! {
    /// Generated amounts add up to the plan total.
    #[test]
    fn prop_amounts_sum_to_total(total in arb_amount(), count in 1u32..=120) {
        let sum: Decimal = (1..=count).map(|p| period_amount(total, count, p)).sum();
        prop_assert_eq!(sum, total);
    }

    /// No period pays a negative amount, and periods differ by at most a cent.
    #[test]
    fn prop_period_amounts_are_non_negative(
        total in prop_oneof![arb_amount(), (1i64..500).prop_map(|cents| Decimal::new(cents, 2))],
        count in 1u32..=120,
    ) {
        let amounts: Vec<Decimal> = (1..=count).map(|p| period_amount(total, count, p)).collect();
        for amount in &amounts {
            prop_assert!(*amount >= Decimal::ZERO, "negative period amount {}", amount);
        }
        let min = amounts.iter().min().copied().unwrap_or_default();
        let max = amounts.iter().max().copied().unwrap_or_default();
        prop_assert!(max - min <= Decimal::new(1, 2));
    }

    /// Advancing never lowers the paid counter and completes exactly at the end.
    #[test]
    fn prop_progress_never_regresses(
        count in 1u32..=36,
        paid in 0u32..=36,
        target in 0u32..=40,
        start in arb_date(),
        day in 1u32..=31,
    ) {
        let paid = paid.min(count);
        let current = plan(count, paid, start, day);

        match advance_to(&current, target) {
            Ok(progress) => {
                prop_assert!(target > paid && target <= count);
                prop_assert_eq!(progress.next.paid_count, target);
                prop_assert_eq!(progress.transactions.len() as u32, target - paid);
                prop_assert_eq!(progress.next.status == InstallmentStatus::Completed, target == count);
            }
            Err(_) => prop_assert!(target <= paid || target > count),
        }

        match advance_one(&current, None) {
            Ok(progress) => {
                prop_assert_eq!(progress.next.paid_count, paid + 1);
                prop_assert_eq!(progress.next.status == InstallmentStatus::Completed, paid + 1 == count);
            }
            Err(_) => prop_assert_eq!(paid, count),
        }
    }
}
