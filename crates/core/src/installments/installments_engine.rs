//! Installment plan lifecycle.
//!
//! Pure functions that validate a transition against the current plan and
//! compute the resulting counters plus the ledger transactions to emit.
//! Persisting the result is the repository's job.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::installments_errors::InstallmentError;
use super::installments_model::{
    InitialPaidCount, InstallmentPlan, InstallmentPlanUpdate, InstallmentStatus,
    NewInstallmentPlan, PlanDraft, PlanOpening, PlanProgress, PreviewPeriod, ProgressStamp,
    SchedulePreview,
};
use crate::constants::{DEFAULT_CATEGORY, MAX_PAYMENT_DAY, MAX_PERIOD_COUNT, MIN_PAYMENT_DAY};
use crate::errors::{Result, ValidationError};
use crate::schedule::{elapsed_periods, period_amount, period_date, regular_share, YearMonth};
use crate::transactions::{installment_key, NewLedgerTransaction, TransactionSource};

/// Checks the scheduling terms shared by creation, update and preview.
pub fn validate_terms(
    total_amount: Decimal,
    period_count: u32,
    payment_day: u32,
) -> std::result::Result<(), InstallmentError> {
    if total_amount <= Decimal::ZERO {
        return Err(InstallmentError::InvalidAmount(total_amount));
    }
    if period_count < 1 || period_count > MAX_PERIOD_COUNT {
        return Err(InstallmentError::InvalidPeriodCount(period_count));
    }
    if !(MIN_PAYMENT_DAY..=MAX_PAYMENT_DAY).contains(&payment_day) {
        return Err(InstallmentError::InvalidPaymentDay(payment_day));
    }
    Ok(())
}

fn non_empty_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("description".to_string()).into());
    }
    Ok(trimmed.to_string())
}

fn category_or_default(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Plan fields needed to build the transaction of one period.
struct PeriodSource<'a> {
    plan_id: &'a str,
    owner_id: &'a str,
    group_id: Option<&'a str>,
    description: &'a str,
    category: &'a str,
    total_amount: Decimal,
    period_count: u32,
    start_date: NaiveDate,
    payment_day: u32,
    is_shared: bool,
    paid_by_member_id: Option<&'a str>,
}

impl<'a> From<&'a InstallmentPlan> for PeriodSource<'a> {
    fn from(plan: &'a InstallmentPlan) -> Self {
        PeriodSource {
            plan_id: &plan.id,
            owner_id: &plan.owner_id,
            group_id: plan.group_id.as_deref(),
            description: &plan.description,
            category: &plan.category,
            total_amount: plan.total_amount,
            period_count: plan.period_count,
            start_date: plan.start_date,
            payment_day: plan.payment_day,
            is_shared: plan.is_shared,
            paid_by_member_id: plan.paid_by_member_id.as_deref(),
        }
    }
}

impl<'a> From<&'a PlanDraft> for PeriodSource<'a> {
    fn from(draft: &'a PlanDraft) -> Self {
        PeriodSource {
            plan_id: &draft.id,
            owner_id: &draft.owner_id,
            group_id: draft.group_id.as_deref(),
            description: &draft.description,
            category: &draft.category,
            total_amount: draft.total_amount,
            period_count: draft.period_count,
            start_date: draft.start_date,
            payment_day: draft.payment_day,
            is_shared: draft.is_shared,
            paid_by_member_id: draft.paid_by_member_id.as_deref(),
        }
    }
}

impl PeriodSource<'_> {
    /// Transaction for the 1-based `period`, dated by the schedule unless overridden.
    fn transaction(&self, period: u32, date: Option<NaiveDate>) -> Result<NewLedgerTransaction> {
        let occurred_on = match date {
            Some(date) => date,
            None => period_date(self.start_date, self.payment_day, period - 1)?,
        };
        Ok(NewLedgerTransaction {
            owner_id: self.owner_id.to_string(),
            group_id: self.group_id.map(str::to_string),
            description: format!("{} ({}/{})", self.description, period, self.period_count),
            category: self.category.to_string(),
            amount: period_amount(self.total_amount, self.period_count, period),
            occurred_on,
            source: TransactionSource::installment(self.plan_id, period, self.period_count),
            is_shared: self.is_shared,
            paid_by_member_id: self.paid_by_member_id.map(str::to_string),
            idempotency_key: installment_key(self.plan_id, period),
        })
    }

    /// Transactions for periods `from..=to`, all dated by the schedule.
    fn transactions(&self, from: u32, to: u32) -> Result<Vec<NewLedgerTransaction>> {
        (from..=to).map(|period| self.transaction(period, None)).collect()
    }
}

/// Validates a new plan and computes its initial progress as of `today`.
pub fn open_plan(id: String, input: NewInstallmentPlan, today: NaiveDate) -> Result<PlanOpening> {
    validate_terms(input.total_amount, input.period_count, input.payment_day)?;
    let description = non_empty_description(&input.description)?;

    let paid_count = match input.initial_paid {
        InitialPaidCount::Manual(count) => count.min(input.period_count),
        InitialPaidCount::Auto => elapsed_periods(
            input.start_date,
            input.payment_day,
            input.period_count,
            today,
        ),
    };
    let status = InstallmentStatus::for_progress(paid_count, input.period_count);
    debug!(
        "Opening plan {} with {}/{} periods paid ({:?})",
        id, paid_count, input.period_count, input.initial_paid
    );

    let draft = PlanDraft {
        id,
        owner_id: input.owner_id,
        group_id: input.group_id,
        description,
        category: category_or_default(input.category),
        total_amount: input.total_amount,
        period_count: input.period_count,
        start_date: input.start_date,
        payment_day: input.payment_day,
        paid_count,
        status,
        is_shared: input.is_shared,
        paid_by_member_id: input.paid_by_member_id,
    };
    let transactions = PeriodSource::from(&draft).transactions(1, paid_count)?;

    Ok(PlanOpening {
        draft,
        transactions,
    })
}

fn ensure_not_cancelled(plan: &InstallmentPlan) -> std::result::Result<(), InstallmentError> {
    if plan.status == InstallmentStatus::Cancelled {
        return Err(InstallmentError::PlanCancelled);
    }
    Ok(())
}

/// Records the next unpaid period, optionally on an explicit payment date.
pub fn advance_one(plan: &InstallmentPlan, payment_date: Option<NaiveDate>) -> Result<PlanProgress> {
    ensure_not_cancelled(plan)?;
    if plan.paid_count >= plan.period_count {
        return Err(InstallmentError::AlreadyComplete(plan.period_count).into());
    }

    let period = plan.paid_count + 1;
    let transaction = PeriodSource::from(plan).transaction(period, payment_date)?;
    debug!("Advancing plan {} to period {}/{}", plan.id, period, plan.period_count);

    Ok(PlanProgress {
        plan_id: plan.id.clone(),
        owner_id: plan.owner_id.clone(),
        expected: plan.stamp(),
        next: ProgressStamp {
            paid_count: period,
            status: InstallmentStatus::for_progress(period, plan.period_count),
        },
        transactions: vec![transaction],
    })
}

/// Records every period up to and including `target`.
pub fn advance_to(plan: &InstallmentPlan, target: u32) -> Result<PlanProgress> {
    ensure_not_cancelled(plan)?;
    if target <= plan.paid_count || target > plan.period_count {
        return Err(InstallmentError::InvalidTarget {
            target,
            paid_count: plan.paid_count,
            period_count: plan.period_count,
        }
        .into());
    }

    let transactions = PeriodSource::from(plan).transactions(plan.paid_count + 1, target)?;
    debug!(
        "Advancing plan {} from {} to {} of {}",
        plan.id, plan.paid_count, target, plan.period_count
    );

    Ok(PlanProgress {
        plan_id: plan.id.clone(),
        owner_id: plan.owner_id.clone(),
        expected: plan.stamp(),
        next: ProgressStamp {
            paid_count: target,
            status: InstallmentStatus::for_progress(target, plan.period_count),
        },
        transactions,
    })
}

/// Moves an active plan to `Cancelled`, leaving its history in place.
pub fn cancel(plan: &InstallmentPlan) -> Result<PlanProgress> {
    match plan.status {
        InstallmentStatus::Cancelled => return Err(InstallmentError::AlreadyCancelled.into()),
        InstallmentStatus::Completed => {
            return Err(InstallmentError::AlreadyComplete(plan.period_count).into())
        }
        InstallmentStatus::Active => {}
    }

    Ok(PlanProgress {
        plan_id: plan.id.clone(),
        owner_id: plan.owner_id.clone(),
        expected: plan.stamp(),
        next: ProgressStamp {
            paid_count: plan.paid_count,
            status: InstallmentStatus::Cancelled,
        },
        transactions: Vec::new(),
    })
}

/// Applies an edit to a copy of `plan`. Progress fields are never touched.
pub fn apply_update(plan: &InstallmentPlan, update: InstallmentPlanUpdate) -> Result<InstallmentPlan> {
    if let Some(group_id) = &update.group_id {
        if plan.group_id.as_deref() != Some(group_id.as_str()) {
            return Err(InstallmentError::GroupImmutable.into());
        }
    }

    let mut updated = plan.clone();
    if update.changes_terms(plan) {
        if plan.status != InstallmentStatus::Active || plan.paid_count > 0 {
            return Err(InstallmentError::TermsLocked.into());
        }
        updated.total_amount = update.total_amount.unwrap_or(plan.total_amount);
        updated.period_count = update.period_count.unwrap_or(plan.period_count);
        updated.start_date = update.start_date.unwrap_or(plan.start_date);
        updated.payment_day = update.payment_day.unwrap_or(plan.payment_day);
        validate_terms(updated.total_amount, updated.period_count, updated.payment_day)?;
    }

    if let Some(description) = update.description {
        updated.description = non_empty_description(&description)?;
    }
    if let Some(category) = update.category {
        updated.category = category_or_default(Some(category));
    }
    if let Some(is_shared) = update.is_shared {
        updated.is_shared = is_shared;
    }
    if let Some(paid_by_member_id) = update.paid_by_member_id {
        updated.paid_by_member_id = paid_by_member_id;
    }

    Ok(updated)
}

/// Plans with an unpaid period falling in `month`.
///
/// Cancelled plans are never due. Read-only: `paid_count` is not consulted
/// beyond deciding whether the month's period was already recorded.
pub fn plans_due_in_month(plans: Vec<InstallmentPlan>, month: YearMonth) -> Vec<InstallmentPlan> {
    plans
        .into_iter()
        .filter(|plan| {
            if plan.status == InstallmentStatus::Cancelled {
                return false;
            }
            let months_passed = month.months_since(YearMonth::from_date(plan.start_date));
            months_passed >= 0
                && months_passed < i64::from(plan.period_count)
                && months_passed >= i64::from(plan.paid_count)
        })
        .collect()
}

/// Period list of a prospective plan as of `now`.
pub fn preview_schedule(
    total_amount: Decimal,
    period_count: u32,
    start_date: NaiveDate,
    payment_day: u32,
    now: NaiveDate,
) -> Result<SchedulePreview> {
    validate_terms(total_amount, period_count, payment_day)?;

    let suggested_paid_count = elapsed_periods(start_date, payment_day, period_count, now);
    let periods = (1..=period_count)
        .map(|index| {
            Ok(PreviewPeriod {
                index,
                date: period_date(start_date, payment_day, index - 1)?,
                amount: period_amount(total_amount, period_count, index),
                elapsed: index <= suggested_paid_count,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SchedulePreview {
        total_amount,
        period_count,
        installment_amount: regular_share(total_amount, period_count),
        as_of: now,
        suggested_paid_count,
        periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_plan(total: Decimal, count: u32, start: NaiveDate, day: u32) -> NewInstallmentPlan {
        NewInstallmentPlan {
            owner_id: "owner-1".to_string(),
            group_id: None,
            description: "Laptop".to_string(),
            category: Some("ELECTRONICS".to_string()),
            total_amount: total,
            period_count: count,
            start_date: start,
            payment_day: day,
            is_shared: false,
            paid_by_member_id: None,
            initial_paid: InitialPaidCount::Manual(0),
        }
    }

    fn plan(paid_count: u32, status: InstallmentStatus) -> InstallmentPlan {
        InstallmentPlan {
            id: "plan-1".to_string(),
            owner_id: "owner-1".to_string(),
            group_id: Some("family".to_string()),
            description: "Sofa".to_string(),
            category: "HOME".to_string(),
            total_amount: dec!(1200),
            period_count: 12,
            start_date: date(2024, 1, 15),
            payment_day: 15,
            paid_count,
            status,
            is_shared: true,
            paid_by_member_id: Some("member-2".to_string()),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn installment_error(err: Error) -> InstallmentError {
        match err {
            Error::Installment(e) => e,
            other => panic!("expected installment error, got {:?}", other),
        }
    }

    #[test]
    fn test_open_plan_auto_seeds_elapsed_periods() {
        let mut input = new_plan(dec!(1200), 12, date(2024, 1, 15), 15);
        input.initial_paid = InitialPaidCount::Auto;

        let opening = open_plan("plan-1".to_string(), input, date(2024, 4, 20)).unwrap();

        assert_eq!(opening.draft.paid_count, 4);
        assert_eq!(opening.draft.status, InstallmentStatus::Active);
        assert_eq!(opening.transactions.len(), 4);
        assert!(opening.transactions.iter().all(|t| t.amount == dec!(100)));
        let dates: Vec<_> = opening.transactions.iter().map(|t| t.occurred_on).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15), date(2024, 4, 15)]
        );
        assert_eq!(opening.transactions[0].description, "Laptop (1/12)");
        assert_eq!(opening.transactions[3].idempotency_key, "installment:plan-1:4");
    }

    #[test]
    fn test_open_plan_manual_count_is_clamped_and_completes() {
        let mut input = new_plan(dec!(300), 3, date(2024, 1, 10), 10);
        input.initial_paid = InitialPaidCount::Manual(7);

        let opening = open_plan("plan-1".to_string(), input, date(2024, 1, 1)).unwrap();

        assert_eq!(opening.draft.paid_count, 3);
        assert_eq!(opening.draft.status, InstallmentStatus::Completed);
        assert_eq!(opening.transactions.len(), 3);
    }

    #[test]
    fn test_paid_amount_sums_recorded_periods() {
        let mut three_way = plan(2, InstallmentStatus::Active);
        three_way.total_amount = dec!(200);
        three_way.period_count = 3;

        assert_eq!(three_way.installment_amount(), dec!(66.66));
        assert_eq!(three_way.paid_amount(), dec!(133.33));
        assert_eq!(three_way.remaining_amount(), dec!(66.67));
    }

    #[test]
    fn test_open_plan_small_total_emits_no_negative_amounts() {
        let mut input = new_plan(dec!(1.50), 100, date(2024, 1, 10), 10);
        input.initial_paid = InitialPaidCount::Manual(100);

        let opening = open_plan("plan-1".to_string(), input, date(2024, 1, 1)).unwrap();

        assert_eq!(opening.transactions.len(), 100);
        assert!(opening.transactions.iter().all(|t| t.amount > Decimal::ZERO));
        let total: Decimal = opening.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(total, dec!(1.50));
        assert_eq!(opening.transactions[99].amount, dec!(0.02));
    }

    #[test]
    fn test_open_plan_validates_terms() {
        let cases = [
            (new_plan(dec!(0), 12, date(2024, 1, 1), 1), "totalAmount"),
            (new_plan(dec!(-5), 12, date(2024, 1, 1), 1), "totalAmount"),
            (new_plan(dec!(100), 0, date(2024, 1, 1), 1), "periodCount"),
            (new_plan(dec!(100), 121, date(2024, 1, 1), 1), "periodCount"),
            (new_plan(dec!(100), 12, date(2024, 1, 1), 0), "paymentDay"),
            (new_plan(dec!(100), 12, date(2024, 1, 1), 32), "paymentDay"),
        ];
        for (input, field) in cases {
            let err = open_plan("p".to_string(), input, date(2024, 1, 1)).unwrap_err();
            assert_eq!(installment_error(err).field(), Some(field));
        }
    }

    #[test]
    fn test_open_plan_defaults_category_and_requires_description() {
        let mut input = new_plan(dec!(100), 2, date(2024, 1, 1), 1);
        input.category = Some("  ".to_string());
        let opening = open_plan("p".to_string(), input, date(2024, 1, 1)).unwrap();
        assert_eq!(opening.draft.category, DEFAULT_CATEGORY);

        let mut input = new_plan(dec!(100), 2, date(2024, 1, 1), 1);
        input.description = "   ".to_string();
        let err = open_plan("p".to_string(), input, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::MissingField(_))));
    }

    #[test]
    fn test_advance_one_emits_next_period() {
        let progress = advance_one(&plan(3, InstallmentStatus::Active), None).unwrap();

        assert_eq!(progress.expected.paid_count, 3);
        assert_eq!(progress.next.paid_count, 4);
        assert_eq!(progress.next.status, InstallmentStatus::Active);
        let tx = &progress.transactions[0];
        assert_eq!(tx.occurred_on, date(2024, 4, 15));
        assert_eq!(tx.description, "Sofa (4/12)");
        assert_eq!(tx.group_id.as_deref(), Some("family"));
        assert_eq!(tx.paid_by_member_id.as_deref(), Some("member-2"));
        assert!(tx.is_shared);
    }

    #[test]
    fn test_advance_one_uses_payment_date_override() {
        let progress =
            advance_one(&plan(0, InstallmentStatus::Active), Some(date(2024, 1, 3))).unwrap();
        assert_eq!(progress.transactions[0].occurred_on, date(2024, 1, 3));
    }

    #[test]
    fn test_advance_one_completes_on_last_period() {
        let progress = advance_one(&plan(11, InstallmentStatus::Active), None).unwrap();
        assert_eq!(progress.next.paid_count, 12);
        assert_eq!(progress.next.status, InstallmentStatus::Completed);
    }

    #[test]
    fn test_advance_one_rejects_terminal_plans() {
        let err = advance_one(&plan(12, InstallmentStatus::Completed), None).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::AlreadyComplete(12));

        let err = advance_one(&plan(4, InstallmentStatus::Cancelled), None).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::PlanCancelled);
    }

    #[test]
    fn test_advance_to_emits_each_missing_period() {
        let progress = advance_to(&plan(2, InstallmentStatus::Active), 5).unwrap();

        assert_eq!(progress.next.paid_count, 5);
        let keys: Vec<_> = progress
            .transactions
            .iter()
            .map(|t| t.idempotency_key.as_str())
            .collect();
        assert_eq!(
            keys,
            vec!["installment:plan-1:3", "installment:plan-1:4", "installment:plan-1:5"]
        );
    }

    #[test]
    fn test_advance_to_rejects_regression() {
        let err = advance_to(&plan(5, InstallmentStatus::Active), 2).unwrap_err();
        assert!(matches!(
            installment_error(err),
            InstallmentError::InvalidTarget { target: 2, paid_count: 5, .. }
        ));

        let err = advance_to(&plan(5, InstallmentStatus::Active), 5).unwrap_err();
        assert!(matches!(installment_error(err), InstallmentError::InvalidTarget { .. }));

        let err = advance_to(&plan(5, InstallmentStatus::Active), 13).unwrap_err();
        assert!(matches!(installment_error(err), InstallmentError::InvalidTarget { .. }));
    }

    #[test]
    fn test_advance_to_rejects_cancelled() {
        let err = advance_to(&plan(5, InstallmentStatus::Cancelled), 6).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::PlanCancelled);
    }

    #[test]
    fn test_advance_to_last_period_completes() {
        let progress = advance_to(&plan(0, InstallmentStatus::Active), 12).unwrap();
        assert_eq!(progress.next.status, InstallmentStatus::Completed);
        let total: Decimal = progress.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(total, dec!(1200));
    }

    #[test]
    fn test_cancel_transitions() {
        let progress = cancel(&plan(4, InstallmentStatus::Active)).unwrap();
        assert_eq!(progress.next.status, InstallmentStatus::Cancelled);
        assert_eq!(progress.next.paid_count, 4);
        assert!(progress.transactions.is_empty());

        let err = cancel(&plan(4, InstallmentStatus::Cancelled)).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::AlreadyCancelled);

        let err = cancel(&plan(12, InstallmentStatus::Completed)).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::AlreadyComplete(12));
    }

    #[test]
    fn test_apply_update_descriptive_fields_on_terminal_plan() {
        let update = InstallmentPlanUpdate {
            description: Some("Corner sofa".to_string()),
            paid_by_member_id: Some(None),
            ..Default::default()
        };
        let updated = apply_update(&plan(12, InstallmentStatus::Completed), update).unwrap();
        assert_eq!(updated.description, "Corner sofa");
        assert_eq!(updated.paid_by_member_id, None);
        assert_eq!(updated.paid_count, 12);
        assert_eq!(updated.status, InstallmentStatus::Completed);
    }

    #[test]
    fn test_apply_update_locks_terms_after_first_payment() {
        let update = InstallmentPlanUpdate {
            total_amount: Some(dec!(1500)),
            ..Default::default()
        };
        let err = apply_update(&plan(1, InstallmentStatus::Active), update.clone()).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::TermsLocked);

        let updated = apply_update(&plan(0, InstallmentStatus::Active), update).unwrap();
        assert_eq!(updated.total_amount, dec!(1500));
    }

    #[test]
    fn test_apply_update_unchanged_terms_are_not_locked() {
        let update = InstallmentPlanUpdate {
            total_amount: Some(dec!(1200)),
            period_count: Some(12),
            group_id: Some("family".to_string()),
            ..Default::default()
        };
        assert!(apply_update(&plan(6, InstallmentStatus::Active), update).is_ok());
    }

    #[test]
    fn test_apply_update_revalidates_terms_and_group() {
        let update = InstallmentPlanUpdate {
            period_count: Some(0),
            ..Default::default()
        };
        let err = apply_update(&plan(0, InstallmentStatus::Active), update).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::InvalidPeriodCount(0));

        let update = InstallmentPlanUpdate {
            group_id: Some("other".to_string()),
            ..Default::default()
        };
        let err = apply_update(&plan(0, InstallmentStatus::Active), update).unwrap_err();
        assert_eq!(installment_error(err), InstallmentError::GroupImmutable);
    }

    #[test]
    fn test_plans_due_in_month() {
        let mut later = plan(0, InstallmentStatus::Active);
        later.id = "later".to_string();
        later.start_date = date(2024, 6, 1);

        let plans = vec![
            plan(2, InstallmentStatus::Active),     // April is period 4, unpaid
            plan(4, InstallmentStatus::Active),     // April already paid
            plan(2, InstallmentStatus::Cancelled),  // never due
            later,                                  // not started
        ];
        let due = plans_due_in_month(plans, YearMonth::new(2024, 4).unwrap());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].paid_count, 2);
    }

    #[test]
    fn test_plans_due_in_month_past_end() {
        let plans = vec![plan(0, InstallmentStatus::Active)];
        assert!(plans_due_in_month(plans.clone(), YearMonth::new(2025, 1).unwrap()).is_empty());
        assert_eq!(plans_due_in_month(plans, YearMonth::new(2024, 12).unwrap()).len(), 1);
    }

    #[test]
    fn test_preview_schedule() {
        let preview =
            preview_schedule(dec!(100), 3, date(2024, 1, 31), 31, date(2024, 2, 29)).unwrap();

        assert_eq!(preview.suggested_paid_count, 2);
        assert_eq!(preview.installment_amount, dec!(33.33));
        let dates: Vec<_> = preview.periods.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
        assert_eq!(preview.periods[2].amount, dec!(33.34));
        assert!(preview.periods[1].elapsed);
        assert!(!preview.periods[2].elapsed);
    }
}
