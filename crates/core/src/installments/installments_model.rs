//! Installment plan domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::schedule::{period_amount, period_date, regular_share, YearMonth};
use crate::transactions::{LedgerTransaction, NewLedgerTransaction};
use crate::Error;

/// Lifecycle state of a plan. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentStatus::Active => "ACTIVE",
            InstallmentStatus::Completed => "COMPLETED",
            InstallmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InstallmentStatus::Active)
    }

    /// Status implied by a paid counter on a plan that was not cancelled.
    pub fn for_progress(paid_count: u32, period_count: u32) -> Self {
        if paid_count >= period_count {
            InstallmentStatus::Completed
        } else {
            InstallmentStatus::Active
        }
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(InstallmentStatus::Active),
            "COMPLETED" => Ok(InstallmentStatus::Completed),
            "CANCELLED" => Ok(InstallmentStatus::Cancelled),
            _ => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown installment status '{}'",
                s
            )))),
        }
    }
}

/// Domain model representing an installment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub id: String,
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: String,
    pub total_amount: Decimal,
    pub period_count: u32,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    pub paid_count: u32,
    pub status: InstallmentStatus,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl InstallmentPlan {
    /// Regular per-period amount.
    pub fn installment_amount(&self) -> Decimal {
        regular_share(self.total_amount, self.period_count)
    }

    /// Sum of the amounts of the periods recorded as paid.
    pub fn paid_amount(&self) -> Decimal {
        (1..=self.paid_count.min(self.period_count))
            .map(|period| self.amount_for_period(period))
            .sum()
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.total_amount - self.paid_amount()
    }

    /// Amount of the 1-based `period`.
    pub fn amount_for_period(&self, period: u32) -> Decimal {
        period_amount(self.total_amount, self.period_count, period)
    }

    /// Due date of the next unpaid period, if the plan still has one.
    pub fn next_payment_date(&self) -> Option<NaiveDate> {
        if self.status.is_terminal() || self.paid_count >= self.period_count {
            return None;
        }
        period_date(self.start_date, self.payment_day, self.paid_count).ok()
    }

    pub fn stamp(&self) -> ProgressStamp {
        ProgressStamp {
            paid_count: self.paid_count,
            status: self.status,
        }
    }
}

/// How the paid counter of a new plan is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialPaidCount {
    /// Explicit count, clamped to `[0, periodCount]`.
    Manual(u32),
    /// Every period elapsed as of the creation date.
    Auto,
}

impl Default for InitialPaidCount {
    fn default() -> Self {
        InitialPaidCount::Manual(0)
    }
}

/// Input model for creating a new plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallmentPlan {
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: Option<String>,
    pub total_amount: Decimal,
    pub period_count: u32,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    #[serde(default)]
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    #[serde(default)]
    pub initial_paid: InitialPaidCount,
}

/// Partial update of an existing plan. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlanUpdate {
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_shared: Option<bool>,
    /// `Some(None)` clears the member.
    pub paid_by_member_id: Option<Option<String>>,
    pub group_id: Option<String>,
    pub total_amount: Option<Decimal>,
    pub period_count: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub payment_day: Option<u32>,
}

impl InstallmentPlanUpdate {
    /// Whether the update touches the scheduling terms of the plan.
    pub fn changes_terms(&self, plan: &InstallmentPlan) -> bool {
        self.total_amount.is_some_and(|v| v != plan.total_amount)
            || self.period_count.is_some_and(|v| v != plan.period_count)
            || self.start_date.is_some_and(|v| v != plan.start_date)
            || self.payment_day.is_some_and(|v| v != plan.payment_day)
    }
}

/// List filters. `month` selects plans with an unpaid period due in that month.
#[derive(Debug, Clone, Default)]
pub struct InstallmentQuery {
    pub status: Option<InstallmentStatus>,
    pub group_id: Option<String>,
    pub month: Option<YearMonth>,
}

/// Paid counter and status a conditional write expects to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStamp {
    pub paid_count: u32,
    pub status: InstallmentStatus,
}

/// A validated plan ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDraft {
    pub id: String,
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: String,
    pub total_amount: Decimal,
    pub period_count: u32,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    pub paid_count: u32,
    pub status: InstallmentStatus,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
}

/// A new plan together with the transactions for its already paid periods.
#[derive(Debug, Clone)]
pub struct PlanOpening {
    pub draft: PlanDraft,
    pub transactions: Vec<NewLedgerTransaction>,
}

/// A progress transition computed against a known stamp.
///
/// Storage applies it only if the plan still carries `expected`; otherwise the
/// write fails with a concurrent-modification error and nothing is committed.
#[derive(Debug, Clone)]
pub struct PlanProgress {
    pub plan_id: String,
    pub owner_id: String,
    pub expected: ProgressStamp,
    pub next: ProgressStamp,
    pub transactions: Vec<NewLedgerTransaction>,
}

/// A persisted plan and the ledger transactions written with it.
#[derive(Debug, Clone)]
pub struct PlanChange {
    pub plan: InstallmentPlan,
    pub transactions: Vec<LedgerTransaction>,
}

/// Terms for a schedule preview. `as_of` defaults to today.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePreviewRequest {
    pub total_amount: Decimal,
    pub period_count: u32,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPeriod {
    pub index: u32,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub elapsed: bool,
}

/// Full period list of a prospective plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePreview {
    pub total_amount: Decimal,
    pub period_count: u32,
    pub installment_amount: Decimal,
    pub as_of: NaiveDate,
    pub suggested_paid_count: u32,
    pub periods: Vec<PreviewPeriod>,
}
