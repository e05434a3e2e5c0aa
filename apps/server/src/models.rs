//! Request and response bodies of the HTTP API.
//!
//! The wire format keeps the field names clients already use (`installments`,
//! `isFamily`, `paidBy`), which differ from the domain names.

use chrono::{NaiveDate, NaiveDateTime};
use ledgerline_core::installments::{
    InitialPaidCount, InstallmentPlan, InstallmentPlanUpdate, InstallmentStatus,
    NewInstallmentPlan, PlanChange,
};
use ledgerline_core::recurring::{NewRecurringExpense, RecurringExpense, RecurringExpenseUpdate};
use ledgerline_core::transactions::{LedgerTransaction, TransactionSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maps a domain field name to the name used on the wire.
pub fn wire_field_name(field: &str) -> &str {
    match field {
        "periodCount" => "installments",
        "isShared" => "isFamily",
        "paidByMemberId" => "paidBy",
        other => other,
    }
}

// --- Installments ---

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    pub description: String,
    pub category: String,
    pub total_amount: Decimal,
    pub installments: u32,
    pub installment_amount: Decimal,
    pub paid_installments: u32,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    pub next_payment_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
    pub group_id: Option<String>,
    pub is_family: bool,
    pub paid_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InstallmentPlan> for Installment {
    fn from(plan: InstallmentPlan) -> Self {
        Self {
            installment_amount: plan.installment_amount(),
            paid_amount: plan.paid_amount(),
            remaining_amount: plan.remaining_amount(),
            next_payment_date: plan.next_payment_date(),
            id: plan.id,
            description: plan.description,
            category: plan.category,
            total_amount: plan.total_amount,
            installments: plan.period_count,
            paid_installments: plan.paid_count,
            start_date: plan.start_date,
            payment_day: plan.payment_day,
            status: plan.status,
            group_id: plan.group_id,
            is_family: plan.is_shared,
            paid_by: plan.paid_by_member_id,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewInstallment {
    pub description: String,
    pub total_amount: Decimal,
    pub installments: u32,
    pub category: Option<String>,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_family: bool,
    pub paid_by: Option<String>,
    pub initial_paid: Option<u32>,
    #[serde(default)]
    pub auto_mark_paid: bool,
}

impl NewInstallment {
    pub fn into_domain(self, owner_id: String) -> NewInstallmentPlan {
        let initial_paid = if self.auto_mark_paid {
            InitialPaidCount::Auto
        } else {
            InitialPaidCount::Manual(self.initial_paid.unwrap_or(0))
        };
        NewInstallmentPlan {
            owner_id,
            group_id: non_blank(self.group_id),
            description: self.description,
            category: self.category,
            total_amount: self.total_amount,
            period_count: self.installments,
            start_date: self.start_date,
            payment_day: self.payment_day,
            is_shared: self.is_family,
            paid_by_member_id: non_blank(self.paid_by),
            initial_paid,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentUpdate {
    pub description: Option<String>,
    pub category: Option<String>,
    pub total_amount: Option<Decimal>,
    pub installments: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub payment_day: Option<u32>,
    pub group_id: Option<String>,
    pub is_family: Option<bool>,
    /// An empty string clears the member.
    pub paid_by: Option<String>,
}

impl From<InstallmentUpdate> for InstallmentPlanUpdate {
    fn from(update: InstallmentUpdate) -> Self {
        Self {
            description: update.description,
            category: update.category,
            is_shared: update.is_family,
            paid_by_member_id: update.paid_by.map(|p| non_blank(Some(p))),
            group_id: update.group_id,
            total_amount: update.total_amount,
            period_count: update.installments,
            start_date: update.start_date,
            payment_day: update.payment_day,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentListQuery {
    pub status: Option<String>,
    pub group_id: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub total_amount: Decimal,
    pub installments: u32,
    pub start_date: NaiveDate,
    pub payment_day: u32,
    pub as_of: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub payment_date: Option<NaiveDate>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidRequest {
    pub paid_count: u32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentChangeResponse {
    pub installment: Installment,
    pub created_transactions: usize,
    pub message: String,
}

impl InstallmentChangeResponse {
    pub fn new(change: PlanChange, message: String) -> Self {
        Self {
            created_transactions: change.transactions.len(),
            installment: change.plan.into(),
            message,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub installment: Installment,
    pub transaction: Option<Transaction>,
    pub message: String,
}

// --- Recurring expenses ---

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpenseDto {
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub day_of_month: u32,
    pub is_active: bool,
    pub last_generated_month: Option<u32>,
    pub last_generated_year: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<RecurringExpense> for RecurringExpenseDto {
    fn from(expense: RecurringExpense) -> Self {
        Self {
            id: expense.id,
            description: expense.description,
            category: expense.category,
            amount: expense.amount,
            day_of_month: expense.day_of_month,
            is_active: expense.is_active,
            last_generated_month: expense.last_generated_period.map(|p| p.month()),
            last_generated_year: expense.last_generated_period.map(|p| p.year()),
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurring {
    pub description: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub day_of_month: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewRecurring {
    pub fn into_domain(self, owner_id: String) -> NewRecurringExpense {
        NewRecurringExpense {
            owner_id,
            description: self.description,
            category: self.category,
            amount: self.amount,
            day_of_month: self.day_of_month,
            is_active: self.is_active,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecurringUpdate {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub day_of_month: Option<u32>,
    pub is_active: Option<bool>,
}

impl From<RecurringUpdate> for RecurringExpenseUpdate {
    fn from(update: RecurringUpdate) -> Self {
        Self {
            description: update.description,
            category: update.category,
            amount: update.amount,
            day_of_month: update.day_of_month,
            is_active: update.is_active,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecurringListQuery {
    pub active: Option<bool>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GenerateRequest {
    pub month: u32,
    pub year: i32,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub recurring_expense: RecurringExpenseDto,
    pub transaction: Transaction,
    pub message: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAllResponse {
    pub transactions: Vec<Transaction>,
    pub generated: usize,
    pub skipped: usize,
    pub message: String,
}

// --- Ledger ---

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub group_id: Option<String>,
    pub is_family: bool,
    pub paid_by: Option<String>,
    pub source: TransactionSource,
    pub created_at: NaiveDateTime,
}

impl From<LedgerTransaction> for Transaction {
    fn from(t: LedgerTransaction) -> Self {
        Self {
            id: t.id,
            description: t.description,
            category: t.category,
            amount: t.amount,
            date: t.occurred_on,
            group_id: t.group_id,
            is_family: t.is_shared,
            paid_by: t.paid_by_member_id,
            source: t.source,
            created_at: t.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
