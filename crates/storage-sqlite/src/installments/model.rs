//! Database models for installment plans.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use ledgerline_core::installments::{InstallmentPlan, InstallmentStatus, PlanDraft};
use ledgerline_core::{Error, Result};

use crate::utils::{parse_decimal, to_i32, to_u32};

/// Database model for installment plans
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::installment_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstallmentPlanDB {
    pub id: String,
    pub owner_id: String,
    pub group_id: Option<String>,
    pub description: String,
    pub category: String,
    pub total_amount: String,
    pub period_count: i32,
    pub start_date: NaiveDate,
    pub payment_day: i32,
    pub paid_count: i32,
    pub status: String,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable columns of a plan. Progress columns are written separately.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::installment_plans)]
#[diesel(treat_none_as_null = true)]
pub struct InstallmentPlanTermsDB {
    pub description: String,
    pub category: String,
    pub total_amount: String,
    pub period_count: i32,
    pub start_date: NaiveDate,
    pub payment_day: i32,
    pub is_shared: bool,
    pub paid_by_member_id: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl InstallmentPlanDB {
    pub fn from_draft(draft: PlanDraft, now: NaiveDateTime) -> Self {
        InstallmentPlanDB {
            id: draft.id,
            owner_id: draft.owner_id,
            group_id: draft.group_id,
            description: draft.description,
            category: draft.category,
            total_amount: draft.total_amount.to_string(),
            period_count: to_i32(draft.period_count),
            start_date: draft.start_date,
            payment_day: to_i32(draft.payment_day),
            paid_count: to_i32(draft.paid_count),
            status: draft.status.as_str().to_string(),
            is_shared: draft.is_shared,
            paid_by_member_id: draft.paid_by_member_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl InstallmentPlanTermsDB {
    pub fn from_plan(plan: InstallmentPlan, now: NaiveDateTime) -> Self {
        InstallmentPlanTermsDB {
            description: plan.description,
            category: plan.category,
            total_amount: plan.total_amount.to_string(),
            period_count: to_i32(plan.period_count),
            start_date: plan.start_date,
            payment_day: to_i32(plan.payment_day),
            is_shared: plan.is_shared,
            paid_by_member_id: plan.paid_by_member_id,
            updated_at: now,
        }
    }
}

impl TryFrom<InstallmentPlanDB> for InstallmentPlan {
    type Error = Error;

    fn try_from(db: InstallmentPlanDB) -> Result<Self> {
        Ok(InstallmentPlan {
            total_amount: parse_decimal(&db.total_amount, "total_amount")?,
            period_count: to_u32(db.period_count, "period_count")?,
            payment_day: to_u32(db.payment_day, "payment_day")?,
            paid_count: to_u32(db.paid_count, "paid_count")?,
            status: db.status.parse::<InstallmentStatus>()?,
            id: db.id,
            owner_id: db.owner_id,
            group_id: db.group_id,
            description: db.description,
            category: db.category,
            start_date: db.start_date,
            is_shared: db.is_shared,
            paid_by_member_id: db.paid_by_member_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
