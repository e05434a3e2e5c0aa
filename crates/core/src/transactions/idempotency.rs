//! Idempotency keys for generated ledger transactions.
//!
//! Storage keeps these unique, so a (plan, period) or (definition, month)
//! pair can be materialized at most once no matter how often generation runs.

use crate::schedule::YearMonth;

/// Key for period `period_index` (1-based) of an installment plan.
pub fn installment_key(plan_id: &str, period_index: u32) -> String {
    format!("installment:{}:{}", plan_id, period_index)
}

/// Key for the occurrence of a recurring expense in `period`.
pub fn recurring_key(expense_id: &str, period: YearMonth) -> String {
    format!("recurring:{}:{}", expense_id, period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installment_key() {
        assert_eq!(installment_key("plan-1", 3), "installment:plan-1:3");
    }

    #[test]
    fn test_recurring_key_is_zero_padded() {
        let period = YearMonth::new(2024, 3).unwrap();
        assert_eq!(recurring_key("rent", period), "recurring:rent:2024-03");
    }
}
