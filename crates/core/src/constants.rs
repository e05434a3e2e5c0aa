/// Decimal precision for generated transaction amounts (minor units)
pub const MONEY_DECIMAL_PRECISION: u32 = 2;

/// Upper bound for the number of periods in one installment plan
pub const MAX_PERIOD_COUNT: u32 = 120;

/// Valid range for a payment day-of-month
pub const MIN_PAYMENT_DAY: u32 = 1;
pub const MAX_PAYMENT_DAY: u32 = 31;

/// Calendar years accepted for recurring generation requests
pub const MIN_GENERATION_YEAR: i32 = 1900;
pub const MAX_GENERATION_YEAR: i32 = 9999;

/// How many times a service re-reads and recomputes after a conflicting write
pub const MAX_CONFLICT_RETRIES: usize = 3;

/// Default category for plans created without one
pub const DEFAULT_CATEGORY: &str = "OTHER";
