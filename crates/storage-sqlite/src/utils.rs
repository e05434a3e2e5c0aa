//! Conversion helpers between SQLite column values and domain types.

use std::str::FromStr;

use ledgerline_core::Result;
use rust_decimal::Decimal;

use crate::errors::StorageError;

/// Parses a decimal stored as TEXT.
pub fn parse_decimal(value: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::Corrupt(format!("{} '{}' is not a decimal: {}", column, value, e)).into()
    })
}

/// Converts a non-negative INTEGER column to `u32`.
pub fn to_u32(value: i32, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| StorageError::Corrupt(format!("{} is negative: {}", column, value)).into())
}

/// Converts a counter to the INTEGER column type.
pub fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
