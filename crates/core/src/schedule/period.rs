use chrono::{Datelike, NaiveDate};

use super::{ScheduleError, YearMonth};

/// Number of days in the given month. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 0,
    }
}

/// Day of `month` on which a payment scheduled for `day_of_month` falls.
fn clamped_day(year_month: YearMonth, day_of_month: u32) -> u32 {
    day_of_month
        .clamp(1, 31)
        .min(days_in_month(year_month.year(), year_month.month()))
}

/// Calendar date of the period `period_index` months after `start`'s month.
///
/// The day is `min(day_of_month, days in that month)`, so a plan paying on the
/// 31st lands on Feb 29 in a leap year and on Apr 30.
pub fn period_date(
    start: NaiveDate,
    day_of_month: u32,
    period_index: u32,
) -> Result<NaiveDate, ScheduleError> {
    let out_of_range = || {
        ScheduleError::DateOutOfRange(format!("{} + {} month(s)", start, period_index))
    };
    let target = YearMonth::from_date(start)
        .plus_months(period_index)
        .ok_or_else(out_of_range)?;
    NaiveDate::from_ymd_opt(
        target.year(),
        target.month(),
        clamped_day(target, day_of_month),
    )
    .ok_or_else(out_of_range)
}

/// How many periods of a plan have come due by `now`, capped at `period_count`.
///
/// Counts whole months from `start` to `now`, plus the current month once
/// `now` reaches its (clamped) payment day. Zero when the plan starts after `now`.
pub fn elapsed_periods(
    start: NaiveDate,
    day_of_month: u32,
    period_count: u32,
    now: NaiveDate,
) -> u32 {
    if start > now {
        return 0;
    }

    let current = YearMonth::from_date(now);
    let mut elapsed = current.months_since(YearMonth::from_date(start));
    if now.day() >= clamped_day(current, day_of_month) {
        elapsed += 1;
    }

    u32::try_from(elapsed.max(0))
        .unwrap_or(u32::MAX)
        .min(period_count)
}
