pub mod conflict_retry;
pub mod time_utils;

pub use conflict_retry::retry_on_conflict;
pub use time_utils::{today_in, Clock, FixedClock, SystemClock};
