mod deriver;
mod intervals;

pub use deriver::{directory_date, parse_directory_date, CapturedTimestamp, TimestampDeriver};
pub use intervals::{frame_intervals, IntervalSummary};
