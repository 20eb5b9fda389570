use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

use crate::config::TimestampConfig;
use crate::error::TimestampError;

const FIELD_DELIMITER: char = '_';

/// Capture instant recovered from a `HH_MM_SS_FFF` frame filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapturedTimestamp {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    /// Calendar date after rollover has been applied.
    pub calendar_date: NaiveDate,
    pub unix_epoch_seconds: i64,
}

impl CapturedTimestamp {
    pub fn naive_utc(&self) -> Option<NaiveDateTime> {
        self.calendar_date
            .and_hms_milli_opt(self.hour, self.minute, self.second, self.millisecond)
    }

    /// Full-precision instant, used for ordering and interval analysis.
    pub fn epoch_millis(&self) -> i64 {
        self.unix_epoch_seconds * 1000 + self.millisecond as i64
    }

    /// Value stored in the 4-byte header field.
    pub fn header_seconds(&self) -> u32 {
        self.unix_epoch_seconds as u32
    }
}

#[derive(Debug, Clone)]
pub struct TimestampDeriver {
    rollover_hour: u32,
}

impl Default for TimestampDeriver {
    fn default() -> Self {
        Self::new(&TimestampConfig::default())
    }
}

impl TimestampDeriver {
    pub fn new(config: &TimestampConfig) -> Self {
        Self {
            rollover_hour: config.rollover_hour,
        }
    }

    pub fn rollover_hour(&self) -> u32 {
        self.rollover_hour
    }

    pub fn derive(
        &self,
        filename: &str,
        directory_date: NaiveDate,
    ) -> Result<CapturedTimestamp, TimestampError> {
        let invalid = || TimestampError::InvalidTimeFields(filename.to_string());

        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?;

        let fields = stem
            .split(FIELD_DELIMITER)
            .map(parse_numeric_field)
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(invalid)?;

        let [hour, minute, second, millisecond] = fields[..] else {
            return Err(invalid());
        };
        if hour > 23 || minute > 59 || second > 59 || millisecond > 999 {
            return Err(invalid());
        }

        let calendar_date = if hour < self.rollover_hour {
            directory_date
                .succ_opt()
                .ok_or_else(|| TimestampError::InvalidDirectoryDate(directory_date.to_string()))?
        } else {
            directory_date
        };

        let instant = calendar_date
            .and_hms_milli_opt(hour, minute, second, millisecond)
            .ok_or_else(invalid)?;

        Ok(CapturedTimestamp {
            hour,
            minute,
            second,
            millisecond,
            calendar_date,
            unix_epoch_seconds: instant.and_utc().timestamp(),
        })
    }
}

fn parse_numeric_field(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parses the `YYYYMMDD` prefix of a nightly batch directory name.
pub fn parse_directory_date(name: &str) -> Result<NaiveDate, TimestampError> {
    let invalid = || TimestampError::InvalidDirectoryDate(name.to_string());

    let prefix = name.get(..8).ok_or_else(invalid)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year = prefix[0..4].parse().map_err(|_| invalid())?;
    let month = prefix[4..6].parse().map_err(|_| invalid())?;
    let day = prefix[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Resolves the batch date from the last component of `dir`.
pub fn directory_date(dir: &Path) -> Result<NaiveDate, TimestampError> {
    let name = match dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => dir
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .ok_or_else(|| TimestampError::InvalidDirectoryDate(dir.display().to_string()))?,
    };
    parse_directory_date(&name)
}
