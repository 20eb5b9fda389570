use serde::Serialize;

use super::deriver::CapturedTimestamp;

/// Seconds between consecutive captures, in chronological order.
pub fn frame_intervals(timestamps: &[CapturedTimestamp]) -> Vec<f64> {
    let mut millis: Vec<i64> = timestamps.iter().map(|t| t.epoch_millis()).collect();
    millis.sort_unstable();

    millis
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / 1000.0)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalSummary {
    pub frames: usize,
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub mean_seconds: f64,
    /// Frames per second implied by the mean interval.
    pub frame_rate: Option<f64>,
}

impl IntervalSummary {
    pub fn from_intervals(intervals: &[f64]) -> Option<Self> {
        if intervals.is_empty() {
            return None;
        }

        let min_seconds = intervals.iter().copied().fold(f64::INFINITY, f64::min);
        let max_seconds = intervals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean_seconds = intervals.iter().sum::<f64>() / intervals.len() as f64;
        let frame_rate = (mean_seconds > 0.0).then(|| 1.0 / mean_seconds);

        Some(Self {
            frames: intervals.len() + 1,
            min_seconds,
            max_seconds,
            mean_seconds,
            frame_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::TimestampDeriver;
    use chrono::NaiveDate;

    fn derive_all(names: &[&str]) -> Vec<CapturedTimestamp> {
        let deriver = TimestampDeriver::default();
        let dir = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        names.iter().map(|n| deriver.derive(n, dir).unwrap()).collect()
    }

    #[test]
    fn test_intervals_are_sorted_across_midnight() {
        let stamps = derive_all(&["00_00_00_250", "23_59_59_750", "23_59_59_500"]);
        let intervals = frame_intervals(&stamps);
        assert_eq!(intervals, vec![0.25, 0.5]);
    }

    #[test]
    fn test_summary() {
        let summary = IntervalSummary::from_intervals(&[0.5, 1.0, 1.5]).unwrap();
        assert_eq!(summary.frames, 4);
        assert_eq!(summary.min_seconds, 0.5);
        assert_eq!(summary.max_seconds, 1.5);
        assert_eq!(summary.mean_seconds, 1.0);
        assert_eq!(summary.frame_rate, Some(1.0));
    }

    #[test]
    fn test_summary_of_single_frame_is_none() {
        let stamps = derive_all(&["20_00_00_000"]);
        assert!(frame_intervals(&stamps).is_empty());
        assert!(IntervalSummary::from_intervals(&[]).is_none());
    }
}
