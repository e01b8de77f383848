use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One production operation as recorded in a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub date: NaiveDate,
    pub employee: String,
    pub process: String,
    pub quantity: i64,
    pub duration_minutes: f64,
    #[serde(default)]
    pub machine: Option<String>,
    #[serde(default)]
    pub process_type: Option<String>,
}

impl OperationRecord {
    /// Duration in hours; negative durations count as zero.
    pub fn hours(&self) -> f64 {
        self.duration_minutes.max(0.0) / 60.0
    }

    /// Pieces produced per hour, or zero when no time was recorded.
    pub fn productivity_per_hour(&self) -> f64 {
        if self.duration_minutes <= 0.0 {
            return 0.0;
        }
        self.quantity as f64 / (self.duration_minutes / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quantity: i64, duration_minutes: f64) -> OperationRecord {
        OperationRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            employee: "Anna Bianchi".into(),
            process: "Saldatura".into(),
            quantity,
            duration_minutes,
            machine: None,
            process_type: None,
        }
    }

    #[test]
    fn productivity_is_pieces_per_hour() {
        let record = record(50, 45.0);
        assert!((record.hours() - 0.75).abs() < 1e-9);
        assert!((record.productivity_per_hour() - 66.6666).abs() < 1e-3);
    }

    #[test]
    fn non_positive_durations_yield_zero() {
        assert_eq!(record(10, 0.0).productivity_per_hour(), 0.0);
        assert_eq!(record(10, -30.0).hours(), 0.0);
        assert_eq!(record(10, -30.0).productivity_per_hour(), 0.0);
    }
}
