use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};

// Two-digit year layouts come first: `%Y` would read "24" as year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a day, accepting ISO and day-first European layouts.
///
/// Date-times are accepted too; only their date part is kept.
pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }
    parse_naive_datetime(trimmed)
        .map(|datetime| datetime.date())
        .map_err(|_| anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// Parses a number written with either a decimal point or a decimal comma.
pub fn parse_number(value: &str) -> Result<f64> {
    let normalized = value.trim().replace(',', ".");
    let parsed = normalized
        .parse::<f64>()
        .map_err(|_| anyhow!("Failed to parse '{value}' as number"))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(anyhow!("'{value}' is not a finite number"))
    }
}

/// Renders a float without a trailing `.0` when it is integral.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_accept_iso_and_european_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        for raw in [
            "2024-02-03",
            "03/02/2024",
            "03-02-2024",
            "03.02.2024",
            "2024/02/03",
            " 2024-02-03 08:30:00 ",
            "2024-02-03T08:30:00.250",
            "03.02.24",
        ] {
            assert_eq!(parse_naive_date(raw).unwrap(), expected, "{raw}");
        }
        assert!(parse_naive_date("ieri").is_err());
    }

    #[test]
    fn numbers_accept_decimal_comma() {
        assert_eq!(parse_number("12,5").unwrap(), 12.5);
        assert_eq!(parse_number(" 90 ").unwrap(), 90.0);
        assert!(parse_number("dodici").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn integral_floats_drop_the_fraction() {
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(1.5), "1.5");
    }
}
