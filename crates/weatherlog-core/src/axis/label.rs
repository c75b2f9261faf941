//! Tick label formatting

use chrono::{Datelike, NaiveDateTime};

use super::LabelStyle;

/// Format the label of a tick at the given local wall-clock time
pub fn format_label(wall_clock: NaiveDateTime, style: LabelStyle) -> String {
    match style {
        LabelStyle::Hour => {
            let hour = wall_clock.format("%H").to_string();
            match hour.strip_prefix('0') {
                Some(digit) if !digit.is_empty() => digit.to_string(),
                _ => hour,
            }
        }
        LabelStyle::Weekday => wall_clock.format("%a").to_string(),
        LabelStyle::CalendarWeek => format!(
            "CW {}\n{}",
            wall_clock.iso_week().week(),
            wall_clock.format("%b %d")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_hour_labels_strip_one_leading_zero() {
        assert_eq!(format_label(at(2024, 10, 28, 0), LabelStyle::Hour), "0");
        assert_eq!(format_label(at(2024, 10, 28, 8), LabelStyle::Hour), "8");
        assert_eq!(format_label(at(2024, 10, 28, 10), LabelStyle::Hour), "10");
        assert_eq!(format_label(at(2024, 10, 28, 22), LabelStyle::Hour), "22");
    }

    #[test]
    fn test_weekday_label() {
        assert_eq!(format_label(at(2024, 10, 30, 0), LabelStyle::Weekday), "Wed");
    }

    #[test]
    fn test_calendar_week_label() {
        assert_eq!(
            format_label(at(2024, 10, 28, 0), LabelStyle::CalendarWeek),
            "CW 44\nOct 28"
        );
        // ISO week 1 of 2025 starts on Monday 2024-12-30
        assert_eq!(
            format_label(at(2024, 12, 30, 0), LabelStyle::CalendarWeek),
            "CW 1\nDec 30"
        );
    }
}
