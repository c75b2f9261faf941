//! Chart horizons and their tick intervals

use serde::{Deserialize, Serialize};

/// Seconds per minute
pub const MINUTE: i64 = 60;
/// Seconds per hour
pub const HOUR: i64 = 60 * MINUTE;
/// Seconds per day
pub const DAY: i64 = 24 * HOUR;
/// Seconds per week
pub const WEEK: i64 = 7 * DAY;
/// Seconds in the 31-day month horizon
pub const MONTH: i64 = 31 * DAY;
/// Seconds in the 365-day year horizon
pub const YEAR: i64 = 365 * DAY;

/// Horizon of a chart, selecting its tick intervals and label style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// 24 hours
    Day,
    /// 48 hours
    TwoDays,
    /// 7 days
    Week,
    /// 31 days
    Month,
    /// 365 days
    Year,
}

impl SpanKind {
    /// All horizons, shortest first
    pub const ALL: [SpanKind; 5] = [
        SpanKind::Day,
        SpanKind::TwoDays,
        SpanKind::Week,
        SpanKind::Month,
        SpanKind::Year,
    ];

    /// Length of the horizon in seconds
    pub const fn span(self) -> i64 {
        match self {
            Self::Day => DAY,
            Self::TwoDays => 2 * DAY,
            Self::Week => WEEK,
            Self::Month => MONTH,
            Self::Year => YEAR,
        }
    }

    /// Seconds between two minor ticks
    pub const fn minor_tick(self) -> i64 {
        match self {
            Self::Day => 15 * MINUTE,
            Self::TwoDays => 30 * MINUTE,
            Self::Week => 6 * HOUR,
            Self::Month => DAY,
            Self::Year => WEEK,
        }
    }

    /// Seconds between two major ticks
    pub const fn major_tick(self) -> i64 {
        match self {
            Self::Day => HOUR,
            Self::TwoDays => 2 * HOUR,
            Self::Week => 12 * HOUR,
            Self::Month => WEEK,
            Self::Year => 4 * WEEK,
        }
    }

    /// Seconds between two labelled major ticks
    pub const fn label_interval(self) -> i64 {
        match self {
            Self::Day => 2 * HOUR,
            Self::TwoDays => 4 * HOUR,
            Self::Week => DAY,
            Self::Month => WEEK,
            Self::Year => 4 * WEEK,
        }
    }

    /// Caption of the time axis
    pub const fn x_label(self) -> &'static str {
        match self {
            Self::Day | Self::TwoDays => "Daily Hour",
            Self::Week => "Weekday",
            Self::Month | Self::Year => "",
        }
    }

    /// How tick labels are written for this horizon
    pub const fn label_style(self) -> LabelStyle {
        let span = self.span();
        if span < WEEK {
            LabelStyle::Hour
        } else if span < MONTH {
            LabelStyle::Weekday
        } else {
            LabelStyle::CalendarWeek
        }
    }
}

/// Tick label format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Hour of day without leading zero, e.g. `7`, `14`
    Hour,
    /// Weekday abbreviation, e.g. `Wed`
    Weekday,
    /// ISO calendar week and date, e.g. `CW 44\nOct 28`
    CalendarWeek,
}
