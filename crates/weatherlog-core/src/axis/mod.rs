//! Axis Tick Planner
//!
//! Places time-axis ticks so that they fall on natural calendar boundaries in
//! local time (full hours, midnights, Mondays) regardless of where the first
//! sample of a chart happens to fall.
//!
//! Unix time 0 was a Thursday at 00:00 UTC. Shifting by four days lands on a
//! Monday, and shifting by the local UTC offset lands on local midnight, so
//! `(t - offset) % interval == 0` marks a boundary for every interval that
//! divides a week (and for multiples of a week, counted from 1970-01-05).

mod label;
mod span;

pub use label::format_label;
pub use span::{LabelStyle, SpanKind, DAY, HOUR, MINUTE, MONTH, WEEK, YEAR};

use crate::clock::Zone;

/// Offset that maps tick boundaries onto local Monday midnight.
///
/// Computed once per run from an explicit UTC offset; a chart spanning a
/// daylight saving change keeps the offset of the instant it was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAlignment {
    offset: i64,
}

impl TimeAlignment {
    /// Thursday 1970-01-01 to Monday 1970-01-05
    const EPOCH_TO_MONDAY: i64 = 4 * DAY;

    /// Alignment for a wall clock `utc_offset_secs` ahead of UTC
    pub fn from_utc_offset(utc_offset_secs: i32) -> Self {
        Self {
            offset: Self::EPOCH_TO_MONDAY - i64::from(utc_offset_secs),
        }
    }

    /// Alignment for the offset `zone` has at instant `at`
    pub fn for_zone(zone: Zone, at: i64) -> Self {
        Self::from_utc_offset(zone.utc_offset(at))
    }

    /// Total offset in seconds
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Smallest aligned multiple of `interval` at or after `t`
    pub fn ceil(&self, t: i64, interval: i64) -> i64 {
        let modulo = (t - self.offset).rem_euclid(interval);
        if modulo == 0 {
            t
        } else {
            t - modulo + interval
        }
    }
}

/// A major tick, labelled when it falls on the label interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Position on the time axis
    pub timestamp: i64,
    /// Text under the tick, if it is a labelled one
    pub label: Option<String>,
}

/// Tick positions and labels of one chart's time axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickPlan {
    kind: SpanKind,
    ticks: Vec<Tick>,
    minor_ticks: Vec<i64>,
}

impl TickPlan {
    /// Horizon the plan was made for
    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    /// Major ticks, strictly increasing and `major_tick` apart
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Minor tick positions, strictly increasing and `minor_tick` apart
    pub fn minor_ticks(&self) -> &[i64] {
        &self.minor_ticks
    }

    /// Only the labelled ticks
    pub fn labelled(&self) -> impl Iterator<Item = (i64, &str)> {
        self.ticks
            .iter()
            .filter_map(|t| t.label.as_deref().map(|label| (t.timestamp, label)))
    }

    /// Check if no tick falls inside the window
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// Builds [`TickPlan`]s for a fixed zone and alignment
#[derive(Debug, Clone, Copy)]
pub struct TickPlanner {
    zone: Zone,
    alignment: TimeAlignment,
}

impl TickPlanner {
    /// Planner labelling ticks in `zone` and placing them on `alignment`
    pub fn new(zone: Zone, alignment: TimeAlignment) -> Self {
        Self { zone, alignment }
    }

    /// Planner aligned with the offset `zone` has at instant `at`
    pub fn for_zone(zone: Zone, at: i64) -> Self {
        Self::new(zone, TimeAlignment::for_zone(zone, at))
    }

    /// Alignment the ticks are placed on
    pub fn alignment(&self) -> TimeAlignment {
        self.alignment
    }

    /// Plan the ticks between the first and last of `timestamps`.
    ///
    /// Fewer than two distinct timestamps give an empty plan.
    pub fn plan(&self, timestamps: &[i64], kind: SpanKind) -> TickPlan {
        let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
            return TickPlan {
                kind,
                ticks: Vec::new(),
                minor_ticks: Vec::new(),
            };
        };

        let major = kind.major_tick();
        let label_interval = kind.label_interval();
        let style = kind.label_style();

        let mut ticks = Vec::new();
        let mut tick = self.alignment.ceil(first, major);
        let mut next_label = self.alignment.ceil(first, label_interval);
        while tick < last {
            let label = if tick == next_label {
                next_label += label_interval;
                Some(format_label(self.zone.wall_clock(tick), style))
            } else {
                None
            };
            ticks.push(Tick {
                timestamp: tick,
                label,
            });
            tick += major;
        }

        let minor = kind.minor_tick();
        let mut minor_ticks = Vec::new();
        let mut position = self.alignment.ceil(first, minor);
        while position < last {
            minor_ticks.push(position);
            position += minor;
        }

        TickPlan {
            kind,
            ticks,
            minor_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CET: Zone = Zone::Fixed { offset_secs: 3600 };

    #[test]
    fn test_ceil_to_multiple() {
        let alignment = TimeAlignment::from_utc_offset(0);
        assert_eq!(alignment.offset(), 4 * DAY);
        assert_eq!(alignment.ceil(3600, HOUR), 3600);
        assert_eq!(alignment.ceil(3601, HOUR), 7200);
        // Monday 1970-01-05 00:00 UTC
        assert_eq!(alignment.ceil(1, WEEK), 4 * DAY);
        // before the epoch the modulo stays non-negative
        assert_eq!(alignment.ceil(-10, HOUR), 0);
    }

    #[test]
    fn test_week_ticks_land_on_local_monday_midnight() {
        let alignment = TimeAlignment::for_zone(CET, 0);
        // Sunday 1970-01-04 23:00 UTC is Monday 00:00 CET
        assert_eq!(alignment.ceil(0, WEEK), 4 * DAY - HOUR);
    }

    #[test]
    fn test_single_sample_gives_empty_plan() {
        let planner = TickPlanner::for_zone(Zone::UTC, 0);
        assert!(planner.plan(&[1_000_000], SpanKind::Day).is_empty());
        assert!(planner.plan(&[], SpanKind::Day).is_empty());
    }

    #[test]
    fn test_day_plan_starting_mid_hour() {
        let planner = TickPlanner::for_zone(CET, 0);
        // 2024-10-28 10:00 CET
        let base = 1_730_106_000;
        let start = base + 40 * MINUTE;
        let end = base + 6 * HOUR + 10 * MINUTE;
        let plan = planner.plan(&[start, end], SpanKind::Day);

        let stamps: Vec<i64> = plan.ticks().iter().map(|t| t.timestamp).collect();
        assert_eq!(stamps, (1..=6).map(|i| base + i * HOUR).collect::<Vec<_>>());

        let labels: Vec<Option<&str>> = plan.ticks().iter().map(|t| t.label.as_deref()).collect();
        assert_eq!(
            labels,
            vec![None, Some("12"), None, Some("14"), None, Some("16")]
        );
    }

    #[test]
    fn test_minor_ticks_evenly_spaced() {
        let planner = TickPlanner::for_zone(Zone::UTC, 0);
        let plan = planner.plan(&[100, 3 * HOUR], SpanKind::Day);
        let minor = plan.minor_ticks();
        assert_eq!(minor.first(), Some(&(15 * MINUTE)));
        assert!(minor.windows(2).all(|w| w[1] - w[0] == 15 * MINUTE));
        assert_eq!(minor.len(), 11);
        for tick in plan.ticks() {
            assert!(minor.contains(&tick.timestamp));
        }
    }

    #[test]
    fn test_month_plan_labels_calendar_weeks() {
        let planner = TickPlanner::for_zone(CET, 0);
        // Tuesday 2024-10-01 00:00 CET .. Friday 2024-11-01 00:00 CET
        let start = 1_727_737_200;
        let end = start + 31 * DAY;
        let plan = planner.plan(&[start, end], SpanKind::Month);

        let labels: Vec<&str> = plan.labelled().map(|(_, l)| l).collect();
        assert_eq!(
            labels,
            vec!["CW 41\nOct 07", "CW 42\nOct 14", "CW 43\nOct 21", "CW 44\nOct 28"]
        );
        assert_eq!(plan.ticks()[0].timestamp, start + 6 * DAY);
    }

    #[test]
    fn test_week_plan_labels_every_other_tick() {
        let planner = TickPlanner::for_zone(Zone::UTC, 0);
        // Monday 2024-10-28 00:00 UTC for three days
        let start = 1_730_073_600;
        let plan = planner.plan(&[start, start + 3 * DAY], SpanKind::Week);
        let labels: Vec<Option<&str>> = plan.ticks().iter().map(|t| t.label.as_deref()).collect();
        assert_eq!(
            labels,
            vec![Some("Mon"), None, Some("Tue"), None, Some("Wed"), None]
        );
    }
}
