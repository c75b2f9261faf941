//! Wall-clock interpretation and the source of "now"
//!
//! Log lines store local wall-clock time without a zone tag. A [`Zone`] says
//! how that wall clock maps onto Unix seconds; the same zone is used when
//! stamping new records, when decoding them again, and when the tick planner
//! aligns axis ticks to local midnight.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Time zone used to interpret the wall-clock columns of every log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Zone {
    /// The zone of the running process, daylight saving included
    #[default]
    Local,
    /// A fixed offset east of UTC in seconds
    Fixed {
        /// Seconds east of UTC, must be within ±24h
        offset_secs: i32,
    },
}

impl Zone {
    /// UTC as a fixed zone
    pub const UTC: Zone = Zone::Fixed { offset_secs: 0 };

    /// Whether the zone can be used (fixed offsets must stay below one day)
    pub fn is_valid(&self) -> bool {
        match *self {
            Zone::Local => true,
            Zone::Fixed { offset_secs } => FixedOffset::east_opt(offset_secs).is_some(),
        }
    }

    /// Convert a wall-clock time in this zone to Unix seconds.
    ///
    /// Returns `None` for wall-clock times skipped by a daylight saving jump.
    /// Repeated times resolve to their earlier instant.
    pub fn timestamp(&self, wall_clock: NaiveDateTime) -> Option<i64> {
        match *self {
            Zone::Local => Local
                .from_local_datetime(&wall_clock)
                .earliest()
                .map(|dt| dt.timestamp()),
            Zone::Fixed { offset_secs } => fixed(offset_secs)
                .from_local_datetime(&wall_clock)
                .earliest()
                .map(|dt| dt.timestamp()),
        }
    }

    /// Convert Unix seconds to the wall-clock time of this zone
    pub fn wall_clock(&self, timestamp: i64) -> NaiveDateTime {
        let utc = DateTime::from_timestamp(timestamp, 0).unwrap_or_default();
        match *self {
            Zone::Local => utc.with_timezone(&Local).naive_local(),
            Zone::Fixed { offset_secs } => utc.with_timezone(&fixed(offset_secs)).naive_local(),
        }
    }

    /// Seconds the wall clock is ahead of UTC at the given instant
    pub fn utc_offset(&self, timestamp: i64) -> i32 {
        match *self {
            Zone::Local => {
                let utc = DateTime::from_timestamp(timestamp, 0).unwrap_or_default();
                utc.with_timezone(&Local).offset().fix().local_minus_utc()
            }
            Zone::Fixed { offset_secs } => fixed(offset_secs).local_minus_utc(),
        }
    }
}

fn fixed(offset_secs: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix())
}

/// Source of the current instant in Unix seconds
pub trait Clock {
    /// Current time in seconds since the Unix epoch
    fn now(&self) -> i64;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock frozen at a given instant, for replays and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
