use crate::range::Day;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Which calendar a timestamp is bucketed into.
///
/// Collections are keyed by the local calendar day, so every instant → day and
/// day → instant conversion in the app goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum UserTimezone {
    Utc,
    #[default]
    Local,
}

impl UserTimezone {
    pub const ALL: [UserTimezone; 2] = [UserTimezone::Local, UserTimezone::Utc];

    /// Calendar day the instant falls on.
    pub fn day_of(self, ts_ms: u64) -> Day {
        let ts = ts_ms.min(i64::MAX as u64) as i64;
        let utc = DateTime::<Utc>::from_timestamp_millis(ts).unwrap_or(DateTime::<Utc>::MAX_UTC);

        match self {
            UserTimezone::Utc => Day::new(utc.date_naive()),
            UserTimezone::Local => Day::new(utc.with_timezone(&Local).date_naive()),
        }
    }

    /// First millisecond of `day`.
    pub fn start_of(self, day: Day) -> u64 {
        self.instant_at(day.date().and_time(NaiveTime::MIN))
    }

    /// Last millisecond of `day`.
    pub fn end_of(self, day: Day) -> u64 {
        match day.succ() {
            Some(next) => self.start_of(next).saturating_sub(1),
            None => u64::MAX,
        }
    }

    /// Instant for a wall-clock hour on `day`.
    pub fn at_hour(self, day: Day, hour: u32) -> u64 {
        let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
        self.instant_at(day.date().and_time(time))
    }

    fn instant_at(self, naive: NaiveDateTime) -> u64 {
        let millis = match self {
            UserTimezone::Utc => naive.and_utc().timestamp_millis(),
            UserTimezone::Local => match Local.from_local_datetime(&naive) {
                LocalResult::Single(dt) => dt.timestamp_millis(),
                LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
                // wall-clock gap (DST spring forward), the hour that does exist
                LocalResult::None => {
                    let shifted = naive + chrono::TimeDelta::hours(1);
                    Local
                        .from_local_datetime(&shifted)
                        .earliest()
                        .map_or_else(|| naive.and_utc().timestamp_millis(), |dt| dt.timestamp_millis())
                }
            },
        };

        u64::try_from(millis).unwrap_or_default()
    }
}

impl std::fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserTimezone::Utc => write!(f, "UTC"),
            UserTimezone::Local => {
                let local_offset = chrono::Local::now().offset().local_minus_utc();
                let hours = local_offset / 3600;
                let minutes = (local_offset % 3600) / 60;
                write!(f, "Local (UTC {hours:+03}:{minutes:02})")
            }
        }
    }
}
