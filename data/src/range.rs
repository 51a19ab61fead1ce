use crate::config::timezone::{DAY_MS, UserTimezone};

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Longest span a custom range may cover, in days.
pub const MAX_CUSTOM_DAYS: u32 = 732;

const LABEL_FORMAT: &str = "%d %b";
const ENTRY_FORMAT: &str = "%d-%m-%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// A calendar date; the identity of a chart bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn offset(self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(TimeDelta::days(days)).map(Self)
    }

    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Whole days from `self` to `other`, negative when `other` is earlier.
    pub fn days_until(self, other: Day) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Short axis label, e.g. `"05 Mar"`.
    pub fn label(self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }

    /// Accepts `dd-mm-yyyy` or ISO `yyyy-mm-dd`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, ENTRY_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(s, ISO_FORMAT))
            .ok()
            .map(Self)
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ENTRY_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Window {
    Week,
    Fortnight,
    #[default]
    Month,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Week, Window::Fortnight, Window::Month];

    pub fn days(self) -> u32 {
        match self {
            Window::Week => 7,
            Window::Fortnight => 15,
            Window::Month => 30,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Days", self.days())
    }
}

/// The time window the analytics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RangeSelection {
    Last(Window),
    Custom { from: Option<Day>, to: Option<Day> },
}

impl Default for RangeSelection {
    fn default() -> Self {
        RangeSelection::Last(Window::default())
    }
}

impl RangeSelection {
    pub fn is_custom(&self) -> bool {
        matches!(self, RangeSelection::Custom { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Custom range is missing its {0} date")]
    MissingBound(Bound),
    #[error("Custom range starts on {from} after it ends on {to}")]
    Inverted { from: Day, to: Day },
    #[error("Custom range spans {0} days, at most {MAX_CUSTOM_DAYS} allowed")]
    TooLong(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    From,
    To,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::From => write!(f, "start"),
            Bound::To => write!(f, "end"),
        }
    }
}

/// First and last day of the selection, inclusive.
pub fn bounds(selection: RangeSelection, today: Day) -> Result<(Day, Day), RangeError> {
    match selection {
        RangeSelection::Last(window) => {
            let first = today
                .offset(-(i64::from(window.days()) - 1))
                .unwrap_or(today);
            Ok((first, today))
        }
        RangeSelection::Custom { from, to } => {
            let from = from.ok_or(RangeError::MissingBound(Bound::From))?;
            let to = to.ok_or(RangeError::MissingBound(Bound::To))?;

            if from > to {
                return Err(RangeError::Inverted { from, to });
            }

            let span = from.days_until(to) + 1;
            if span > i64::from(MAX_CUSTOM_DAYS) {
                return Err(RangeError::TooLong(span));
            }

            Ok((from, to))
        }
    }
}

/// Every calendar day of the selection, oldest first.
pub fn resolve(selection: RangeSelection, today: Day) -> Result<Vec<Day>, RangeError> {
    let (first, last) = bounds(selection, today)?;

    let mut days = Vec::with_capacity(first.days_until(last) as usize + 1);
    let mut cursor = Some(first);
    while let Some(day) = cursor
        && day <= last
    {
        days.push(day);
        cursor = day.succ();
    }

    Ok(days)
}

/// Like [`resolve`], but an invalid range yields no days at all.
pub fn resolve_or_empty(selection: RangeSelection, today: Day) -> Vec<Day> {
    resolve(selection, today).unwrap_or_else(|err| {
        log::debug!("range {selection:?} resolves to nothing: {err}");
        Vec::new()
    })
}

/// Which records count as inside a resolved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum FilterPolicy {
    /// The record's calendar day lies within the range's first and last day.
    #[default]
    CalendarDay,
    /// Fixed windows admit anything no more than `n` whole days older than
    /// now, later timestamps included; custom ranges run from the start of
    /// the first day to the end of the last.
    Rolling,
}

impl FilterPolicy {
    pub const ALL: [FilterPolicy; 2] = [FilterPolicy::CalendarDay, FilterPolicy::Rolling];

    /// Instant bounds `[start, end]` a timestamp must fall in to be admitted.
    pub fn window(
        self,
        selection: RangeSelection,
        now_ms: u64,
        tz: UserTimezone,
    ) -> Result<(u64, u64), RangeError> {
        let today = tz.day_of(now_ms);

        match (self, selection) {
            (FilterPolicy::Rolling, RangeSelection::Last(window)) => {
                let reach = u64::from(window.days()) * DAY_MS;
                Ok((now_ms.saturating_sub(reach), u64::MAX))
            }
            _ => {
                let (first, last) = bounds(selection, today)?;
                Ok((tz.start_of(first), tz.end_of(last)))
            }
        }
    }
}

impl std::fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterPolicy::CalendarDay => write!(f, "Calendar days"),
            FilterPolicy::Rolling => write!(f, "Rolling window"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn last_week_ends_today() {
        let today = day(2024, 3, 10);
        let days = resolve(RangeSelection::Last(Window::Week), today).unwrap();

        assert_eq!(days.len(), 7);
        assert_eq!(days.first(), Some(&day(2024, 3, 4)));
        assert_eq!(days.last(), Some(&today));
    }

    #[test]
    fn windows_have_fixed_lengths() {
        let today = day(2024, 1, 3);
        for window in Window::ALL {
            let days = resolve(RangeSelection::Last(window), today).unwrap();
            assert_eq!(days.len() as u32, window.days());
            assert!(days.windows(2).all(|w| w[0].succ() == Some(w[1])));
        }
    }

    #[test]
    fn custom_range_is_inclusive() {
        let selection = RangeSelection::Custom {
            from: Some(day(2024, 2, 27)),
            to: Some(day(2024, 3, 2)),
        };
        let labels: Vec<String> = resolve(selection, day(2024, 6, 1))
            .unwrap()
            .into_iter()
            .map(Day::label)
            .collect();

        assert_eq!(labels, ["27 Feb", "28 Feb", "29 Feb", "01 Mar", "02 Mar"]);
    }

    #[test]
    fn single_day_custom_range() {
        let only = day(2024, 5, 5);
        let selection = RangeSelection::Custom {
            from: Some(only),
            to: Some(only),
        };
        assert_eq!(resolve(selection, only).unwrap(), vec![only]);
    }

    #[test]
    fn invalid_custom_ranges() {
        let today = day(2024, 5, 5);

        assert_eq!(
            resolve(
                RangeSelection::Custom {
                    from: None,
                    to: Some(today)
                },
                today
            ),
            Err(RangeError::MissingBound(Bound::From))
        );
        assert_eq!(
            resolve(
                RangeSelection::Custom {
                    from: Some(today),
                    to: None
                },
                today
            ),
            Err(RangeError::MissingBound(Bound::To))
        );

        let from = day(2024, 5, 9);
        assert_eq!(
            resolve(
                RangeSelection::Custom {
                    from: Some(from),
                    to: Some(today)
                },
                today
            ),
            Err(RangeError::Inverted { from, to: today })
        );

        let long = RangeSelection::Custom {
            from: Some(day(2020, 1, 1)),
            to: Some(day(2024, 1, 1)),
        };
        assert!(matches!(resolve(long, today), Err(RangeError::TooLong(_))));
        assert!(resolve_or_empty(long, today).is_empty());
    }

    #[test]
    fn day_parsing_accepts_both_formats() {
        assert_eq!(Day::parse("05-03-2024"), Some(day(2024, 3, 5)));
        assert_eq!(Day::parse(" 2024-03-05 "), Some(day(2024, 3, 5)));
        assert_eq!(Day::parse("31-02-2024"), None);
        assert_eq!(Day::parse(""), None);
        assert_eq!(day(2024, 3, 5).to_string(), "05-03-2024");
    }

    #[test]
    fn calendar_policy_covers_whole_days() {
        let tz = UserTimezone::Utc;
        let today = day(2024, 3, 10);
        let noon = tz.at_hour(today, 12);

        let (start, end) = FilterPolicy::CalendarDay
            .window(RangeSelection::Last(Window::Week), noon, tz)
            .unwrap();

        assert_eq!(start, tz.start_of(day(2024, 3, 4)));
        assert_eq!(end, tz.end_of(today));
    }

    #[test]
    fn rolling_policy_reaches_back_from_now() {
        let tz = UserTimezone::Utc;
        let noon = tz.at_hour(day(2024, 3, 10), 12);

        let (start, end) = FilterPolicy::Rolling
            .window(RangeSelection::Last(Window::Week), noon, tz)
            .unwrap();

        assert_eq!(end, u64::MAX);
        assert_eq!(start, noon - 7 * DAY_MS);
    }

    #[test]
    fn rolling_policy_admits_later_entries_of_today() {
        let tz = UserTimezone::Utc;
        let morning = tz.at_hour(day(2024, 3, 10), 9);
        let evening = tz.at_hour(day(2024, 3, 10), 18);

        let (start, end) = FilterPolicy::Rolling
            .window(RangeSelection::Last(Window::Week), morning, tz)
            .unwrap();

        assert!((start..=end).contains(&evening));
    }
}
