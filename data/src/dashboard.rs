use crate::config::timezone::UserTimezone;
use crate::range::Day;
use crate::util::{format_litres, format_rupees};

use enum_map::EnumMap;
use store::{CollectionRecord, Session};

/// Number of entries in the "Recent Records" list.
pub const RECENT_RECORDS: usize = 10;

/// What was collected today, one slot per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodaySummary {
    pub day: Option<Day>,
    entries: EnumMap<Session, Option<CollectionRecord>>,
}

impl TodaySummary {
    pub fn get(&self, session: Session) -> Option<&CollectionRecord> {
        self.entries[session].as_ref()
    }

    pub fn card(&self, session: Session) -> SessionCard {
        SessionCard::from(self.get(session))
    }

    pub fn total_litres(&self) -> f64 {
        self.entries
            .values()
            .flatten()
            .map(|record| record.quantity_litres)
            .sum()
    }
}

/// Records dated today, first match per session in the order given.
pub fn today<'a>(
    records: impl IntoIterator<Item = &'a CollectionRecord>,
    now_ms: u64,
    tz: UserTimezone,
) -> TodaySummary {
    let day = tz.day_of(now_ms);
    let mut summary = TodaySummary {
        day: Some(day),
        entries: EnumMap::default(),
    };

    for record in records {
        if tz.day_of(record.timestamp) != day {
            continue;
        }

        if let Some(kept) = &summary.entries[record.session] {
            log::warn!(
                "duplicate {} entry on {day}: keeping {:?}, ignoring {:?}",
                record.session,
                kept.id,
                record.id
            );
        } else {
            summary.entries[record.session] = Some(record.clone());
        }
    }

    summary
}

/// A session tile on the dashboard. A missing entry is not a zero entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCard {
    Missing,
    Recorded { litres: f64, rate: f64 },
}

impl SessionCard {
    pub fn headline(&self) -> String {
        match self {
            SessionCard::Missing => "---".to_string(),
            SessionCard::Recorded { litres, .. } => format_litres(*litres, 1),
        }
    }

    pub fn caption(&self) -> String {
        match self {
            SessionCard::Missing => "No entry".to_string(),
            SessionCard::Recorded { rate, .. } => format!("Rate: {}", format_rupees(*rate, 2)),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SessionCard::Missing)
    }
}

impl From<Option<&CollectionRecord>> for SessionCard {
    fn from(record: Option<&CollectionRecord>) -> Self {
        match record {
            Some(record) => SessionCard::Recorded {
                litres: record.quantity_litres,
                rate: record.price_per_litre,
            },
            None => SessionCard::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::RecordId;

    fn tz() -> UserTimezone {
        UserTimezone::Utc
    }

    fn on(day: Day, session: Session, litres: f64) -> CollectionRecord {
        CollectionRecord::new(tz().at_hour(day, session.nominal_hour()), session, litres, 4.0, 30.0)
    }

    #[test]
    fn missing_evening_is_not_zero() {
        let today_day = Day::from_ymd(2024, 3, 5).unwrap();
        let now = tz().at_hour(today_day, 20);
        let records = vec![on(today_day, Session::Morning, 10.0)];

        let summary = today(&records, now, tz());

        assert_eq!(summary.get(Session::Morning), Some(&records[0]));
        assert_eq!(summary.get(Session::Evening), None);
        assert_eq!(summary.card(Session::Evening).headline(), "---");
        assert_eq!(summary.card(Session::Evening).caption(), "No entry");
        assert_eq!(summary.card(Session::Morning).headline(), "10.0 L");
        assert_eq!(summary.card(Session::Morning).caption(), "Rate: ₹30.00");
    }

    #[test]
    fn zero_litre_entry_is_recorded() {
        let today_day = Day::from_ymd(2024, 3, 5).unwrap();
        let records = vec![on(today_day, Session::Evening, 0.0)];
        let card = today(&records, tz().at_hour(today_day, 21), tz()).card(Session::Evening);

        assert!(!card.is_missing());
        assert_eq!(card.headline(), "0.0 L");
    }

    #[test]
    fn other_days_are_ignored() {
        let today_day = Day::from_ymd(2024, 3, 5).unwrap();
        let yesterday = today_day.offset(-1).unwrap();
        let records = vec![on(yesterday, Session::Morning, 10.0)];

        let summary = today(&records, tz().at_hour(today_day, 7), tz());
        assert_eq!(summary.get(Session::Morning), None);
        assert_eq!(summary.total_litres(), 0.0);
    }

    #[test]
    fn first_duplicate_wins() {
        let today_day = Day::from_ymd(2024, 3, 5).unwrap();
        let records = vec![
            on(today_day, Session::Morning, 10.0).with_id(RecordId(2)),
            on(today_day, Session::Morning, 99.0).with_id(RecordId(1)),
        ];

        let summary = today(&records, tz().at_hour(today_day, 12), tz());
        assert_eq!(summary.get(Session::Morning).and_then(|r| r.id), Some(RecordId(2)));
        assert_eq!(summary.total_litres(), 10.0);
    }
}
