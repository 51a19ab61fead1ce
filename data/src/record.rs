use crate::config::timezone::UserTimezone;
use crate::range::Day;

use store::{CollectionRecord, PaymentStatus, RecordId, Session};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in Liters and Rate.")]
    MissingAmounts,
    #[error("{field} must be a number, got \"{input}\"")]
    InvalidNumber { field: &'static str, input: String },
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("Date must look like dd-mm-yyyy, got \"{0}\"")]
    InvalidDate(String),
    #[error("{0} is in the future")]
    FutureDate(Day),
    #[error("A record for this {0} session already exists today.")]
    Duplicate(Session),
}

/// Raw contents of the add/edit dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm {
    /// The record being edited, `None` when adding.
    pub editing: Option<CollectionRecord>,
    pub date: String,
    pub litres: String,
    pub rate: String,
    pub fat: String,
    pub session: Session,
    pub payment_status: PaymentStatus,
}

impl RecordForm {
    pub fn new(today: Day) -> Self {
        Self {
            date: today.to_string(),
            ..Self::default()
        }
    }

    pub fn edit(record: &CollectionRecord, tz: UserTimezone) -> Self {
        Self {
            editing: Some(record.clone()),
            date: tz.day_of(record.timestamp).to_string(),
            litres: record.quantity_litres.to_string(),
            rate: record.price_per_litre.to_string(),
            fat: record.fat_percentage.to_string(),
            session: record.session,
            payment_status: record.payment_status,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        self.editing.as_ref().and_then(|record| record.id)
    }

    /// Validates the form against the stored records and produces the record to save.
    pub fn build(
        &self,
        existing: &[CollectionRecord],
        now_ms: u64,
        tz: UserTimezone,
    ) -> Result<CollectionRecord, FormError> {
        let litres = parse_amount("Liters", &self.litres)?;
        let rate = parse_amount("Rate", &self.rate)?;
        let fat = parse_amount("Fat", &self.fat)?.unwrap_or(0.0);

        let (litres, rate) = match (litres, rate) {
            (Some(litres), Some(rate)) if litres > 0.0 && rate > 0.0 => (litres, rate),
            _ => return Err(FormError::MissingAmounts),
        };

        let day = Day::parse(&self.date).ok_or_else(|| FormError::InvalidDate(self.date.clone()))?;
        let today = tz.day_of(now_ms);
        if day > today {
            return Err(FormError::FutureDate(day));
        }

        if find_duplicate(existing, day, self.session, self.editing_id(), tz).is_some() {
            return Err(FormError::Duplicate(self.session));
        }

        let timestamp = match &self.editing {
            Some(original) if tz.day_of(original.timestamp) == day => original.timestamp,
            _ if day == today => now_ms,
            _ => tz.at_hour(day, self.session.nominal_hour()),
        };

        let record = match &self.editing {
            Some(original) => CollectionRecord {
                timestamp,
                session: self.session,
                quantity_litres: litres,
                fat_percentage: fat,
                price_per_litre: rate,
                payment_status: self.payment_status,
                updated_at: now_ms,
                ..original.clone()
            },
            None => CollectionRecord::new(timestamp, self.session, litres, fat, rate)
                .with_payment(self.payment_status),
        };

        Ok(record)
    }
}

/// Another record for the same day and session, ignoring `except`.
pub fn find_duplicate(
    records: &[CollectionRecord],
    day: Day,
    session: Session,
    except: Option<RecordId>,
    tz: UserTimezone,
) -> Option<&CollectionRecord> {
    records.iter().find(|record| {
        record.session == session
            && tz.day_of(record.timestamp) == day
            && (except.is_none() || record.id != except)
    })
}

fn parse_amount(field: &'static str, input: &str) -> Result<Option<f64>, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field,
            input: trimmed.to_string(),
        })?;

    if value < 0.0 {
        return Err(FormError::Negative(field));
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TZ: UserTimezone = UserTimezone::Utc;

    fn today() -> Day {
        Day::from_ymd(2024, 3, 10).unwrap()
    }

    fn now() -> u64 {
        TZ.at_hour(today(), 9) + 1_234
    }

    fn form(date: &str, litres: &str, rate: &str) -> RecordForm {
        RecordForm {
            date: date.to_string(),
            litres: litres.to_string(),
            rate: rate.to_string(),
            ..RecordForm::new(today())
        }
    }

    #[test]
    fn today_uses_now_and_past_days_use_the_session_hour() {
        let record = form("10-03-2024", "10", "30").build(&[], now(), TZ).unwrap();
        assert_eq!(record.timestamp, now());
        assert_eq!(record.total_amount(), 300.0);
        assert_eq!(record.fat_percentage, 0.0);

        let mut evening = form("2024-03-08", "8", "32");
        evening.session = Session::Evening;
        let record = evening.build(&[], now(), TZ).unwrap();
        assert_eq!(record.timestamp, TZ.at_hour(Day::from_ymd(2024, 3, 8).unwrap(), 18));
    }

    #[test]
    fn litres_and_rate_are_required() {
        for (litres, rate) in [("", "30"), ("10", ""), ("0", "30"), ("10", "0")] {
            assert_eq!(
                form("10-03-2024", litres, rate).build(&[], now(), TZ),
                Err(FormError::MissingAmounts)
            );
        }
        assert_eq!(
            FormError::MissingAmounts.to_string(),
            "Please fill in Liters and Rate."
        );
    }

    #[test]
    fn bad_numbers_and_dates() {
        assert!(matches!(
            form("10-03-2024", "ten", "30").build(&[], now(), TZ),
            Err(FormError::InvalidNumber { field: "Liters", .. })
        ));
        assert_eq!(
            form("10-03-2024", "-4", "30").build(&[], now(), TZ),
            Err(FormError::Negative("Liters"))
        );
        assert!(matches!(
            form("yesterday", "4", "30").build(&[], now(), TZ),
            Err(FormError::InvalidDate(_))
        ));
        assert_eq!(
            form("11-03-2024", "4", "30").build(&[], now(), TZ),
            Err(FormError::FutureDate(Day::from_ymd(2024, 3, 11).unwrap()))
        );
    }

    #[test]
    fn second_entry_for_a_session_is_rejected() {
        let stored = form("10-03-2024", "10", "30")
            .build(&[], now(), TZ)
            .unwrap()
            .with_id(RecordId(1));
        let existing = vec![stored.clone()];

        let err = form("10-03-2024", "5", "30")
            .build(&existing, now(), TZ)
            .unwrap_err();
        assert_eq!(err, FormError::Duplicate(Session::Morning));
        assert_eq!(
            err.to_string(),
            "A record for this Morning session already exists today."
        );

        let mut evening = form("10-03-2024", "5", "30");
        evening.session = Session::Evening;
        assert!(evening.build(&existing, now(), TZ).is_ok());
    }

    #[test]
    fn editing_is_not_a_duplicate_of_itself() {
        let stored = form("09-03-2024", "10", "30")
            .build(&[], now(), TZ)
            .unwrap()
            .with_id(RecordId(4));
        let existing = vec![stored.clone()];

        let mut edit = RecordForm::edit(&stored, TZ);
        assert_eq!(edit.date, "09-03-2024");
        edit.litres = "12.5".to_string();
        edit.payment_status = PaymentStatus::Paid;

        let updated = edit.build(&existing, now(), TZ).unwrap();
        assert_eq!(updated.id, Some(RecordId(4)));
        assert_eq!(updated.timestamp, stored.timestamp);
        assert_eq!(updated.created_at, stored.created_at);
        assert_eq!(updated.updated_at, now());
        assert_eq!(updated.quantity_litres, 12.5);
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
    }
}
