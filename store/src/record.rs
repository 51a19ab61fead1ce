use enum_map::Enum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum, Serialize, Deserialize)]
pub enum Session {
    #[default]
    Morning,
    Evening,
}

impl Session {
    pub const ALL: [Session; 2] = [Session::Morning, Session::Evening];

    /// Local hour assigned to entries recorded for a day other than today.
    pub fn nominal_hour(self) -> u32 {
        match self {
            Session::Morning => 6,
            Session::Evening => 18,
        }
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Session::Morning => "Morning",
                Session::Evening => "Evening",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            PaymentStatus::Pending => PaymentStatus::Paid,
            PaymentStatus::Paid => PaymentStatus::Pending,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PaymentStatus::Pending => "Pending",
                PaymentStatus::Paid => "Paid",
            }
        )
    }
}

/// One morning or evening milk collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    /// `None` until the store assigns a key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Milliseconds since the epoch.
    pub timestamp: u64,
    pub session: Session,
    pub quantity_litres: f64,
    pub fat_percentage: f64,
    pub price_per_litre: f64,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

impl CollectionRecord {
    pub fn new(
        timestamp: u64,
        session: Session,
        quantity_litres: f64,
        fat_percentage: f64,
        price_per_litre: f64,
    ) -> Self {
        let now = now_millis();
        Self {
            id: None,
            timestamp,
            session,
            quantity_litres,
            fat_percentage,
            price_per_litre,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_payment(mut self, status: PaymentStatus) -> Self {
        self.payment_status = status;
        self
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn total_amount(&self) -> f64 {
        self.quantity_litres * self.price_per_litre
    }
}

pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_amount_follows_inputs() {
        let mut record = CollectionRecord::new(0, Session::Morning, 10.0, 4.2, 30.0);
        assert_eq!(record.total_amount(), 300.0);

        record.quantity_litres = 8.0;
        record.price_per_litre = 32.0;
        assert_eq!(record.total_amount(), 256.0);
    }

    #[test]
    fn new_records_have_no_id_until_assigned() {
        let record = CollectionRecord::new(0, Session::Evening, 1.0, 0.0, 1.0);
        assert_eq!(record.id, None);
        assert_eq!(record.with_id(RecordId(3)).id, Some(RecordId(3)));
    }

    #[test]
    fn legacy_json_without_bookkeeping_fields_loads() {
        let json = r#"{
            "id": 7,
            "timestamp": 1700000000000,
            "session": "Evening",
            "quantity_litres": 8.5,
            "fat_percentage": 4.0,
            "price_per_litre": 32.0
        }"#;
        let record: CollectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(RecordId(7)));
        assert_eq!(record.payment_status, PaymentStatus::Pending);
        assert_eq!(record.created_at, 0);
    }
}
