use crate::chart::Metric;
use crate::config::timezone::UserTimezone;
use crate::range::Day;

use rustc_hash::FxHashMap;
use store::CollectionRecord;

/// Litres and earnings collected on one day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayTotals {
    pub litres: f64,
    pub earnings: f64,
}

impl DayTotals {
    pub fn add(&mut self, record: &CollectionRecord) {
        self.litres += record.quantity_litres;
        self.earnings += record.total_amount();
    }

    /// Earnings per litre, `None` when nothing was collected.
    pub fn rate(&self) -> Option<f64> {
        (self.litres > 0.0).then(|| self.earnings / self.litres)
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Litres => self.litres,
            Metric::Earnings => self.earnings,
        }
    }
}

/// Per-day totals in the order of the keys they were built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySeries {
    buckets: Vec<(Day, DayTotals)>,
    index: FxHashMap<Day, usize>,
}

impl DailySeries {
    /// Zeroed buckets, one per key. Repeated keys collapse onto the first.
    pub fn with_keys(keys: &[Day]) -> Self {
        let mut buckets = Vec::with_capacity(keys.len());
        let mut index = FxHashMap::default();

        for &day in keys {
            index.entry(day).or_insert_with(|| {
                buckets.push((day, DayTotals::default()));
                buckets.len() - 1
            });
        }

        Self { buckets, index }
    }

    /// Adds the record to its day's bucket; `false` if that day has none.
    pub fn accumulate(&mut self, day: Day, record: &CollectionRecord) -> bool {
        match self.index.get(&day) {
            Some(&i) => {
                self.buckets[i].1.add(record);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(Day, DayTotals)> {
        self.buckets.iter()
    }

    pub fn get(&self, index: usize) -> Option<&(Day, DayTotals)> {
        self.buckets.get(index)
    }

    pub fn totals_for(&self, day: Day) -> Option<&DayTotals> {
        self.index.get(&day).map(|&i| &self.buckets[i].1)
    }

    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.buckets
            .iter()
            .map(|(_, totals)| totals.value(metric))
            .collect()
    }
}

/// Folds records into one bucket per key; records on other days are dropped.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a CollectionRecord>,
    keys: &[Day],
    tz: UserTimezone,
) -> DailySeries {
    let mut series = DailySeries::with_keys(keys);
    let mut dropped = 0usize;

    for record in records {
        if !series.accumulate(tz.day_of(record.timestamp), record) {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::trace!(
            "{dropped} records fell outside the {} day buckets",
            series.len()
        );
    }

    series
}

/// Scalar rollups over a filtered record set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub total_litres: f64,
    pub total_earnings: f64,
    pub avg_fat: f64,
    pub avg_rate: f64,
    pub count: usize,
}

impl Summary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CollectionRecord>) -> Self {
        let mut summary = Summary::default();
        let mut fat_sum = 0.0;
        let mut rate_sum = 0.0;

        for record in records {
            summary.total_litres += record.quantity_litres;
            summary.total_earnings += record.total_amount();
            fat_sum += record.fat_percentage;
            rate_sum += record.price_per_litre;
            summary.count += 1;
        }

        if summary.count > 0 {
            let n = summary.count as f64;
            summary.avg_fat = fat_sum / n;
            summary.avg_rate = rate_sum / n;
        }

        summary
    }
}

/// Records whose timestamp lies in `[start_ms, end_ms]`.
pub fn within(
    records: &[CollectionRecord],
    (start_ms, end_ms): (u64, u64),
) -> Vec<&CollectionRecord> {
    records
        .iter()
        .filter(|record| (start_ms..=end_ms).contains(&record.timestamp))
        .collect()
}
