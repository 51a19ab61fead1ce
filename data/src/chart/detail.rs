use super::{Metric, bucket_at};
use crate::aggr::DayTotals;
use crate::range::Day;
use crate::util::{format_litres, format_rupees};

/// Which bucket, if any, has its popup open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Showing(usize),
}

impl Selection {
    /// A tap inside the plot opens that bucket; anywhere else leaves things as they are.
    pub fn tap(self, x: f32, width: f32, count: usize) -> Self {
        match bucket_at(x, width, count) {
            Some(index) => Selection::Showing(index),
            None => self,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Idle => None,
            Selection::Showing(index) => Some(index),
        }
    }
}

/// Contents of the tap-to-inspect popup for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketDetail {
    pub day: Day,
    pub litres: f64,
    pub earnings: f64,
}

impl BucketDetail {
    pub fn new(day: Day, totals: DayTotals) -> Self {
        Self {
            day,
            litres: totals.litres,
            earnings: totals.earnings,
        }
    }

    pub fn title(&self) -> String {
        self.day.label()
    }

    pub fn rate(&self) -> Option<f64> {
        (self.litres > 0.0).then(|| self.earnings / self.litres)
    }

    /// Popup lines, the active metric first and the average rate last.
    pub fn lines(&self, metric: Metric) -> Vec<String> {
        let litres = format!("Litres: {}", format_litres(self.litres, 2));
        let earnings = format!("Earnings: {}", format_rupees(self.earnings, 2));

        let mut lines = match metric {
            Metric::Litres => vec![litres, earnings],
            Metric::Earnings => vec![earnings, litres],
        };

        if let Some(rate) = self.rate() {
            lines.push(format!("Avg Rate: {}", format_rupees(rate, 2)));
        }

        lines
    }
}
