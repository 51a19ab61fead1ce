use crate::aggr::{self, DailySeries, Summary};
use crate::chart::{BucketDetail, ChartKind, Metric, Selection, ValueAxis, ViewConfig};
use crate::config::timezone::UserTimezone;
use crate::range::{self, Day, FilterPolicy, RangeError, RangeSelection, Window};

use serde::{Deserialize, Serialize};
use store::CollectionRecord;

/// View state of the history screen; everything else is derived from it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryState {
    pub range: RangeSelection,
    pub view: ViewConfig,
    pub policy: FilterPolicy,
    /// Custom bounds, kept while a fixed window is selected.
    pub last_custom: CustomBounds,
    #[serde(skip)]
    pub selection: Selection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomBounds {
    pub from: Option<Day>,
    pub to: Option<Day>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SelectWindow(Window),
    SelectCustom,
    SetCustomFrom(Option<Day>),
    SetCustomTo(Option<Day>),
    SetKind(ChartKind),
    SetMetric(Metric),
    SetPolicy(FilterPolicy),
    Tap { x: f32, width: f32, buckets: usize },
    Dismiss,
    RecordsChanged,
}

impl HistoryState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectWindow(window) => {
                self.range = RangeSelection::Last(window);
                self.selection = Selection::Idle;
            }
            Action::SelectCustom => {
                self.range = RangeSelection::Custom {
                    from: self.last_custom.from,
                    to: self.last_custom.to,
                };
                self.selection = Selection::Idle;
            }
            Action::SetCustomFrom(day) => {
                self.last_custom.from = day;
                self.sync_custom();
            }
            Action::SetCustomTo(day) => {
                self.last_custom.to = day;
                self.sync_custom();
            }
            Action::SetKind(kind) => self.view.kind = kind,
            Action::SetMetric(metric) => self.view.metric = metric,
            Action::SetPolicy(policy) => {
                self.policy = policy;
                self.selection = Selection::Idle;
            }
            Action::Tap { x, width, buckets } => {
                self.selection = self.selection.tap(x, width, buckets);
            }
            Action::Dismiss | Action::RecordsChanged => self.selection = Selection::Idle,
        }
    }

    fn sync_custom(&mut self) {
        if self.range.is_custom() {
            self.range = RangeSelection::Custom {
                from: self.last_custom.from,
                to: self.last_custom.to,
            };
            self.selection = Selection::Idle;
        }
    }

    pub fn custom_bounds(&self) -> Option<CustomBounds> {
        match self.range {
            RangeSelection::Custom { from, to } => Some(CustomBounds { from, to }),
            RangeSelection::Last(_) => None,
        }
    }
}

/// Everything the history screen shows for one state and record snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    pub series: DailySeries,
    pub summary: Summary,
    pub error: Option<RangeError>,
}

impl HistoryView {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn axis(&self, view: &ViewConfig) -> ValueAxis {
        ValueAxis::fit(&self.series.values(view.metric), view.autoscale)
    }

    /// Popup contents for the selection, `None` when the index is stale.
    pub fn detail(&self, selection: Selection) -> Option<BucketDetail> {
        let index = selection.index()?;
        self.series
            .get(index)
            .map(|&(day, totals)| BucketDetail::new(day, totals))
    }
}

pub fn derive(
    state: &HistoryState,
    records: &[CollectionRecord],
    now_ms: u64,
    tz: UserTimezone,
) -> HistoryView {
    let today = tz.day_of(now_ms);

    let window = range::resolve(state.range, today)
        .and_then(|keys| Ok((keys, state.policy.window(state.range, now_ms, tz)?)));

    match window {
        Ok((keys, bounds)) => {
            let filtered = aggr::within(records, bounds);

            HistoryView {
                series: aggr::aggregate(filtered.iter().copied(), &keys, tz),
                summary: Summary::from_records(filtered.iter().copied()),
                error: None,
            }
        }
        Err(err) => {
            log::debug!("history range {:?} is invalid: {err}", state.range);
            HistoryView {
                error: Some(err),
                ..HistoryView::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::Session;

    fn day(y: i32, m: u32, d: u32) -> Day {
        Day::from_ymd(y, m, d).unwrap()
    }

    fn on(day: Day, session: Session, litres: f64, price: f64) -> CollectionRecord {
        CollectionRecord::new(
            UserTimezone::Utc.at_hour(day, session.nominal_hour()),
            session,
            litres,
            4.0,
            price,
        )
    }

    #[test]
    fn default_is_last_thirty_days_bar_litres() {
        let state = HistoryState::default();
        assert_eq!(state.range, RangeSelection::Last(Window::Month));
        assert_eq!(state.view.kind, ChartKind::Bar);
        assert_eq!(state.view.metric, Metric::Litres);
        assert_eq!(state.selection, Selection::Idle);
    }

    #[test]
    fn range_changes_close_the_popup() {
        let mut state = HistoryState::default();

        state.apply(Action::Tap {
            x: 10.0,
            width: 700.0,
            buckets: 10,
        });
        assert_eq!(state.selection, Selection::Showing(0));

        state.apply(Action::SelectWindow(Window::Week));
        assert_eq!(state.selection, Selection::Idle);

        state.apply(Action::Tap {
            x: 100.0,
            width: 700.0,
            buckets: 10,
        });
        state.apply(Action::RecordsChanged);
        assert_eq!(state.selection, Selection::Idle);
    }

    #[test]
    fn metric_switch_keeps_the_popup() {
        let mut state = HistoryState::default();
        state.apply(Action::Tap {
            x: 80.0,
            width: 700.0,
            buckets: 10,
        });
        state.apply(Action::SetMetric(Metric::Earnings));
        state.apply(Action::SetKind(ChartKind::Line));

        assert_eq!(state.selection, Selection::Showing(1));
    }

    #[test]
    fn out_of_range_tap_is_ignored() {
        let mut state = HistoryState::default();
        state.apply(Action::Tap {
            x: 800.0,
            width: 700.0,
            buckets: 10,
        });
        assert_eq!(state.selection, Selection::Idle);
    }

    #[test]
    fn custom_bounds_are_remembered() {
        let mut state = HistoryState::default();

        state.apply(Action::SetCustomFrom(Some(day(2024, 3, 1))));
        assert_eq!(state.range, RangeSelection::Last(Window::Month));

        state.apply(Action::SelectCustom);
        state.apply(Action::SetCustomTo(Some(day(2024, 3, 3))));
        assert_eq!(
            state.range,
            RangeSelection::Custom {
                from: Some(day(2024, 3, 1)),
                to: Some(day(2024, 3, 3)),
            }
        );

        state.apply(Action::SelectWindow(Window::Week));
        state.apply(Action::SelectCustom);
        assert_eq!(
            state.custom_bounds(),
            Some(CustomBounds {
                from: Some(day(2024, 3, 1)),
                to: Some(day(2024, 3, 3)),
            })
        );
    }

    #[test]
    fn derive_buckets_and_summarises() {
        let today = day(2024, 3, 10);
        let now = UserTimezone::Utc.at_hour(today, 20);
        let records = vec![
            on(today, Session::Evening, 8.0, 32.0),
            on(today, Session::Morning, 10.0, 30.0),
            on(day(2024, 3, 1), Session::Morning, 50.0, 30.0),
        ];
        let mut state = HistoryState::default();
        state.apply(Action::SelectWindow(Window::Week));

        let view = derive(&state, &records, now, UserTimezone::Utc);

        assert_eq!(view.series.len(), 7);
        assert_eq!(view.series.values(Metric::Litres)[6], 18.0);
        assert_eq!(view.summary.total_litres, 18.0);
        assert_eq!(view.summary.total_earnings, 556.0);
        assert_eq!(view.error, None);
    }

    #[test]
    fn stale_selection_has_no_detail() {
        let today = day(2024, 3, 10);
        let state = HistoryState {
            range: RangeSelection::Last(Window::Week),
            ..HistoryState::default()
        };
        let view = derive(&state, &[], UserTimezone::Utc.at_hour(today, 9), UserTimezone::Utc);

        assert!(view.detail(Selection::Showing(6)).is_some());
        assert!(view.detail(Selection::Showing(7)).is_none());
        assert!(view.detail(Selection::Idle).is_none());
    }

    #[test]
    fn persisted_state_skips_the_selection() {
        let mut state = HistoryState::default();
        state.apply(Action::SelectCustom);
        state.apply(Action::Tap {
            x: 1.0,
            width: 70.0,
            buckets: 1,
        });

        let json = serde_json::to_string(&state).unwrap();
        let restored: HistoryState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.range, state.range);
        assert_eq!(restored.selection, Selection::Idle);
    }

    #[test]
    fn rolling_week_counts_an_evening_entry_logged_ahead_of_now() {
        let today = day(2024, 3, 10);
        let mut state = HistoryState::default();
        state.apply(Action::SelectWindow(Window::Week));
        state.apply(Action::SetPolicy(FilterPolicy::Rolling));

        let records = [on(today, Session::Evening, 8.0, 30.0)];
        let view = derive(&state, &records, UserTimezone::Utc.at_hour(today, 9), UserTimezone::Utc);

        assert_eq!(view.summary.total_litres, 8.0);
        assert_eq!(view.series.totals_for(today).map(|t| t.litres), Some(8.0));
    }
}
