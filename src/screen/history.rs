use crate::style;
use crate::widget::chart;

use data::UserTimezone;
use data::chart::{ChartKind, Metric};
use data::history::{self, Action, HistoryState, HistoryView};
use data::range::{Day, FilterPolicy, RangeSelection, Window};
use data::util::{format_litres, format_rupees, format_rupees_grouped};
use store::CollectionRecord;

use iced::widget::{button, column, container, pick_list, row, scrollable, space, text, text_input};
use iced::{Alignment, Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    Apply(Action),
    FromInput(String),
    ToInput(String),
    Chart(chart::Event),
}

impl From<chart::Event> for Message {
    fn from(event: chart::Event) -> Self {
        Message::Chart(event)
    }
}

/// History tab: range controls, summary, chart and daily breakdown.
pub struct History {
    state: HistoryState,
    view: HistoryView,
    from_input: String,
    to_input: String,
}

impl History {
    pub fn new(state: HistoryState) -> Self {
        let bounds = state.last_custom;

        Self {
            state,
            view: HistoryView::default(),
            from_input: bounds.from.map(|day| day.to_string()).unwrap_or_default(),
            to_input: bounds.to.map(|day| day.to_string()).unwrap_or_default(),
        }
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Rebuilds everything shown from scratch.
    pub fn refresh(&mut self, records: &[CollectionRecord], now_ms: u64, tz: UserTimezone) {
        self.view = history::derive(&self.state, records, now_ms, tz);
    }

    pub fn records_changed(&mut self, records: &[CollectionRecord], now_ms: u64, tz: UserTimezone) {
        self.state.apply(Action::RecordsChanged);
        self.refresh(records, now_ms, tz);
    }

    /// Returns whether persisted preferences changed.
    pub fn update(
        &mut self,
        message: Message,
        records: &[CollectionRecord],
        now_ms: u64,
        tz: UserTimezone,
    ) -> bool {
        let action = match message {
            Message::Apply(action) => action,
            Message::FromInput(input) => {
                let day = Day::parse(&input);
                self.from_input = input;
                Action::SetCustomFrom(day)
            }
            Message::ToInput(input) => {
                let day = Day::parse(&input);
                self.to_input = input;
                Action::SetCustomTo(day)
            }
            Message::Chart(chart::Event::Tapped { x, width, buckets }) => {
                Action::Tap { x, width, buckets }
            }
        };

        let before = self.state.clone();
        self.state.apply(action);

        let changed = self.state.range != before.range
            || self.state.view != before.view
            || self.state.policy != before.policy
            || self.state.last_custom != before.last_custom;

        if changed {
            self.refresh(records, now_ms, tz);
        }
        changed
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut controls = column![
            text("History").size(style::TITLE_SIZE),
            self.range_chips(),
        ]
        .spacing(12);

        if let Some(inputs) = self.custom_inputs() {
            controls = controls.push(inputs);
        }
        let controls = controls.push(self.chart_toggles());

        let chart_card = container(
            column![
                text(self.state.view.metric.to_string()).size(style::SUBTITLE_SIZE),
                chart::view(&self.view.series, &self.state.view, self.state.selection),
            ]
            .spacing(8),
        )
        .style(style::card)
        .padding(12)
        .width(Length::Fill);

        let content = column![
            controls,
            self.summary_card(),
            chart_card,
            self.breakdown(),
        ]
        .spacing(16)
        .padding(20);

        scrollable(content).height(Length::Fill).into()
    }

    /// Popup for the tapped bucket, `None` when nothing is selected.
    pub fn popup(&self) -> Option<Element<'_, Message>> {
        let detail = self.view.detail(self.state.selection)?;

        let mut lines = column![text(detail.title()).size(style::SUBTITLE_SIZE)].spacing(6);
        for line in detail.lines(self.state.view.metric) {
            lines = lines.push(text(line).size(style::BODY_SIZE));
        }

        Some(
            lines
                .push(
                    row![
                        space::horizontal(),
                        button(text("Close").size(style::BODY_SIZE))
                            .style(|theme, status| style::button::transparent(theme, status, false))
                            .on_press(Message::Apply(Action::Dismiss)),
                    ],
                )
                .into(),
        )
    }

    fn range_chips(&self) -> Element<'_, Message> {
        let selected = self.state.range;

        let mut chips = row![].spacing(8);
        for window in Window::ALL {
            let is_selected = selected == RangeSelection::Last(window);
            chips = chips.push(
                button(text(window.to_string()).size(style::BODY_SIZE))
                    .style(move |theme, status| style::button::modifier(theme, status, is_selected))
                    .on_press(Message::Apply(Action::SelectWindow(window))),
            );
        }

        let is_custom = selected.is_custom();
        chips
            .push(
                button(text("Custom").size(style::BODY_SIZE))
                    .style(move |theme, status| style::button::modifier(theme, status, is_custom))
                    .on_press(Message::Apply(Action::SelectCustom)),
            )
            .into()
    }

    fn custom_inputs(&self) -> Option<Element<'_, Message>> {
        let bounds = self.state.custom_bounds()?;

        let hint = match self.view.error {
            Some(ref err) if bounds.from.is_some() || bounds.to.is_some() => err.to_string(),
            Some(_) => "Pick a start and end date".to_string(),
            None => String::new(),
        };

        Some(
            row![
                text_input("From (dd-mm-yyyy)", &self.from_input)
                    .on_input(Message::FromInput)
                    .padding(6)
                    .width(160.0),
                text("to").size(style::BODY_SIZE),
                text_input("To (dd-mm-yyyy)", &self.to_input)
                    .on_input(Message::ToInput)
                    .padding(6)
                    .width(160.0),
                text(hint).size(style::BODY_SIZE).style(style::muted_text),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
            .into(),
        )
    }

    fn chart_toggles(&self) -> Element<'_, Message> {
        let config = self.state.view;

        let kinds = ChartKind::ALL.into_iter().map(|kind| {
            let is_selected = config.kind == kind;
            button(text(kind.to_string()).size(style::BODY_SIZE))
                .style(move |theme, status| style::button::modifier(theme, status, is_selected))
                .on_press(Message::Apply(Action::SetKind(kind)))
                .into()
        });

        let metrics = Metric::ALL.into_iter().map(|metric| {
            let is_selected = config.metric == metric;
            button(text(metric.to_string()).size(style::BODY_SIZE))
                .style(move |theme, status| style::button::modifier(theme, status, is_selected))
                .on_press(Message::Apply(Action::SetMetric(metric)))
                .into()
        });

        row![
            row(kinds).spacing(6),
            row(metrics).spacing(6),
            space::horizontal(),
            text("Filter").size(style::BODY_SIZE),
            pick_list(FilterPolicy::ALL, Some(self.state.policy), |policy| {
                Message::Apply(Action::SetPolicy(policy))
            })
            .text_size(style::BODY_SIZE),
        ]
        .spacing(16)
        .align_y(Alignment::Center)
        .into()
    }

    fn summary_card(&self) -> Element<'_, Message> {
        let summary = &self.view.summary;

        let figure = |label: &'static str, value: String| {
            column![
                text(label).size(style::BODY_SIZE).style(style::muted_text),
                text(value).size(style::SUBTITLE_SIZE),
            ]
            .spacing(4)
            .width(Length::Fill)
        };

        container(
            row![
                figure("Total Milk", format_litres(summary.total_litres, 1)),
                figure("Total Earnings", format_rupees_grouped(summary.total_earnings)),
                figure("Avg Fat", format!("{:.2}%", summary.avg_fat)),
                figure("Avg Rate", format_rupees(summary.avg_rate, 2)),
            ]
            .spacing(12),
        )
        .style(style::card)
        .padding(12)
        .width(Length::Fill)
        .into()
    }

    fn breakdown(&self) -> Element<'_, Message> {
        let rows = self
            .view
            .series
            .iter()
            .rev()
            .enumerate()
            .map(|(i, (day, totals))| {
                let rate = totals
                    .rate()
                    .map_or_else(|| "-".to_string(), |rate| format_rupees(rate, 2));

                container(
                    row![
                        text(day.to_string()).size(style::BODY_SIZE).width(Length::Fill),
                        text(format_litres(totals.litres, 2))
                            .size(style::BODY_SIZE)
                            .width(Length::Fill),
                        text(format_rupees(totals.earnings, 2))
                            .size(style::BODY_SIZE)
                            .width(Length::Fill),
                        text(rate).size(style::BODY_SIZE).width(Length::Fill),
                    ]
                    .spacing(8),
                )
                .style(move |theme| style::table_row(theme, i % 2 == 1))
                .padding(6)
                .into()
            });

        let header = container(
            row![
                text("Date").width(Length::Fill),
                text("Milk").width(Length::Fill),
                text("Earnings").width(Length::Fill),
                text("Avg Rate").width(Length::Fill),
            ]
            .spacing(8),
        )
        .style(style::table_header)
        .padding(6);

        column![
            text("Daily Breakdown").size(style::SUBTITLE_SIZE),
            header,
            column(rows),
        ]
        .spacing(6)
        .into()
    }
}
