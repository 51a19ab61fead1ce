mod axis;

use data::aggr::DailySeries;
use data::chart::{ChartKind, Metric, PlotArea, Selection, ValueAxis, ViewConfig, Y_STEPS};
use data::config::theme::{darken, lighten};

use iced::widget::{canvas, center, container, row, scrollable, text};
use iced::{Element, Length, Point, Rectangle, Renderer, Size, Theme, mouse};

pub const CHART_HEIGHT: f32 = 300.0;
pub const AXIS_WIDTH: f32 = 56.0;

const LABEL_SIZE: f32 = 11.0;
const LINE_WIDTH: f32 = 3.0;
const MARKER_RADIUS: f32 = 5.0;
const BAR_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Left click inside the plot, in plot-local coordinates.
    Tapped { x: f32, width: f32, buckets: usize },
}

/// Bars or a polyline over day buckets, one fixed-width slot per day.
pub struct DailyChart<'a> {
    series: &'a DailySeries,
    kind: ChartKind,
    metric: Metric,
    axis: ValueAxis,
    selection: Selection,
}

#[derive(Default)]
pub struct State {
    hovered: Option<usize>,
}

impl<'a> DailyChart<'a> {
    pub fn new(
        series: &'a DailySeries,
        config: &ViewConfig,
        axis: ValueAxis,
        selection: Selection,
    ) -> Self {
        Self {
            series,
            kind: config.kind,
            metric: config.metric,
            axis,
            selection,
        }
    }

    fn plot(&self, bounds: Rectangle) -> PlotArea {
        PlotArea::new(bounds.width, bounds.height, self.series.len())
    }

    fn fill_grid(&self, frame: &mut canvas::Frame, plot: &PlotArea, theme: &Theme) {
        let color = theme
            .extended_palette()
            .background
            .strong
            .color
            .scale_alpha(0.35);

        for step in 0..=Y_STEPS {
            let y = plot.grid_y(step);
            frame.stroke(
                &canvas::Path::line(Point::new(0.0, y), Point::new(plot.width, y)),
                canvas::Stroke::default().with_color(color).with_width(1.0),
            );
        }
    }

    fn fill_bars(
        &self,
        frame: &mut canvas::Frame,
        plot: &PlotArea,
        values: &[f64],
        theme: &Theme,
        hovered: Option<usize>,
    ) {
        let palette = theme.extended_palette();

        for (i, &value) in values.iter().enumerate() {
            let bar = plot.bar(i, &self.axis, value);
            if bar.height <= 0.0 {
                continue;
            }

            let color = if self.selection.index() == Some(i) {
                darken(palette.primary.base.color, 0.12)
            } else if hovered == Some(i) {
                lighten(palette.primary.base.color, 0.08)
            } else {
                palette.primary.base.color
            };

            let radius = BAR_RADIUS.min(bar.height / 2.0).min(bar.width / 2.0);
            frame.fill(
                &canvas::Path::rounded_rectangle(
                    Point::new(bar.x, bar.y),
                    Size::new(bar.width, bar.height),
                    radius.into(),
                ),
                color,
            );
        }
    }

    fn fill_line(
        &self,
        frame: &mut canvas::Frame,
        plot: &PlotArea,
        values: &[f64],
        theme: &Theme,
        hovered: Option<usize>,
    ) {
        let palette = theme.extended_palette();
        let points = plot.points(&self.axis, values);

        if points.len() >= 2 {
            let mut builder = canvas::path::Builder::new();
            for (i, &(x, y)) in points.iter().enumerate() {
                if i == 0 {
                    builder.move_to(Point::new(x, y));
                } else {
                    builder.line_to(Point::new(x, y));
                }
            }

            frame.stroke(
                &builder.build(),
                canvas::Stroke::default()
                    .with_color(palette.primary.strong.color)
                    .with_width(LINE_WIDTH)
                    .with_line_cap(canvas::LineCap::Round),
            );
        }

        for (i, &(x, y)) in points.iter().enumerate() {
            let radius = if self.selection.index() == Some(i) || hovered == Some(i) {
                MARKER_RADIUS + 2.0
            } else {
                MARKER_RADIUS
            };

            frame.fill(
                &canvas::Path::circle(Point::new(x, y), radius),
                palette.primary.strong.color,
            );
        }
    }

    fn fill_labels(&self, frame: &mut canvas::Frame, plot: &PlotArea, theme: &Theme) {
        let color = theme.extended_palette().background.base.text;

        for (i, (day, _)) in self.series.iter().enumerate() {
            frame.fill_text(canvas::Text {
                content: day.label(),
                position: Point::new(plot.center_x(i), plot.label_y()),
                color,
                size: LABEL_SIZE.into(),
                align_x: iced::Alignment::Center.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }
}

impl<Message> canvas::Program<Message> for DailyChart<'_>
where
    Message: From<Event>,
{
    type State = State;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;

                let tapped = Event::Tapped {
                    x: position.x,
                    width: bounds.width,
                    buckets: self.series.len(),
                };
                Some(canvas::Action::publish(Message::from(tapped)).and_capture())
            }
            iced::Event::Mouse(mouse::Event::CursorMoved { .. } | mouse::Event::CursorLeft) => {
                let hovered = cursor
                    .position_in(bounds)
                    .and_then(|position| self.plot(bounds).bucket_at(position.x));

                if hovered == state.hovered {
                    return None;
                }
                state.hovered = hovered;
                Some(canvas::Action::request_redraw())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let plot = self.plot(bounds);
        let values = self.series.values(self.metric);

        if let Some(i) = self.selection.index()
            && i < plot.count
        {
            frame.fill_rectangle(
                Point::new(plot.gap() * i as f32, PlotArea::TOP_PAD),
                Size::new(plot.gap(), plot.chart_height()),
                theme
                    .extended_palette()
                    .primary
                    .weak
                    .color
                    .scale_alpha(0.25),
            );
        }

        self.fill_grid(&mut frame, &plot, theme);

        match self.kind {
            ChartKind::Bar => self.fill_bars(&mut frame, &plot, &values, theme, state.hovered),
            ChartKind::Line => self.fill_line(&mut frame, &plot, &values, theme, state.hovered),
        }

        self.fill_labels(&mut frame, &plot, theme);

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.hovered.is_some() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Sticky value axis on the left, scrollable day plot on the right.
pub fn view<'a, Message>(
    series: &'a DailySeries,
    config: &ViewConfig,
    selection: Selection,
) -> Element<'a, Message>
where
    Message: From<Event> + 'a,
{
    if series.is_empty() {
        return container(center(
            text("No data available")
                .size(14)
                .style(crate::style::muted_text),
        ))
        .width(Length::Fill)
        .into();
    }

    let axis = ValueAxis::fit(&series.values(config.metric), config.autoscale);

    let y_axis = canvas(axis::AxisPane::new(axis, config.metric))
        .width(AXIS_WIDTH)
        .height(CHART_HEIGHT);

    let plot = canvas(DailyChart::new(series, config, axis, selection))
        .width(PlotArea::content_width(series.len()))
        .height(CHART_HEIGHT);

    let scroller = scrollable(plot)
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new().width(6).scroller_width(4),
        ))
        .width(Length::Fill);

    row![y_axis, scroller].into()
}
