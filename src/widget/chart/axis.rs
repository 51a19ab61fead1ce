use data::chart::{Metric, PlotArea, ValueAxis};

use iced::widget::canvas;
use iced::{Point, Rectangle, Renderer, Theme, mouse};

const TICK_SIZE: f32 = 10.0;
const PADDING: f32 = 6.0;

/// Value labels for the plot next to it; stays put while the plot scrolls.
pub struct AxisPane {
    axis: ValueAxis,
    metric: Metric,
}

impl AxisPane {
    pub fn new(axis: ValueAxis, metric: Metric) -> Self {
        Self { axis, metric }
    }
}

impl<Message> canvas::Program<Message> for AxisPane {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let palette = theme.extended_palette();

        // Same vertical layout as the plot, count does not matter for rows
        let plot = PlotArea::new(bounds.width, bounds.height, 0);
        let x = bounds.width - PADDING;

        for (i, value) in self.axis.ticks().into_iter().enumerate() {
            frame.fill_text(canvas::Text {
                content: self.axis.format_tick(value),
                position: Point::new(x, plot.grid_y(i)),
                color: palette.background.base.text,
                size: TICK_SIZE.into(),
                align_x: iced::Alignment::End.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }

        frame.fill_text(canvas::Text {
            content: self.metric.unit().to_string(),
            position: Point::new(x, plot.label_y()),
            color: palette.background.strong.color,
            size: TICK_SIZE.into(),
            align_x: iced::Alignment::End.into(),
            align_y: iced::Alignment::Center.into(),
            ..Default::default()
        });

        vec![frame.into_geometry()]
    }
}
