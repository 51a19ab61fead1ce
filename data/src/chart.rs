pub mod detail;

pub use detail::{BucketDetail, Selection};

use serde::{Deserialize, Serialize};

/// Number of equal steps the value axis is divided into.
pub const Y_STEPS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::Bar, ChartKind::Line];
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "Bar"),
            ChartKind::Line => write!(f, "Line"),
        }
    }
}

/// Which per-day quantity the chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Metric {
    #[default]
    Litres,
    Earnings,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Litres, Metric::Earnings];

    /// Short unit shown above the value axis.
    pub fn unit(self) -> &'static str {
        match self {
            Metric::Litres => "Litres",
            Metric::Earnings => "₹",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Litres => write!(f, "Litres"),
            Metric::Earnings => write!(f, "₹ Earnings"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
pub enum Autoscale {
    /// Axis top follows the largest plotted value.
    #[default]
    FitToData,
    /// Axis top pinned to a value, e.g. a monthly target.
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
pub struct ViewConfig {
    pub kind: ChartKind,
    pub metric: Metric,
    pub autoscale: Option<Autoscale>,
}

/// Vertical scale shared by the axis pane and the data canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAxis {
    pub max: f64,
    pub step: f64,
}

impl ValueAxis {
    /// Never narrower than `1.0`, so an all-zero range still draws.
    pub fn fit(values: &[f64], autoscale: Option<Autoscale>) -> Self {
        let top = match autoscale.unwrap_or_default() {
            Autoscale::FitToData => values
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .fold(0.0, f64::max),
            Autoscale::Fixed(max) => max,
        };
        let max = if top.is_finite() { top.max(1.0) } else { 1.0 };

        Self {
            max,
            step: max / Y_STEPS as f64,
        }
    }

    /// Position of `value` within the axis, `0.0` at the baseline.
    pub fn normalize(&self, value: f64) -> f32 {
        (value / self.max).clamp(0.0, 1.0) as f32
    }

    /// Tick values from the top of the axis down to zero.
    pub fn ticks(&self) -> Vec<f64> {
        (0..=Y_STEPS)
            .map(|i| self.max * (1.0 - i as f64 / Y_STEPS as f64))
            .collect()
    }

    pub fn format_tick(&self, value: f64) -> String {
        if self.step >= 1.0 {
            format!("{value:.0}")
        } else if self.step >= 0.1 {
            format!("{value:.1}")
        } else {
            format!("{value:.2}")
        }
    }
}

/// Pixel layout of a day-bucketed plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub width: f32,
    pub height: f32,
    pub count: usize,
}

impl PlotArea {
    pub const BUCKET_WIDTH: f32 = 70.0;
    pub const TOP_PAD: f32 = 12.0;
    pub const BOTTOM_PAD: f32 = 40.0;
    pub const BAR_RATIO: f32 = 0.6;
    pub const MAX_BAR_WIDTH: f32 = 55.0;
    /// Offset of the day labels below the baseline.
    pub const LABEL_OFFSET: f32 = 24.0;

    /// Content width for `count` buckets.
    pub fn content_width(count: usize) -> f32 {
        count as f32 * Self::BUCKET_WIDTH
    }

    pub fn new(width: f32, height: f32, count: usize) -> Self {
        Self {
            width,
            height,
            count,
        }
    }

    pub fn gap(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.width / self.count as f32
        }
    }

    pub fn chart_height(&self) -> f32 {
        (self.height - Self::TOP_PAD - Self::BOTTOM_PAD).max(0.0)
    }

    pub fn baseline(&self) -> f32 {
        Self::TOP_PAD + self.chart_height()
    }

    pub fn bar_width(&self) -> f32 {
        (self.gap() * Self::BAR_RATIO).min(Self::MAX_BAR_WIDTH)
    }

    pub fn center_x(&self, index: usize) -> f32 {
        self.gap() * index as f32 + self.gap() / 2.0
    }

    /// Y of `value` on this plot; lower values sit closer to the baseline.
    pub fn value_y(&self, axis: &ValueAxis, value: f64) -> f32 {
        self.baseline() - axis.normalize(value) * self.chart_height()
    }

    /// Y of the `i`th of [`Y_STEPS`] gridlines, counting from the top.
    pub fn grid_y(&self, step: usize) -> f32 {
        Self::TOP_PAD + self.chart_height() * (step as f32 / Y_STEPS as f32)
    }

    pub fn label_y(&self) -> f32 {
        self.baseline() + Self::LABEL_OFFSET
    }

    pub fn bar(&self, index: usize, axis: &ValueAxis, value: f64) -> Bar {
        let width = self.bar_width();
        let top = self.value_y(axis, value);

        Bar {
            x: self.center_x(index) - width / 2.0,
            y: top,
            width,
            height: self.baseline() - top,
        }
    }

    /// Line vertices, one per bucket.
    pub fn points(&self, axis: &ValueAxis, values: &[f64]) -> Vec<(f32, f32)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.center_x(i), self.value_y(axis, v)))
            .collect()
    }

    pub fn bucket_at(&self, x: f32) -> Option<usize> {
        bucket_at(x, self.width, self.count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Index of the bucket under `x`, if any.
pub fn bucket_at(x: f32, width: f32, count: usize) -> Option<usize> {
    if count == 0 || width.is_nan() || width <= 0.0 || !x.is_finite() || x < 0.0 {
        return None;
    }

    let gap = width / count as f32;
    let index = (x / gap).floor() as usize;

    (index < count).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_fits_the_largest_value() {
        let axis = ValueAxis::fit(&[0.0, 18.0, 7.5], None);
        assert_eq!(axis.max, 18.0);
        assert_eq!(axis.ticks().len(), Y_STEPS + 1);
        assert_eq!(axis.ticks()[0], 18.0);
        assert_eq!(axis.ticks()[Y_STEPS], 0.0);
    }

    #[test]
    fn axis_has_a_floor_of_one() {
        let axis = ValueAxis::fit(&[0.0, 0.0], None);
        assert_eq!(axis.max, 1.0);
        assert_eq!(axis.normalize(0.0), 0.0);

        let empty = ValueAxis::fit(&[], Some(Autoscale::FitToData));
        assert_eq!(empty.max, 1.0);
        assert_eq!(empty.format_tick(0.4), "0.4");
    }

    #[test]
    fn fixed_axis_clamps_overflowing_values() {
        let axis = ValueAxis::fit(&[40.0], Some(Autoscale::Fixed(20.0)));
        assert_eq!(axis.max, 20.0);
        assert_eq!(axis.normalize(40.0), 1.0);
        assert_eq!(axis.format_tick(20.0), "20");
    }

    #[test]
    fn bars_grow_from_the_baseline() {
        let plot = PlotArea::new(PlotArea::content_width(3), 252.0, 3);
        let axis = ValueAxis::fit(&[10.0, 5.0, 0.0], None);

        assert_eq!(plot.gap(), 70.0);
        assert!((plot.bar_width() - 42.0).abs() < 1e-4);
        assert_eq!(plot.chart_height(), 200.0);

        let full = plot.bar(0, &axis, 10.0);
        assert_eq!(full.y, PlotArea::TOP_PAD);
        assert_eq!(full.height, 200.0);
        assert!((full.x - 14.0).abs() < 1e-4);

        let half = plot.bar(1, &axis, 5.0);
        assert_eq!(half.height, 100.0);

        let zero = plot.bar(2, &axis, 0.0);
        assert_eq!(zero.height, 0.0);
        assert_eq!(zero.y, plot.baseline());
    }

    #[test]
    fn bar_width_is_capped() {
        let plot = PlotArea::new(1000.0, 300.0, 2);
        assert_eq!(plot.bar_width(), PlotArea::MAX_BAR_WIDTH);
    }

    #[test]
    fn taps_map_to_buckets() {
        assert_eq!(bucket_at(0.0, 210.0, 3), Some(0));
        assert_eq!(bucket_at(69.9, 210.0, 3), Some(0));
        assert_eq!(bucket_at(70.0, 210.0, 3), Some(1));
        assert_eq!(bucket_at(209.0, 210.0, 3), Some(2));
        assert_eq!(bucket_at(210.0, 210.0, 3), None);
        assert_eq!(bucket_at(-1.0, 210.0, 3), None);
        assert_eq!(bucket_at(10.0, 210.0, 0), None);
        assert_eq!(bucket_at(10.0, 0.0, 3), None);
    }

    #[test]
    fn line_points_sit_on_bucket_centres() {
        let plot = PlotArea::new(140.0, 252.0, 2);
        let axis = ValueAxis::fit(&[4.0, 2.0], None);

        assert_eq!(
            plot.points(&axis, &[4.0, 2.0]),
            vec![(35.0, 12.0), (105.0, 112.0)]
        );
    }
}
