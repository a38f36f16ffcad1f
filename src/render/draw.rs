//! Series → vector drawing primitives, plus the surface they are drawn on.

use crate::core::{
    bounds::{AxisRange, compute_axis_range},
    color::{Rgb, Theme},
    constants::{GRID_DASH, LABEL_ROTATION_DEG, LINE_WIDTH, MARKER_RADIUS, Y_LABEL_X},
    data::PreparedSeries,
    error::ChartError,
};

use super::layout::{Layout, layout};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Straight line; `dash` is an `(on, off)` pattern.
    Line {
        from: Point,
        to: Point,
        stroke: Rgb,
        width: f64,
        dash: Option<(f64, f64)>,
    },
    /// Text anchored at its start; `rotate` is in degrees about `at`.
    Text {
        at: Point,
        content: String,
        fill: Rgb,
        rotate: Option<f64>,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Rgb,
        width: f64,
    },
    /// Hoverable data point that remembers its value.
    Marker {
        center: Point,
        radius: f64,
        fill: Rgb,
        value: f64,
    },
}

/// Everything needed to paint one frame, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawInstructions {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl DrawInstructions {
    pub fn grid_lines(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { dash: Some(_), .. }))
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, Point, Option<f64>)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text {
                at,
                content,
                rotate,
                ..
            } => Some((content.as_str(), *at, *rotate)),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Marker { center, value, .. } => Some((*center, *value)),
            _ => None,
        })
    }

    #[must_use]
    pub fn polyline(&self) -> Option<&[Point]> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }
}

/// Something a chart can be painted on.
pub trait Surface {
    fn current_width(&self) -> f64;
    fn current_height(&self) -> f64;
    /// Container changed size; the next frame should fill the new size.
    fn resize(&mut self, width: f64, height: f64);
    /// Replace whatever is shown with `frame`.
    ///
    /// # Errors
    /// Whatever the backing store reports.
    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), ChartError>;
}

/// Y-axis labels are whole numbers.
#[inline]
fn tick_label(value: f64) -> String {
    // `+ 0.0` turns -0 into 0
    format!("{}", value.round() + 0.0)
}

/// Stateless painter: same series and size in, same instructions out.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChartRenderer {
    theme: Theme,
}

impl ChartRenderer {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn compute_axis_range(min_value: f64, max_value: f64) -> AxisRange {
        compute_axis_range(min_value, max_value)
    }

    #[must_use]
    pub fn layout(series: &PreparedSeries, width: f64, height: f64) -> Layout {
        layout(series, width, height)
    }

    /// Grid + y labels, x labels, the line, then one marker per point.
    #[must_use]
    pub fn render(&self, series: &PreparedSeries, width: f64, height: f64) -> DrawInstructions {
        let l = layout(series, width, height);
        let t = &self.theme;
        let mut out = Vec::with_capacity(2 * l.ticks.len() + 2 * l.points.len() + 1);

        for tick in &l.ticks {
            out.push(Primitive::Text {
                at: Point::new(Y_LABEL_X, tick.y),
                content: tick_label(tick.value),
                fill: t.text,
                rotate: None,
            });
            out.push(Primitive::Line {
                from: Point::new(l.grid_left, tick.y),
                to: Point::new(l.grid_right, tick.y),
                stroke: t.grid,
                width: 1.0,
                dash: Some(GRID_DASH),
            });
        }

        let rotate = l.rotate_labels.then_some(LABEL_ROTATION_DEG);
        for (dp, pos) in series.points.iter().zip(&l.points) {
            out.push(Primitive::Text {
                at: Point::new(pos.x, l.label_y),
                content: dp.label.clone(),
                fill: t.text,
                rotate,
            });
        }

        out.push(Primitive::Polyline {
            points: l.points.iter().map(|p| Point::new(p.x, p.y)).collect(),
            stroke: t.line,
            width: LINE_WIDTH,
        });
        out.extend(l.points.iter().map(|p| Primitive::Marker {
            center: Point::new(p.x, p.y),
            radius: MARKER_RADIUS,
            fill: t.marker,
            value: p.value,
        }));

        DrawInstructions {
            width,
            height,
            primitives: out,
        }
    }

    /// Render for the surface's current size and hand the frame over.
    ///
    /// # Errors
    /// Propagates the surface's failure.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        series: &PreparedSeries,
        surface: &mut S,
    ) -> Result<(), ChartError> {
        let frame = self.render(series, surface.current_width(), surface.current_height());
        surface.draw(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{RawPoint, normalize};

    fn prepared(values: &[i32], width: f64) -> PreparedSeries {
        let raw: Vec<RawPoint> = values
            .iter()
            .enumerate()
            .map(|(i, v)| RawPoint::new(format!("Point {}", i + 1), *v))
            .collect();
        normalize(&raw, width)
    }

    #[test]
    fn one_grid_line_and_label_per_tick() {
        let s = prepared(&[-30, 40], 600.0);
        let frame = ChartRenderer::default().render(&s, 600.0, 400.0);
        assert_eq!(frame.grid_lines().count(), 5);
        let y_labels: Vec<&str> = frame
            .labels()
            .filter(|(_, at, _)| (at.x - Y_LABEL_X).abs() < f64::EPSILON)
            .map(|(text, _, _)| text)
            .collect();
        assert_eq!(y_labels, ["-50", "-25", "0", "25", "50"]);
    }

    #[test]
    fn markers_carry_point_values() {
        let s = prepared(&[3, -8, 12], 600.0);
        let frame = ChartRenderer::default().render(&s, 600.0, 400.0);
        let values: Vec<f64> = frame.markers().map(|(_, v)| v).collect();
        assert_eq!(values, vec![3.0, -8.0, 12.0]);
        let line = frame.polyline().unwrap();
        assert_eq!(line.len(), 3);
        for ((center, _), vertex) in frame.markers().zip(line) {
            assert_eq!(center, *vertex);
        }
    }

    #[test]
    fn x_labels_follow_points_and_rotate_when_crowded() {
        let s = prepared(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10], 1000.0);
        let frame = ChartRenderer::default().render(&s, 1000.0, 400.0);
        let x_labels: Vec<_> = frame
            .labels()
            .filter(|(text, _, _)| text.starts_with("Point"))
            .collect();
        assert_eq!(x_labels.len(), 10);
        assert!(x_labels.iter().all(|(_, at, rot)| {
            (at.y - 370.0).abs() < f64::EPSILON && *rot == Some(LABEL_ROTATION_DEG)
        }));
        assert!((x_labels[1].1.x - 150.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series_still_renders_a_frame() {
        let frame = ChartRenderer::default().render(&PreparedSeries::empty(), 800.0, 400.0);
        assert_eq!(frame.markers().count(), 0);
        assert_eq!(frame.polyline().map(<[Point]>::len), Some(0));
        assert_eq!(frame.grid_lines().count(), 1);
    }

    #[test]
    fn render_is_pure() {
        let s = prepared(&[5, 6, 5], 700.0);
        let r = ChartRenderer::new(Theme::default().with_accent(Rgb::orange()));
        assert_eq!(r.render(&s, 700.0, 300.0), r.render(&s, 700.0, 300.0));
    }

    #[test]
    fn tick_labels_round_and_drop_negative_zero() {
        assert_eq!(tick_label(-0.0), "0");
        assert_eq!(tick_label(24.6), "25");
        assert_eq!(tick_label(-50.0), "-50");
    }
}
