//! Value → pixel mapping for a fixed-margin canvas.
//!
//! ```text
//!   0 ┌──────────────────────────────┐
//!     │            MARGIN            │
//!     │   ┌──────────────────────┐   │
//!     │ M │      plot area       │ M │
//!     │   └──────────────────────┘   │
//!     │            MARGIN            │
//!   h └──────────────────────────────┘
//! ```
//!
//! The value axis runs bottom (`h - MARGIN`, axis start) to top
//! (`MARGIN`, axis end).  Points step left to right by the series' `step_x`.

use crate::core::{
    bounds::{AxisRange, compute_axis_range},
    constants::{MARGIN, MARGIN_SUM, ROTATE_LABELS_ABOVE, X_LABEL_OFFSET},
    data::PreparedSeries,
};

/// One horizontal grid position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
}

/// Where a data point lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointPosition {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub axis: AxisRange,
    /// Vertical distance between neighbouring ticks; zero with one tick.
    pub tick_pitch: f64,
    pub ticks: Vec<Tick>,
    pub points: Vec<PointPosition>,
    /// Horizontal extent of the grid lines.
    pub grid_left: f64,
    pub grid_right: f64,
    /// Baseline of the x-axis labels.
    pub label_y: f64,
    /// X-axis labels are drawn at an angle when the series is crowded.
    pub rotate_labels: bool,
}

/// Height of the plot area, never negative.
#[inline]
fn plot_height(height: f64) -> f64 {
    (height - MARGIN_SUM).max(0.0)
}

/// Compute ticks and point positions of `series` on a `width × height`
/// canvas.  Point spacing comes from `series.step_x`, which was derived from
/// the source width at normalisation time.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(series: &PreparedSeries, width: f64, height: f64) -> Layout {
    let axis = compute_axis_range(series.min_value, series.max_value);
    let plot_h = plot_height(height);
    let bottom = height - MARGIN;
    let center = height / 2.0;

    let tick_count = axis.tick_count();
    let tick_pitch = if tick_count > 1 {
        plot_h / (tick_count - 1) as f64
    } else {
        0.0
    };
    let ticks = axis
        .ticks()
        .enumerate()
        .map(|(i, value)| Tick {
            value,
            y: if tick_count > 1 {
                bottom - i as f64 * tick_pitch
            } else {
                center
            },
        })
        .collect();

    let span = axis.span();
    let points = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| PointPosition {
            x: MARGIN + i as f64 * series.step_x,
            y: if span > 0.0 {
                bottom - ((p.value - axis.start) / span) * plot_h
            } else {
                center
            },
            value: p.value,
        })
        .collect();

    Layout {
        axis,
        tick_pitch,
        ticks,
        points,
        grid_left: MARGIN,
        grid_right: (width - MARGIN).max(MARGIN),
        label_y: height - X_LABEL_OFFSET,
        rotate_labels: series.len() > ROTATE_LABELS_ABOVE,
    }
}
