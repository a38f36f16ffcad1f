//! Value-axis helpers: data extent and human-friendly tick ranges.

use crate::core::{constants::MAX_TICK_INTERVALS, data::DataPoint};

/// Inclusive `(min, max)` of the point values, `None` for an empty slice.
///
/// Values are finite by construction of [`DataPoint`], so no padding or
/// non-finite filtering happens here.
#[must_use]
pub fn value_extent(points: &[DataPoint]) -> Option<(f64, f64)> {
    let mut it = points.iter().map(|p| p.value);
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Tick range of the value axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl AxisRange {
    /// Number of ticks from `start` to `end` inclusive.  Always in
    /// `1..=MAX_TICK_INTERVALS + 1`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick_count(&self) -> usize {
        let n = self.intervals();
        if n.is_finite() && n > 0.0 {
            (n as usize).min(MAX_TICK_INTERVALS) + 1
        } else {
            1
        }
    }

    fn intervals(&self) -> f64 {
        ((self.end - self.start) / self.step).floor()
    }

    /// Tick values, bottom to top.
    #[allow(clippy::cast_precision_loss)]
    pub fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.tick_count()).map(move |i| self.start + i as f64 * self.step)
    }

    /// `end - start`; zero when every value sits on a single tick.
    #[inline]
    #[must_use]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Tick size for a data range: 10 up to 50, 25 up to 100, 50 beyond.
#[inline]
#[must_use]
pub fn tick_step(range: f64) -> f64 {
    if range <= 50.0 {
        10.0
    } else if range <= 100.0 {
        25.0
    } else {
        50.0
    }
}

fn snap(min_value: f64, max_value: f64, step: f64) -> AxisRange {
    let start = if min_value < 0.0 {
        ((min_value / step).floor() * step).max(f64::MIN)
    } else {
        0.0
    };
    // `+ 0.0` folds a `-0.0` from rounding small negatives up to zero.
    let end = ((max_value / step).ceil() * step).min(f64::MAX) + 0.0;
    AxisRange { start, end, step }
}

/// Pick a rounded axis range that contains `[min_value, max_value]`.
///
/// The top is the data maximum rounded up to a whole step.  The bottom is
/// zero unless the data goes negative, in which case it is the minimum
/// rounded down to a whole step.  When that would need more than
/// [`MAX_TICK_INTERVALS`] gaps the step is doubled until it fits.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_axis_range(min_value: f64, max_value: f64) -> AxisRange {
    let mut step = tick_step(max_value - min_value);
    loop {
        let range = snap(min_value, max_value, step);
        let n = range.intervals();
        // a non-finite count only happens once the span itself overflows
        if n <= MAX_TICK_INTERVALS as f64 || !n.is_finite() || !step.is_finite() {
            return range;
        }
        step *= 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn negative_min_floors_to_step() {
        let r = compute_axis_range(-30.0, 40.0);
        assert!(close(r.step, 25.0));
        assert!(close(r.start, -50.0));
        assert!(close(r.end, 50.0));
        assert_eq!(r.tick_count(), 5);
        let ticks: Vec<f64> = r.ticks().collect();
        assert_eq!(ticks, vec![-50.0, -25.0, 0.0, 25.0, 50.0]);
    }

    #[test]
    fn non_negative_data_starts_at_zero() {
        let r = compute_axis_range(120.0, 160.0);
        assert!(close(r.step, 10.0));
        assert!(close(r.start, 0.0));
        assert!(close(r.end, 160.0));
        assert_eq!(r.tick_count(), 17);
    }

    #[test]
    fn step_tiers() {
        assert!(close(tick_step(50.0), 10.0));
        assert!(close(tick_step(50.5), 25.0));
        assert!(close(tick_step(100.0), 25.0));
        assert!(close(tick_step(180.0), 50.0));
        let r = compute_axis_range(-93.0, 88.0);
        assert!(close(r.start, -100.0));
        assert!(close(r.end, 100.0));
        assert_eq!(r.tick_count(), 5);
    }

    #[test]
    fn all_negative_tops_out_at_zero() {
        let r = compute_axis_range(-42.0, -3.0);
        assert!(close(r.start, -50.0));
        assert!(r.end == 0.0 && r.end.is_sign_positive());
    }

    #[test]
    fn degenerate_range_has_single_tick() {
        let r = compute_axis_range(0.0, 0.0);
        assert!(close(r.span(), 0.0));
        assert_eq!(r.tick_count(), 1);
        assert_eq!(r.ticks().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn huge_values_get_a_coarser_step() {
        let r = compute_axis_range(0.0, 1e9);
        assert!(r.tick_count() <= MAX_TICK_INTERVALS + 1);
        assert!(r.end >= 1e9);
        assert!(r.ticks().last().unwrap() >= 1e9);

        let r = compute_axis_range(0.0, 1e300);
        assert!(r.end.is_finite() && r.end >= 1e300);
        assert!((2..=MAX_TICK_INTERVALS + 1).contains(&r.tick_count()));

        let r = compute_axis_range(-f64::MAX, f64::MAX);
        assert!(r.tick_count() <= MAX_TICK_INTERVALS + 1);
    }

    #[test]
    fn moderate_ranges_keep_their_step() {
        let r = compute_axis_range(0.0, 2500.0);
        assert!(close(r.step, 50.0));
        assert_eq!(r.tick_count(), 51);
        let r = compute_axis_range(0.0, 2600.0);
        assert!(close(r.step, 100.0));
        assert_eq!(r.tick_count(), 27);
    }

    #[test]
    fn extent_of_points() {
        let pts = [
            DataPoint::new("a", 4.0),
            DataPoint::new("b", -2.0),
            DataPoint::new("c", 9.5),
        ];
        assert_eq!(value_extent(&pts), Some((-2.0, 9.5)));
        assert_eq!(value_extent(&[]), None);
    }
}
