//! A collection of constants.

/// Blank space between the canvas edge and the plot area, on every side.
pub const MARGIN: f64 = 50.0;
/// Left + right (or top + bottom) margins combined.
pub const MARGIN_SUM: f64 = 2.0 * MARGIN;

/// Y-axis labels are anchored this far from the left edge.
pub const Y_LABEL_X: f64 = 20.0;
/// X-axis labels sit this far above the bottom edge.
pub const X_LABEL_OFFSET: f64 = 30.0;

/// More points than this and the x-axis labels are rotated.
pub const ROTATE_LABELS_ABOVE: usize = 8;
/// Rotation applied to crowded x-axis labels, in degrees.
pub const LABEL_ROTATION_DEG: f64 = 45.0;

/// Most gaps between value-axis ticks; wider ranges get a coarser step.
pub const MAX_TICK_INTERVALS: usize = 50;

pub const MARKER_RADIUS: f64 = 4.0;
pub const LINE_WIDTH: f64 = 2.0;
/// Dash pattern of the horizontal grid lines (`on,off` in px).
pub const GRID_DASH: (f64, f64) = (5.0, 5.0);

/// Poll every five seconds unless told otherwise.
pub const DEFAULT_INTERVAL_MS: u64 = 5_000;
/// Shortest period the poller will accept; anything below is clamped.
pub const MIN_INTERVAL_MS: u64 = 100;

/// Default canvas size in pixels.
pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;
