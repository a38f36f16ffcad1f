//! Poll a labelled series and draw it as a line chart whenever it
//! changes.  The `series-watch` binary writes the chart as SVG.

pub mod cli;
pub mod core;
pub mod live;
pub mod poll;
pub mod render;

pub use core::{
    bounds::{AxisRange, compute_axis_range},
    color::{ColorError, Rgb, Theme},
    config::{Config, ConfigBuilder},
    data::{DataPoint, MalformedPoint, PreparedSeries, RawPoint, RawValue, normalize, same_series},
    error::{ChartError, ConfigError, FetchError},
};

pub use live::LiveChart;
pub use poll::{HttpFetcher, RandomSource, SeriesFetcher, SeriesPoller};
pub use render::{ChartRenderer, DrawInstructions, Primitive, Surface, SvgSurface, to_svg, write_svg};
