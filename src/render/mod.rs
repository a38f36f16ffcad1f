pub mod draw;
pub mod layout;
pub mod svg;

pub use draw::{ChartRenderer, DrawInstructions, Point, Primitive, Surface};
pub use layout::{Layout, PointPosition, Tick, layout};
pub use svg::{SvgSurface, to_svg, write_svg};
