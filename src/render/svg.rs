//! SVG serialisation of [`DrawInstructions`] and a file-backed surface.
//!
//! Markers are emitted as `<circle class="data-point" data-value="…">` with a
//! `<title>` child, so browsers show the value on hover without any script.
//! Elements go through `quick_xml`'s writer, which escapes labels and
//! attribute values.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use tracing::debug;

use crate::core::error::ChartError;

use super::draw::{DrawInstructions, Point, Primitive, Surface};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn element<'a>(name: &'a str, attrs: &[(&str, String)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(name);
    for (key, value) in attrs {
        el.push_attribute((*key, value.as_str()));
    }
    el
}

fn write_primitive<W: Write>(w: &mut Writer<W>, p: &Primitive) -> io::Result<()> {
    match p {
        Primitive::Line {
            from,
            to,
            stroke,
            width,
            dash,
        } => {
            let mut attrs = vec![
                ("x1", from.x.to_string()),
                ("y1", from.y.to_string()),
                ("x2", to.x.to_string()),
                ("y2", to.y.to_string()),
                ("stroke", stroke.to_string()),
                ("stroke-width", width.to_string()),
            ];
            if let Some((on, off)) = dash {
                attrs.push(("stroke-dasharray", format!("{on},{off}")));
            }
            w.write_event(Event::Empty(element("line", &attrs)))
        }
        Primitive::Text {
            at,
            content,
            fill,
            rotate,
        } => {
            let mut attrs = vec![
                ("x", at.x.to_string()),
                ("y", at.y.to_string()),
                ("fill", fill.to_string()),
            ];
            if let Some(deg) = rotate {
                attrs.push(("transform", format!("rotate({deg}, {}, {})", at.x, at.y)));
            }
            w.write_event(Event::Start(element("text", &attrs)))?;
            w.write_event(Event::Text(BytesText::new(content)))?;
            w.write_event(Event::End(BytesEnd::new("text")))
        }
        Primitive::Polyline {
            points,
            stroke,
            width,
        } => {
            let attrs = [
                ("points", points_attr(points)),
                ("fill", "none".to_owned()),
                ("stroke", stroke.to_string()),
                ("stroke-width", width.to_string()),
            ];
            w.write_event(Event::Empty(element("polyline", &attrs)))
        }
        Primitive::Marker {
            center,
            radius,
            fill,
            value,
        } => {
            let attrs = [
                ("cx", center.x.to_string()),
                ("cy", center.y.to_string()),
                ("r", radius.to_string()),
                ("fill", fill.to_string()),
                ("class", "data-point".to_owned()),
                ("data-value", value.to_string()),
            ];
            w.write_event(Event::Start(element("circle", &attrs)))?;
            w.write_event(Event::Start(BytesStart::new("title")))?;
            w.write_event(Event::Text(BytesText::new(&format!("Value: {value}"))))?;
            w.write_event(Event::End(BytesEnd::new("title")))?;
            w.write_event(Event::End(BytesEnd::new("circle")))
        }
    }
}

/// Write `frame` as a standalone SVG document.
///
/// # Errors
/// Whatever `out` reports.
pub fn write_svg<W: Write>(frame: &DrawInstructions, out: &mut W) -> io::Result<()> {
    let (width, height) = (frame.width.to_string(), frame.height.to_string());
    let root = element(
        "svg",
        &[
            ("xmlns", SVG_NS.to_owned()),
            ("width", width.clone()),
            ("height", height.clone()),
            ("viewBox", format!("0 0 {width} {height}")),
        ],
    );

    let mut w = Writer::new(&mut *out);
    w.write_event(Event::Start(root))?;
    for p in &frame.primitives {
        write_primitive(&mut w, p)?;
    }
    w.write_event(Event::End(BytesEnd::new("svg")))?;
    out.write_all(b"\n")
}

/// Serialise one frame to a standalone SVG document in memory.
///
/// # Errors
/// Only if serialisation itself fails; writing to memory cannot.
pub fn to_svg(frame: &DrawInstructions) -> io::Result<String> {
    let mut buf = Vec::new();
    write_svg(frame, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Surface that rewrites an SVG file on every frame.
///
/// Frames are written to a sibling temp file and renamed into place so a
/// viewer never sees a half-written document.
#[derive(Debug)]
pub struct SvgSurface {
    path: PathBuf,
    width: f64,
    height: f64,
    frames: usize,
}

impl SvgSurface {
    pub fn new(path: impl Into<PathBuf>, width: f64, height: f64) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            frames: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames written so far.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl Surface for SvgSurface {
    fn current_width(&self) -> f64 {
        self.width
    }

    fn current_height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), ChartError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let mut out = BufWriter::new(File::create(&tmp)?);
        write_svg(frame, &mut out)?;
        out.flush()?;
        drop(out);
        std::fs::rename(&tmp, &self.path)?;
        self.frames += 1;
        debug!(path = %self.path.display(), frame = self.frames, "svg written");
        Ok(())
    }
}
