//! Wire format of the polled series and its normalised, plot-ready form.

use std::{
    error::Error,
    fmt::{self, Display},
    io::Read,
};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::{
    bounds::value_extent,
    constants::MARGIN_SUM,
    error::{ChartError, FetchError},
};

// --- Wire structs ---

/// Response body: `{ "data": [ { "x": ..., "value": ... }, ... ] }`.
#[derive(Debug, Deserialize)]
pub struct SeriesEnvelope {
    pub data: Vec<RawPoint>,
}

/// One point exactly as the source served it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawPoint {
    #[serde(rename = "x", alias = "label", default, deserialize_with = "label_from_any")]
    pub label: String,
    #[serde(default)]
    pub value: RawValue,
}

impl RawPoint {
    pub fn new(label: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Unvalidated scalar; coerced to `f64` during normalisation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Default for RawValue {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}
impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}
impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl RawValue {
    /// Finite number or nothing.  Strings are trimmed and parsed; `null`,
    /// booleans, arrays and objects never coerce.
    #[must_use]
    pub fn coerce(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => parse_number(s)?,
            RawValue::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Text(s) => write!(f, "{s:?}"),
            RawValue::Other(v) => write!(f, "{v}"),
        }
    }
}

fn label_from_any<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// --- Normalised structs ---

/// A labelled observation whose value is guaranteed finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Plot-ready series.  `points` keeps the source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedSeries {
    pub points: Vec<DataPoint>,
    pub max_value: f64,
    pub min_value: f64,
    /// Horizontal pixel distance between neighbouring points.
    pub step_x: f64,
}

impl PreparedSeries {
    /// The "no usable data" state: no points, every metric zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            max_value: 0.0,
            min_value: 0.0,
            step_x: 0.0,
        }
    }

    /// Same points laid out for a source `width` pixels wide.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.step_x = step_x(width, self.points.len());
        self
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

impl Default for PreparedSeries {
    fn default() -> Self {
        Self::empty()
    }
}

/// Two point sequences describe the same series: equal length and, at every
/// index, the same label and exactly the same value.  A reordering counts as
/// a change.
#[inline]
#[must_use]
pub fn same_series(a: &[DataPoint], b: &[DataPoint]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(l, r)| l.label == r.label && l.value == r.value)
}

// --- Error Handling ---

/// A raw value that does not coerce to a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedPoint {
    pub index: usize,
    pub label: String,
    pub raw: String,
}

impl Display for MalformedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "point #{} ({:?}): value {} is not a finite number",
            self.index, self.label, self.raw
        )
    }
}
impl Error for MalformedPoint {}

// --- Helpers ---

/// Replace U+2212 MINUS SIGN with ASCII `-` in place.
#[inline]
pub fn normalize_unicode_minus(buf: &mut Vec<u8>) {
    let (mut r, mut w) = (0, 0);
    while r < buf.len() {
        if r + 2 < buf.len() && buf[r] == 0xE2 && buf[r + 1] == 0x88 && buf[r + 2] == 0x92 {
            buf[w] = b'-';
            r += 3;
            w += 1;
        } else {
            if r != w {
                buf[w] = buf[r];
            }
            r += 1;
            w += 1;
        }
    }
    buf.truncate(w);
}

#[inline]
fn parse_number(text: &str) -> Option<f64> {
    let mut buf = text.trim().as_bytes().to_vec();
    normalize_unicode_minus(&mut buf);
    lexical_core::parse::<f64>(&buf).ok()
}

/// Pixel step between points for a canvas `width` wide.  Zero for fewer
/// than two points and for canvases narrower than the margins.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn step_x(width: f64, count: usize) -> f64 {
    if count < 2 {
        return 0.0;
    }
    (width - MARGIN_SUM).max(0.0) / (count - 1) as f64
}

/// Coerce one raw point.
///
/// # Errors
/// [`MalformedPoint`] when the value is not a finite number.
pub fn coerce_point(index: usize, raw: &RawPoint) -> Result<DataPoint, MalformedPoint> {
    raw.value
        .coerce()
        .map(|value| DataPoint::new(raw.label.clone(), value))
        .ok_or_else(|| MalformedPoint {
            index,
            label: raw.label.clone(),
            raw: raw.value.to_string(),
        })
}

/// Turn raw points into a [`PreparedSeries`] for a source `width` pixels
/// wide.  Malformed points are logged and dropped.
#[must_use]
pub fn normalize(raw: &[RawPoint], width: f64) -> PreparedSeries {
    let points: Vec<DataPoint> = raw
        .iter()
        .enumerate()
        .filter_map(|(i, p)| match coerce_point(i, p) {
            Ok(dp) => Some(dp),
            Err(e) => {
                warn!(error = %e, "dropping malformed point");
                None
            }
        })
        .collect();

    let Some((min_value, max_value)) = value_extent(&points) else {
        warn!(raw_points = raw.len(), "no valid data points found");
        return PreparedSeries::empty();
    };

    let step_x = step_x(width, points.len());
    PreparedSeries {
        points,
        max_value,
        min_value,
        step_x,
    }
}

// --- Ingest ---

/// Parse a `{ "data": [...] }` document.
///
/// # Errors
/// [`FetchError::Body`] when the bytes are not JSON of that shape.
pub fn parse_series(bytes: &[u8]) -> Result<Vec<RawPoint>, FetchError> {
    let envelope: SeriesEnvelope = serde_json::from_slice(bytes)?;
    Ok(envelope.data)
}

/// Read a series document from `path`, or from stdin when `path` is `-`.
///
/// # Errors
/// I/O failures and malformed documents.
pub fn read_series_from_path(path: &str) -> Result<Vec<RawPoint>, ChartError> {
    let mut buf = Vec::new();
    if path == "-" {
        std::io::stdin().read_to_end(&mut buf)?;
    } else {
        std::fs::File::open(path)?.read_to_end(&mut buf)?;
    }
    Ok(parse_series(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Vec<RawPoint> {
        parse_series(json.as_bytes()).unwrap()
    }

    #[test]
    fn drops_values_that_do_not_coerce() {
        let pts = raw(r#"{"data":[{"x":"a","value":"oops"},{"x":"b","value":"5"}]}"#);
        let s = normalize(&pts, 800.0);
        assert_eq!(s.points, vec![DataPoint::new("b", 5.0)]);
        assert!((s.min_value - 5.0).abs() < f64::EPSILON);
        assert!((s.max_value - 5.0).abs() < f64::EPSILON);
        assert!(s.step_x.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_is_degenerate_not_an_error() {
        let s = normalize(&[], 800.0);
        assert_eq!(s, PreparedSeries::empty());
        assert!(s.is_empty());
    }

    #[test]
    fn all_invalid_is_degenerate() {
        let pts = raw(r#"{"data":[{"x":"a","value":null},{"x":"b","value":true},{"x":"c","value":""}]}"#);
        assert_eq!(normalize(&pts, 800.0), PreparedSeries::empty());
    }

    #[test]
    fn normalize_is_idempotent() {
        let pts = raw(r#"{"data":[{"x":"P1","value":3},{"x":"P2","value":"-7.5"},{"x":"P3","value":12}]}"#);
        assert_eq!(normalize(&pts, 640.0), normalize(&pts, 640.0));
    }

    #[test]
    fn step_x_spans_plot_width() {
        let pts: Vec<RawPoint> = (0..5).map(|i| RawPoint::new(format!("P{i}"), i)).collect();
        let s = normalize(&pts, 500.0);
        assert!((s.step_x - 100.0).abs() < 1e-9);
        assert!((s.min_value - 0.0).abs() < f64::EPSILON);
        assert!((s.max_value - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn step_x_guards_small_counts_and_narrow_canvas() {
        assert!(step_x(800.0, 0).abs() < f64::EPSILON);
        assert!(step_x(800.0, 1).abs() < f64::EPSILON);
        assert!(step_x(60.0, 4).abs() < f64::EPSILON);
    }

    #[test]
    fn text_values_are_trimmed_and_accept_unicode_minus() {
        assert_eq!(RawValue::from(" 42 ").coerce(), Some(42.0));
        assert_eq!(RawValue::from("\u{2212}3.5").coerce(), Some(-3.5));
        assert_eq!(RawValue::from("1e999").coerce(), None);
        assert_eq!(RawValue::Other(Value::Bool(true)).coerce(), None);
    }

    #[test]
    fn blank_text_is_missing_not_zero() {
        // JavaScript's `Number("")` would read these as 0; a blank reading
        // is treated as absent instead.
        assert_eq!(RawValue::from("").coerce(), None);
        assert_eq!(RawValue::from("   ").coerce(), None);
        let s = normalize(&raw(r#"{"data":[{"x":"a","value":""},{"x":"b","value":4}]}"#), 800.0);
        assert_eq!(s.points, vec![DataPoint::new("b", 4.0)]);
    }

    #[test]
    fn relayout_keeps_points_and_updates_step() {
        let s = normalize(&raw(r#"{"data":[{"x":"a","value":1},{"x":"b","value":2},{"x":"c","value":3}]}"#), 500.0);
        assert!((s.step_x - 200.0).abs() < 1e-9);
        let wide = s.clone().with_width(900.0);
        assert_eq!(wide.points, s.points);
        assert!((wide.step_x - 400.0).abs() < 1e-9);
    }

    #[test]
    fn label_accepts_alias_and_non_string_labels() {
        let pts = raw(r#"{"data":[{"label":"L","value":1},{"x":2020,"value":2},{"value":3}]}"#);
        let labels: Vec<&str> = pts.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["L", "2020", ""]);
    }

    #[test]
    fn wrong_shape_is_a_body_error() {
        assert!(matches!(parse_series(b"{\"points\":[]}"), Err(FetchError::Body(_))));
        assert!(matches!(parse_series(b"<html>"), Err(FetchError::Body(_))));
        assert!(matches!(parse_series(b"{\"data\":5}"), Err(FetchError::Body(_))));
    }

    #[test]
    fn same_series_is_order_sensitive_and_exact() {
        let a = vec![DataPoint::new("A", 1.0), DataPoint::new("B", 2.0)];
        let b = vec![DataPoint::new("B", 2.0), DataPoint::new("A", 1.0)];
        assert!(same_series(&a, &a.clone()));
        assert!(!same_series(&a, &b));
        assert!(!same_series(&a, &a[..1]));
        assert!(!same_series(&[DataPoint::new("A", 1.0)], &[DataPoint::new("A", 1.000_000_1)]));
    }

    #[test]
    fn malformed_point_names_the_offender() {
        let err = coerce_point(3, &RawPoint::new("Q", "n/a")).unwrap_err();
        assert_eq!(err.index, 3);
        assert!(err.to_string().contains("\"n/a\""));
    }
}
