//! SVG path generation and pixel bounds for GeoJSON features.
//!
//! [`GeoPath`] streams geometry through a [`LayerProjection`] into either a
//! path-data writer or a bounds accumulator. The projection is supplied per
//! call, so the same generator can redraw features after the view changes.

use super::stream::{stream_feature, stream_geometry, GeoStream, TransformStream};
use crate::map::LayerProjection;
use geojson::{Feature, Value};
use glam::DVec2;
use std::fmt::Write;

/// Axis-aligned bounds in layer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    /// Top-left corner
    pub min: DVec2,
    /// Bottom-right corner
    pub max: DVec2,
}

impl PixelBounds {
    pub fn from_point(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grows the bounds to include `point`.
    pub fn extend(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn top_left(&self) -> DVec2 {
        self.min
    }

    pub fn bottom_right(&self) -> DVec2 {
        self.max
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Path generator for GeoJSON features.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPath {
    point_radius: f64,
    digits: Option<u32>,
}

impl Default for GeoPath {
    fn default() -> Self {
        Self {
            point_radius: Self::DEFAULT_POINT_RADIUS,
            digits: Some(Self::DEFAULT_DIGITS),
        }
    }
}

impl GeoPath {
    /// Radius of the circle drawn for point geometry.
    pub const DEFAULT_POINT_RADIUS: f64 = 4.5;
    /// Decimal places kept in path data.
    pub const DEFAULT_DIGITS: u32 = 3;
    /// Most decimal places that are still rounded; an f64 holds no more.
    pub const MAX_DIGITS: u32 = 15;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    /// Sets output precision; `None` writes coordinates unrounded, as does
    /// anything above [`GeoPath::MAX_DIGITS`].
    pub fn with_digits(mut self, digits: Option<u32>) -> Self {
        self.digits = digits;
        self
    }

    pub fn point_radius(&self) -> f64 {
        self.point_radius
    }

    pub fn digits(&self) -> Option<u32> {
        self.digits
    }

    /// Renders a feature as SVG path data. Returns `None` when the feature
    /// has no drawable geometry.
    pub fn path_data<P>(&self, feature: &Feature, projection: &P) -> Option<String>
    where
        P: LayerProjection + ?Sized,
    {
        let mut writer = PathWriter::new(self.point_radius, self.digits);
        stream_feature(feature, &mut TransformStream::new(projection, &mut writer));
        writer.finish()
    }

    /// Renders a bare geometry value as SVG path data.
    pub fn geometry_path_data<P>(&self, value: &Value, projection: &P) -> Option<String>
    where
        P: LayerProjection + ?Sized,
    {
        let mut writer = PathWriter::new(self.point_radius, self.digits);
        stream_geometry(value, &mut TransformStream::new(projection, &mut writer));
        writer.finish()
    }

    /// Computes the pixel bounds of all features under `projection`.
    /// Returns `None` when no feature contributes a point.
    pub fn bounds<'a, I, P>(&self, features: I, projection: &P) -> Option<PixelBounds>
    where
        I: IntoIterator<Item = &'a Feature>,
        P: LayerProjection + ?Sized,
    {
        let mut accumulator = BoundsAccumulator::default();
        for feature in features {
            stream_feature(feature, &mut TransformStream::new(projection, &mut accumulator));
        }
        accumulator.bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LinePoint {
    /// Not inside a line; points are drawn as circles
    Outside,
    First,
    Rest,
}

/// Writes streamed pixel geometry as SVG path commands.
struct PathWriter {
    out: String,
    circle: String,
    digits: Option<u32>,
    in_polygon: bool,
    line_point: LinePoint,
}

impl PathWriter {
    fn new(radius: f64, digits: Option<u32>) -> Self {
        let r = format_number(radius, digits);
        let d = format_number(2.0 * radius, digits);
        let circle = format!("m0,{r}a{r},{r} 0 1,1 0,-{d}a{r},{r} 0 1,1 0,{d}z");
        Self {
            out: String::new(),
            circle,
            digits,
            in_polygon: false,
            line_point: LinePoint::Outside,
        }
    }

    fn finish(self) -> Option<String> {
        if self.out.is_empty() {
            None
        } else {
            Some(self.out)
        }
    }

    fn push_point(&mut self, command: char, x: f64, y: f64) {
        let _ = write!(
            self.out,
            "{}{},{}",
            command,
            format_number(x, self.digits),
            format_number(y, self.digits)
        );
    }
}

impl GeoStream for PathWriter {
    fn point(&mut self, x: f64, y: f64) {
        match self.line_point {
            LinePoint::First => {
                self.push_point('M', x, y);
                self.line_point = LinePoint::Rest;
            }
            LinePoint::Rest => self.push_point('L', x, y),
            LinePoint::Outside => {
                self.push_point('M', x, y);
                self.out.push_str(&self.circle);
            }
        }
    }

    fn line_start(&mut self) {
        self.line_point = LinePoint::First;
    }

    fn line_end(&mut self) {
        if self.in_polygon {
            self.out.push('Z');
        }
        self.line_point = LinePoint::Outside;
    }

    fn polygon_start(&mut self) {
        self.in_polygon = true;
    }

    fn polygon_end(&mut self) {
        self.in_polygon = false;
    }
}

#[derive(Default)]
struct BoundsAccumulator {
    bounds: Option<PixelBounds>,
}

impl GeoStream for BoundsAccumulator {
    fn point(&mut self, x: f64, y: f64) {
        let point = DVec2::new(x, y);
        match &mut self.bounds {
            Some(bounds) => bounds.extend(point),
            None => self.bounds = Some(PixelBounds::from_point(point)),
        }
    }
}

/// Formats a coordinate, rounding to `digits` decimal places when set.
pub(crate) fn format_number(value: f64, digits: Option<u32>) -> String {
    let mut value = match digits {
        Some(digits) if digits <= GeoPath::MAX_DIGITS => {
            let k = 10_f64.powi(digits as i32);
            (value * k).round() / k
        }
        _ => value,
    };
    if value == 0.0 {
        // Avoid printing "-0"
        value = 0.0;
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::Coord;
    use geojson::Geometry;

    fn feature(value: Value) -> Feature {
        Feature::from(Geometry::new(value))
    }

    fn scaled(c: Coord<f64>) -> DVec2 {
        DVec2::new(c.x * 10.0, -c.y * 10.0)
    }

    #[test]
    fn test_polygon_path_data() {
        let square = feature(Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]));
        assert_eq!(
            GeoPath::new().path_data(&square, &scaled).as_deref(),
            Some("M0,0L10,0L10,-10L0,-10Z")
        );
    }

    #[test]
    fn test_polygon_with_hole_closes_each_ring() {
        let donut = feature(Value::Polygon(vec![
            vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0], vec![0.0, 0.0]],
            vec![vec![1.0, 1.0], vec![2.0, 1.0], vec![2.0, 2.0], vec![1.0, 1.0]],
        ]));
        assert_eq!(
            GeoPath::new().path_data(&donut, &scaled).as_deref(),
            Some("M0,0L40,0L40,-40ZM10,-10L20,-10L20,-20Z")
        );
    }

    #[test]
    fn test_line_string_is_open() {
        let line = feature(Value::MultiLineString(vec![
            vec![vec![0.0, 0.0], vec![1.0, 2.0]],
            vec![vec![3.0, 3.0], vec![4.0, 3.0]],
        ]));
        assert_eq!(
            GeoPath::new().path_data(&line, &scaled).as_deref(),
            Some("M0,0L10,-20M30,-30L40,-30")
        );
    }

    #[test]
    fn test_point_is_drawn_as_circle() {
        let point = feature(Value::Point(vec![1.0, 2.0]));
        assert_eq!(
            GeoPath::new().path_data(&point, &scaled).as_deref(),
            Some("M10,-20m0,4.5a4.5,4.5 0 1,1 0,-9a4.5,4.5 0 1,1 0,9z")
        );

        let small = GeoPath::new().with_point_radius(2.0);
        assert_eq!(
            small.path_data(&point, &scaled).as_deref(),
            Some("M10,-20m0,2a2,2 0 1,1 0,-4a2,2 0 1,1 0,4z")
        );
    }

    #[test]
    fn test_empty_geometry_has_no_path() {
        let empty = feature(Value::MultiPolygon(vec![]));
        assert_eq!(GeoPath::new().path_data(&empty, &scaled), None);

        let no_geometry = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(GeoPath::new().path_data(&no_geometry, &scaled), None);
    }

    #[test]
    fn test_precision() {
        let projection = |c: Coord<f64>| DVec2::new(c.x, c.y);
        let point = Value::LineString(vec![vec![1.23456, -0.0001], vec![2.0, 3.5]]);

        assert_eq!(
            GeoPath::new()
                .geometry_path_data(&point, &projection)
                .as_deref(),
            Some("M1.235,0L2,3.5")
        );
        assert_eq!(
            GeoPath::new()
                .with_digits(None)
                .geometry_path_data(&point, &projection)
                .as_deref(),
            Some("M1.23456,-0.0001L2,3.5")
        );
    }

    #[test]
    fn test_excess_precision_is_unrounded() {
        let projection = |c: Coord<f64>| DVec2::new(c.x, c.y);
        let line = Value::LineString(vec![vec![1.23456, -0.0001], vec![2.0, 3.5]]);

        for digits in [16, 400, u32::MAX] {
            assert_eq!(
                GeoPath::new()
                    .with_digits(Some(digits))
                    .geometry_path_data(&line, &projection)
                    .as_deref(),
                Some("M1.23456,-0.0001L2,3.5")
            );
        }
        assert_eq!(format_number(0.1, Some(GeoPath::MAX_DIGITS)), "0.1");
    }

    #[test]
    fn test_bounds_span_all_features() {
        let features = vec![
            feature(Value::Polygon(vec![vec![
                vec![0.0, 0.0],
                vec![2.0, 0.0],
                vec![2.0, 1.0],
                vec![0.0, 0.0],
            ]])),
            feature(Value::Point(vec![-1.0, 3.0])),
        ];
        let bounds = GeoPath::new().bounds(&features, &scaled).unwrap();
        assert_eq!(bounds.top_left(), DVec2::new(-10.0, -30.0));
        assert_eq!(bounds.bottom_right(), DVec2::new(20.0, 0.0));
        assert_eq!(bounds.width(), 30.0);
        assert_eq!(bounds.height(), 30.0);
    }

    #[test]
    fn test_bounds_of_nothing() {
        let features: Vec<Feature> = Vec::new();
        assert_eq!(GeoPath::new().bounds(&features, &scaled), None);
    }
}
