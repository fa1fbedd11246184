//! Streaming traversal of GeoJSON geometry.
//!
//! Geometry is walked once and pushed into a [`GeoStream`] sink as a
//! sequence of points framed by line and polygon markers. Sinks that
//! produce path data or bounds only have to handle those events.

use crate::map::LayerProjection;
use geo_types::Coord;
use geojson::{Feature, Value};

/// Receiver of streamed geometry events.
pub trait GeoStream {
    fn point(&mut self, x: f64, y: f64);
    fn line_start(&mut self) {}
    fn line_end(&mut self) {}
    fn polygon_start(&mut self) {}
    fn polygon_end(&mut self) {}
}

/// Streams a feature's geometry. Features without geometry emit nothing.
pub fn stream_feature<S: GeoStream + ?Sized>(feature: &Feature, sink: &mut S) {
    if let Some(geometry) = &feature.geometry {
        stream_geometry(&geometry.value, sink);
    }
}

/// Streams a geometry value.
///
/// Polygon rings are emitted without their closing position; sinks close
/// rings themselves on `line_end` inside a polygon.
pub fn stream_geometry<S: GeoStream + ?Sized>(value: &Value, sink: &mut S) {
    match value {
        Value::Point(position) => stream_position(position, sink),
        Value::MultiPoint(positions) => {
            for position in positions {
                stream_position(position, sink);
            }
        }
        Value::LineString(line) => stream_line(line, sink, false),
        Value::MultiLineString(lines) => {
            for line in lines {
                stream_line(line, sink, false);
            }
        }
        Value::Polygon(rings) => stream_polygon(rings, sink),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                stream_polygon(rings, sink);
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                stream_geometry(&geometry.value, sink);
            }
        }
    }
}

fn stream_position<S: GeoStream + ?Sized>(position: &[f64], sink: &mut S) {
    // Positions need at least longitude and latitude; extra ordinates are ignored
    if let [x, y, ..] = position {
        sink.point(*x, *y);
    }
}

fn stream_line<S: GeoStream + ?Sized>(line: &[Vec<f64>], sink: &mut S, closed: bool) {
    let n = if closed {
        line.len().saturating_sub(1)
    } else {
        line.len()
    };
    sink.line_start();
    for position in &line[..n] {
        stream_position(position, sink);
    }
    sink.line_end();
}

fn stream_polygon<S: GeoStream + ?Sized>(rings: &[Vec<Vec<f64>>], sink: &mut S) {
    sink.polygon_start();
    for ring in rings {
        stream_line(ring, sink, true);
    }
    sink.polygon_end();
}

/// Adapter that projects every point from longitude/latitude into layer
/// pixels before handing it to the wrapped sink.
pub struct TransformStream<'a, P: ?Sized, S: ?Sized> {
    projection: &'a P,
    sink: &'a mut S,
}

impl<'a, P, S> TransformStream<'a, P, S>
where
    P: LayerProjection + ?Sized,
    S: GeoStream + ?Sized,
{
    pub fn new(projection: &'a P, sink: &'a mut S) -> Self {
        Self { projection, sink }
    }
}

impl<P, S> GeoStream for TransformStream<'_, P, S>
where
    P: LayerProjection + ?Sized,
    S: GeoStream + ?Sized,
{
    fn point(&mut self, x: f64, y: f64) {
        let point = self.projection.lat_lng_to_layer_point(Coord { x, y });
        self.sink.point(point.x, point.y);
    }

    fn line_start(&mut self) {
        self.sink.line_start();
    }

    fn line_end(&mut self) {
        self.sink.line_end();
    }

    fn polygon_start(&mut self) {
        self.sink.polygon_start();
    }

    fn polygon_end(&mut self) {
        self.sink.polygon_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl GeoStream for Recorder {
        fn point(&mut self, x: f64, y: f64) {
            self.events.push(format!("p({},{})", x, y));
        }
        fn line_start(&mut self) {
            self.events.push("ls".to_string());
        }
        fn line_end(&mut self) {
            self.events.push("le".to_string());
        }
        fn polygon_start(&mut self) {
            self.events.push("ps".to_string());
        }
        fn polygon_end(&mut self) {
            self.events.push("pe".to_string());
        }
    }

    #[test]
    fn test_polygon_ring_drops_closing_position() {
        let square = Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]);
        let mut recorder = Recorder::default();
        stream_geometry(&square, &mut recorder);
        assert_eq!(
            recorder.events,
            vec!["ps", "ls", "p(0,0)", "p(1,0)", "p(1,1)", "le", "pe"]
        );
    }

    #[test]
    fn test_line_and_points() {
        let collection = Value::GeometryCollection(vec![
            geojson::Geometry::new(Value::LineString(vec![vec![0.0, 0.0], vec![2.0, 3.0]])),
            geojson::Geometry::new(Value::MultiPoint(vec![vec![5.0, 6.0, 100.0], vec![7.0]])),
        ]);
        let mut recorder = Recorder::default();
        stream_geometry(&collection, &mut recorder);
        assert_eq!(
            recorder.events,
            vec!["ls", "p(0,0)", "p(2,3)", "le", "p(5,6)"]
        );
    }

    #[test]
    fn test_feature_without_geometry() {
        let mut recorder = Recorder::default();
        let feature = Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        stream_feature(&feature, &mut recorder);
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_transform_stream_projects_points() {
        let projection = |c: Coord<f64>| DVec2::new(c.x * 2.0, c.y * -2.0);
        let mut recorder = Recorder::default();
        {
            let mut stream = TransformStream::new(&projection, &mut recorder);
            stream_geometry(&Value::Point(vec![3.0, 4.0]), &mut stream);
        }
        assert_eq!(recorder.events, vec!["p(6,-8)"]);
    }
}
