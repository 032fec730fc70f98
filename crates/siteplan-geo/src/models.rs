//! Conversions between the canonical [`Geometry`] and `geo` crate types

use geo::{Coord, Geometry as GeoGeometry, LineString, MultiPolygon, Polygon};
use siteplan_core::models::Geometry;

fn line(coords: &[[f64; 2]]) -> LineString<f64> {
    LineString::from(coords.iter().map(|&[x, y]| Coord { x, y }).collect::<Vec<_>>())
}

fn polygon(rings: &[Vec<[f64; 2]>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| line(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

fn coords(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

fn rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors()).map(coords).collect()
}

/// Convert a canonical geometry into a `geo::Geometry`
pub fn to_geo_geometry(geometry: &Geometry) -> GeoGeometry<f64> {
    match geometry {
        Geometry::Point { coordinates: [x, y] } => GeoGeometry::Point(geo::Point::new(*x, *y)),
        Geometry::LineString { coordinates } => GeoGeometry::LineString(line(coordinates)),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(
            coordinates.iter().map(|&[x, y]| geo::Point::new(x, y)).collect(),
        ),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| line(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(MultiPolygon::new(
            coordinates.iter().map(|p| polygon(p)).collect(),
        )),
    }
}

/// Convert a `geo::Geometry` back into the canonical model.
///
/// Lines, rectangles and triangles become their LineString/Polygon
/// equivalents. Geometry collections have no canonical form and yield `None`.
pub fn from_geo_geometry(geometry: &GeoGeometry<f64>) -> Option<Geometry> {
    let converted = match geometry {
        GeoGeometry::Point(p) => Geometry::point(p.x(), p.y()),
        GeoGeometry::Line(l) => Geometry::LineString {
            coordinates: vec![[l.start.x, l.start.y], [l.end.x, l.end.y]],
        },
        GeoGeometry::LineString(ls) => Geometry::LineString { coordinates: coords(ls) },
        GeoGeometry::Polygon(p) => Geometry::Polygon { coordinates: rings(p) },
        GeoGeometry::MultiPoint(mp) => Geometry::MultiPoint {
            coordinates: mp.iter().map(|p| [p.x(), p.y()]).collect(),
        },
        GeoGeometry::MultiLineString(mls) => Geometry::MultiLineString {
            coordinates: mls.iter().map(coords).collect(),
        },
        GeoGeometry::MultiPolygon(mp) => Geometry::MultiPolygon {
            coordinates: mp.iter().map(rings).collect(),
        },
        GeoGeometry::Rect(r) => Geometry::Polygon { coordinates: rings(&r.to_polygon()) },
        GeoGeometry::Triangle(t) => Geometry::Polygon { coordinates: rings(&t.to_polygon()) },
        GeoGeometry::GeometryCollection(_) => return None,
    };

    Some(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_conversion() {
        let geom = Geometry::point(-73.98, 40.75);
        let back = from_geo_geometry(&to_geo_geometry(&geom)).unwrap();
        assert_eq!(geom, back);
    }

    #[test]
    fn test_polygon_with_hole_keeps_rings() {
        let geom = Geometry::polygon(vec![
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]],
        ]);

        match to_geo_geometry(&geom) {
            GeoGeometry::Polygon(p) => assert_eq!(p.interiors().len(), 1),
            other => panic!("expected polygon, got {:?}", other),
        }

        assert_eq!(from_geo_geometry(&to_geo_geometry(&geom)).unwrap(), geom);
    }

    #[test]
    fn test_rect_becomes_polygon() {
        let rect = geo::Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
        let converted = from_geo_geometry(&GeoGeometry::Rect(rect)).unwrap();
        assert!(converted.is_polygonal());
    }

    #[test]
    fn test_collection_has_no_canonical_form() {
        let gc = GeoGeometry::GeometryCollection(geo::GeometryCollection::<f64>(vec![]));
        assert!(from_geo_geometry(&gc).is_none());
    }
}
