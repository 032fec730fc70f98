//! Integration tests for the memoized footprint layer

use siteplan_core::error::SiteplanError;
use siteplan_core::models::{FeatureId, Geometry};
use siteplan_store::GeometryStore;
use std::fs;
use std::sync::Arc;

const BLOCKS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-73.99, 40.75], [-73.98, 40.75], [-73.98, 40.76], [-73.99, 40.76], [-73.99, 40.75]]]
            },
            "properties": { "bin": 1001, "height": 42.5 }
        },
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-73.97, 40.75], [-73.96, 40.75], [-73.96, 40.76], [-73.97, 40.76], [-73.97, 40.75]]]
            },
            "properties": { "bin": 1002, "height": 18.0 }
        }
    ]
}"#;

#[tokio::test]
async fn test_load_is_memoized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.geojson");
    fs::write(&path, BLOCKS).unwrap();

    let store = GeometryStore::new(&path);
    let first = store.load().await.unwrap();

    // Later loads must not go back to disk
    fs::remove_file(&path).unwrap();
    let second = store.load().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(store.is_loaded());
    assert_eq!(first.len(), 2);
    assert!(first.crs.is_wgs84());
    assert_eq!(first.features[1].id, FeatureId(1));
}

#[tokio::test]
async fn test_failed_load_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.geojson");

    let store = GeometryStore::new(&path);
    assert!(matches!(store.load().await, Err(SiteplanError::DataLoad { .. })));

    fs::write(&path, BLOCKS).unwrap();
    assert_eq!(store.load().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_layer_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.geojson");
    fs::write(&path, r#"{ "type": "FeatureCollection", "features": [] }"#).unwrap();

    let err = GeometryStore::new(&path).load().await.unwrap_err();

    assert!(matches!(err, SiteplanError::DataLoad { .. }));
    assert!(err.to_string().contains("no features"));
}

#[tokio::test]
async fn test_unparseable_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.geojson");
    fs::write(&path, "{ not json").unwrap();

    let result = GeometryStore::new(&path).load().await;
    assert!(matches!(result, Err(SiteplanError::DataLoad { .. })));
}

#[tokio::test]
async fn test_projected_layer_is_normalized_to_wgs84() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mercator.geojson");
    fs::write(
        &path,
        r#"{
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "EPSG:3857" } },
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [111319.49, 0.0] },
                    "properties": { "name": "marker" }
                }
            ]
        }"#,
    )
    .unwrap();

    let collection = GeometryStore::new(&path).load().await.unwrap();

    assert!(collection.crs.is_wgs84());
    match &collection.features[0].geometry {
        Geometry::Point { coordinates: [lon, lat] } => {
            assert!((lon - 1.0).abs() < 1e-6);
            assert!(lat.abs() < 1e-9);
        }
        other => panic!("expected point, got {:?}", other),
    }
    assert_eq!(collection.features[0].properties["name"], "marker");
}

#[tokio::test]
async fn test_layer_with_altitude_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks_z.geojson");
    fs::write(
        &path,
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-73.99, 40.75, 12.0], [-73.98, 40.75, 12.0], [-73.98, 40.76, 12.0], [-73.99, 40.75, 12.0]]]
                    },
                    "properties": { "bin": 1001 }
                }
            ]
        }"#,
    )
    .unwrap();

    let collection = GeometryStore::new(&path).load().await.unwrap();

    assert_eq!(collection.len(), 1);
    assert!(collection.features[0].geometry.is_polygonal());
}

const UTM_18N_PRJ: &str = r#"PROJCS["NAD83 / UTM zone 18N",GEOGCS["NAD83",DATUM["North_American_Datum_1983",SPHEROID["GRS 1980",6378137,298.257222101,AUTHORITY["EPSG","7019"]],AUTHORITY["EPSG","6269"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4269"]],PROJECTION["Transverse_Mercator"],UNIT["metre",1,AUTHORITY["EPSG","9001"]],AUTHORITY["EPSG","26918"]]"#;

#[tokio::test]
async fn test_shapefile_layer_is_normalized_to_wgs84() {
    use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
    use shapefile::{Point, Polygon, PolygonRing};

    let dir = tempfile::tempdir().unwrap();
    let shp = dir.path().join("OneNeighborhood.shp");

    let table =
        TableWriterBuilder::new().add_numeric_field(FieldName::try_from("BIN").unwrap(), 10, 0);
    {
        let mut writer = shapefile::Writer::from_path(&shp, table).unwrap();
        for (i, x) in [583_000.0, 583_100.0].into_iter().enumerate() {
            let y = 4_507_000.0;
            let polygon = Polygon::new(PolygonRing::Outer(vec![
                Point::new(x, y),
                Point::new(x, y + 25.0),
                Point::new(x + 25.0, y + 25.0),
                Point::new(x + 25.0, y),
                Point::new(x, y),
            ]));
            let mut record = Record::default();
            record.insert("BIN".to_string(), FieldValue::Numeric(Some(1001.0 + i as f64)));
            writer.write_shape_and_record(&polygon, &record).unwrap();
        }
    }
    fs::write(dir.path().join("OneNeighborhood.prj"), UTM_18N_PRJ).unwrap();

    let collection = GeometryStore::new(&shp).load().await.unwrap();

    assert!(collection.crs.is_wgs84());
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.features[1].id, FeatureId(1));
    assert_eq!(collection.features[1].properties["BIN"], 1002.0);

    match &collection.features[0].geometry {
        Geometry::Polygon { coordinates } => {
            let [lon, lat] = coordinates[0][0];
            assert!((-74.1..-73.9).contains(&lon), "lon {}", lon);
            assert!((40.6..40.8).contains(&lat), "lat {}", lat);
        }
        other => panic!("expected polygon, got {:?}", other),
    }
}
