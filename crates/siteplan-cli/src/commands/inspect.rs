//! Inspect command implementation

use crate::output::OutputWriter;
use crate::output_types::InspectOutput;
use anyhow::Result;
use siteplan_core::config::LayeredConfig;
use siteplan_core::models::GeometryType;
use siteplan_geo::map_center;
use siteplan_store::GeometryStore;

pub async fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = GeometryStore::new(config.data_path.value.clone());
    let collection = store.load().await?;

    let center = map_center(&collection)?;

    let mut geometry_types: Vec<GeometryType> = Vec::new();
    for feature in collection.iter() {
        let kind = feature.geometry.geometry_type();
        if !geometry_types.contains(&kind) {
            geometry_types.push(kind);
        }
    }

    let inspect = InspectOutput {
        path: store.path().display().to_string(),
        name: collection.name.clone(),
        feature_count: collection.len(),
        crs: collection.crs.to_string(),
        geometry_types,
        columns: collection.columns(),
        center,
    };

    if output.is_json() {
        return output.result(inspect);
    }

    output.section("Footprint Layer");
    output.kv("Path", &inspect.path);
    output.kv("Name", &inspect.name);
    output.kv("Features", inspect.feature_count);
    output.kv("CRS", &inspect.crs);
    output.kv(
        "Geometry",
        inspect.geometry_types.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "),
    );
    output.kv("Columns", inspect.columns.join(", "));

    match inspect.center {
        Some([lon, lat]) => output.kv("Map centre", format!("{:.6}, {:.6} (lon, lat)", lon, lat)),
        None => {
            let [lon, lat] = config.default_center.value;
            output.warning(format!(
                "Layer has no centroid, map would use the default centre {}, {}",
                lon, lat
            ));
        }
    }

    Ok(())
}
