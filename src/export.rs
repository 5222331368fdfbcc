use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::registry::SiteRegistry;

/// Write the registry as the map widget's site table plus a GeoJSON layer of site centers.
pub fn export_json(registry: &SiteRegistry, output: &str) -> Result<()> {
    let data = build_document(registry)?;

    if let Some(parent) = Path::new(output).parent() {
        fs::create_dir_all(parent)?;
    }
    let json_str = serde_json::to_string_pretty(&data).context("Failed to serialize sites")?;
    fs::write(output, &json_str).with_context(|| format!("Failed to write {output}"))?;

    let overlays: usize = registry.iter().map(|s| s.layers.iter().count()).sum();
    info!(
        "Exported to {output}: {} sites, {overlays} overlays",
        registry.len()
    );

    Ok(())
}

fn build_document(registry: &SiteRegistry) -> Result<Value> {
    let mut sites = Map::new();
    for site in registry.iter() {
        let value = serde_json::to_value(site)
            .with_context(|| format!("Failed to serialize site {}", site.key))?;
        sites.insert(site.key.clone(), value);
    }

    Ok(json!({
        "keys": registry.list_keys(),
        "sites": sites,
        "centers": {
            "type": "FeatureCollection",
            "features": build_center_features(registry),
        },
    }))
}

fn build_center_features(registry: &SiteRegistry) -> Vec<Value> {
    registry
        .iter()
        .map(|site| {
            let center = site.center_point();
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [center.x(), center.y()],
                },
                "properties": {
                    "key": site.key,
                    "name": site.name,
                    "company": site.company,
                    "defaultZoom": site.default_zoom,
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_export_writes_sites_and_centers() {
        let registry = SiteRegistry::builtin(&Settings::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("web").join("sites.json");

        export_json(&registry, output.to_str().unwrap()).unwrap();

        let data: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(data["keys"].as_array().unwrap().len(), 8);
        assert_eq!(data["keys"][0], "binduli-north");

        let gruyere = &data["sites"]["gruyere"];
        assert_eq!(gruyere["name"], "Gruyere");
        assert_eq!(gruyere["company"], "Goldfields");
        assert_eq!(gruyere["defaultZoom"], 15);
        assert_eq!(gruyere["center"], json!([123.8552, -27.9897]));
        assert_eq!(gruyere["layers"]["nfzDaily"], Value::Null);

        let features = data["centers"]["features"].as_array().unwrap();
        assert_eq!(features.len(), 8);
        let feature = features
            .iter()
            .find(|f| f["properties"]["key"] == "gruyere")
            .unwrap();
        assert_eq!(feature["geometry"]["type"], "Point");
        assert_eq!(feature["geometry"]["coordinates"], json!([123.8552, -27.9897]));
    }
}
