//! Catalog files: the JSON form of the site table.
//!
//! Entries use the `layers` shape. Older entries with a flat `boundaryUrl`
//! are migrated into `layers.boundaries` on load, and `${CF_BASE}`,
//! `${BOUNDARY_BASE}` and `${SERVER_URL}` are expanded from [`Settings`].

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::{DEFAULT_ZOOM, Settings};
use crate::error::RegistryError;
use crate::site::{LayerKind, Layers, SiteRecord};

const BUILTIN: &str = include_str!("../data/sites.json");

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    sites: Entries,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSite {
    name: String,
    company: String,
    tile_url: String,
    #[serde(default)]
    boundary_url: Option<String>,
    #[serde(default)]
    layers: Layers,
    center: [f64; 2],
    #[serde(default = "default_zoom")]
    default_zoom: u32,
}

fn default_zoom() -> u32 {
    DEFAULT_ZOOM
}

/// Site entries in file order. Repeated keys are kept so the registry can reject them.
struct Entries(Vec<(String, RawSite)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of site key to site entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, site)) = map.next_entry::<String, RawSite>()? {
                    entries.push((key, site));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl RawSite {
    fn into_record(self, key: String, settings: &Settings) -> Result<SiteRecord, RegistryError> {
        let mut layers = self.layers;
        if let Some(url) = self.boundary_url {
            if layers.boundaries.is_some() {
                return Err(RegistryError::ConflictingBoundary(key));
            }
            debug!("Migrating boundaryUrl of '{key}' into layers.boundaries");
            layers.boundaries = Some(url);
        }

        for kind in LayerKind::ALL {
            let slot = layers.slot_mut(kind);
            if let Some(url) = slot.take() {
                *slot = Some(expand(&key, &url, settings)?);
            }
        }

        Ok(SiteRecord {
            tile_url: expand(&key, &self.tile_url, settings)?,
            key,
            name: self.name,
            company: self.company,
            layers,
            center: self.center,
            default_zoom: self.default_zoom,
        })
    }
}

/// Substitute `${NAME}` tokens. Slippy placeholders like `{z}` pass through.
fn expand(key: &str, input: &str, settings: &Settings) -> Result<String, RegistryError> {
    let unknown = |name: &str| RegistryError::UnknownTemplate {
        key: key.to_string(),
        name: name.to_string(),
    };

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| RegistryError::UnterminatedTemplate {
                key: key.to_string(),
                input: input.to_string(),
            })?;
        let name = &after[..end];
        out.push_str(settings.template_value(name).ok_or_else(|| unknown(name))?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Parse catalog JSON. `origin` names the source in errors.
pub fn parse(
    json: &str,
    origin: &str,
    settings: &Settings,
) -> Result<Vec<SiteRecord>, RegistryError> {
    let file: CatalogFile = serde_json::from_str(json).map_err(|source| RegistryError::Parse {
        path: origin.to_string(),
        source,
    })?;

    file.sites
        .0
        .into_iter()
        .map(|(key, site)| site.into_record(key, settings))
        .collect()
}

pub fn read(path: &Path, settings: &Settings) -> Result<Vec<SiteRecord>, RegistryError> {
    let origin = path.display().to_string();
    let data = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: origin.clone(),
        source,
    })?;
    parse(&data, &origin, settings)
}

/// The site table compiled into the binary.
pub fn builtin(settings: &Settings) -> Result<Vec<SiteRecord>, RegistryError> {
    parse(BUILTIN, "built-in catalog", settings)
}
