use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::catalog;
use crate::config::{MAX_ZOOM, Settings};
use crate::error::RegistryError;
use crate::site::SiteRecord;
use crate::tiles;

/// Immutable lookup of sites by key, built once at start-up and handed to consumers.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<SiteRecord>,
    index: HashMap<String, usize>,
}

impl SiteRegistry {
    /// Validate records and index them. Declaration order is kept.
    pub fn from_records(records: Vec<SiteRecord>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(records.len());

        for (i, site) in records.iter().enumerate() {
            if site.tile_url.trim().is_empty() {
                return Err(RegistryError::EmptyTileUrl(site.key.clone()));
            }
            if !tiles::has_placeholders_once(&site.tile_url) {
                return Err(RegistryError::BadPlaceholders {
                    key: site.key.clone(),
                    url: site.tile_url.clone(),
                });
            }
            if site.default_zoom > MAX_ZOOM {
                return Err(RegistryError::ZoomOutOfRange {
                    key: site.key.clone(),
                    zoom: site.default_zoom,
                    max: MAX_ZOOM,
                });
            }
            if index.insert(site.key.clone(), i).is_some() {
                return Err(RegistryError::DuplicateKey(site.key.clone()));
            }
        }

        Ok(Self {
            sites: records,
            index,
        })
    }

    pub fn builtin(settings: &Settings) -> Result<Self, RegistryError> {
        let registry = Self::from_records(catalog::builtin(settings)?)?;
        info!("Loaded {} sites from built-in catalog", registry.len());
        Ok(registry)
    }

    pub fn load(path: &Path, settings: &Settings) -> Result<Self, RegistryError> {
        let registry = Self::from_records(catalog::read(path, settings)?)?;
        info!("Loaded {} sites from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Result<&SiteRecord, RegistryError> {
        self.index
            .get(key)
            .map(|&i| &self.sites[i])
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in declaration order.
    pub fn list_keys(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRecord> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
