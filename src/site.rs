use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A mine or quarry site as shown by the map widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRecord {
    pub key: String,
    pub name: String,
    pub company: String,
    /// Orthoimage tile template with `{z}`, `{x}` and `{y}` placeholders
    pub tile_url: String,
    pub layers: Layers,
    /// `[longitude, latitude]`
    pub center: [f64; 2],
    pub default_zoom: u32,
}

impl SiteRecord {
    pub fn center_point(&self) -> Point<f64> {
        Point::new(self.center[0], self.center[1])
    }
}

/// Optional KML overlays, one slot per [`LayerKind`]. Empty slots serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Layers {
    #[serde(default)]
    pub boundaries: Option<String>,
    #[serde(default)]
    pub infrastructure: Option<String>,
    #[serde(default)]
    pub nfz_permanent: Option<String>,
    #[serde(default)]
    pub nfz_daily: Option<String>,
}

impl Layers {
    pub fn get(&self, kind: LayerKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    fn slot(&self, kind: LayerKind) -> &Option<String> {
        match kind {
            LayerKind::Boundaries => &self.boundaries,
            LayerKind::Infrastructure => &self.infrastructure,
            LayerKind::NfzPermanent => &self.nfz_permanent,
            LayerKind::NfzDaily => &self.nfz_daily,
        }
    }

    pub fn slot_mut(&mut self, kind: LayerKind) -> &mut Option<String> {
        match kind {
            LayerKind::Boundaries => &mut self.boundaries,
            LayerKind::Infrastructure => &mut self.infrastructure,
            LayerKind::NfzPermanent => &mut self.nfz_permanent,
            LayerKind::NfzDaily => &mut self.nfz_daily,
        }
    }

    /// Configured overlays in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &str)> {
        LayerKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|url| (kind, url)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Boundaries,
    Infrastructure,
    NfzPermanent,
    NfzDaily,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [
        Self::Boundaries,
        Self::Infrastructure,
        Self::NfzPermanent,
        Self::NfzDaily,
    ];

    /// Key under `layers` in catalog and export JSON.
    pub fn slot_name(&self) -> &'static str {
        match self {
            Self::Boundaries => "boundaries",
            Self::Infrastructure => "infrastructure",
            Self::NfzPermanent => "nfzPermanent",
            Self::NfzDaily => "nfzDaily",
        }
    }

    /// File stem used by the upload service, also its `layerType` value.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Boundaries => "boundaries",
            Self::Infrastructure => "infrastructure",
            Self::NfzPermanent => "nfz-permanent",
            Self::NfzDaily => "nfz-daily",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid layer type '{0}', must be one of: boundaries, infrastructure, nfz-permanent, nfz-daily"
)]
pub struct UnknownLayerKind(pub String);

impl FromStr for LayerKind {
    type Err = UnknownLayerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s || kind.slot_name() == s)
            .ok_or_else(|| UnknownLayerKind(s.to_string()))
    }
}

/// Where the upload service publishes a site's KML overlay of the given kind.
pub fn kml_url(cf_base: &str, key: &str, kind: LayerKind) -> String {
    format!("{}/{key}/{}.kml", cf_base.trim_end_matches('/'), kind.slug())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layers() -> Layers {
        Layers {
            boundaries: Some("https://example.com/b.kml".to_string()),
            nfz_daily: Some("https://example.com/d.kml".to_string()),
            ..Layers::default()
        }
    }

    #[test]
    fn test_layer_kind_parses_slug_and_slot_name() {
        assert_eq!("nfz-daily".parse::<LayerKind>(), Ok(LayerKind::NfzDaily));
        assert_eq!("nfzPermanent".parse::<LayerKind>(), Ok(LayerKind::NfzPermanent));
        assert_eq!(" boundaries ".parse::<LayerKind>(), Ok(LayerKind::Boundaries));
    }

    #[test]
    fn test_unknown_layer_kind_lists_valid_values() {
        let err = "roads".parse::<LayerKind>().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("invalid layer type 'roads', must be one of: "));
        assert!(message.ends_with("boundaries, infrastructure, nfz-permanent, nfz-daily"));
    }

    #[test]
    fn test_layer_kind_display_is_padded_slug() {
        assert_eq!(LayerKind::NfzDaily.to_string(), "nfz-daily");
        assert_eq!(format!("{:<12}|", LayerKind::Boundaries), "boundaries  |");
    }

    #[test]
    fn test_every_layer_kind_is_listed_in_parse_error() {
        let message = "x".parse::<LayerKind>().unwrap_err().to_string();
        for kind in LayerKind::ALL {
            assert!(message.contains(kind.slug()), "{message}");
        }
    }

    #[test]
    fn test_layers_iter_skips_empty_slots() {
        let kinds: Vec<LayerKind> = layers().iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![LayerKind::Boundaries, LayerKind::NfzDaily]);
    }

    #[test]
    fn test_layers_serialize_empty_slots_as_null() {
        let value = serde_json::to_value(layers()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "boundaries": "https://example.com/b.kml",
                "infrastructure": null,
                "nfzPermanent": null,
                "nfzDaily": "https://example.com/d.kml",
            })
        );
    }

    #[test]
    fn test_layers_reject_unknown_slot() {
        let result: Result<Layers, _> = serde_json::from_str(r#"{"roads": "x.kml"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_slot_mut_writes_matching_slot() {
        let mut layers = Layers::default();
        *layers.slot_mut(LayerKind::Infrastructure) = Some("i.kml".to_string());
        assert_eq!(layers.get(LayerKind::Infrastructure), Some("i.kml"));
        assert_eq!(layers.get(LayerKind::Boundaries), None);
    }

    #[test]
    fn test_kml_url_follows_upload_convention() {
        assert_eq!(
            kml_url("https://cdn.example.com/", "koth", LayerKind::NfzPermanent),
            "https://cdn.example.com/koth/nfz-permanent.kml"
        );
    }
}
