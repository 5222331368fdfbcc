use crate::site::SiteRecord;

pub const PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

/// True when every placeholder occurs exactly once in the template.
pub fn has_placeholders_once(template: &str) -> bool {
    PLACEHOLDERS
        .iter()
        .all(|token| template.matches(token).count() == 1)
}

pub fn resolve(template: &str, tile: Tile) -> String {
    template
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}

/// Where the upload service publishes a site's orthoimage tiles.
pub fn cdn_template(cf_base: &str, key: &str) -> String {
    format!("{}/{key}/{{z}}/{{x}}/{{y}}.png", cf_base.trim_end_matches('/'))
}

/// Tile covering the site's center. `zoom` falls back to the site's default.
pub fn center_tile(site: &SiteRecord, zoom: Option<u32>) -> Tile {
    let z = zoom.unwrap_or(site.default_zoom);
    let center = site.center_point();
    Tile {
        z,
        x: lon_to_tile(center.x(), z),
        y: lat_to_tile(center.y(), z),
    }
}

pub fn center_tile_url(site: &SiteRecord, zoom: Option<u32>) -> String {
    resolve(&site.tile_url, center_tile(site, zoom))
}

pub fn lon_to_tile(lon: f64, zoom: u32) -> u32 {
    let n = 2_f64.powi(zoom as i32);
    clamp_index((lon / 360.0 + 0.5) * n, n)
}

pub fn lat_to_tile(lat: f64, zoom: u32) -> u32 {
    let n = 2_f64.powi(zoom as i32);
    clamp_index(mercator_y(lat) * n, n)
}

// Centers are not range-checked, so keep indices on the grid.
fn clamp_index(pos: f64, n: f64) -> u32 {
    pos.floor().clamp(0.0, n - 1.0) as u32
}

/// Convert latitude to Web Mercator Y fraction (0.0 = top, 1.0 = bottom).
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0
}
