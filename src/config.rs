use std::env;

/// CloudFront distribution serving orthoimage tiles and uploaded overlays
pub const DEFAULT_CF_BASE: &str = "https://d3mamsvnskv4vj.cloudfront.net";
/// KML boundaries published alongside the map widget
pub const DEFAULT_BOUNDARY_BASE: &str =
    "https://ciarangracie.github.io/jotform-map-widget/boundaries";
/// Tile upload service
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

pub const DEFAULT_ZOOM: u32 = 15;
pub const MAX_ZOOM: u32 = 21;

pub const EXPORT_PATH: &str = "web/sites.json";
pub const USER_AGENT: &str = "minesite-registry/0.1";

/// Base URLs substituted into catalog entries at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cf_base: String,
    pub boundary_base: String,
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cf_base: DEFAULT_CF_BASE.to_string(),
            boundary_base: DEFAULT_BOUNDARY_BASE.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Empty values fall back to the defaults, like unset ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            cf_base: var("CLOUDFRONT_DOMAIN")
                .map(|domain| format!("https://{}", domain.trim_end_matches('/')))
                .unwrap_or(defaults.cf_base),
            boundary_base: var("MINESITE_BOUNDARY_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.boundary_base),
            server_url: var("MINESITE_SERVER_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
        }
    }

    /// Value for a `${NAME}` catalog template token.
    pub fn template_value(&self, name: &str) -> Option<&str> {
        match name {
            "CF_BASE" => Some(&self.cf_base),
            "BOUNDARY_BASE" => Some(&self.boundary_base),
            "SERVER_URL" => Some(&self.server_url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.cf_base, DEFAULT_CF_BASE);
    }

    #[test]
    fn test_cloudfront_domain_becomes_https_base() {
        let settings =
            Settings::from_lookup(lookup(&[("CLOUDFRONT_DOMAIN", "abc.cloudfront.net/")]));
        assert_eq!(settings.cf_base, "https://abc.cloudfront.net");
        assert_eq!(settings.boundary_base, DEFAULT_BOUNDARY_BASE);
    }

    #[test]
    fn test_blank_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            ("CLOUDFRONT_DOMAIN", "  "),
            ("MINESITE_SERVER_URL", "https://tiles.example.com/"),
        ]));
        assert_eq!(settings.cf_base, DEFAULT_CF_BASE);
        assert_eq!(settings.server_url, "https://tiles.example.com");
    }

    #[test]
    fn test_template_values() {
        let settings = Settings::default();
        assert_eq!(settings.template_value("CF_BASE"), Some(DEFAULT_CF_BASE));
        assert_eq!(settings.template_value("SERVER_URL"), Some(DEFAULT_SERVER_URL));
        assert_eq!(settings.template_value("cf_base"), None);
    }
}
