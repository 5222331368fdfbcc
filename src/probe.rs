use std::fmt;
use tracing::{debug, warn};

use crate::site::SiteRecord;
use crate::tiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Ok(u16),
    Http(u16),
    Failed(String),
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(code) => write!(f, "ok ({code})"),
            Self::Http(code) => write!(f, "HTTP {code}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// `tile` or the overlay's layer slug
    pub label: String,
    pub url: String,
    pub status: ProbeStatus,
}

/// Fetch the site's center tile and every configured overlay.
/// Unreachable URLs are reported, not returned as errors.
pub async fn probe_site(
    client: &reqwest::Client,
    site: &SiteRecord,
    zoom: Option<u32>,
) -> Vec<ProbeResult> {
    let mut targets = vec![("tile".to_string(), tiles::center_tile_url(site, zoom))];
    targets.extend(
        site.layers
            .iter()
            .map(|(kind, url)| (kind.slug().to_string(), url.to_string())),
    );

    let mut results = Vec::with_capacity(targets.len());
    for (label, url) in targets {
        let status = probe_url(client, &url).await;
        match &status {
            ProbeStatus::Ok(_) => debug!("{} {label}: {status}", site.key),
            _ => warn!("{} {label} {url}: {status}", site.key),
        }
        results.push(ProbeResult { label, url, status });
    }
    results
}

async fn probe_url(client: &reqwest::Client, url: &str) -> ProbeStatus {
    match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => ProbeStatus::Ok(resp.status().as_u16()),
        Ok(resp) => ProbeStatus::Http(resp.status().as_u16()),
        Err(e) => ProbeStatus::Failed(e.to_string()),
    }
}
