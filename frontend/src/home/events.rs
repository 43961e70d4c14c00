// frontend/src/home/events.rs

use civix_shared::GeoFix;
use serde::Deserialize;

/// Messages the map and geolocation bridges push into `window.__civix_events`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapEvent {
    Ready,
    /// Leaflet never loaded; the init retry gave up.
    Unavailable,
    /// The window lost focus; any live drag is abandoned.
    PointerLost,
    Marker {
        id: u32,
    },
    Fix(GeoFix),
    GeoError {
        code: u16,
        #[serde(default)]
        message: String,
    },
}

/// Parses a drained queue. Unknown or malformed entries are skipped.
pub fn parse_events(raw: &str) -> Vec<MapEvent> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("bad event batch from JS: {e}");
            return Vec::new();
        }
    };
    values
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<MapEvent>(v) {
            Ok(ev) => Some(ev),
            Err(e) => {
                log::warn!("dropping JS event: {e}");
                None
            }
        })
        .collect()
}

pub async fn drain() -> Vec<MapEvent> {
    let raw = super::js_query_string(
        r#"(typeof window.__civix_drain === "function") ? window.__civix_drain() : "[]""#,
    )
    .await;
    match raw {
        Some(raw) => parse_events(&raw),
        None => Vec::new(),
    }
}
