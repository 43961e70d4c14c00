use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean earth radius used by web map libraries for metre conversions.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One reading from the geolocation source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl GeoFix {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Accuracy radius for the map circle, `fallback` when the source gave none.
    pub fn accuracy_or(&self, fallback: f64) -> f64 {
        match self.accuracy_m {
            Some(a) if a.is_finite() && a > 0.0 => a,
            _ => fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoError {
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Other(String),
}

impl GeoError {
    /// Maps the browser `GeolocationPositionError.code`. Code 0 is reported by
    /// the map bridge when `navigator.geolocation` is missing.
    pub fn from_code(code: u16, message: &str) -> Self {
        match code {
            0 => GeoError::Unsupported,
            1 => GeoError::PermissionDenied,
            2 => GeoError::PositionUnavailable,
            3 => GeoError::Timeout,
            _ => GeoError::Other(message.to_string()),
        }
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::Unsupported => f.write_str("geolocation is not supported on this platform"),
            GeoError::PermissionDenied => f.write_str("geolocation permission denied"),
            GeoError::PositionUnavailable => f.write_str("position unavailable"),
            GeoError::Timeout => f.write_str("timed out waiting for a position"),
            GeoError::Other(msg) => write!(f, "geolocation error: {msg}"),
        }
    }
}

impl std::error::Error for GeoError {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn contains(&self, p: LatLng) -> bool {
        (self.south..=self.north).contains(&p.lat) && (self.west..=self.east).contains(&p.lng)
    }
}

/// Box enclosing a circle of `radius_m` around `center`, used to fit the
/// map around the user's range circle.
pub fn range_bounds(center: LatLng, radius_m: f64) -> Bounds {
    let radius_m = if radius_m.is_finite() { radius_m.max(0.0) } else { 0.0 };
    let dlat = (radius_m / EARTH_RADIUS_M).to_degrees();
    // Longitude degrees shrink towards the poles; stop dividing by ~0 near them.
    let cos_lat = center.lat.to_radians().cos().max(1e-6);
    let dlng = (dlat / cos_lat).min(180.0);
    Bounds {
        south: (center.lat - dlat).max(-90.0),
        west: center.lng - dlng,
        north: (center.lat + dlat).min(90.0),
        east: center.lng + dlng,
    }
}
