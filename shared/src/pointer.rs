use serde::{Deserialize, Serialize};

/// Where a pointer sample came from. Mouse and touch go through the same
/// three sheet transitions; the source is only kept for logging and for the
/// horizontal scroll multiplier of the category strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSource {
    Mouse,
    Touch,
}

impl PointerSource {
    pub fn from_is_touch(is_touch: bool) -> Self {
        if is_touch {
            PointerSource::Touch
        } else {
            PointerSource::Mouse
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, PointerSource::Touch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PointerSource::Mouse => "mouse",
            PointerSource::Touch => "touch",
        }
    }
}

/// One normalized pointer position in client (viewport) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub source: PointerSource,
}

impl PointerSample {
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            source: PointerSource::Mouse,
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            source: PointerSource::Touch,
        }
    }

    /// First finite touch point of a touch list. Touch end events usually
    /// carry an empty list, which yields `None`.
    pub fn first_touch<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points
            .into_iter()
            .find(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| Self::touch(x, y))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
