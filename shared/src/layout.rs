use crate::geo::LatLng;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_LAYOUT_PATH: &str = "layout/layout.json";
const EMBEDDED_LAYOUT_JSON: &str = include_str!("../layout/layout.json");

/// Height of the sheet strip that stays visible when closed.
pub const PEEK_HEIGHT_PX: f64 = 72.0;
/// Clearance between an overlay button and the sheet's top edge.
pub const ANCHOR_GAP_PX: f64 = 16.0;
/// Viewport width at and above which overlays stop tracking the sheet.
pub const BREAKPOINT_PX: f64 = 900.0;

static EMBEDDED: Lazy<LayoutConfig> = Lazy::new(|| match parse_layout(EMBEDDED_LAYOUT_JSON) {
    Ok(layout) => layout,
    Err(e) => {
        log::warn!("embedded layout rejected, using defaults: {e}");
        LayoutConfig::default()
    }
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub version: u32,
    #[serde(default)]
    pub sheet: SheetLayout,
    #[serde(default)]
    pub overlays: OverlaysLayout,
    #[serde(default)]
    pub feedback: FeedbackCadence,
    #[serde(default)]
    pub map: MapLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub peek_height: f64,
    /// Fraction of the closed offset at or below which a release opens the sheet.
    pub open_ratio: f64,
    /// Fraction of the closed offset at or above which a release closes the sheet.
    pub close_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaysLayout {
    pub anchor_gap: f64,
    pub breakpoint: f64,
    pub location: OverlaySpec,
    pub report: OverlaySpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlaySide {
    Left,
    Right,
}

impl OverlaySide {
    pub fn as_css(&self) -> &'static str {
        match self {
            OverlaySide::Left => "left",
            OverlaySide::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub side: OverlaySide,
    /// Distance from the screen side below the breakpoint.
    pub mobile_inset: f64,
    /// Distance from the screen bottom at and above the breakpoint.
    pub desktop_bottom: f64,
    /// Distance from the screen side at and above the breakpoint (clears the side panel).
    pub desktop_inset: f64,
    /// Extra height added on top of the computed anchor, for stacking buttons.
    #[serde(default)]
    pub stack: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FeedbackCadence {
    #[default]
    Immediate,
    FrameLimited { fps: u32 },
}

impl FeedbackCadence {
    /// Frame period in milliseconds, `None` for the synchronous path.
    pub fn frame_ms(&self) -> Option<u64> {
        match self {
            FeedbackCadence::Immediate => None,
            FeedbackCadence::FrameLimited { fps } => Some(1000 / u64::from((*fps).clamp(1, 240))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapLayout {
    pub center: LatLng,
    pub zoom: f64,
    /// Zoom applied when a marker is selected and the minimum zoom on the first location fix.
    pub focus_zoom: f64,
    pub range_radius_m: f64,
    pub default_accuracy_m: f64,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            peek_height: PEEK_HEIGHT_PX,
            open_ratio: 0.35,
            close_ratio: 0.65,
        }
    }
}

impl Default for OverlaysLayout {
    fn default() -> Self {
        Self {
            anchor_gap: ANCHOR_GAP_PX,
            breakpoint: BREAKPOINT_PX,
            location: OverlaySpec {
                side: OverlaySide::Right,
                mobile_inset: 16.0,
                desktop_bottom: 32.0,
                desktop_inset: 416.0,
                stack: 0.0,
            },
            report: OverlaySpec {
                side: OverlaySide::Right,
                mobile_inset: 16.0,
                desktop_bottom: 32.0,
                desktop_inset: 416.0,
                stack: 56.0,
            },
        }
    }
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            center: LatLng::new(26.778374, 75.877988),
            zoom: 13.0,
            focus_zoom: 16.0,
            range_radius_m: 2000.0,
            default_accuracy_m: 30.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version: 1,
            sheet: SheetLayout::default(),
            overlays: OverlaysLayout::default(),
            feedback: FeedbackCadence::default(),
            map: MapLayout::default(),
        }
    }
}

impl LayoutConfig {
    /// The layout compiled into the binary. Parsed once.
    pub fn embedded() -> &'static LayoutConfig {
        &EMBEDDED
    }

    pub fn validate(&self) -> Result<(), String> {
        let s = &self.sheet;
        if !(s.peek_height.is_finite() && s.peek_height >= 0.0) {
            return Err(format!("sheet.peek_height must be >= 0, got {}", s.peek_height));
        }
        if !(0.0..=1.0).contains(&s.open_ratio) || !(0.0..=1.0).contains(&s.close_ratio) {
            return Err("sheet ratios must lie in [0, 1]".to_string());
        }
        if s.open_ratio > s.close_ratio {
            return Err(format!(
                "sheet.open_ratio ({}) exceeds sheet.close_ratio ({})",
                s.open_ratio, s.close_ratio
            ));
        }
        if !(self.overlays.breakpoint.is_finite() && self.overlays.breakpoint > 0.0) {
            return Err("overlays.breakpoint must be positive".to_string());
        }
        if let FeedbackCadence::FrameLimited { fps: 0 } = self.feedback {
            return Err("feedback.fps must be at least 1".to_string());
        }
        Ok(())
    }
}

pub fn layout_path() -> PathBuf {
    if let Ok(path) = std::env::var("CIVIX_LAYOUT_PATH") {
        return PathBuf::from(path);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_LAYOUT_PATH)
}

pub fn parse_layout(raw: &str) -> Result<LayoutConfig, String> {
    let layout: LayoutConfig =
        serde_json::from_str(raw).map_err(|e| format!("Invalid layout JSON: {e}"))?;
    layout.validate()?;
    Ok(layout)
}

pub fn load_layout() -> Result<LayoutConfig, String> {
    let path = layout_path();
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read layout file {path:?}: {e}"))?;
    parse_layout(&raw)
}
