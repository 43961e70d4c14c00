//! Overlay buttons that ride just above the sheet's visible top edge.

use crate::layout::{FeedbackCadence, OverlaySide, OverlaySpec, OverlaysLayout, SheetLayout};
use crate::sheet::PositionTuple;

/// Viewport width at which overlays switch to their fixed desktop anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub width_px: f64,
}

impl Breakpoint {
    pub fn new(width_px: f64) -> Self {
        Self { width_px }
    }

    /// Unknown (non-finite) widths count as narrow.
    pub fn is_wide(&self, viewport_width: f64) -> bool {
        viewport_width.is_finite() && viewport_width >= self.width_px
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorMode {
    /// Follows the sheet edge.
    Tracking,
    /// Desktop layout; the sheet position is ignored.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayAnchor {
    pub bottom_px: f64,
    pub side: OverlaySide,
    pub side_px: f64,
    pub mode: AnchorMode,
    /// Ease into the new position. Only for committed open/close flips.
    pub animate: bool,
}

impl OverlayAnchor {
    pub fn to_css(&self) -> String {
        let transition = if self.animate {
            "bottom 300ms cubic-bezier(.22,.9,.35,1)"
        } else {
            "none"
        };
        format!(
            "bottom:{:.1}px; {}:{:.1}px; transition:{};",
            self.bottom_px,
            self.side.as_css(),
            self.side_px,
            transition
        )
    }
}

/// `peek + (closed_offset - offset) + gap`: distance from the screen bottom
/// to a point `gap` above the sheet's top edge.
pub fn anchor_bottom(peek_height: f64, anchor_gap: f64, tuple: &PositionTuple) -> f64 {
    let visible = (tuple.closed_offset - tuple.offset).max(0.0);
    peek_height + visible + anchor_gap
}

/// One overlay's view of the sheet. Holds no sheet state of its own beyond
/// the last anchor it produced.
#[derive(Debug, Clone)]
pub struct PositionFeedbackConsumer {
    spec: OverlaySpec,
    peek_height: f64,
    anchor_gap: f64,
    breakpoint: Breakpoint,
    last: Option<OverlayAnchor>,
}

impl PositionFeedbackConsumer {
    pub fn new(spec: OverlaySpec, sheet: &SheetLayout, overlays: &OverlaysLayout) -> Self {
        Self {
            spec,
            peek_height: sheet.peek_height,
            anchor_gap: overlays.anchor_gap,
            breakpoint: Breakpoint::new(overlays.breakpoint),
            last: None,
        }
    }

    pub fn location_button(sheet: &SheetLayout, overlays: &OverlaysLayout) -> Self {
        Self::new(overlays.location, sheet, overlays)
    }

    pub fn report_button(sheet: &SheetLayout, overlays: &OverlaysLayout) -> Self {
        Self::new(overlays.report, sheet, overlays)
    }

    /// Anchor for `tuple` at the given viewport width. The breakpoint is
    /// checked on every call.
    pub fn anchor(&self, tuple: &PositionTuple, viewport_width: f64) -> OverlayAnchor {
        if self.breakpoint.is_wide(viewport_width) {
            return OverlayAnchor {
                bottom_px: self.spec.desktop_bottom + self.spec.stack,
                side: self.spec.side,
                side_px: self.spec.desktop_inset,
                mode: AnchorMode::Fixed,
                animate: false,
            };
        }
        OverlayAnchor {
            bottom_px: anchor_bottom(self.peek_height, self.anchor_gap, tuple) + self.spec.stack,
            side: self.spec.side,
            side_px: self.spec.mobile_inset,
            mode: AnchorMode::Tracking,
            animate: tuple.animate,
        }
    }

    /// Like [`anchor`](Self::anchor) but remembers the result.
    pub fn update(&mut self, tuple: &PositionTuple, viewport_width: f64) -> OverlayAnchor {
        let anchor = self.anchor(tuple, viewport_width);
        self.last = Some(anchor);
        anchor
    }

    pub fn last(&self) -> Option<OverlayAnchor> {
        self.last
    }
}

/// Decouples the tuple publish rate from the redraw rate. Holds at most one
/// pending tuple; settled tuples bypass the queue so the final position is
/// applied the moment the sheet commits.
#[derive(Debug, Clone, Default)]
pub struct FramePump {
    frame_limited: bool,
    pending: Option<PositionTuple>,
}

impl FramePump {
    pub fn new(cadence: FeedbackCadence) -> Self {
        Self {
            frame_limited: cadence.frame_ms().is_some(),
            pending: None,
        }
    }

    /// Returns the tuple to apply now, if any.
    pub fn offer(&mut self, tuple: PositionTuple) -> Option<PositionTuple> {
        if !self.frame_limited || tuple.settled {
            self.pending = None;
            return Some(tuple);
        }
        self.pending = Some(tuple);
        None
    }

    /// Called once per frame.
    pub fn take_frame(&mut self) -> Option<PositionTuple> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
