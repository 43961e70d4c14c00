//! Horizontal snapping for the nearby-issues card strip.

/// Space between two cards.
pub const CARD_GAP_PX: f64 = 16.0;
/// Offsets closer than this to a card boundary are left alone.
pub const SNAP_TOLERANCE_PX: f64 = 5.0;
/// Horizontal finger travel before the strip starts following it.
pub const TOUCH_SLOP_PX: f64 = 5.0;
/// Quiet time after the last scroll event before snapping.
pub const SETTLE_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselMetrics {
    pub card_width: f64,
    pub viewport_width: f64,
    pub content_width: f64,
}

impl CarouselMetrics {
    pub fn stride(&self) -> f64 {
        self.card_width.max(0.0) + CARD_GAP_PX
    }

    pub fn max_scroll(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    pub fn clamp(&self, scroll_left: f64) -> f64 {
        if scroll_left.is_finite() {
            scroll_left.clamp(0.0, self.max_scroll())
        } else {
            0.0
        }
    }

    /// Card boundary to settle on, or `None` when already within tolerance.
    pub fn snap_target(&self, scroll_left: f64) -> Option<f64> {
        let scroll_left = self.clamp(scroll_left);
        let stride = self.stride();
        let target = self.clamp((scroll_left / stride).round() * stride);
        ((scroll_left - target).abs() > SNAP_TOLERANCE_PX).then_some(target)
    }
}

/// Follows one finger across the strip. Moves under the slop are ignored
/// and do not rebase the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchScroll {
    last_x: f64,
    last_scroll: f64,
}

impl TouchScroll {
    pub fn start(x: f64, scroll_left: f64) -> Self {
        Self {
            last_x: x,
            last_scroll: scroll_left,
        }
    }

    pub fn on_move(&mut self, x: f64, metrics: &CarouselMetrics) -> Option<f64> {
        let diff = self.last_x - x;
        if !(diff.abs() > TOUCH_SLOP_PX) {
            return None;
        }
        let next = metrics.clamp(self.last_scroll + diff);
        self.last_x = x;
        self.last_scroll = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> CarouselMetrics {
        CarouselMetrics {
            card_width: 284.0,
            viewport_width: 360.0,
            content_width: 7.0 * 300.0,
        }
    }

    #[test]
    fn snaps_to_nearest_card() {
        let m = strip();
        assert_eq!(m.stride(), 300.0);
        assert_eq!(m.snap_target(140.0), Some(0.0));
        assert_eq!(m.snap_target(160.0), Some(300.0));
        assert_eq!(m.snap_target(604.0), None);
        assert_eq!(m.snap_target(606.0), Some(600.0));
    }

    #[test]
    fn snap_respects_the_end_of_the_strip() {
        let m = strip();
        let max = m.max_scroll();
        assert_eq!(max, 1740.0);
        assert_eq!(m.snap_target(1739.0), None);
        assert_eq!(m.snap_target(1700.0), Some(1740.0));
        assert_eq!(m.snap_target(5000.0), None);
        assert_eq!(m.clamp(-20.0), 0.0);
    }

    #[test]
    fn touch_waits_for_slop() {
        let m = strip();
        let mut t = TouchScroll::start(200.0, 300.0);
        assert_eq!(t.on_move(197.0, &m), None);
        assert_eq!(t.on_move(190.0, &m), Some(310.0));
        assert_eq!(t.on_move(250.0, &m), Some(250.0));
    }

    #[test]
    fn touch_clamps_at_start() {
        let m = strip();
        let mut t = TouchScroll::start(0.0, 10.0);
        assert_eq!(t.on_move(100.0, &m), Some(0.0));
    }
}
