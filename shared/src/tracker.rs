//! Live location tracking and marker selection, expressed against a
//! [`MapWidget`] so the same logic drives the real map and the test fakes.

use crate::geo::{Bounds, GeoError, GeoFix, LatLng, range_bounds};
use crate::layout::MapLayout;

/// The map operations the app needs. Implementations must tolerate calls
/// before the map is ready (they may drop them).
pub trait MapWidget {
    fn pan_to(&mut self, at: LatLng);
    /// Sets the zoom to `max(current, zoom)`.
    fn zoom_to_at_least(&mut self, zoom: f64);
    fn set_zoom(&mut self, zoom: f64);
    /// Moves the user dot and its accuracy circle.
    fn show_user(&mut self, at: LatLng, accuracy_m: f64);
    fn show_range(&mut self, center: LatLng, radius_m: f64);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn set_marker_highlight(&mut self, issue_id: u32, on: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Idle,
    /// Watch started, no fix yet.
    Locating,
    Tracking,
}

impl TrackerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerState::Idle => "idle",
            TrackerState::Locating => "locating",
            TrackerState::Tracking => "tracking",
        }
    }
}

/// What the caller must do with the platform position watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Start,
    Stop,
    Keep,
}

#[derive(Debug, Clone)]
pub struct LocationTracker {
    state: TrackerState,
    focus_zoom: f64,
    default_accuracy_m: f64,
    range_radius_m: f64,
    last_fix: Option<GeoFix>,
}

impl LocationTracker {
    pub fn new(map: &MapLayout) -> Self {
        Self {
            state: TrackerState::Idle,
            focus_zoom: map.focus_zoom,
            default_accuracy_m: map.default_accuracy_m,
            range_radius_m: map.range_radius_m,
            last_fix: None,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != TrackerState::Idle
    }

    pub fn last_fix(&self) -> Option<GeoFix> {
        self.last_fix
    }

    pub fn start(&mut self, supported: bool) -> Result<WatchCommand, GeoError> {
        if !supported {
            log::warn!("{}", GeoError::Unsupported);
            self.state = TrackerState::Idle;
            return Err(GeoError::Unsupported);
        }
        if self.is_active() {
            return Ok(WatchCommand::Keep);
        }
        self.state = TrackerState::Locating;
        log::info!("location tracking started");
        Ok(WatchCommand::Start)
    }

    pub fn stop(&mut self) -> WatchCommand {
        if !self.is_active() {
            return WatchCommand::Keep;
        }
        self.state = TrackerState::Idle;
        log::info!("location tracking stopped");
        WatchCommand::Stop
    }

    /// Button tap.
    pub fn toggle(&mut self, supported: bool) -> Result<WatchCommand, GeoError> {
        if self.is_active() {
            Ok(self.stop())
        } else {
            self.start(supported)
        }
    }

    /// Applies a position reading. Fixes that arrive after a stop are dropped.
    pub fn on_fix<M: MapWidget + ?Sized>(&mut self, fix: GeoFix, map: &mut M) {
        let at = fix.position();
        if !self.is_active() || !at.is_valid() {
            return;
        }
        map.show_user(at, fix.accuracy_or(self.default_accuracy_m));
        map.show_range(at, self.range_radius_m);
        map.pan_to(at);
        if self.state == TrackerState::Locating {
            map.zoom_to_at_least(self.focus_zoom);
            self.state = TrackerState::Tracking;
            log::debug!("first fix at {:.6},{:.6}", at.lat, at.lng);
        }
        self.last_fix = Some(fix);
    }

    /// The watch failed. The caller must clear it.
    pub fn on_error(&mut self, err: &GeoError) -> WatchCommand {
        log::warn!("watchPosition error: {err}");
        self.stop()
    }

    /// Fits the map to the range circle around the last fix.
    pub fn fit_range<M: MapWidget + ?Sized>(&self, map: &mut M) -> Option<Bounds> {
        let fix = self.last_fix?;
        let bounds = range_bounds(fix.position(), self.range_radius_m);
        map.fit_bounds(bounds);
        Some(bounds)
    }
}

/// Which issue marker is highlighted.
#[derive(Debug, Clone, Default)]
pub struct MarkerSelection {
    selected: Option<u32>,
    focus_zoom: f64,
}

impl MarkerSelection {
    pub fn new(map: &MapLayout) -> Self {
        Self {
            selected: None,
            focus_zoom: map.focus_zoom,
        }
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn select<M: MapWidget + ?Sized>(&mut self, issue_id: u32, at: LatLng, map: &mut M) {
        if let Some(prev) = self.selected.filter(|p| *p != issue_id) {
            map.set_marker_highlight(prev, false);
        }
        map.set_marker_highlight(issue_id, true);
        map.pan_to(at);
        map.set_zoom(self.focus_zoom);
        self.selected = Some(issue_id);
    }

    pub fn clear<M: MapWidget + ?Sized>(&mut self, map: &mut M) {
        if let Some(prev) = self.selected.take() {
            map.set_marker_highlight(prev, false);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{MapCall, RecordingMap};
    use super::*;

    fn fix(lat: f64, lng: f64, acc: Option<f64>) -> GeoFix {
        GeoFix {
            lat,
            lng,
            accuracy_m: acc,
        }
    }

    #[test]
    fn unsupported_stays_idle() {
        let mut t = LocationTracker::new(&MapLayout::default());
        assert_eq!(t.start(false), Err(GeoError::Unsupported));
        assert_eq!(t.state(), TrackerState::Idle);
    }

    #[test]
    fn first_fix_zooms_later_fixes_only_follow() {
        let mut t = LocationTracker::new(&MapLayout::default());
        let mut map = RecordingMap::default();
        assert_eq!(t.start(true), Ok(WatchCommand::Start));
        assert_eq!(t.state(), TrackerState::Locating);

        t.on_fix(fix(26.7, 75.8, None), &mut map);
        assert_eq!(t.state(), TrackerState::Tracking);
        let at = LatLng::new(26.7, 75.8);
        assert_eq!(
            map.calls,
            vec![
                MapCall::User(at, 30.0),
                MapCall::Range(at, 2000.0),
                MapCall::Pan(at),
                MapCall::ZoomAtLeast(16.0),
            ]
        );

        map.calls.clear();
        t.on_fix(fix(26.71, 75.81, Some(8.0)), &mut map);
        let at = LatLng::new(26.71, 75.81);
        assert_eq!(
            map.calls,
            vec![MapCall::User(at, 8.0), MapCall::Range(at, 2000.0), MapCall::Pan(at)]
        );
    }

    #[test]
    fn error_returns_to_idle_and_drops_late_fixes() {
        let mut t = LocationTracker::new(&MapLayout::default());
        let mut map = RecordingMap::default();
        t.start(true).expect("supported");
        assert_eq!(t.on_error(&GeoError::PermissionDenied), WatchCommand::Stop);
        assert_eq!(t.state(), TrackerState::Idle);
        t.on_fix(fix(1.0, 1.0, None), &mut map);
        assert!(map.calls.is_empty());
    }

    #[test]
    fn toggle_flips_watch() {
        let mut t = LocationTracker::new(&MapLayout::default());
        assert_eq!(t.toggle(true), Ok(WatchCommand::Start));
        assert_eq!(t.start(true), Ok(WatchCommand::Keep));
        assert_eq!(t.toggle(true), Ok(WatchCommand::Stop));
        assert_eq!(t.stop(), WatchCommand::Keep);
    }

    #[test]
    fn fit_range_needs_a_fix() {
        let mut t = LocationTracker::new(&MapLayout::default());
        let mut map = RecordingMap::default();
        assert_eq!(t.fit_range(&mut map), None);
        t.start(true).expect("supported");
        t.on_fix(fix(0.0, 0.0, None), &mut map);
        map.calls.clear();
        let b = t.fit_range(&mut map).expect("bounds");
        assert_eq!(map.calls, vec![MapCall::Fit(b)]);
        assert!(b.north > 0.0 && b.south < 0.0);
    }

    #[test]
    fn selecting_a_marker_resets_the_previous_one() {
        let mut sel = MarkerSelection::new(&MapLayout::default());
        let mut map = RecordingMap::default();
        let a = LatLng::new(1.0, 2.0);
        let b = LatLng::new(3.0, 4.0);
        sel.select(1, a, &mut map);
        sel.select(2, b, &mut map);
        assert_eq!(
            map.calls,
            vec![
                MapCall::Highlight(1, true),
                MapCall::Pan(a),
                MapCall::Zoom(16.0),
                MapCall::Highlight(1, false),
                MapCall::Highlight(2, true),
                MapCall::Pan(b),
                MapCall::Zoom(16.0),
            ]
        );
        assert_eq!(sel.selected(), Some(2));
    }

    #[test]
    fn reselecting_same_marker_does_not_reset_it() {
        let mut sel = MarkerSelection::new(&MapLayout::default());
        let mut map = RecordingMap::default();
        sel.select(5, LatLng::new(0.0, 0.0), &mut map);
        map.calls.clear();
        sel.select(5, LatLng::new(0.0, 0.0), &mut map);
        assert!(!map.calls.contains(&MapCall::Highlight(5, false)));
        sel.clear(&mut map);
        assert_eq!(map.calls.last(), Some(&MapCall::Highlight(5, false)));
        assert_eq!(sel.selected(), None);
    }
}
