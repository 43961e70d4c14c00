//! Drag-to-open/close state machine for the "Nearby" bottom sheet.
//!
//! The controller turns vertical pointer motion on the sheet handle into a
//! bounded offset (0 = fully open, `closed_offset` = only the peek strip
//! visible) and, on release, into a committed [`SheetState`]. Every change is
//! broadcast synchronously to the subscribed [`SheetObserver`]s as a
//! [`PositionTuple`].

use crate::layout::SheetLayout;
use crate::pointer::PointerSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetState {
    Open,
    #[default]
    Closed,
}

impl SheetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetState::Open => "open",
            SheetState::Closed => "closed",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SheetState::Open)
    }

    pub fn toggled(&self) -> Self {
        match self {
            SheetState::Open => SheetState::Closed,
            SheetState::Closed => SheetState::Open,
        }
    }
}

impl fmt::Display for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of where the sheet is, broadcast on every drag move and every commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTuple {
    /// `offset / closed_offset`: 0 fully open, 1 fully closed.
    pub progress: f64,
    pub offset: f64,
    pub closed_offset: f64,
    /// `true` when produced by a commit rather than a live drag move.
    pub settled: bool,
    /// `true` when the commit moves the sheet away from where it was last
    /// shown. Re-measuring a sheet at rest does not animate.
    pub animate: bool,
}

impl PositionTuple {
    pub fn live(offset: f64, closed_offset: f64) -> Self {
        let progress = if closed_offset > 0.0 {
            (offset / closed_offset).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            progress,
            offset,
            closed_offset,
            settled: false,
            animate: false,
        }
    }

    /// Rest position of `state`, reached by an animated commit.
    pub fn settled(state: SheetState, closed_offset: f64) -> Self {
        let (progress, offset) = match state {
            SheetState::Open => (0.0, 0.0),
            SheetState::Closed => (1.0, closed_offset),
        };
        Self {
            progress,
            offset,
            closed_offset,
            settled: true,
            animate: true,
        }
    }

    /// Rest position of `state` with no transition, e.g. after a resize.
    pub fn at_rest(state: SheetState, closed_offset: f64) -> Self {
        Self {
            animate: false,
            ..Self::settled(state, closed_offset)
        }
    }
}

impl Default for PositionTuple {
    fn default() -> Self {
        PositionTuple::at_rest(SheetState::Closed, 0.0)
    }
}

/// Receives controller output. Both callbacks run inside the input call that
/// caused them.
pub trait SheetObserver {
    fn on_state_changed(&mut self, _state: SheetState) {}
    fn on_position(&mut self, _tuple: PositionTuple) {}
}

/// Page-level side effects held for the duration of a drag: the sheet's
/// open/close animation is suppressed and text selection is disabled.
pub trait DragPresentation {
    fn suppress(&self);
    fn restore(&self);
}

/// Held by a live [`DragSession`]; restores the presentation when dropped, so
/// every way a session ends (release, cancel, controller teardown) releases it.
pub struct PresentationLease {
    host: Rc<dyn DragPresentation>,
}

impl PresentationLease {
    pub fn acquire(host: Rc<dyn DragPresentation>) -> Self {
        host.suppress();
        Self { host }
    }
}

impl Drop for PresentationLease {
    fn drop(&mut self) {
        self.host.restore();
    }
}

impl fmt::Debug for PresentationLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PresentationLease")
    }
}

#[derive(Debug)]
pub struct DragSession {
    pub start_pointer_y: f64,
    pub drag_start_offset: f64,
    pub current_offset: f64,
    pub source: PointerSource,
    _lease: Option<PresentationLease>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Open/close thresholds derived from a closed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapThresholds {
    pub open_below: f64,
    pub close_above: f64,
    pub midpoint: f64,
}

impl SnapThresholds {
    pub fn new(layout: &SheetLayout, closed_offset: f64) -> Self {
        Self {
            open_below: closed_offset * layout.open_ratio,
            close_above: closed_offset * layout.close_ratio,
            midpoint: closed_offset / 2.0,
        }
    }

    /// State a release at `offset` commits to. Between the two thresholds the
    /// nearer end wins; exactly half way counts as closed.
    pub fn decide(&self, offset: f64) -> SheetState {
        if offset <= self.open_below {
            SheetState::Open
        } else if offset >= self.close_above {
            SheetState::Closed
        } else if offset < self.midpoint {
            SheetState::Open
        } else {
            SheetState::Closed
        }
    }
}

pub struct DragSheetController {
    layout: SheetLayout,
    state: SheetState,
    closed_offset: f64,
    session: Option<DragSession>,
    last_tuple: PositionTuple,
    observers: Vec<(SubscriberId, Box<dyn SheetObserver>)>,
    next_id: u64,
    presentation: Option<Rc<dyn DragPresentation>>,
}

impl DragSheetController {
    pub fn new(layout: SheetLayout) -> Self {
        Self {
            layout,
            state: SheetState::Closed,
            closed_offset: 0.0,
            session: None,
            last_tuple: PositionTuple::default(),
            observers: Vec::new(),
            next_id: 0,
            presentation: None,
        }
    }

    pub fn with_presentation(mut self, host: Rc<dyn DragPresentation>) -> Self {
        self.presentation = Some(host);
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn SheetObserver>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn closed_offset(&self) -> f64 {
        self.closed_offset
    }

    pub fn peek_height(&self) -> f64 {
        self.layout.peek_height
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Current offset: the live drag offset, or the rest offset of the committed state.
    pub fn current_offset(&self) -> f64 {
        match &self.session {
            Some(s) => s.current_offset,
            None => self.rest_offset(self.state),
        }
    }

    pub fn position(&self) -> PositionTuple {
        self.last_tuple
    }

    pub fn thresholds(&self) -> SnapThresholds {
        SnapThresholds::new(&self.layout, self.closed_offset)
    }

    /// Starts a drag from the handle. Ignored while a drag is already active.
    pub fn pointer_down(&mut self, y: f64, source: PointerSource) {
        if self.session.is_some() || !y.is_finite() {
            return;
        }
        let drag_start_offset = self.rest_offset(self.state);
        let lease = self
            .presentation
            .as_ref()
            .map(|host| PresentationLease::acquire(Rc::clone(host)));
        log::debug!(
            "sheet drag start ({}) from {} at y={y}",
            source.as_str(),
            self.state
        );
        self.session = Some(DragSession {
            start_pointer_y: y,
            drag_start_offset,
            current_offset: drag_start_offset,
            source,
            _lease: lease,
        });
    }

    pub fn pointer_move(&mut self, y: f64) {
        if !y.is_finite() {
            return;
        }
        let closed = self.closed_offset;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dy = y - session.start_pointer_y;
        let next = (session.drag_start_offset + dy).clamp(0.0, closed);
        if next == session.current_offset && !self.last_tuple.settled {
            return;
        }
        session.current_offset = next;
        self.broadcast_position(PositionTuple::live(next, closed));
    }

    /// Releases the drag and commits to the nearer state.
    pub fn pointer_up(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let next = self.thresholds().decide(session.current_offset);
        log::debug!(
            "sheet drag end at offset {:.1}/{:.1} -> {next}",
            session.current_offset,
            self.closed_offset
        );
        drop(session);
        self.commit(next);
    }

    /// Abandons the drag (touch cancel, focus loss); the sheet returns to the
    /// state it had before the gesture.
    pub fn pointer_cancel(&mut self) {
        if self.session.take().is_some() {
            log::debug!("sheet drag cancelled, staying {}", self.state);
            self.commit(self.state);
        }
    }

    /// Recomputes the closed offset from the sheet's rendered height.
    pub fn container_resized(&mut self, height: f64) {
        let height = if height.is_finite() { height } else { 0.0 };
        self.closed_offset = (height - self.layout.peek_height).max(0.0);
        let closed = self.closed_offset;
        match self.session.as_mut() {
            Some(session) => {
                session.current_offset = session.current_offset.min(closed);
                let tuple = PositionTuple::live(session.current_offset, closed);
                self.broadcast_position(tuple);
            }
            None => self.broadcast_position(PositionTuple::at_rest(self.state, closed)),
        }
    }

    pub fn open(&mut self) {
        self.set_state(SheetState::Open);
    }

    pub fn close(&mut self) {
        self.set_state(SheetState::Closed);
    }

    pub fn toggle(&mut self) {
        self.set_state(self.state.toggled());
    }

    /// Programmatic commit. Ignored during a drag; the gesture owns the sheet then.
    pub fn set_state(&mut self, state: SheetState) {
        if self.session.is_some() {
            return;
        }
        self.commit(state);
    }

    fn rest_offset(&self, state: SheetState) -> f64 {
        match state {
            SheetState::Open => 0.0,
            SheetState::Closed => self.closed_offset,
        }
    }

    fn commit(&mut self, state: SheetState) {
        let changed = state != self.state;
        self.state = state;
        if changed {
            for (_, observer) in self.observers.iter_mut() {
                observer.on_state_changed(state);
            }
        }
        let rest = PositionTuple::settled(state, self.closed_offset);
        let tuple = if rest.offset != self.last_tuple.offset {
            rest
        } else {
            PositionTuple::at_rest(state, self.closed_offset)
        };
        self.broadcast_position(tuple);
    }

    fn broadcast_position(&mut self, tuple: PositionTuple) {
        self.last_tuple = tuple;
        for (_, observer) in self.observers.iter_mut() {
            observer.on_position(tuple);
        }
    }
}

impl fmt::Debug for DragSheetController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSheetController")
            .field("state", &self.state)
            .field("closed_offset", &self.closed_offset)
            .field("session", &self.session)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Log {
        states: Vec<SheetState>,
        tuples: Vec<PositionTuple>,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl SheetObserver for Recorder {
        fn on_state_changed(&mut self, state: SheetState) {
            self.0.borrow_mut().states.push(state);
        }
        fn on_position(&mut self, tuple: PositionTuple) {
            self.0.borrow_mut().tuples.push(tuple);
        }
    }

    #[derive(Default)]
    struct Chrome {
        held: Cell<i32>,
        acquisitions: Cell<u32>,
    }

    impl DragPresentation for Chrome {
        fn suppress(&self) {
            self.held.set(self.held.get() + 1);
            self.acquisitions.set(self.acquisitions.get() + 1);
        }
        fn restore(&self) {
            self.held.set(self.held.get() - 1);
        }
    }

    /// Controller whose closed offset is `closed` (sheet height = closed + peek).
    fn sheet(closed: f64) -> (DragSheetController, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let mut c = DragSheetController::new(SheetLayout::default());
        c.container_resized(closed + SheetLayout::default().peek_height);
        c.subscribe(Box::new(Recorder(log.clone())));
        (c, log)
    }

    fn drag_to(c: &mut DragSheetController, offset: f64) {
        let y0 = 500.0;
        c.pointer_down(y0, PointerSource::Touch);
        let start = c.session().map(|s| s.drag_start_offset).unwrap_or(0.0);
        c.pointer_move(y0 + (offset - start));
    }

    #[test]
    fn starts_closed_with_default_tuple() {
        let c = DragSheetController::new(SheetLayout::default());
        assert_eq!(c.state(), SheetState::Closed);
        assert_eq!(c.closed_offset(), 0.0);
        assert!(!c.is_dragging());
        let t = c.position();
        assert_eq!((t.progress, t.offset, t.closed_offset), (1.0, 0.0, 0.0));
    }

    #[test]
    fn closed_offset_subtracts_peek_and_never_goes_negative() {
        let mut c = DragSheetController::new(SheetLayout::default());
        c.container_resized(472.0);
        assert_eq!(c.closed_offset(), 400.0);
        c.container_resized(40.0);
        assert_eq!(c.closed_offset(), 0.0);
        c.container_resized(-10.0);
        assert_eq!(c.closed_offset(), 0.0);
        c.container_resized(f64::NAN);
        assert_eq!(c.closed_offset(), 0.0);
    }

    #[test]
    fn drag_start_offset_depends_on_state() {
        let (mut c, _) = sheet(200.0);
        c.pointer_down(300.0, PointerSource::Mouse);
        assert_eq!(c.session().map(|s| s.drag_start_offset), Some(200.0));
        c.pointer_up();
        c.open();
        c.pointer_down(300.0, PointerSource::Mouse);
        assert_eq!(c.session().map(|s| s.drag_start_offset), Some(0.0));
        assert_eq!(c.current_offset(), 0.0);
    }

    #[test]
    fn moves_are_clamped_for_any_delta() {
        for dy in [-10_000.0, -250.0, -200.0, -1.0, 0.0, 1.0, 50.0, 199.0, 400.0, 1e9] {
            for start_open in [false, true] {
                let (mut c, _) = sheet(200.0);
                if start_open {
                    c.open();
                }
                c.pointer_down(100.0, PointerSource::Mouse);
                let start = c.session().map(|s| s.drag_start_offset).unwrap_or(f64::NAN);
                c.pointer_move(100.0 + dy);
                let expected = (start + dy).clamp(0.0, 200.0);
                assert_eq!(c.current_offset(), expected, "dy={dy} open={start_open}");
            }
        }
    }

    #[test]
    fn repeated_moves_to_same_y_are_idempotent() {
        let (mut c, log) = sheet(200.0);
        c.pointer_down(400.0, PointerSource::Touch);
        c.pointer_move(330.0);
        let first = c.position();
        let emitted = log.borrow().tuples.len();
        c.pointer_move(330.0);
        c.pointer_move(330.0);
        assert_eq!(c.position(), first);
        assert_eq!(c.current_offset(), 130.0);
        assert_eq!(log.borrow().tuples.len(), emitted);
    }

    #[test]
    fn live_tuples_track_progress() {
        let (mut c, log) = sheet(200.0);
        c.pointer_down(400.0, PointerSource::Mouse);
        c.pointer_move(350.0);
        let t = *log.borrow().tuples.last().expect("tuple");
        assert_eq!(t.offset, 150.0);
        assert_eq!(t.progress, 0.75);
        assert_eq!(t.closed_offset, 200.0);
        assert!(!t.settled);
    }

    #[test]
    fn release_near_top_opens() {
        let (mut c, log) = sheet(200.0);
        drag_to(&mut c, 60.0);
        assert_eq!(c.current_offset(), 60.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Open);
        assert_eq!(log.borrow().states, vec![SheetState::Open]);
        let t = c.position();
        assert_eq!((t.offset, t.progress, t.settled), (0.0, 0.0, true));
    }

    #[test]
    fn release_near_bottom_closes() {
        let (mut c, _) = sheet(200.0);
        c.open();
        drag_to(&mut c, 150.0);
        assert_eq!(c.current_offset(), 150.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Closed);
        let t = c.position();
        assert_eq!((t.offset, t.progress, t.settled), (200.0, 1.0, true));
    }

    #[test]
    fn dead_zone_uses_midpoint_and_exact_half_closes() {
        let (mut c, _) = sheet(200.0);
        c.open();
        drag_to(&mut c, 100.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Closed);

        drag_to(&mut c, 99.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Open);

        drag_to(&mut c, 101.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Closed);
    }

    #[test]
    fn threshold_boundaries_are_inclusive() {
        let t = SnapThresholds::new(&SheetLayout::default(), 200.0);
        assert_eq!(t.decide(70.0), SheetState::Open);
        assert_eq!(t.decide(130.0), SheetState::Closed);
        assert_eq!(t.decide(70.5), SheetState::Open);
        assert_eq!(t.decide(129.5), SheetState::Closed);
    }

    #[test]
    fn move_and_up_without_down_are_ignored() {
        let (mut c, log) = sheet(200.0);
        let before = log.borrow().tuples.len();
        c.pointer_move(10.0);
        c.pointer_up();
        c.pointer_cancel();
        assert_eq!(c.state(), SheetState::Closed);
        assert!(!c.is_dragging());
        assert!(log.borrow().states.is_empty());
        assert_eq!(log.borrow().tuples.len(), before);
    }

    #[test]
    fn second_down_during_drag_is_ignored() {
        let (mut c, _) = sheet(200.0);
        c.pointer_down(400.0, PointerSource::Touch);
        c.pointer_move(380.0);
        c.pointer_down(10.0, PointerSource::Mouse);
        let s = c.session().expect("session");
        assert_eq!(s.start_pointer_y, 400.0);
        assert_eq!(s.source, PointerSource::Touch);
        assert_eq!(s.current_offset, 180.0);
    }

    #[test]
    fn resize_during_drag_clamps_to_new_bound() {
        let (mut c, _) = sheet(400.0);
        c.pointer_down(100.0, PointerSource::Touch);
        assert_eq!(c.session().map(|s| s.drag_start_offset), Some(400.0));
        c.container_resized(172.0);
        assert_eq!(c.closed_offset(), 100.0);
        assert!(c.is_dragging());
        for y in [100.0, 150.0, 500.0, 90.0] {
            c.pointer_move(y);
            assert!(c.current_offset() <= 100.0, "y={y}");
        }
        // Start offset still counts from the old bound; only the clamp moved.
        assert_eq!(c.session().map(|s| s.drag_start_offset), Some(400.0));
        c.pointer_move(20.0);
        assert_eq!(c.current_offset(), 100.0);
    }

    #[test]
    fn resize_at_rest_rebroadcasts_without_animation() {
        let (mut c, log) = sheet(200.0);
        c.container_resized(372.0);
        let t = *log.borrow().tuples.last().expect("tuple");
        assert_eq!(t, PositionTuple::at_rest(SheetState::Closed, 300.0));
        assert!(t.settled && !t.animate);
    }

    #[test]
    fn only_commits_that_move_the_sheet_animate() {
        let (mut c, _) = sheet(200.0);
        c.close();
        assert!(!c.position().animate);
        c.open();
        assert!(c.position().animate);

        // Press and release without moving: nothing to animate.
        c.pointer_down(300.0, PointerSource::Mouse);
        c.pointer_up();
        assert_eq!(c.position(), PositionTuple::at_rest(SheetState::Open, 200.0));

        // Released off the rest offset: the sheet slides back.
        c.pointer_down(300.0, PointerSource::Mouse);
        c.pointer_move(350.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Open);
        assert!(c.position().animate);
    }

    #[test]
    fn zero_closed_offset_always_commits_open() {
        let mut c = DragSheetController::new(SheetLayout::default());
        c.pointer_down(300.0, PointerSource::Mouse);
        c.pointer_move(900.0);
        assert_eq!(c.current_offset(), 0.0);
        assert_eq!(c.position().progress, 0.0);
        c.pointer_up();
        assert_eq!(c.state(), SheetState::Open);
    }

    #[test]
    fn presentation_is_released_on_every_exit() {
        let chrome = Rc::new(Chrome::default());
        let mut c = DragSheetController::new(SheetLayout::default())
            .with_presentation(chrome.clone());
        c.container_resized(300.0);

        c.pointer_down(10.0, PointerSource::Mouse);
        assert_eq!(chrome.held.get(), 1);
        c.pointer_up();
        assert_eq!(chrome.held.get(), 0);

        c.pointer_down(10.0, PointerSource::Touch);
        c.pointer_cancel();
        assert_eq!(chrome.held.get(), 0);

        c.pointer_down(10.0, PointerSource::Touch);
        assert_eq!(chrome.held.get(), 1);
        drop(c);
        assert_eq!(chrome.held.get(), 0);
        assert_eq!(chrome.acquisitions.get(), 3);
    }

    #[test]
    fn cancel_restores_previous_state() {
        let (mut c, log) = sheet(200.0);
        c.pointer_down(400.0, PointerSource::Touch);
        c.pointer_move(210.0);
        assert_eq!(c.current_offset(), 10.0);
        c.pointer_cancel();
        assert_eq!(c.state(), SheetState::Closed);
        assert!(log.borrow().states.is_empty());
        assert_eq!(c.position(), PositionTuple::settled(SheetState::Closed, 200.0));
    }

    #[test]
    fn programmatic_toggle_is_ignored_while_dragging() {
        let (mut c, log) = sheet(200.0);
        c.toggle();
        assert_eq!(c.state(), SheetState::Open);
        c.pointer_down(0.0, PointerSource::Mouse);
        c.toggle();
        assert_eq!(c.state(), SheetState::Open);
        c.pointer_up();
        c.close();
        assert_eq!(log.borrow().states, vec![SheetState::Open, SheetState::Closed]);
    }

    #[test]
    fn unsubscribed_observer_stops_hearing() {
        let (mut c, log) = sheet(200.0);
        let extra = Rc::new(RefCell::new(Log::default()));
        let id = c.subscribe(Box::new(Recorder(extra.clone())));
        c.open();
        assert!(c.unsubscribe(id));
        assert!(!c.unsubscribe(id));
        c.close();
        assert_eq!(extra.borrow().states, vec![SheetState::Open]);
        assert_eq!(log.borrow().states, vec![SheetState::Open, SheetState::Closed]);
    }
}
