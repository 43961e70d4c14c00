//! UI-independent core of civix: the bottom sheet state machine, the
//! overlays that follow it, and the data and map logic around them.

pub mod carousel;
pub mod category;
pub mod feedback;
pub mod geo;
pub mod issues;
pub mod layout;
pub mod pointer;
pub mod sheet;
pub mod tracker;

pub use feedback::{AnchorMode, FramePump, OverlayAnchor, PositionFeedbackConsumer};
pub use geo::{GeoError, GeoFix, LatLng};
pub use issues::{Issue, IssueStatus};
pub use layout::{LayoutConfig, load_layout};
pub use pointer::{PointerSample, PointerSource};
pub use sheet::{
    DragPresentation, DragSheetController, PositionTuple, SheetObserver, SheetState, SubscriberId,
};
pub use tracker::{LocationTracker, MapWidget, MarkerSelection, TrackerState, WatchCommand};
