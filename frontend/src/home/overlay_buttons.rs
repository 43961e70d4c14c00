// frontend/src/home/overlay_buttons.rs

use super::geolocation;
use civix_shared::layout::LayoutConfig;
use civix_shared::{LocationTracker, PositionFeedbackConsumer, PositionTuple, TrackerState};
use dioxus::prelude::*;
use dioxus_signals::{ReadableExt, Signal};

#[component]
pub fn LocationButton(
    position: Signal<PositionTuple>,
    viewport_width: Signal<f64>,
    tracker: Signal<LocationTracker>,
) -> Element {
    let consumer = use_hook(|| {
        let layout = LayoutConfig::embedded();
        PositionFeedbackConsumer::location_button(&layout.sheet, &layout.overlays)
    });

    let anchor = consumer.anchor(&position(), viewport_width());
    let state = tracker.read().state();
    let (class, title) = match state {
        TrackerState::Idle => ("overlay-btn location-btn", "Show my location"),
        TrackerState::Locating => ("overlay-btn location-btn locating", "Locating..."),
        TrackerState::Tracking => ("overlay-btn location-btn tracking", "Stop tracking"),
    };

    rsx! {
        button {
            class,
            title,
            style: "{anchor.to_css()}",
            onclick: move |_| geolocation::toggle(tracker),
            if state == TrackerState::Locating {
                span { class: "spinner" }
            } else if state == TrackerState::Tracking {
                span { class: "live-dot" }
            } else {
                span { class: "pin-icon", "⌖" }
            }
        }
    }
}

#[component]
pub fn ReportIssueButton(position: Signal<PositionTuple>, viewport_width: Signal<f64>) -> Element {
    let consumer = use_hook(|| {
        let layout = LayoutConfig::embedded();
        PositionFeedbackConsumer::report_button(&layout.sheet, &layout.overlays)
    });

    let anchor = consumer.anchor(&position(), viewport_width());

    rsx! {
        button {
            class: "overlay-btn report-btn",
            title: "Report an issue",
            style: "{anchor.to_css()}",
            onclick: move |_| log!("[civix] report issue clicked"),
            span { class: "report-plus", "+" }
            span { class: "report-label", "Report" }
        }
    }
}
