// frontend/src/home/bottom_sheet.rs

use super::map_view::LeafletMap;
use super::{js_eval, js_query_json, sleep_ms, touch_sample};
use crate::app::Route;
use civix_shared::carousel::{CarouselMetrics, SETTLE_MS, TouchScroll};
use civix_shared::category::filter_issues;
use civix_shared::feedback::Breakpoint;
use civix_shared::issues::{Issue, nearby};
use civix_shared::layout::LayoutConfig;
use civix_shared::{DragSheetController, LocationTracker, PointerSource, PositionTuple, SheetState};
use dioxus::prelude::*;
use dioxus_router::Link;
use dioxus_signals::{CopyValue, ReadableExt, Signal, WritableExt};
use serde::Deserialize;

const LIST_ID: &str = "nearby-list";

/// What the snapping logic needs to know about the card strip.
#[derive(Debug, Clone, Copy, Deserialize)]
struct StripMetrics {
    scroll_left: f64,
    card_width: f64,
    viewport_width: f64,
    content_width: f64,
}

impl StripMetrics {
    fn metrics(&self) -> CarouselMetrics {
        CarouselMetrics {
            card_width: self.card_width,
            viewport_width: self.viewport_width,
            content_width: self.content_width,
        }
    }
}

async fn measure_strip() -> Option<StripMetrics> {
    js_query_json(&format!(
        r#"(function() {{
          const el = document.getElementById("{LIST_ID}");
          if (!el) return null;
          const card = el.querySelector(".issue-card");
          return {{
            scroll_left: el.scrollLeft,
            card_width: card ? card.offsetWidth : 0,
            viewport_width: el.clientWidth,
            content_width: el.scrollWidth
          }};
        }})()"#
    ))
    .await
}

fn js_set_strip_scroll(left: f64, smooth: bool) {
    let behavior = if smooth { "smooth" } else { "auto" };
    js_eval(&format!(
        r#"
        (function() {{
          const el = document.getElementById("{LIST_ID}");
          if (el) el.scrollTo({{ left: {left}, behavior: "{behavior}" }});
        }})();
        "#
    ));
}

/// At and above the breakpoint the sheet is a fixed side panel and its
/// handle does not start drags.
pub(super) fn accepts_drag(viewport_width: f64) -> bool {
    !Breakpoint::new(LayoutConfig::embedded().overlays.breakpoint).is_wide(viewport_width)
}

/// Sheet transform while a drag is live. At rest the CSS classes place it.
fn sheet_style(dragging: bool, tuple: &PositionTuple) -> String {
    if dragging {
        format!("transform: translateY({:.1}px); transition: none;", tuple.offset)
    } else {
        String::new()
    }
}

#[component]
pub fn BottomSheet(
    controller: CopyValue<DragSheetController>,
    sheet_state: Signal<SheetState>,
    dragging: Signal<bool>,
    position: Signal<PositionTuple>,
    active_category: Signal<String>,
    tracker: Signal<LocationTracker>,
    viewport_width: Signal<f64>,
) -> Element {
    let mut controller = controller;
    let mut scroll_gen = use_signal(|| 0u64);
    let mut touch = use_signal(|| None::<(TouchScroll, CarouselMetrics)>);

    let state = sheet_state();
    let style = sheet_style(dragging(), &position());
    let has_fix = tracker.read().last_fix().is_some();
    let active = active_category();
    let issues: Vec<Issue> = filter_issues(nearby(), &active)
        .into_iter()
        .cloned()
        .collect();
    let count = issues.len();

    // Snap once scrolling has been quiet for SETTLE_MS.
    let mut schedule_snap = move || {
        *scroll_gen.write() += 1;
        let generation = *scroll_gen.peek();
        spawn(async move {
            sleep_ms(u64::from(SETTLE_MS)).await;
            if *scroll_gen.peek() != generation || touch.peek().is_some() {
                return;
            }
            let Some(strip) = measure_strip().await else {
                return;
            };
            if let Some(target) = strip.metrics().snap_target(strip.scroll_left) {
                js_set_strip_scroll(target, true);
            }
        });
    };

    rsx! {
        section {
            class: if state.is_open() { "bottom-sheet open" } else { "bottom-sheet closed" },
            style: "{style}",
            onresize: move |e| {
                if let Ok(size) = e.get_border_box_size() {
                    controller.write().container_resized(size.height);
                }
            },

            div {
                class: "sheet-handle",
                onmousedown: move |e| {
                    if !accepts_drag(*viewport_width.peek()) {
                        return;
                    }
                    e.prevent_default();
                    e.stop_propagation();
                    let y = e.client_coordinates().y;
                    controller.write().pointer_down(y, PointerSource::Mouse);
                },
                ontouchstart: move |e| {
                    if !accepts_drag(*viewport_width.peek()) {
                        return;
                    }
                    e.stop_propagation();
                    if let Some(p) = touch_sample(&e) {
                        controller.write().pointer_down(p.y, PointerSource::Touch);
                    }
                },
                div { class: "sheet-grip" }
                div { class: "sheet-title-row",
                    span { class: "sheet-title", "Nearby" }
                    span { class: "sheet-count", "{count} issues" }
                    if has_fix {
                        button {
                            class: "sheet-range-btn",
                            title: "Fit the 2 km range",
                            onmousedown: move |e| e.stop_propagation(),
                            ontouchstart: move |e| e.stop_propagation(),
                            onclick: move |_| {
                                if tracker.read().fit_range(&mut LeafletMap).is_none() {
                                    log::debug!("fit range requested before any fix");
                                }
                            },
                            "2 km"
                        }
                    }
                }
            }

            div {
                id: LIST_ID,
                class: "nearby-list",
                onscroll: move |_| schedule_snap(),
                ontouchstart: move |e| {
                    let Some(p) = touch_sample(&e) else {
                        return;
                    };
                    spawn(async move {
                        if let Some(strip) = measure_strip().await {
                            let scroll = TouchScroll::start(p.x, strip.scroll_left);
                            touch.set(Some((scroll, strip.metrics())));
                        }
                    });
                },
                ontouchmove: move |e| {
                    let Some((mut scroll, metrics)) = *touch.peek() else {
                        return;
                    };
                    let Some(p) = touch_sample(&e) else {
                        return;
                    };
                    if let Some(next) = scroll.on_move(p.x, &metrics) {
                        js_set_strip_scroll(next, false);
                    }
                    touch.set(Some((scroll, metrics)));
                },
                ontouchend: move |_| {
                    touch.set(None);
                    schedule_snap();
                },
                ontouchcancel: move |_| touch.set(None),

                if count == 0 {
                    div { class: "nearby-empty", "No issues in this category nearby." }
                }
                for issue in issues {
                    IssueCard { key: "{issue.id}", issue }
                }
            }
        }
    }
}

#[component]
fn IssueCard(issue: Issue) -> Element {
    let status = issue.status();
    let pct = issue.progress_pct();

    rsx! {
        Link {
            class: "issue-card",
            to: Route::IssueDetail { id: issue.id },
            div { class: "issue-card-media",
                if let Some(src) = issue.image.as_deref() {
                    img { src: "{src}", alt: "{issue.title_or_default()}" }
                } else {
                    div { class: "issue-card-noimg", "No Image Available" }
                }
                span { class: "issue-card-badge", "{issue.category_or_default()}" }
            }
            div { class: "issue-card-body",
                h3 { class: "issue-card-title", "{issue.title_or_default()}" }
                p { class: "issue-card-desc", "{issue.description_or_default()}" }
                div { class: "progress-row",
                    span { style: "color: {status.color()};", "{status}" }
                    span { "{pct}%" }
                }
                div { class: "progress-track",
                    div {
                        class: "progress-fill",
                        style: "width: {pct}%; background: {status.color()};",
                    }
                }
                p { class: "issue-card-loc", "{issue.location_or_default()}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_only_applies_while_dragging() {
        let live = PositionTuple::live(120.0, 300.0);
        assert_eq!(
            sheet_style(true, &live),
            "transform: translateY(120.0px); transition: none;"
        );
        assert!(sheet_style(false, &live).is_empty());
    }

    #[test]
    fn side_panel_widths_refuse_drags() {
        assert!(accepts_drag(375.0));
        assert!(accepts_drag(899.0));
        assert!(accepts_drag(f64::NAN));
        assert!(!accepts_drag(900.0));
        assert!(!accepts_drag(1280.0));
    }

    #[test]
    fn strip_measurements_parse_from_bridge_json() {
        let p: StripMetrics = serde_json::from_str(
            r#"{"scroll_left":160,"card_width":284,"viewport_width":360,"content_width":2100}"#,
        )
        .expect("strip metrics");
        assert_eq!(p.metrics().snap_target(p.scroll_left), Some(300.0));
    }
}
