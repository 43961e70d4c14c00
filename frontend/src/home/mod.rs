// frontend/src/home/mod.rs

mod bottom_sheet;
mod category_filter;
mod events;
mod geolocation;
mod map_view;
mod overlay_buttons;

use bottom_sheet::BottomSheet;
use category_filter::CategoryFilter;
use civix_shared::category;
use civix_shared::issues::find_issue;
use civix_shared::layout::LayoutConfig;
use civix_shared::{
    DragPresentation, DragSheetController, FramePump, GeoError, LocationTracker, MarkerSelection,
    PointerSample, PositionTuple, SheetObserver, SheetState,
};
use dioxus::prelude::*;
use dioxus_signals::{CopyValue, ReadableExt, Signal, WritableExt};
use events::MapEvent;
use geolocation::LocationDriver;
use map_view::{LeafletMap, MapView};
use overlay_buttons::{LocationButton, ReportIssueButton};
use std::rc::Rc;

/// How often the JS event queue (marker clicks, fixes, map readiness) is drained.
const EVENT_POLL_MS: u64 = 50;

/// Controller output -> page signals. Writes go through `try_write` because
/// the controller can outlive the scope that owns the signals.
struct SignalFeedback {
    state: Signal<SheetState>,
    position: Signal<PositionTuple>,
    pump: CopyValue<FramePump>,
}

impl SheetObserver for SignalFeedback {
    fn on_state_changed(&mut self, state: SheetState) {
        log!("[civix] sheet -> {state}");
        if let Ok(mut w) = self.state.try_write() {
            *w = state;
        }
    }

    fn on_position(&mut self, tuple: PositionTuple) {
        let Some(ready) = self.pump.write().offer(tuple) else {
            return;
        };
        if let Ok(mut w) = self.position.try_write() {
            *w = ready;
        }
    }
}

/// Drag-time page chrome: sheet transition off, body text selection off, and
/// the page lifted over the navbar so the capture layer can cover it.
struct SheetChrome {
    dragging: Signal<bool>,
}

impl SheetChrome {
    fn set(&self, on: bool) {
        let mut dragging = self.dragging;
        if let Ok(mut w) = dragging.try_write() {
            *w = on;
        }
        js_eval(&format!(
            r#"
            try {{
              document.body.style.userSelect = "{select}";
              document.body.classList.toggle("civix-dragging", {on});
            }} catch (e) {{}}
            "#,
            select = if on { "none" } else { "" },
        ));
    }
}

impl DragPresentation for SheetChrome {
    fn suppress(&self) {
        self.set(true);
    }

    fn restore(&self) {
        self.set(false);
    }
}

#[component]
pub fn Home() -> Element {
    let layout = LayoutConfig::embedded();

    let sheet_state = use_signal(SheetState::default);
    let position = use_signal(PositionTuple::default);
    let dragging = use_signal(|| false);
    let mut viewport_width = use_signal(|| f64::NAN);
    let map_ready = use_signal(|| false);
    let active_category = use_signal(|| category::ALL.to_string());
    let tracker = use_signal(|| LocationTracker::new(&layout.map));
    let selection = use_signal(|| MarkerSelection::new(&layout.map));

    let pump = use_hook(|| CopyValue::new(FramePump::new(layout.feedback)));
    let mut controller = use_hook(|| {
        let chrome = Rc::new(SheetChrome { dragging });
        let mut sheet = DragSheetController::new(layout.sheet).with_presentation(chrome);
        sheet.subscribe(Box::new(SignalFeedback {
            state: sheet_state,
            position,
            pump,
        }));
        CopyValue::new(sheet)
    });

    // Frame-limited cadence: apply the newest pending tuple once per frame.
    use_future(move || async move {
        let Some(frame_ms) = layout.feedback.frame_ms() else {
            return;
        };
        let mut pump = pump;
        let mut position = position;
        loop {
            sleep_ms(frame_ms).await;
            let next = pump.write().take_frame();
            if let Some(tuple) = next {
                position.set(tuple);
            }
        }
    });

    // Drain map/geolocation events raised on the JS side.
    use_future(move || async move {
        js_install_event_queue();
        loop {
            sleep_ms(EVENT_POLL_MS).await;
            for ev in events::drain().await {
                handle_map_event(ev, controller, map_ready, tracker, selection);
            }
        }
    });

    rsx! {
        div {
            class: "home-root",
            onresize: move |e| {
                if let Ok(size) = e.get_border_box_size() {
                    viewport_width.set(size.width);
                    // The side panel cannot be dragged; drop a gesture caught mid-way.
                    if !bottom_sheet::accepts_drag(size.width) && controller.read().is_dragging() {
                        controller.write().pointer_cancel();
                    }
                }
            },
            onmousemove: move |e| {
                if !controller.read().is_dragging() {
                    return;
                }
                // Button released somewhere we never heard about.
                if e.held_buttons().is_empty() {
                    controller.write().pointer_up();
                    return;
                }
                controller.write().pointer_move(e.client_coordinates().y);
            },
            onmouseup: move |_| {
                if controller.read().is_dragging() {
                    controller.write().pointer_up();
                }
            },
            ontouchmove: move |e| {
                if !controller.read().is_dragging() {
                    return;
                }
                if let Some(p) = touch_sample(&e) {
                    e.prevent_default();
                    controller.write().pointer_move(p.y);
                }
            },
            ontouchend: move |_| {
                if controller.read().is_dragging() {
                    controller.write().pointer_up();
                }
            },
            ontouchcancel: move |_| {
                if controller.read().is_dragging() {
                    controller.write().pointer_cancel();
                }
            },

            // Covers the whole window (navbar included) while a drag is live so
            // mouse moves and the release always reach the handlers above.
            if dragging() {
                div {
                    class: "drag-capture",
                    onmouseleave: move |_| {
                        if controller.read().is_dragging() {
                            controller.write().pointer_cancel();
                        }
                    },
                }
            }

            header { class: "map-header",
                MapView {}
            }

            CategoryFilter { active: active_category }

            BottomSheet {
                controller,
                sheet_state,
                dragging,
                position,
                active_category,
                tracker,
                viewport_width,
            }

            LocationDriver { tracker, map_ready }

            if map_ready() {
                LocationButton { position, viewport_width, tracker }
            }
            ReportIssueButton { position, viewport_width }
        }
    }
}

fn handle_map_event(
    ev: MapEvent,
    mut controller: CopyValue<DragSheetController>,
    mut map_ready: Signal<bool>,
    mut tracker: Signal<LocationTracker>,
    mut selection: Signal<MarkerSelection>,
) {
    match ev {
        MapEvent::Ready => {
            if !*map_ready.peek() {
                log!("[civix] map ready");
                map_ready.set(true);
            }
        }
        MapEvent::PointerLost => {
            if controller.read().is_dragging() {
                controller.write().pointer_cancel();
            }
        }
        MapEvent::Unavailable => {
            log::warn!("map script unavailable; continuing without a map");
        }
        MapEvent::Marker { id } => match find_issue(id) {
            Some(issue) => selection.write().select(id, issue.position, &mut LeafletMap),
            None => log::warn!("click on unknown marker {id}"),
        },
        MapEvent::Fix(fix) => tracker.write().on_fix(fix, &mut LeafletMap),
        MapEvent::GeoError { code, message } => {
            let err = GeoError::from_code(code, &message);
            let cmd = tracker.write().on_error(&err);
            geolocation::apply(cmd);
        }
    }
}

pub(crate) fn touch_sample(e: &TouchEvent) -> Option<PointerSample> {
    PointerSample::first_touch(e.touches().iter().map(|t| {
        let c = t.client_coordinates();
        (c.x, c.y)
    }))
}

pub(crate) async fn sleep_ms(ms: u64) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms as u32).await;

    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

// --------------------------------------------------------------------------------------------
// JS helpers
// --------------------------------------------------------------------------------------------

/// Queue the JS side pushes events into; drained by [`events::drain`].
fn js_install_event_queue() {
    js_eval(
        r#"
        (function() {
          if (window.__civix_queue_installed) return;
          window.__civix_queue_installed = true;
          window.__civix_events = [];
          window.__civix_push = function(ev) {
            try { window.__civix_events.push(ev); } catch (e) {}
          };
          window.__civix_drain = function() {
            const q = window.__civix_events || [];
            window.__civix_events = [];
            return JSON.stringify(q);
          };
          window.addEventListener("blur", function() {
            window.__civix_push({ kind: "pointer_lost" });
          });
        })();
        "#,
    );
}

/// Evaluates a JS expression and returns it stringified. `None` when the
/// expression throws or the webview gives nothing back.
#[cfg(target_arch = "wasm32")]
pub(crate) async fn js_query_string(expr: &str) -> Option<String> {
    js_eval(&format!(
        r#"
        (function() {{
          try {{
            const v = ({expr});
            window.__civix_tmp_str = (v === undefined || v === null) ? "" : String(v);
          }} catch (e) {{
            window.__civix_tmp_str = "";
          }}
        }})();
        "#
    ));
    js_get_tmp_str().filter(|s| !s.is_empty())
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn js_query_string(expr: &str) -> Option<String> {
    let eval = dioxus::document::eval(&format!(
        r#"
        try {{
          const v = ({expr});
          return (v === undefined || v === null) ? "" : String(v);
        }} catch (e) {{
          return "";
        }}
        "#
    ));
    eval.join::<String>().await.ok().filter(|s| !s.is_empty())
}

/// Like [`js_query_string`] for expressions that produce JSON.
pub(crate) async fn js_query_json<T: serde::de::DeserializeOwned>(expr: &str) -> Option<T> {
    let raw = js_query_string(&format!("JSON.stringify({expr})")).await?;
    serde_json::from_str(&raw).ok()
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn js_eval(js: &str) {
    let _ = js_sys::eval(js);
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn js_eval(js: &str) {
    dioxus::document::eval(js);
}

#[cfg(target_arch = "wasm32")]
fn js_get_tmp_str() -> Option<String> {
    let win = web_sys::window()?;
    let v = js_sys::Reflect::get(&win, &wasm_bindgen::JsValue::from_str("__civix_tmp_str")).ok()?;
    v.as_string()
}
