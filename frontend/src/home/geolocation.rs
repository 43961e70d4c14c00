// frontend/src/home/geolocation.rs

use super::js_eval;
use civix_shared::{GeoError, LocationTracker, WatchCommand};
use dioxus::prelude::*;
use dioxus_signals::{ReadableExt, Signal, WritableExt};
use std::sync::atomic::{AtomicBool, Ordering};

static WATCHING: AtomicBool = AtomicBool::new(false);

/// Whether the platform exposes a geolocation API at all. Native webviews
/// report a missing API back through the event queue instead.
fn geolocation_supported() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .map(|w| w.navigator().geolocation().is_ok())
            .unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        true
    }
}

/// Carries out what the tracker decided about the position watch.
/// Safe to call repeatedly.
pub fn apply(cmd: WatchCommand) {
    match cmd {
        WatchCommand::Start => {
            if !WATCHING.swap(true, Ordering::SeqCst) {
                js_setup_geolocation_bridge();
                js_eval("(function(){ try { window.civixGeoStart(); } catch (e) {} })();");
            }
        }
        WatchCommand::Stop => {
            if WATCHING.swap(false, Ordering::SeqCst) {
                js_eval("(function(){ try { window.civixGeoStop(); } catch (e) {} })();");
            }
        }
        WatchCommand::Keep => {}
    }
}

/// Location button tap.
pub fn toggle(mut tracker: Signal<LocationTracker>) {
    let result = tracker.write().toggle(geolocation_supported());
    handle(result);
}

fn handle(result: Result<WatchCommand, GeoError>) {
    match result {
        Ok(cmd) => apply(cmd),
        Err(e) => log!("[civix] location unavailable: {e}"),
    }
}

/// Starts tracking once the map is up and stops the watch on unmount.
///
/// This component renders nothing visible.
#[component]
pub fn LocationDriver(tracker: Signal<LocationTracker>, map_ready: Signal<bool>) -> Element {
    let mut tracker = tracker;

    use_effect(move || {
        if !map_ready() {
            return;
        }
        if tracker.peek().is_active() {
            return;
        }
        let result = tracker.write().start(geolocation_supported());
        handle(result);
    });

    use_drop(move || {
        if let Ok(mut t) = tracker.try_write() {
            t.stop();
        }
        apply(WatchCommand::Stop);
    });

    rsx!(div {})
}

fn js_setup_geolocation_bridge() {
    js_eval(
        r#"
        (function() {
          if (window.__civix_geo_installed) return;
          window.__civix_geo_installed = true;
          window.__civix_geo_watch = null;

          function push(ev) {
            try { if (typeof window.__civix_push === "function") window.__civix_push(ev); } catch (e) {}
          }

          window.civixGeoStart = function() {
            if (window.__civix_geo_watch != null) return;
            if (!navigator || !navigator.geolocation) {
              push({ kind: "geo_error", code: 0, message: "geolocation missing" });
              return;
            }
            try {
              window.__civix_geo_watch = navigator.geolocation.watchPosition(
                (pos) => {
                  const c = pos.coords;
                  push({
                    kind: "fix",
                    lat: c.latitude,
                    lng: c.longitude,
                    accuracy_m: (typeof c.accuracy === "number") ? c.accuracy : null
                  });
                },
                (err) => push({ kind: "geo_error", code: err.code || 99, message: String(err.message || "") }),
                { enableHighAccuracy: true, timeout: 15000, maximumAge: 0 }
              );
            } catch (e) {
              push({ kind: "geo_error", code: 99, message: String(e) });
            }
          };

          window.civixGeoStop = function() {
            try {
              if (window.__civix_geo_watch != null && navigator.geolocation) {
                navigator.geolocation.clearWatch(window.__civix_geo_watch);
              }
            } catch (e) {}
            window.__civix_geo_watch = null;
          };
        })();
        "#,
    );
}
