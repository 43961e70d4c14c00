// frontend/src/home/map_view.rs

use super::js_eval;
use civix_shared::geo::{Bounds, LatLng};
use civix_shared::issues::nearby;
use civix_shared::layout::{LayoutConfig, MapLayout};
use civix_shared::tracker::MapWidget;
use dioxus::prelude::*;
use serde::Serialize;

const RESIZE_DEBOUNCE_MS: u64 = 250;
/// Set by build.rs, which vendors the same release under `/vendor/leaflet`.
const LEAFLET_VERSION: &str = env!("CIVIX_LEAFLET_VERSION");

fn leaflet_cdn() -> String {
    format!("https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist")
}

#[derive(Serialize)]
struct MarkerSpec<'a> {
    id: u32,
    lat: f64,
    lng: f64,
    title: &'a str,
}

#[derive(Serialize)]
struct BridgeConfig<'a> {
    center: LatLng,
    zoom: f64,
    issues: Vec<MarkerSpec<'a>>,
}

fn bridge_config_json(map: &MapLayout) -> String {
    let cfg = BridgeConfig {
        center: map.center,
        zoom: map.zoom,
        issues: nearby()
            .iter()
            .map(|i| MarkerSpec {
                id: i.id,
                lat: i.position.lat,
                lng: i.position.lng,
                title: i.title_or_default(),
            })
            .collect(),
    };
    serde_json::to_string(&cfg).unwrap_or_else(|_| "{}".to_string())
}

/// The Leaflet map behind the header. Everything it shows is driven through
/// [`LeafletMap`]; readiness and clicks come back as queued events.
#[component]
pub fn MapView() -> Element {
    use_effect(move || {
        let layout = LayoutConfig::embedded();
        js_setup_leaflet_loader();
        js_setup_map_bridge(&bridge_config_json(&layout.map));
        js_setup_map_touch_guard();
        js_setup_init_retry();
        js_setup_resize_reinit(RESIZE_DEBOUNCE_MS);
    });

    rsx! {
        div {
            id: "civix-map",
            class: "map-canvas",
            ontouchstart: move |e| {
                if e.touches().len() > 1 {
                    e.prevent_default();
                    e.stop_propagation();
                }
            },
        }
    }
}

/// [`MapWidget`] over the JS bridge. Calls made before the map exists are
/// dropped on the JS side.
pub struct LeafletMap;

impl MapWidget for LeafletMap {
    fn pan_to(&mut self, at: LatLng) {
        js_call(&format!("civixPan({}, {})", at.lat, at.lng));
    }

    fn zoom_to_at_least(&mut self, zoom: f64) {
        js_call(&format!("civixZoomAtLeast({zoom})"));
    }

    fn set_zoom(&mut self, zoom: f64) {
        js_call(&format!("civixSetZoom({zoom})"));
    }

    fn show_user(&mut self, at: LatLng, accuracy_m: f64) {
        js_call(&format!("civixShowUser({}, {}, {accuracy_m})", at.lat, at.lng));
    }

    fn show_range(&mut self, center: LatLng, radius_m: f64) {
        js_call(&format!("civixShowRange({}, {}, {radius_m})", center.lat, center.lng));
    }

    fn fit_bounds(&mut self, b: Bounds) {
        js_call(&format!(
            "civixFitBounds({}, {}, {}, {})",
            b.south, b.west, b.north, b.east
        ));
    }

    fn set_marker_highlight(&mut self, issue_id: u32, on: bool) {
        js_call(&format!("civixHighlight({issue_id}, {on})"));
    }
}

fn js_call(call: &str) {
    let name = call.split('(').next().unwrap_or_default();
    js_eval(&format!(
        r#"
        (function() {{
          try {{
            if (typeof window.{name} === "function") {{
              window.{call};
            }}
          }} catch (e) {{
            console.warn("{name} threw:", e);
          }}
        }})();
        "#
    ));
}

/* ================================================================================================
 * JS bridge setup
 * ============================================================================================== */

fn js_setup_leaflet_loader() {
    let script = r#"
    (function() {
      if (window.__civix_leaflet_loader) return;
      window.__civix_leaflet_loader = true;
      if (typeof window.L !== "undefined") return;

      function addCss(href, fallback) {
        const l = document.createElement("link");
        l.rel = "stylesheet";
        l.href = href;
        if (fallback) l.onerror = function() { addCss(fallback, null); };
        document.head.appendChild(l);
      }

      function addJs(src, fallback) {
        const s = document.createElement("script");
        s.src = src;
        s.async = true;
        s.onerror = function() {
          if (fallback) addJs(fallback, null);
          else console.warn("[civix] Leaflet failed to load");
        };
        document.head.appendChild(s);
      }

      addCss("/vendor/leaflet/leaflet.css", "__CDN__/leaflet.css");
      addJs("/vendor/leaflet/leaflet.js", "__CDN__/leaflet.js");
    })();
    "#;

    js_eval(&script.replace("__CDN__", &leaflet_cdn()));
}

fn js_setup_map_bridge(config_json: &str) {
    let script = r##"
    (function() {
      window.__civix_map_config = __CONFIG__;
      if (window.__civix_bridge_installed) return;
      window.__civix_bridge_installed = true;
      window.__civix_markers = {};

      function push(ev) {
        try { if (typeof window.__civix_push === "function") window.__civix_push(ev); } catch (e) {}
      }

      function pinIcon(active) {
        return L.divIcon({
          className: active ? "civix-pin civix-pin-active" : "civix-pin",
          iconSize: [22, 22],
          iconAnchor: [11, 22]
        });
      }

      function map() { return window.__civix_map || null; }

      window.civixInitMap = function() {
        const el = document.getElementById("civix-map");
        if (!el || typeof window.L === "undefined") return false;

        const old = map();
        if (old) {
          if (old.getContainer() === el) return true;
          try { old.remove(); } catch (e) {}
          window.__civix_map = null;
          window.__civix_markers = {};
          window.__civix_user = null;
          window.__civix_accuracy = null;
          window.__civix_range = null;
        }

        const cfg = window.__civix_map_config || {};
        const c = cfg.center || { lat: 0, lng: 0 };
        const m = L.map(el, { zoomControl: false }).setView([c.lat, c.lng], cfg.zoom || 13);
        L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
          maxZoom: 19,
          attribution: "&copy; OpenStreetMap contributors"
        }).addTo(m);

        (cfg.issues || []).forEach(function(it) {
          const mk = L.marker([it.lat, it.lng], { icon: pinIcon(false), title: it.title });
          mk.on("click", function() { push({ kind: "marker", id: it.id }); });
          mk.addTo(m);
          window.__civix_markers[it.id] = mk;
        });

        window.__civix_map = m;
        push({ kind: "ready" });
        return true;
      };

      window.civixPan = function(lat, lng) {
        const m = map(); if (m) m.panTo([lat, lng]);
      };
      window.civixSetZoom = function(z) {
        const m = map(); if (m) m.setZoom(z);
      };
      window.civixZoomAtLeast = function(z) {
        const m = map(); if (m) m.setZoom(Math.max(m.getZoom() || 0, z));
      };
      window.civixHighlight = function(id, on) {
        const mk = window.__civix_markers[id];
        if (mk) mk.setIcon(pinIcon(on));
      };
      window.civixShowUser = function(lat, lng, acc) {
        const m = map(); if (!m) return;
        if (!window.__civix_user) {
          window.__civix_user = L.circleMarker([lat, lng], {
            radius: 8, color: "#FFFFFF", weight: 2, fillColor: "#1A73E8", fillOpacity: 1
          }).addTo(m);
          window.__civix_accuracy = L.circle([lat, lng], {
            radius: acc, color: "#1A73E8", opacity: 0.5, weight: 1, fillColor: "#1A73E8", fillOpacity: 0.15
          }).addTo(m);
        } else {
          window.__civix_user.setLatLng([lat, lng]);
          window.__civix_accuracy.setLatLng([lat, lng]);
          window.__civix_accuracy.setRadius(acc);
        }
      };
      window.civixShowRange = function(lat, lng, r) {
        const m = map(); if (!m) return;
        if (!window.__civix_range) {
          window.__civix_range = L.circle([lat, lng], {
            radius: r, color: "#34D399", opacity: 0.8, weight: 2, fillColor: "#34D399", fillOpacity: 0.08
          }).addTo(m);
        } else {
          window.__civix_range.setLatLng([lat, lng]);
          window.__civix_range.setRadius(r);
        }
      };
      window.civixFitBounds = function(s, w, n, e) {
        const m = map(); if (m) m.fitBounds([[s, w], [n, e]], { padding: [50, 50] });
      };
    })();
    "##;

    js_eval(&script.replace("__CONFIG__", config_json));
}

fn js_setup_init_retry() {
    js_eval(
        r#"
        (function() {
          let tries = 0;
          const maxTries = 200; // ~10s at 50ms

          const t = setInterval(() => {
            tries++;
            try {
              if (typeof window.civixInitMap === "function" && window.civixInitMap()) {
                const m = window.__civix_map;
                if (m && typeof m.invalidateSize === "function") {
                  requestAnimationFrame(() => { try { m.invalidateSize(); } catch (e) {} });
                  setTimeout(() => { try { m.invalidateSize(); } catch (e) {} }, 200);
                }
                clearInterval(t);
                return;
              }
            } catch (e) {}

            if (tries >= maxTries) {
              clearInterval(t);
              try { console.warn("[civix] map init retry timed out"); } catch (e) {}
              try { if (typeof window.__civix_push === "function") window.__civix_push({ kind: "unavailable" }); } catch (e) {}
            }
          }, 50);
        })();
        "#,
    );
}

fn js_setup_resize_reinit(debounce_ms: u64) {
    let script = r#"
    (function() {
      if (window.__civix_resize_installed) return;
      window.__civix_resize_installed = true;
      const DEBOUNCE = __DEBOUNCE__;

      function invalidate() {
        try {
          const m = window.__civix_map;
          if (m && typeof m.invalidateSize === "function") {
            requestAnimationFrame(() => { try { m.invalidateSize(); } catch (e) {} });
            setTimeout(() => { try { m.invalidateSize(); } catch (e) {} }, 200);
          }
        } catch (e) {}
      }

      let t = null;
      function schedule() {
        try {
          if (t) clearTimeout(t);
          t = setTimeout(invalidate, DEBOUNCE);
        } catch (e) {}
      }

      window.addEventListener('resize', schedule, { passive: true });
      window.addEventListener('orientationchange', schedule, { passive: true });
      try {
        if (window.visualViewport) {
          window.visualViewport.addEventListener('resize', schedule, { passive: true });
        }
      } catch (e) {}
    })();
    "#;

    js_eval(&script.replace("__DEBOUNCE__", &debounce_ms.to_string()));
}

// Blocks pinch-zoom of the page and double-tap zoom over the map.
fn js_setup_map_touch_guard() {
    js_eval(
        r#"
        (function() {
          const el = document.getElementById("civix-map");
          if (!el || el.__civix_touch_guard) return;
          el.__civix_touch_guard = true;
          let last = 0;
          el.addEventListener('touchstart', function(e) {
            if (e.touches && e.touches.length > 1) {
              e.preventDefault();
              e.stopPropagation();
            }
          }, { passive: false });
          el.addEventListener('touchend', function(e) {
            const now = Date.now();
            if (now - last <= 300) {
              e.preventDefault();
              e.stopPropagation();
            }
            last = now;
          }, { passive: false });
        })();
        "#,
    );
}
