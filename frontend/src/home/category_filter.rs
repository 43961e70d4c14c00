// frontend/src/home/category_filter.rs

use super::{js_eval, js_query_json, touch_sample};
use civix_shared::category::{self, CATEGORIES, DragScroll, center_scroll_target};
use civix_shared::PointerSource;
use dioxus::prelude::*;
use dioxus_signals::{ReadableExt, Signal, WritableExt};
use serde::Deserialize;

const STRIP_ID: &str = "category-strip";

#[derive(Debug, Clone, Copy, Deserialize)]
struct StripGeometry {
    scroll_left: f64,
    max_scroll: f64,
    chip_left: f64,
    chip_width: f64,
    container_width: f64,
}

/// Reads the strip's scroll state and the geometry of chip `id`
/// (zeroes when that chip is not rendered).
async fn measure(id: &str) -> Option<StripGeometry> {
    js_query_json(&format!(
        r#"(function() {{
          const el = document.getElementById("{STRIP_ID}");
          if (!el) return null;
          const chip = el.querySelector('[data-category="{id}"]');
          return {{
            scroll_left: el.scrollLeft,
            max_scroll: Math.max(0, el.scrollWidth - el.clientWidth),
            chip_left: chip ? chip.offsetLeft : 0,
            chip_width: chip ? chip.offsetWidth : 0,
            container_width: el.clientWidth
          }};
        }})()"#
    ))
    .await
}

fn js_scroll_strip(left: f64, smooth: bool) {
    let behavior = if smooth { "smooth" } else { "auto" };
    js_eval(&format!(
        r#"
        (function() {{
          const el = document.getElementById("{STRIP_ID}");
          if (el) el.scrollTo({{ left: {left}, behavior: "{behavior}" }});
        }})();
        "#
    ));
}

/// Horizontal chip strip. The active chip is scrolled to the middle.
#[component]
pub fn CategoryFilter(active: Signal<String>) -> Element {
    let mut active = active;
    let mut drag = use_signal(|| None::<(DragScroll, f64)>);

    use_effect(move || {
        let id = active();
        spawn(async move {
            if let Some(g) = measure(&id).await {
                let target = center_scroll_target(g.chip_left, g.chip_width, g.container_width);
                js_scroll_strip(target, true);
            }
        });
    });

    let begin = move |x: f64, source: PointerSource| {
        spawn(async move {
            if let Some(g) = measure(category::ALL).await {
                let scroll = DragScroll::start(x, g.scroll_left, source);
                drag.set(Some((scroll, g.max_scroll)));
            }
        });
    };

    let follow = move |x: f64| {
        if let Some((d, max)) = *drag.peek() {
            js_scroll_strip(d.scroll_for(x, max), false);
        }
    };

    let current = active();

    rsx! {
        nav {
            id: STRIP_ID,
            class: if drag.read().is_some() { "category-strip grabbing" } else { "category-strip" },
            onmousedown: move |e| {
                e.prevent_default();
                begin(e.client_coordinates().x, PointerSource::Mouse);
            },
            onmousemove: move |e| follow(e.client_coordinates().x),
            onmouseup: move |_| drag.set(None),
            onmouseleave: move |_| drag.set(None),
            ontouchstart: move |e| {
                if let Some(p) = touch_sample(&e) {
                    begin(p.x, PointerSource::Touch);
                }
            },
            ontouchmove: move |e| {
                if let Some(p) = touch_sample(&e) {
                    follow(p.x);
                }
            },
            ontouchend: move |_| drag.set(None),
            ontouchcancel: move |_| drag.set(None),

            for c in CATEGORIES {
                button {
                    key: "{c.id}",
                    class: if c.id == current { "category-chip active" } else { "category-chip" },
                    "data-category": c.id,
                    onclick: move |_| {
                        if *active.peek() != c.id {
                            log::debug!("category filter -> {}", c.id);
                            active.set(c.id.to_string());
                        }
                    },
                    span { class: "chip-icon", "{c.icon}" }
                    span { "{c.name}" }
                }
            }
        }
    }
}
