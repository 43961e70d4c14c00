// frontend/src/app.rs

use crate::home::Home;
use crate::issue_page::IssueDetail;
use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, Router};
use dioxus_signals::WritableExt;

// --- global css ---
const GLOBAL_CSS: &str = r#"
html, body {
    margin: 0;
    padding: 0;
    width: 100%;
    height: 100%;
    background: #f8fafc;
    overflow: hidden;
    font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
}

:root, html {
    color-scheme: light;
    --peek: 72px;
    --navbar: 52px;
}

#main {
    width: 100%;
    height: 100%;
}

* { box-sizing: border-box; }

/* ---------- shell ---------- */
.navbar {
    position: fixed; top: 0; left: 0; right: 0; height: var(--navbar);
    display: flex; align-items: center; gap: 12px; padding: 0 12px;
    background: #ffffff; border-bottom: 1px solid #e5e7eb; z-index: 40;
}
.navbar-brand { font-weight: 700; font-size: 18px; color: #0f172a; text-decoration: none; }
.menu-btn {
    width: 36px; height: 36px; border: none; border-radius: 8px;
    background: #f1f5f9; font-size: 18px; cursor: pointer;
}
.sidebar-scrim {
    position: fixed; inset: 0; background: rgba(15, 23, 42, 0.35); z-index: 49;
}
.sidebar {
    position: fixed; top: 0; bottom: 0; left: 0; width: 260px; padding: 20px 16px;
    background: #ffffff; box-shadow: 4px 0 16px rgba(0,0,0,0.15); z-index: 50;
    transform: translateX(-100%); transition: transform 250ms ease;
}
.sidebar.open { transform: translateX(0); }
.sidebar a {
    display: block; padding: 10px 12px; border-radius: 8px;
    color: #0f172a; text-decoration: none;
}
.sidebar a:hover { background: #f1f5f9; }
.page { position: fixed; top: var(--navbar); left: 0; right: 0; bottom: 0; }
body.civix-dragging .page { z-index: 45; }
.drag-capture { position: fixed; inset: 0; z-index: 1000; cursor: grabbing; }

/* ---------- home ---------- */
.home-root { position: absolute; inset: 0; overflow: hidden; }
.map-header { position: absolute; inset: 0; z-index: 0; }
.map-canvas { width: 100%; height: 100%; background: #e2e8f0; touch-action: none; }

.civix-pin {
    width: 22px; height: 22px; border-radius: 50% 50% 50% 0;
    background: #ef4444; border: 2px solid #ffffff; transform: rotate(-45deg);
    box-shadow: 0 2px 6px rgba(0,0,0,0.35);
}
.civix-pin-active { background: #2563eb; width: 28px; height: 28px; }

.category-strip {
    position: absolute; top: 10px; left: 0; right: 0; z-index: 10;
    display: flex; gap: 8px; padding: 4px 12px;
    overflow-x: auto; scrollbar-width: none; cursor: grab; touch-action: pan-y;
}
.category-strip::-webkit-scrollbar { display: none; }
.category-strip.grabbing { cursor: grabbing; }
.category-chip {
    flex: 0 0 auto; display: flex; align-items: center; gap: 6px;
    padding: 8px 14px; border: none; border-radius: 999px;
    background: #ffffff; color: #0f172a; font-size: 14px; white-space: nowrap;
    box-shadow: 0 1px 4px rgba(0,0,0,0.18); cursor: pointer;
}
.category-chip.active { background: #2563eb; color: #ffffff; }

.bottom-sheet {
    position: absolute; left: 0; right: 0; bottom: 0; height: 70%; z-index: 20;
    display: flex; flex-direction: column;
    background: #ffffff; border-radius: 18px 18px 0 0;
    box-shadow: 0 -4px 20px rgba(0,0,0,0.18);
    transition: transform 300ms ease;
    will-change: transform;
}
.bottom-sheet.open { transform: translateY(0); }
.bottom-sheet.closed { transform: translateY(calc(100% - var(--peek))); }
.sheet-handle {
    height: var(--peek); flex: 0 0 auto; padding: 8px 16px 0;
    cursor: grab; touch-action: none; user-select: none;
}
.sheet-grip {
    width: 44px; height: 5px; margin: 0 auto 10px; border-radius: 3px; background: #cbd5e1;
}
.sheet-title-row { display: flex; align-items: center; gap: 10px; }
.sheet-title { font-weight: 700; font-size: 17px; color: #0f172a; }
.sheet-count { color: #64748b; font-size: 13px; flex: 1; }
.sheet-range-btn {
    border: 1px solid #34d399; background: #ecfdf5; color: #047857;
    border-radius: 999px; padding: 4px 10px; font-size: 12px; cursor: pointer;
}

.nearby-list {
    display: flex; gap: 16px; padding: 8px 16px 24px;
    overflow-x: auto; scrollbar-width: none; touch-action: pan-y;
}
.nearby-list::-webkit-scrollbar { display: none; }
.nearby-empty { color: #64748b; padding: 24px 0; }

.issue-card {
    flex: 0 0 284px; display: flex; flex-direction: column;
    border-radius: 14px; overflow: hidden; background: #ffffff;
    border: 1px solid #e5e7eb; color: inherit; text-decoration: none;
}
.issue-card-media { position: relative; height: 140px; background: #f1f5f9; }
.issue-card-media img { width: 100%; height: 100%; object-fit: cover; }
.issue-card-noimg {
    height: 100%; display: flex; align-items: center; justify-content: center;
    color: #94a3b8; font-size: 13px;
}
.issue-card-badge {
    position: absolute; top: 8px; left: 8px; padding: 3px 8px; border-radius: 999px;
    background: rgba(15, 23, 42, 0.75); color: #ffffff; font-size: 11px;
}
.issue-card-body { padding: 10px 12px 12px; }
.issue-card-title { margin: 0 0 4px; font-size: 15px; color: #0f172a; }
.issue-card-desc {
    margin: 0 0 8px; font-size: 13px; color: #475569;
    display: -webkit-box; -webkit-line-clamp: 2; -webkit-box-orient: vertical; overflow: hidden;
}
.issue-card-loc { margin: 8px 0 0; font-size: 12px; color: #64748b; }
.progress-row { display: flex; justify-content: space-between; font-size: 12px; font-weight: 600; }
.progress-track {
    height: 6px; margin-top: 4px; border-radius: 3px; background: #e5e7eb; overflow: hidden;
}
.progress-fill { height: 100%; border-radius: 3px; }

.overlay-btn {
    position: fixed; z-index: 30; display: flex; align-items: center; justify-content: center;
    border: none; cursor: pointer; background: #ffffff; color: #0f172a;
    box-shadow: 0 2px 8px rgba(0,0,0,0.25);
}
.location-btn { width: 44px; height: 44px; border-radius: 50%; font-size: 20px; }
.location-btn.tracking { color: #1a73e8; }
.report-btn {
    height: 44px; padding: 0 16px; gap: 6px; border-radius: 22px;
    background: #2563eb; color: #ffffff; font-weight: 600;
}
.report-plus { font-size: 20px; line-height: 1; }
.spinner {
    width: 18px; height: 18px; border-radius: 50%;
    border: 2px solid #cbd5e1; border-top-color: #1a73e8;
    animation: civix-spin 800ms linear infinite;
}
.live-dot {
    width: 14px; height: 14px; border-radius: 50%;
    background: #1a73e8; border: 2px solid #ffffff; box-shadow: 0 0 0 4px rgba(26,115,232,0.25);
}
@keyframes civix-spin { to { transform: rotate(360deg); } }

@media (min-width: 900px) {
    .bottom-sheet, .bottom-sheet.open, .bottom-sheet.closed {
        left: auto; top: 0; width: 400px; height: 100%;
        border-radius: 0; transform: none !important; transition: none;
    }
    .sheet-handle { cursor: default; }
    .sheet-grip { display: none; }
    .nearby-list {
        flex-direction: column; overflow-x: hidden; overflow-y: auto; touch-action: auto;
    }
    .issue-card { flex: 0 0 auto; }
    .category-strip { right: 400px; }
}

/* ---------- issue detail ---------- */
.issue-page { height: 100%; overflow-y: auto; padding: 16px; }
.issue-detail {
    max-width: 640px; margin: 0 auto; background: #ffffff; border-radius: 16px;
    overflow: hidden; box-shadow: 0 2px 12px rgba(0,0,0,0.08);
}
.issue-detail-media { height: 240px; background: #f1f5f9; }
.issue-detail-media img { width: 100%; height: 100%; object-fit: cover; }
.issue-detail-body { padding: 16px 20px 20px; }
.status-badge {
    display: inline-block; padding: 4px 10px; border-radius: 999px;
    color: #ffffff; font-size: 12px; font-weight: 600;
}
.issue-actions { display: flex; gap: 10px; margin-top: 16px; }
.issue-actions button {
    flex: 1; padding: 10px; border-radius: 10px; border: 1px solid #e5e7eb;
    background: #f8fafc; font-size: 14px; cursor: pointer;
}
"#;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},

    #[route("/issue/:id")]
    IssueDetail { id: u32 },
}

// -------------------------
// App
// -------------------------
#[component]
pub fn App() -> Element {
    rsx! {
        document::Style { "{GLOBAL_CSS}" }
        Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1, maximum-scale=1, user-scalable=no",
        }

        Router::<Route> {}
    }
}

/// Navbar plus the slide-in sidebar around every page.
#[component]
fn Shell() -> Element {
    let mut sidebar_open = use_signal(|| false);

    rsx! {
        header { class: "navbar",
            button {
                class: "menu-btn",
                title: "Menu",
                onclick: move |_| {
                    let next = !sidebar_open();
                    sidebar_open.set(next);
                },
                "☰"
            }
            Link { class: "navbar-brand", to: Route::Home {}, "civix" }
        }

        if sidebar_open() {
            div { class: "sidebar-scrim", onclick: move |_| sidebar_open.set(false) }
        }
        aside { class: if sidebar_open() { "sidebar open" } else { "sidebar" },
            Link {
                to: Route::Home {},
                onclick: move |_| sidebar_open.set(false),
                "Home"
            }
        }

        main { class: "page",
            Outlet::<Route> {}
        }
    }
}
