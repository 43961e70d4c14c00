// frontend/src/issue_page.rs

use crate::app::Route;
use civix_shared::issues::find_issue;
use dioxus::prelude::*;
use dioxus_router::Link;

/// Detail card for one issue. Upvote and Share only log for now.
#[component]
pub fn IssueDetail(id: u32) -> Element {
    let Some(issue) = find_issue(id) else {
        log::warn!("no issue with id {id}");
        return rsx! {
            div { class: "issue-page",
                div { class: "issue-detail issue-detail-body",
                    h2 { "Issue not found" }
                    p { "There is no issue #{id}." }
                    Link { to: Route::Home {}, "Back to the map" }
                }
            }
        };
    };

    let status = issue.status();
    let pct = issue.progress_pct();

    rsx! {
        div { class: "issue-page",
            article { class: "issue-detail",
                div { class: "issue-detail-media",
                    if let Some(src) = issue.image.as_deref() {
                        img { src: "{src}", alt: "{issue.title_or_default()}" }
                    } else {
                        div { class: "issue-card-noimg", "No Image Available" }
                    }
                }
                div { class: "issue-detail-body",
                    span {
                        class: "status-badge",
                        style: "background: {status.color()};",
                        "{status}"
                    }
                    h2 { style: "margin: 12px 0 4px;", "{issue.title_or_default()}" }
                    p { style: "margin: 0 0 12px; color: #64748b; font-size: 13px;",
                        "{issue.category_or_default()} · {issue.location_or_default()}"
                    }
                    p { style: "margin: 0 0 16px; color: #334155;",
                        "{issue.description_or_default()}"
                    }

                    div { class: "progress-row",
                        span { "Progress" }
                        span { "{pct}%" }
                    }
                    div { class: "progress-track",
                        div {
                            class: "progress-fill",
                            style: "width: {pct}%; background: {status.color()};",
                        }
                    }

                    div { class: "issue-actions",
                        button {
                            onclick: move |_| log!("[civix] upvote issue {id}"),
                            "👍 Upvote"
                        }
                        button {
                            onclick: move |_| log!("[civix] share issue {id}"),
                            "🔗 Share"
                        }
                    }
                }
            }
        }
    }
}
