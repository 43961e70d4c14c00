use crate::geo::LatLng;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

const NEARBY_JSON: &str = include_str!("../data/nearby.json");

static NEARBY: Lazy<Vec<Issue>> = Lazy::new(|| match load_nearby() {
    Ok(issues) => issues,
    Err(e) => {
        log::warn!("{e}");
        Vec::new()
    }
});

/// A reported civic issue as shown in the nearby list, the detail page and on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Percent complete, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: String,
    pub position: LatLng,
}

impl Issue {
    pub fn title_or_default(&self) -> &str {
        non_empty_or(&self.title, "Unnamed Issue")
    }

    pub fn category_or_default(&self) -> &str {
        non_empty_or(&self.category, "Pothole")
    }

    pub fn description_or_default(&self) -> &str {
        non_empty_or(&self.description, "No description provided.")
    }

    pub fn location_or_default(&self) -> &str {
        non_empty_or(&self.location, "Location not specified")
    }

    pub fn progress_pct(&self) -> u8 {
        self.progress.min(100)
    }

    pub fn status(&self) -> IssueStatus {
        IssueStatus::from_progress(self.progress)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueStatus {
    Reported,
    InReview,
    InProgress,
    AlmostDone,
    Resolved,
}

impl IssueStatus {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => IssueStatus::Reported,
            1..=29 => IssueStatus::InReview,
            30..=69 => IssueStatus::InProgress,
            70..=99 => IssueStatus::AlmostDone,
            _ => IssueStatus::Resolved,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Reported => "Reported",
            IssueStatus::InReview => "In Review",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::AlmostDone => "Almost Done",
            IssueStatus::Resolved => "Resolved",
        }
    }

    /// Badge colour.
    pub fn color(&self) -> &'static str {
        match self {
            IssueStatus::Reported => "#6b7280",
            IssueStatus::InReview => "#eab308",
            IssueStatus::InProgress => "#3b82f6",
            IssueStatus::AlmostDone => "#f97316",
            IssueStatus::Resolved => "#22c55e",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn parse_issues(raw: &str) -> Result<Vec<Issue>, String> {
    let issues: Vec<Issue> =
        serde_json::from_str(raw).map_err(|e| format!("Invalid issue list JSON: {e}"))?;
    if let Some(bad) = issues.iter().find(|i| !i.position.is_valid()) {
        return Err(format!("Issue {} has an invalid position", bad.id));
    }
    Ok(issues)
}

/// Parses the compiled-in mock list.
pub fn load_nearby() -> Result<Vec<Issue>, String> {
    parse_issues(NEARBY_JSON)
}

/// The mock list, parsed once. Empty (with a warning) if the data is broken.
pub fn nearby() -> &'static [Issue] {
    &NEARBY
}

pub fn find_issue(id: u32) -> Option<&'static Issue> {
    nearby().iter().find(|i| i.id == id)
}
