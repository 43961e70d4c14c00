use crate::issues::Issue;
use crate::pointer::PointerSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Issue category labels that belong to this chip.
    labels: &'static [&'static str],
}

pub const ALL: &str = "all";
pub const OTHER: &str = "other";

#[rustfmt::skip]
pub const CATEGORIES: [Category; 10] = [
    Category::new(ALL, "All Issues", "📋", &[]),
    Category::new("pothole", "Potholes", "🕳️", &["pothole"]),
    Category::new("street_light", "Street Lights", "💡", &["street light"]),
    Category::new("garbage", "Garbage", "🗑️", &["garbage", "sanitation"]),
    Category::new("sidewalk", "Sidewalks", "🚶", &["sidewalk"]),
    Category::new("water", "Water Leaks", "💧", &["water supply", "water leak"]),
    Category::new("traffic", "Traffic", "🚦", &["traffic"]),
    Category::new("trees", "Trees", "🌳", &["trees", "parks"]),
    Category::new("graffiti", "Graffiti", "🎨", &["graffiti"]),
    Category::new(OTHER, "Other", "📌", &[]),
];

impl Category {
    const fn new(
        id: &'static str,
        name: &'static str,
        icon: &'static str,
        labels: &'static [&'static str],
    ) -> Self {
        Self { id, name, icon, labels }
    }

    pub fn by_id(id: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.id == id)
    }

    fn claims(&self, label: &str) -> bool {
        let label = label.trim();
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        let label = issue.category_or_default();
        match self.id {
            ALL => true,
            OTHER => !CATEGORIES.iter().any(|c| c.claims(label)),
            _ => self.claims(label),
        }
    }
}

/// Issues visible under the chip `category_id`, in list order.
/// Unknown ids behave like `all`.
pub fn filter_issues<'a>(issues: &'a [Issue], category_id: &str) -> Vec<&'a Issue> {
    match Category::by_id(category_id) {
        Some(cat) => issues.iter().filter(|i| cat.matches(i)).collect(),
        None => issues.iter().collect(),
    }
}

/// Scroll offset that centres a chip in the strip. Never negative.
pub fn center_scroll_target(chip_left: f64, chip_width: f64, container_width: f64) -> f64 {
    let target = chip_left - container_width / 2.0 + chip_width / 2.0;
    if target.is_finite() { target.max(0.0) } else { 0.0 }
}

/// Drag-to-scroll on the chip strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragScroll {
    start_x: f64,
    start_scroll: f64,
    multiplier: f64,
}

impl DragScroll {
    pub const MOUSE_MULTIPLIER: f64 = 2.0;
    pub const TOUCH_MULTIPLIER: f64 = 0.99;

    pub fn start(pointer_x: f64, scroll_left: f64, source: PointerSource) -> Self {
        let multiplier = match source {
            PointerSource::Mouse => Self::MOUSE_MULTIPLIER,
            PointerSource::Touch => Self::TOUCH_MULTIPLIER,
        };
        Self {
            start_x: pointer_x,
            start_scroll: scroll_left,
            multiplier,
        }
    }

    /// New `scrollLeft` for the pointer at `pointer_x`, clamped to `[0, max_scroll]`.
    pub fn scroll_for(&self, pointer_x: f64, max_scroll: f64) -> f64 {
        let walk = (pointer_x - self.start_x) * self.multiplier;
        let max_scroll = max_scroll.max(0.0);
        let next = self.start_scroll - walk;
        if next.is_finite() {
            next.clamp(0.0, max_scroll)
        } else {
            self.start_scroll.clamp(0.0, max_scroll)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::{nearby, parse_issues};

    fn ids(v: &[&Issue]) -> Vec<u32> {
        v.iter().map(|i| i.id).collect()
    }

    #[test]
    fn ten_chips_in_display_order() {
        let ids: Vec<&str> = CATEGORIES.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                "all", "pothole", "street_light", "garbage", "sidewalk", "water", "traffic",
                "trees", "graffiti", "other"
            ]
        );
    }

    #[test]
    fn all_keeps_everything_in_order() {
        assert_eq!(ids(&filter_issues(nearby(), "all")), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ids(&filter_issues(nearby(), "nonsense")), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn named_chips_map_to_issue_labels() {
        assert_eq!(ids(&filter_issues(nearby(), "pothole")), vec![1]);
        assert_eq!(ids(&filter_issues(nearby(), "garbage")), vec![3]);
        assert_eq!(ids(&filter_issues(nearby(), "water")), vec![5]);
        assert_eq!(ids(&filter_issues(nearby(), "trees")), vec![7]);
        assert!(filter_issues(nearby(), "graffiti").is_empty());
    }

    #[test]
    fn other_collects_unclaimed_labels() {
        let issues = parse_issues(
            r#"[
                { "id": 1, "category": "Noise", "position": { "lat": 0.0, "lng": 0.0 } },
                { "id": 2, "category": "pothole", "position": { "lat": 0.0, "lng": 0.0 } },
                { "id": 3, "category": "Stray Animals", "position": { "lat": 0.0, "lng": 0.0 } }
            ]"#,
        )
        .expect("issues");
        assert_eq!(ids(&filter_issues(&issues, "other")), vec![1, 3]);
        assert_eq!(ids(&filter_issues(&issues, "pothole")), vec![2]);
        assert!(filter_issues(nearby(), "other").is_empty());
    }

    #[test]
    fn centring_never_goes_negative() {
        assert_eq!(center_scroll_target(400.0, 100.0, 300.0), 300.0);
        assert_eq!(center_scroll_target(10.0, 100.0, 300.0), 0.0);
        assert_eq!(center_scroll_target(f64::NAN, 100.0, 300.0), 0.0);
    }

    #[test]
    fn mouse_drag_scrolls_twice_as_far() {
        let d = DragScroll::start(200.0, 100.0, PointerSource::Mouse);
        assert_eq!(d.scroll_for(180.0, 1000.0), 140.0);
        assert_eq!(d.scroll_for(300.0, 1000.0), 0.0);
        assert_eq!(d.scroll_for(-1000.0, 1000.0), 1000.0);
    }

    #[test]
    fn touch_drag_follows_the_finger() {
        let d = DragScroll::start(200.0, 100.0, PointerSource::Touch);
        let s = d.scroll_for(100.0, 1000.0);
        assert!((s - 199.0).abs() < 1e-9, "{s}");
    }
}
