use civix_shared::category::filter_issues;
use civix_shared::feedback::AnchorMode;
use civix_shared::issues::{nearby, parse_issues};
use civix_shared::layout::LayoutConfig;
use civix_shared::{
    DragSheetController, OverlayAnchor, PointerSource, PositionFeedbackConsumer, PositionTuple,
    SheetObserver, SheetState,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Stands in for an overlay button: re-anchors on every tuple it hears.
struct Button {
    consumer: PositionFeedbackConsumer,
    viewport: Rc<RefCell<f64>>,
    seen: Rc<RefCell<Vec<OverlayAnchor>>>,
}

impl SheetObserver for Button {
    fn on_position(&mut self, tuple: PositionTuple) {
        let anchor = self.consumer.update(&tuple, *self.viewport.borrow());
        self.seen.borrow_mut().push(anchor);
    }
}

fn button(
    consumer: PositionFeedbackConsumer,
    viewport: &Rc<RefCell<f64>>,
) -> (Box<Button>, Rc<RefCell<Vec<OverlayAnchor>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let b = Box::new(Button {
        consumer,
        viewport: viewport.clone(),
        seen: seen.clone(),
    });
    (b, seen)
}

#[test]
fn two_overlays_follow_a_full_drag_cycle() {
    let layout = LayoutConfig::embedded();
    let viewport = Rc::new(RefCell::new(390.0));
    let mut sheet = DragSheetController::new(layout.sheet);

    let (loc, loc_seen) = button(
        PositionFeedbackConsumer::location_button(&layout.sheet, &layout.overlays),
        &viewport,
    );
    let (rep, rep_seen) = button(
        PositionFeedbackConsumer::report_button(&layout.sheet, &layout.overlays),
        &viewport,
    );
    sheet.subscribe(loc);
    sheet.subscribe(rep);

    sheet.container_resized(372.0);
    assert_eq!(sheet.closed_offset(), 300.0);
    assert_eq!(loc_seen.borrow().last().map(|a| a.bottom_px), Some(88.0));

    // Drag up 250px from closed and let go: opens.
    sheet.pointer_down(600.0, PointerSource::Touch);
    for y in [580.0, 500.0, 420.0, 350.0] {
        sheet.pointer_move(y);
        let a = *loc_seen.borrow().last().expect("anchor");
        assert_eq!(a.mode, AnchorMode::Tracking);
        assert!(!a.animate);
        assert_eq!(a.bottom_px, 72.0 + (300.0 - sheet.current_offset()) + 16.0);
    }
    sheet.pointer_up();
    assert_eq!(sheet.state(), SheetState::Open);

    let loc_last = *loc_seen.borrow().last().expect("anchor");
    let rep_last = *rep_seen.borrow().last().expect("anchor");
    assert_eq!(loc_last.bottom_px, 388.0);
    assert!(loc_last.animate);
    assert_eq!(rep_last.bottom_px - loc_last.bottom_px, layout.overlays.report.stack);
    assert_eq!(loc_seen.borrow().len(), rep_seen.borrow().len());

    // Widen the window past the breakpoint; the next tuple pins both buttons.
    *viewport.borrow_mut() = 1280.0;
    sheet.close();
    let a = *loc_seen.borrow().last().expect("anchor");
    assert_eq!(a.mode, AnchorMode::Fixed);
    assert_eq!(a.bottom_px, layout.overlays.location.desktop_bottom);
}

#[test]
fn mouse_drag_cancelled_midway_leaves_sheet_open() {
    let layout = LayoutConfig::embedded();
    let mut sheet = DragSheetController::new(layout.sheet);
    sheet.container_resized(572.0);
    sheet.open();

    sheet.pointer_down(100.0, PointerSource::Mouse);
    sheet.pointer_move(400.0);
    assert_eq!(sheet.position().progress, 0.6);
    sheet.pointer_cancel();

    assert_eq!(sheet.state(), SheetState::Open);
    assert_eq!(sheet.position(), PositionTuple::settled(SheetState::Open, 500.0));
}

#[test]
fn filtered_lists_keep_source_order_and_fields() {
    let issues = parse_issues(
        r#"[
            { "id": 10, "title": "Leaking hydrant", "category": "Water Supply", "progress": 0,
              "location": "Lake Rd", "position": { "lat": 1.0, "lng": 2.0 } },
            { "id": 11, "title": "Fallen branch", "category": "Parks", "progress": 100,
              "location": "Hill St", "position": { "lat": 1.5, "lng": 2.5 } },
            { "id": 12, "title": "Burst main", "category": "Water Supply", "progress": 50,
              "location": "Lake Rd", "position": { "lat": 1.2, "lng": 2.2 } }
        ]"#,
    )
    .expect("issues");

    let water = filter_issues(&issues, "water");
    let titles: Vec<&str> = water.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Leaking hydrant", "Burst main"]);
    assert_eq!(water[1].status().as_str(), "In Progress");

    let all = filter_issues(&issues, "all");
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].location, "Hill St");
    assert_eq!(all[1].status().as_str(), "Resolved");

    assert_eq!(filter_issues(nearby(), "street_light")[0].id, 2);
}

/// Renders the nearby list on every sheet update, the way the sheet body does.
struct ListView {
    renders: Rc<RefCell<Vec<Vec<(u32, String, String, u8)>>>>,
}

impl SheetObserver for ListView {
    fn on_position(&mut self, _tuple: PositionTuple) {
        let rows = filter_issues(nearby(), "all")
            .into_iter()
            .map(|i| (i.id, i.title.clone(), i.category.clone(), i.progress))
            .collect();
        self.renders.borrow_mut().push(rows);
    }
}

#[test]
fn issue_list_is_untouched_by_repeated_drags() {
    let before = nearby().to_vec();
    let expected: Vec<(u32, String, String, u8)> = before
        .iter()
        .map(|i| (i.id, i.title.clone(), i.category.clone(), i.progress))
        .collect();

    let layout = LayoutConfig::embedded();
    let mut sheet = DragSheetController::new(layout.sheet);
    let renders = Rc::new(RefCell::new(Vec::new()));
    sheet.subscribe(Box::new(ListView {
        renders: renders.clone(),
    }));
    sheet.container_resized(572.0);

    for round in 0..5 {
        let source = if round % 2 == 0 {
            PointerSource::Touch
        } else {
            PointerSource::Mouse
        };
        sheet.pointer_down(600.0, source);
        sheet.pointer_move(450.0);
        sheet.pointer_move(200.0);
        sheet.pointer_up();
        sheet.pointer_down(100.0, source);
        sheet.pointer_move(300.0);
        sheet.pointer_cancel();
        sheet.pointer_down(100.0, source);
        sheet.pointer_move(580.0);
        sheet.pointer_up();
    }

    assert_eq!(sheet.state(), SheetState::Closed);
    assert_eq!(nearby(), before.as_slice());
    let renders = renders.borrow();
    assert!(renders.len() > 20);
    assert!(renders.iter().all(|rows| *rows == expected));
    assert_eq!(expected.first().map(|r| r.0), Some(1));
    assert_eq!(expected.len(), 7);
}
