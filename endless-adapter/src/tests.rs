use crate::*;

use endless::{
    Align, Axis, Chunk, FastScrollState, LoadDirection, LoadError, LogicalIndex, PhysicalSlot,
    Rect, Vector, Viewport,
};
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex;

enum Layout {
    Uniform { count: usize, extent: f64 },
    Variable(Vec<f64>),
}

/// An in-memory scroll container. `scroll_to` jumps instantly; animation is only recorded.
struct SimContainer {
    axis: Axis,
    frame: Rect,
    offset: f64,
    layout: Layout,
    /// Extent given to slots added by `insert_slots` / `append_slots`.
    new_extent: f64,
    bound: Vec<(PhysicalSlot, LogicalIndex)>,
    scrolls: Vec<(PhysicalSlot, Align, bool)>,
    paging: Vec<bool>,
    inserts: Vec<(PhysicalSlot, usize)>,
    appends: Vec<usize>,
    reloads: usize,
    layouts: usize,
}

impl SimContainer {
    fn new(axis: Axis, frame: Rect, layout: Layout) -> Self {
        Self {
            axis,
            frame,
            offset: 0.0,
            layout,
            new_extent: 100.0,
            bound: Vec::new(),
            scrolls: Vec::new(),
            paging: Vec::new(),
            inserts: Vec::new(),
            appends: Vec::new(),
            reloads: 0,
            layouts: 0,
        }
    }

    fn uniform(axis: Axis, frame: Rect, count: usize, extent: f64) -> Self {
        Self::new(axis, frame, Layout::Uniform { count, extent })
    }

    fn variable(axis: Axis, frame: Rect, extents: Vec<f64>) -> Self {
        Self::new(axis, frame, Layout::Variable(extents))
    }

    fn slot_count(&self) -> usize {
        match &self.layout {
            Layout::Uniform { count, .. } => *count,
            Layout::Variable(extents) => extents.len(),
        }
    }

    fn slot_start(&self, slot: PhysicalSlot) -> f64 {
        match &self.layout {
            Layout::Uniform { extent, .. } => slot as f64 * extent,
            Layout::Variable(extents) => extents.iter().take(slot).sum(),
        }
    }

    fn slot_extent(&self, slot: PhysicalSlot) -> f64 {
        match &self.layout {
            Layout::Uniform { extent, .. } => *extent,
            Layout::Variable(extents) => extents.get(slot).copied().unwrap_or(0.0),
        }
    }

    fn viewport_main(&self) -> f64 {
        self.axis.main_size(self.frame)
    }

    fn slot_rect(&self, slot: PhysicalSlot) -> Rect {
        let pos = self.slot_start(slot) - self.offset;
        let extent = self.slot_extent(slot);
        match self.axis {
            Axis::Horizontal => Rect::new(self.frame.x + pos, self.frame.y, extent, self.frame.height),
            Axis::Vertical => Rect::new(self.frame.x, self.frame.y + pos, self.frame.width, extent),
        }
    }

    fn add_slots(&mut self, at: PhysicalSlot, count: usize) {
        let new_extent = self.new_extent;
        match &mut self.layout {
            Layout::Uniform { count: n, .. } => *n += count,
            Layout::Variable(extents) => {
                for _ in 0..count {
                    extents.insert(at, new_extent);
                }
            }
        }
    }
}

impl ScrollContainer for SimContainer {
    type Content = LogicalIndex;

    fn frame(&self) -> Rect {
        self.frame
    }

    fn offset(&self) -> Vector {
        self.axis.with_main(Vector::ZERO, self.offset)
    }

    fn set_offset(&mut self, offset: Vector) {
        self.offset = self.axis.main(offset);
    }

    fn content_extent(&self) -> Vector {
        let total = match &self.layout {
            Layout::Uniform { count, extent } => *count as f64 * extent,
            Layout::Variable(extents) => extents.iter().sum(),
        };
        self.axis.with_main(self.frame.size(), total)
    }

    fn for_each_visible_slot(&self, f: &mut dyn FnMut(Viewport)) {
        let end = self.offset + self.viewport_main();
        let first = match &self.layout {
            Layout::Uniform { extent, .. } if *extent > 0.0 => (self.offset / extent).max(0.0) as usize,
            _ => 0,
        };
        for slot in first..self.slot_count() {
            let start = self.slot_start(slot);
            if start >= end {
                break;
            }
            if start + self.slot_extent(slot) <= self.offset {
                continue;
            }
            f(Viewport {
                slot,
                rect: self.slot_rect(slot),
            });
        }
    }

    fn scroll_to(&mut self, slot: PhysicalSlot, align: Align, animated: bool) {
        self.scrolls.push((slot, align, animated));
        let start = self.slot_start(slot);
        let extent = self.slot_extent(slot);
        let viewport = self.viewport_main();
        self.offset = match align {
            Align::Start => start,
            Align::Center => start + extent / 2.0 - viewport / 2.0,
            Align::End => start + extent - viewport,
        };
    }

    fn insert_slots(&mut self, at: PhysicalSlot, count: usize) {
        self.inserts.push((at, count));
        self.add_slots(at, count);
    }

    fn append_slots(&mut self, count: usize) {
        self.appends.push(count);
        let at = self.slot_count();
        self.add_slots(at, count);
    }

    fn reload(&mut self) {
        self.reloads += 1;
        self.bound.clear();
    }

    fn layout_if_needed(&mut self) {
        self.layouts += 1;
    }

    fn set_paging_coupling(&mut self, enabled: bool) {
        self.paging.push(enabled);
    }

    fn bind(&mut self, slot: PhysicalSlot, content: LogicalIndex) {
        self.bound.push((slot, content));
    }
}

#[derive(Debug, Default)]
struct CountingRenderer {
    calls: Vec<LogicalIndex>,
}

impl ItemRenderer for CountingRenderer {
    type Content = LogicalIndex;

    fn render(&mut self, index: LogicalIndex) -> LogicalIndex {
        self.calls.push(index);
        index
    }
}

fn recorder() -> (
    Arc<Mutex<Vec<LogicalIndex>>>,
    impl Fn(LogicalIndex) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |i: LogicalIndex| sink.lock().unwrap().push(i))
}

fn seen(log: &Arc<Mutex<Vec<LogicalIndex>>>) -> Vec<LogicalIndex> {
    log.lock().unwrap().clone()
}

const PAGE: f64 = 100.0;

fn pager_frame() -> Rect {
    Rect::new(0.0, 0.0, PAGE, 200.0)
}

fn attached_pager(options: EngineOptions) -> (Pager<CountingRenderer>, SimContainer) {
    let mut pager = Pager::new(options, CountingRenderer::default());
    let mut c = SimContainer::uniform(Axis::Horizontal, pager_frame(), pager.slot_count(), PAGE);
    pager.attach(&mut c);
    (pager, c)
}

#[test]
fn pager_attach_centers_on_anchor() {
    let (pager, c) = attached_pager(EngineOptions::pager());
    assert_eq!(pager.slot_count(), 100_000_000);
    assert_eq!(pager.anchor(), 50_000_000);
    assert_eq!(c.scrolls, vec![(50_000_000, Align::Center, false)]);
    assert_eq!(c.paging, vec![true]);
    assert_eq!(c.offset, 5_000_000_000.0);
    assert_eq!(pager.current_index(), 0);
}

#[test]
fn pager_jump_renders_nothing_until_settle() {
    let (log, on_change) = recorder();
    let options = EngineOptions::pager().with_on_current_index_changed(Some(on_change));
    let (mut pager, mut c) = attached_pager(options);

    pager.request_scroll_to(5, true, &mut c);
    assert_eq!(
        pager.fast_scroll_state(),
        FastScrollState::Scrolling { target: 50_000_005 }
    );
    assert_eq!(c.scrolls.last(), Some(&(50_000_005, Align::Center, true)));
    assert_eq!(c.paging, vec![true, false, true]);

    // Layout passes during the flight get nothing, and the renderer is never called.
    for slot in [50_000_001, 50_000_003, 50_000_005] {
        assert_eq!(pager.content_for_slot(slot), None);
    }
    pager.handle_signal(ScrollSignal::DidScroll, &mut c);
    assert!(pager.renderer().calls.is_empty());
    assert!(c.bound.is_empty());
    assert_eq!(pager.current_index(), 0);

    pager.handle_signal(ScrollSignal::DidEndScrollAnimation, &mut c);
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(pager.current_index(), 5);
    assert_eq!(seen(&log), vec![5]);
    assert_eq!(c.bound, vec![(50_000_005, 5)]);
    assert_eq!(pager.renderer().calls, vec![5]);

    assert_eq!(pager.content_for_slot(50_000_006), Some(6));
}

#[test]
fn pager_retargets_while_scrolling() {
    let (mut pager, mut c) = attached_pager(EngineOptions::pager());
    pager.request_scroll_to(1_000, true, &mut c);
    pager.request_scroll_to(-40, true, &mut c);
    assert_eq!(
        pager.fast_scroll_state(),
        FastScrollState::Scrolling { target: 49_999_960 }
    );

    pager.handle_signal(ScrollSignal::DidEndScrollAnimation, &mut c);
    assert_eq!(pager.current_index(), -40);
    assert_eq!(pager.renderer().calls, vec![-40]);
}

#[test]
fn pager_request_for_current_index_is_noop() {
    let (mut pager, mut c) = attached_pager(EngineOptions::pager());
    pager.request_scroll_to(0, true, &mut c);
    assert_eq!(c.scrolls.len(), 1);
    assert_eq!(c.paging, vec![true]);
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Idle);
}

#[test]
fn pager_non_animated_jump_settles_immediately() {
    let (log, on_change) = recorder();
    let options = EngineOptions::pager().with_on_current_index_changed(Some(on_change));
    let (mut pager, mut c) = attached_pager(options);

    pager.request_scroll_to(-3, false, &mut c);
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(pager.current_index(), -3);
    assert_eq!(seen(&log), vec![-3]);
    assert_eq!(c.bound, vec![(49_999_997, -3)]);
}

#[test]
fn pager_drag_recomputes_current_index_from_offset() {
    let (log, on_change) = recorder();
    let options = EngineOptions::pager().with_on_current_index_changed(Some(on_change));
    let (mut pager, mut c) = attached_pager(options);

    // A user swipe that ends a little past the start of page anchor + 2.
    c.offset = 50_000_002.0 * PAGE + 30.0;
    pager.handle_signal(ScrollSignal::DidEndDragging { will_decelerate: true }, &mut c);
    assert_eq!(pager.current_index(), 0);

    pager.handle_signal(ScrollSignal::DidEndDecelerating, &mut c);
    assert_eq!(pager.current_index(), 2);
    assert_eq!(seen(&log), vec![2]);
    // Nothing to resynchronize after a user scroll.
    assert!(c.bound.is_empty());

    // Past the halfway point rounds to the next page.
    c.offset = 50_000_002.0 * PAGE + 60.0;
    pager.handle_signal(ScrollSignal::DidEndDragging { will_decelerate: false }, &mut c);
    assert_eq!(pager.current_index(), 3);
}

#[test]
fn pager_index_for_offset_rounds_to_nearest_page() {
    let pager = Pager::new(
        EngineOptions::pager().with_pager_capacity(10),
        CountingRenderer::default(),
    );
    assert_eq!(pager.anchor(), 5);
    assert_eq!(pager.index_for_offset(500.0, PAGE, PAGE), Some(0));
    assert_eq!(pager.index_for_offset(549.0, PAGE, PAGE), Some(0));
    assert_eq!(pager.index_for_offset(550.0, PAGE, PAGE), Some(1));
    assert_eq!(pager.index_for_offset(0.0, PAGE, PAGE), Some(-5));
    assert_eq!(pager.index_for_offset(-60.0, PAGE, PAGE), None);
    assert_eq!(pager.index_for_offset(2_000.0, PAGE, PAGE), None);
    assert_eq!(pager.index_for_offset(500.0, PAGE, 0.0), None);

    // Pages narrower than the viewport: slot 5 centered in a 100 wide viewport sits at 170.
    assert_eq!(pager.index_for_offset(170.0, PAGE, 40.0), Some(0));
    assert_eq!(pager.index_for_offset(189.0, PAGE, 40.0), Some(0));
    assert_eq!(pager.index_for_offset(190.0, PAGE, 40.0), Some(1));
}

#[test]
fn pager_retarget_back_to_current_index_wins() {
    let (log, on_change) = recorder();
    let options = EngineOptions::pager().with_on_current_index_changed(Some(on_change));
    let (mut pager, mut c) = attached_pager(options);

    pager.request_scroll_to(5, true, &mut c);
    pager.request_scroll_to(0, true, &mut c);
    assert_eq!(
        pager.fast_scroll_state(),
        FastScrollState::Scrolling { target: 50_000_000 }
    );
    assert_eq!(c.scrolls.last(), Some(&(50_000_000, Align::Center, true)));

    pager.handle_signal(ScrollSignal::DidEndScrollAnimation, &mut c);
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(pager.current_index(), 0);
    assert!(seen(&log).is_empty());
    assert_eq!(c.bound, vec![(50_000_000, 0)]);
}

#[test]
fn pager_repeated_request_for_jump_target_is_noop() {
    let (mut pager, mut c) = attached_pager(EngineOptions::pager());
    pager.request_scroll_to(5, true, &mut c);
    pager.request_scroll_to(5, true, &mut c);
    assert_eq!(c.scrolls.len(), 2);
    assert_eq!(c.paging, vec![true, false, true]);
}

#[test]
fn pager_fixed_extent_narrower_than_half_the_frame() {
    let (log, on_change) = recorder();
    let options = EngineOptions::pager()
        .with_fixed_item_extent(Some(40.0))
        .with_on_current_index_changed(Some(on_change));
    let mut pager = Pager::new(options, CountingRenderer::default());
    let mut c = SimContainer::uniform(Axis::Horizontal, pager_frame(), pager.slot_count(), 40.0);
    pager.attach(&mut c);
    assert_eq!(pager.item_size(&c), Vector::new(40.0, 200.0));

    pager.request_scroll_to(5, true, &mut c);
    pager.handle_signal(ScrollSignal::DidEndScrollAnimation, &mut c);
    assert_eq!(pager.current_index(), 5);
    assert_eq!(seen(&log), vec![5]);
    assert_eq!(
        c.bound,
        vec![(50_000_004, 4), (50_000_005, 5), (50_000_006, 6)]
    );

    pager.request_scroll_to(-2, false, &mut c);
    assert_eq!(pager.current_index(), -2);
}

#[test]
fn pager_ignores_targets_outside_substrate() {
    let (mut pager, mut c) = attached_pager(EngineOptions::pager().with_pager_capacity(10));
    pager.request_scroll_to(7, true, &mut c);
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(c.scrolls.len(), 1);

    pager.request_scroll_to(4, true, &mut c);
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Scrolling { target: 9 });
}

#[test]
fn pager_item_size_prefers_fixed_extent() {
    let (pager, c) = attached_pager(EngineOptions::pager());
    assert_eq!(pager.item_size(&c), Vector::new(PAGE, 200.0));

    let pager = Pager::new(
        EngineOptions::pager().with_fixed_item_extent(Some(80.0)),
        CountingRenderer::default(),
    );
    assert_eq!(pager.item_size(&c), Vector::new(80.0, 200.0));

    let pager = Pager::new(
        EngineOptions::pager().with_fixed_item_extent(Some(f64::NAN)),
        CountingRenderer::default(),
    );
    assert_eq!(pager.item_size(&c), Vector::new(PAGE, 200.0));
}

#[test]
fn pager_after_teardown_ignores_everything() {
    let (log, on_change) = recorder();
    let options = EngineOptions::pager().with_on_current_index_changed(Some(on_change));
    let (mut pager, mut c) = attached_pager(options);
    pager.request_scroll_to(8, true, &mut c);
    pager.teardown();
    assert!(!pager.is_attached());
    assert_eq!(pager.fast_scroll_state(), FastScrollState::Idle);

    pager.handle_signal(ScrollSignal::DidEndScrollAnimation, &mut c);
    pager.request_scroll_to(9, true, &mut c);
    assert_eq!(pager.current_index(), 0);
    assert!(seen(&log).is_empty());
    assert_eq!(c.scrolls.len(), 2);
}

fn list_frame() -> Rect {
    Rect::new(0.0, 0.0, 390.0, 800.0)
}

fn list_container() -> SimContainer {
    SimContainer::variable(Axis::Vertical, list_frame(), vec![100.0; 48])
}

fn attached_list(options: EngineOptions) -> (InfiniteList<CountingRenderer>, SimContainer) {
    let mut list = InfiniteList::new(options, CountingRenderer::default());
    let mut c = list_container();
    assert_eq!(list.slot_count(), c.slot_count());
    list.attach(&mut c);
    (list, c)
}

#[test]
fn list_attach_aligns_index_zero_to_start() {
    let (list, c) = attached_list(EngineOptions::list());
    assert_eq!(list.anchor(), 24);
    assert_eq!(c.scrolls, vec![(24, Align::Start, false)]);
    assert_eq!(c.paging, vec![false]);
    assert_eq!(c.offset, 2_400.0);
    assert_eq!(list.tracker().last_emitted(), Some(0));
}

#[test]
fn list_prepend_keeps_content_visually_still() {
    let (log, on_change) = recorder();
    let options = EngineOptions::list().with_on_current_index_changed(Some(on_change));
    let (mut list, mut c) = attached_list(options);

    c.offset = 350.0;
    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();

    assert_eq!(c.inserts, vec![(0, 12)]);
    assert_eq!(c.layouts, 1);
    assert_eq!(c.offset, 1_550.0);
    assert_eq!(list.loader().window().start(), -36);
    assert_eq!(list.loader().window().end(), 24);
    assert_eq!(list.anchor(), 36);
    assert_eq!(list.slot_count(), 60);
    assert_eq!(list.slot_count(), c.slot_count());
    assert!(!list.loader().is_loading());

    // Slot 15 straddles the top edge; slot 16 is the first fully inside the detection area.
    assert_eq!(list.current_index(), -20);
    assert_eq!(seen(&log), vec![-20]);
}

#[test]
fn list_appends_near_the_end() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    c.offset = 4_800.0 - 800.0 - 50.0;
    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();

    assert_eq!(c.appends, vec![12]);
    assert!(c.inserts.is_empty());
    assert_eq!(c.offset, 3_950.0);
    assert_eq!(list.loader().window().start(), -24);
    assert_eq!(list.loader().window().end(), 36);
    assert_eq!(list.anchor(), 24);
    assert_eq!(list.slot_count(), c.slot_count());
}

#[test]
fn list_grows_one_chunk_per_signal() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    // Both edges are close: only the end grows.
    c.layout = Layout::Variable(vec![10.0; 48]);
    c.new_extent = 10.0;
    c.offset = 0.0;
    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();
    assert_eq!(c.appends, vec![12]);
    assert!(c.inserts.is_empty());

    list.handle_signal(ScrollSignal::DidScroll, 1, &mut c).unwrap();
    assert_eq!(c.appends, vec![12, 12]);
}

#[test]
fn list_ignores_scroll_before_layout() {
    let mut list = InfiniteList::new(EngineOptions::list(), CountingRenderer::default());
    let mut c = SimContainer::variable(Axis::Vertical, list_frame(), Vec::new());
    list.attach(&mut c);
    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();
    assert!(c.inserts.is_empty());
    assert!(c.appends.is_empty());
    assert_eq!(list.slot_count(), 48);
}

#[test]
fn list_detection_is_throttled() {
    let (log, on_change) = recorder();
    let options = EngineOptions::list().with_on_current_index_changed(Some(on_change));
    let (mut list, mut c) = attached_list(options);

    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();
    assert_eq!(list.current_index(), 0);

    c.offset = 2_600.0;
    list.handle_signal(ScrollSignal::DidScroll, 50, &mut c).unwrap();
    assert_eq!(list.current_index(), 0);
    assert_eq!(list.next_deadline(), Some(100));

    list.tick(99, &c);
    assert_eq!(list.current_index(), 0);
    list.tick(100, &c);
    assert_eq!(list.current_index(), 2);
    assert_eq!(list.next_deadline(), None);
    assert_eq!(seen(&log), vec![2]);
}

#[test]
fn list_jump_materializes_visible_slots_on_settle() {
    let (mut list, mut c) = attached_list(EngineOptions::list());

    list.request_scroll_to(10, true, 0, &mut c);
    assert_eq!(list.fast_scroll_state(), FastScrollState::Scrolling { target: 34 });
    assert_eq!(c.scrolls.last(), Some(&(34, Align::Start, true)));
    assert_eq!(c.offset, 3_400.0);

    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();
    assert_eq!(list.content_for_slot(34), None);
    assert!(list.renderer().calls.is_empty());
    assert_eq!(list.current_index(), 0);
    // Suppressed passes are dropped, not deferred.
    assert_eq!(list.next_deadline(), None);

    list.handle_signal(ScrollSignal::DidEndScrollAnimation, 10, &mut c).unwrap();
    assert_eq!(list.fast_scroll_state(), FastScrollState::Idle);
    let expected: Vec<LogicalIndex> = (10..18).collect();
    assert_eq!(list.renderer().calls, expected);
    assert_eq!(c.bound.len(), 8);
    assert_eq!(c.bound[0], (34, 10));
    assert_eq!(list.current_index(), 10);
}

#[test]
fn list_non_animated_jump_settles_immediately() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    list.request_scroll_to(-5, false, 0, &mut c);
    assert_eq!(list.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(list.current_index(), -5);
    assert_eq!(c.bound.first(), Some(&(19, -5)));
}

#[test]
fn list_request_for_current_index_is_noop() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    list.request_scroll_to(0, true, 0, &mut c);
    assert_eq!(list.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(c.scrolls.len(), 1);
    assert_eq!(list.content_for_slot(24), Some(0));
}

#[test]
fn list_retarget_back_to_current_index_wins() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    list.request_scroll_to(10, true, 0, &mut c);
    list.request_scroll_to(0, true, 0, &mut c);
    assert_eq!(list.fast_scroll_state(), FastScrollState::Scrolling { target: 24 });
    assert_eq!(c.scrolls.last(), Some(&(24, Align::Start, true)));

    list.handle_signal(ScrollSignal::DidEndScrollAnimation, 10, &mut c)
        .unwrap();
    assert_eq!(list.fast_scroll_state(), FastScrollState::Idle);
    assert_eq!(list.current_index(), 0);
    assert_eq!(c.bound.first(), Some(&(24, 0)));
}

#[test]
fn list_prepend_during_jump_shifts_gate_target() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    list.request_scroll_to(10, true, 0, &mut c);
    assert_eq!(list.fast_scroll_state(), FastScrollState::Scrolling { target: 34 });

    list.load(LoadDirection::Backward, &mut c).unwrap();
    assert_eq!(list.fast_scroll_state(), FastScrollState::Scrolling { target: 46 });
    assert_eq!(list.loader().slot_of(10), Some(46));
    assert_eq!(c.offset, 4_600.0);

    list.handle_signal(ScrollSignal::DidEndScrollAnimation, 10, &mut c)
        .unwrap();
    assert_eq!(c.bound.first(), Some(&(46, 10)));
    assert_eq!(list.current_index(), 10);
}

#[test]
fn list_request_outside_window_is_noop() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    list.request_scroll_to(1_000, true, 0, &mut c);
    list.request_scroll_to(-25, true, 0, &mut c);
    assert_eq!(c.scrolls.len(), 1);
    assert_eq!(list.fast_scroll_state(), FastScrollState::Idle);
}

#[test]
fn list_surfaces_load_failures() {
    let source = |chunk: Chunk| match chunk.direction {
        LoadDirection::Backward => Err(LoadError::permanent(chunk)),
        LoadDirection::Forward => Ok(()),
    };
    let mut list =
        InfiniteList::with_source(EngineOptions::list(), CountingRenderer::default(), source);
    let mut c = list_container();
    list.attach(&mut c);

    c.offset = 350.0;
    let err = list
        .handle_signal(ScrollSignal::DidScroll, 0, &mut c)
        .unwrap_err();
    assert_eq!(err, LoadError::Permanent { start: -36, end: -24 });
    assert!(!err.is_retryable());
    assert!(c.inserts.is_empty());
    assert_eq!(c.offset, 350.0);
    assert_eq!(list.slot_count(), 48);
    assert!(list.loader().is_exhausted(LoadDirection::Backward));
    assert!(!list.loader().is_loading());

    // The closed edge stays closed; the other one still grows.
    list.handle_signal(ScrollSignal::DidScroll, 1, &mut c).unwrap();
    assert!(c.inserts.is_empty());
    c.offset = 4_000.0;
    list.handle_signal(ScrollSignal::DidScroll, 2, &mut c).unwrap();
    assert_eq!(c.appends, vec![12]);

    list.reset_exhausted();
    assert!(!list.loader().is_exhausted(LoadDirection::Backward));
}

#[test]
fn list_retries_transient_failures() {
    let mut failures = 1;
    let source = move |chunk: Chunk| {
        if failures > 0 {
            failures -= 1;
            return Err(LoadError::transient(chunk));
        }
        Ok(())
    };
    let mut list =
        InfiniteList::with_source(EngineOptions::list(), CountingRenderer::default(), source);
    let mut c = list_container();
    list.attach(&mut c);

    c.offset = 350.0;
    let err = list
        .handle_signal(ScrollSignal::DidScroll, 0, &mut c)
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(c.inserts.is_empty());

    list.handle_signal(ScrollSignal::DidScroll, 1, &mut c).unwrap();
    assert_eq!(c.inserts, vec![(0, 12)]);
    assert_eq!(c.offset, 1_550.0);
}

#[test]
fn list_explicit_load_applies_chunk() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    list.load(LoadDirection::Backward, &mut c).unwrap();
    assert_eq!(c.inserts, vec![(0, 12)]);
    assert_eq!(c.offset, 3_600.0);
    assert_eq!(list.anchor(), 36);
}

#[test]
fn list_item_size_uses_measurement_then_fixed_then_frame() {
    let renderer = measured(CountingRenderer::default(), |i: LogicalIndex, cross: f64| {
        if i % 2 == 0 { cross / 2.0 } else { 50.0 }
    });
    let list = InfiniteList::new(EngineOptions::list(), renderer);
    let c = list_container();
    assert_eq!(list.item_size(24, &c), Vector::new(390.0, 195.0));
    assert_eq!(list.item_size(25, &c), Vector::new(390.0, 50.0));
    // Unknown slots fall back to the container main size.
    assert_eq!(list.item_size(1_000, &c), Vector::new(390.0, 800.0));

    let list = InfiniteList::new(
        EngineOptions::list().with_fixed_item_extent(Some(60.0)),
        CountingRenderer::default(),
    );
    assert_eq!(list.item_size(3, &c), Vector::new(390.0, 60.0));
}

#[test]
fn list_overlay_follows_policy() {
    let (list, c) = attached_list(EngineOptions::list());
    assert_eq!(list.overlay(&c), None);

    let options = EngineOptions::list().with_detection(
        endless::DetectionPolicy::default()
            .with_show_overlay(true)
            .with_origin_offset(20.0),
    );
    let (list, c) = attached_list(options);
    assert_eq!(list.overlay(&c), Some(Rect::new(0.0, 20.0, 390.0, 640.0)));
}

#[test]
fn list_after_teardown_ignores_signals() {
    let (mut list, mut c) = attached_list(EngineOptions::list());
    c.offset = 2_600.0;
    list.handle_signal(ScrollSignal::DidScroll, 0, &mut c).unwrap();
    c.offset = 350.0;
    list.teardown();
    list.handle_signal(ScrollSignal::DidScroll, 10, &mut c).unwrap();
    list.tick(500, &c);
    assert!(c.inserts.is_empty());
    assert_eq!(list.next_deadline(), None);
}

fn pool_options() -> EngineOptions {
    EngineOptions::pager()
        .with_pool_size(5)
        .with_settle_debounce_ms(200)
}

fn attached_pool(options: EngineOptions) -> (PoolPager<CountingRenderer>, SimContainer) {
    let mut pool = PoolPager::new(options, CountingRenderer::default());
    let mut c = SimContainer::uniform(Axis::Horizontal, pager_frame(), pool.slot_count(), PAGE);
    pool.attach(&mut c);
    (pool, c)
}

#[test]
fn pool_maps_slots_around_pivot() {
    let (pool, c) = attached_pool(pool_options());
    assert_eq!(pool.pivot(), 2);
    assert_eq!(c.offset, 200.0);
    assert_eq!(pool.index_for_slot(0), Some(-2));
    assert_eq!(pool.index_for_slot(4), Some(2));
    assert_eq!(pool.index_for_slot(5), None);

    let tiny = PoolPager::new(EngineOptions::pager().with_pool_size(1), CountingRenderer::default());
    assert_eq!(tiny.slot_count(), 3);
    assert_eq!(tiny.pivot(), 1);
}

#[test]
fn pool_folds_after_swipe_settles() {
    let (log, on_change) = recorder();
    let (mut pool, mut c) = attached_pool(pool_options().with_on_current_index_changed(Some(on_change)));

    c.offset = 300.0;
    pool.handle_signal(ScrollSignal::DidScroll, 0, &c);
    pool.handle_signal(ScrollSignal::DidEndDecelerating, 50, &c);
    assert_eq!(pool.selection(), 3);
    assert_eq!(pool.displayed_index(), 1);
    assert_eq!(pool.next_deadline(), Some(250));

    pool.tick(249, &mut c);
    assert_eq!(pool.base(), 0);

    pool.tick(250, &mut c);
    assert_eq!(pool.base(), 1);
    assert_eq!(pool.selection(), 2);
    assert_eq!(c.scrolls.last(), Some(&(2, Align::Center, false)));
    assert_eq!(c.offset, 200.0);
    assert_eq!(c.reloads, 1);
    assert_eq!(pool.current_index(), 1);
    assert_eq!(seen(&log), vec![1]);
    assert_eq!(pool.content_for_slot(2), Some(1));
    assert_eq!(pool.next_deadline(), None);
}

#[test]
fn pool_selection_uses_viewport_center_with_narrow_pages() {
    let options = pool_options().with_fixed_item_extent(Some(40.0));
    let mut pool = PoolPager::new(options, CountingRenderer::default());
    let mut c = SimContainer::uniform(Axis::Horizontal, pager_frame(), pool.slot_count(), 40.0);
    pool.attach(&mut c);
    assert_eq!(c.offset, 50.0);

    pool.handle_signal(ScrollSignal::DidScroll, 0, &c);
    assert_eq!(pool.selection(), 2);

    // Slot 3 centered in the 100 wide frame.
    c.offset = 90.0;
    pool.handle_signal(ScrollSignal::DidEndDecelerating, 10, &c);
    assert_eq!(pool.selection(), 3);
    pool.tick(210, &mut c);
    assert_eq!(pool.current_index(), 1);
    assert_eq!(c.offset, 50.0);
}

#[test]
fn pool_back_to_back_requests_land_on_last_target() {
    let (log, on_change) = recorder();
    let (mut pool, mut c) = attached_pool(pool_options().with_on_current_index_changed(Some(on_change)));

    pool.request_scroll_to(10, true, 0, &mut c);
    assert_eq!(pool.base(), 9);
    assert_eq!(pool.selection(), 3);
    assert_eq!(pool.displayed_index(), 10);
    assert_eq!(c.scrolls.last(), Some(&(3, Align::Center, true)));

    pool.request_scroll_to(4, true, 20, &mut c);
    assert_eq!(pool.base(), 5);
    assert_eq!(pool.selection(), 1);
    assert_eq!(c.reloads, 2);

    pool.handle_signal(ScrollSignal::DidEndScrollAnimation, 30, &c);
    assert_eq!(pool.selection(), 1);
    pool.tick(230, &mut c);
    assert_eq!(pool.base(), 4);
    assert_eq!(pool.current_index(), 4);
    assert_eq!(seen(&log), vec![4]);
}

#[test]
fn pool_request_for_displayed_index_is_noop() {
    let (mut pool, mut c) = attached_pool(pool_options());
    pool.request_scroll_to(0, true, 0, &mut c);
    assert_eq!(c.reloads, 0);
    assert_eq!(c.scrolls.len(), 1);
    assert_eq!(pool.next_deadline(), None);
}

#[test]
fn pool_non_animated_request_folds_immediately() {
    let (mut pool, mut c) = attached_pool(pool_options());
    pool.request_scroll_to(-7, false, 0, &mut c);
    assert_eq!(pool.base(), -7);
    assert_eq!(pool.selection(), 2);
    assert_eq!(pool.current_index(), -7);
    assert_eq!(c.offset, 200.0);
    assert_eq!(pool.next_deadline(), None);
}

#[test]
fn pool_after_teardown_does_not_fold() {
    let (mut pool, mut c) = attached_pool(pool_options());
    c.offset = 100.0;
    pool.handle_signal(ScrollSignal::DidScroll, 0, &c);
    pool.teardown();
    pool.tick(1_000, &mut c);
    assert_eq!(pool.base(), 0);
    assert_eq!(pool.next_deadline(), None);
}

#[test]
fn scroll_signal_settle_classification() {
    assert!(!ScrollSignal::DidScroll.is_settle());
    assert!(!ScrollSignal::DidEndDragging { will_decelerate: true }.is_settle());
    assert!(ScrollSignal::DidEndDragging { will_decelerate: false }.is_settle());
    assert!(ScrollSignal::DidEndDecelerating.is_settle());
    assert!(ScrollSignal::DidEndScrollAnimation.is_settle());
}

#[test]
fn options_presets() {
    let pager = EngineOptions::default();
    assert_eq!(pager.axis, Axis::Horizontal);
    assert!(pager.paging_enabled);
    assert_eq!(pager.pool_size, 50);
    assert_eq!(pager.settle_debounce_ms, 200);

    let list = EngineOptions::list();
    assert_eq!(list.axis, Axis::Vertical);
    assert!(!list.paging_enabled);
    assert_eq!(list.loader.chunk_size, 12);
    assert_eq!(list.detection.throttle_interval_ms, 100);
}
