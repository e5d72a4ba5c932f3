// Example: a programmatic jump on a fake-infinite pager.
//
// The host owns both the pager and its scroll container. Layout passes pull content through
// `content_for_slot`; during the jump it returns `None`, and the visible slots are bound once the
// container reports that the animation ended.
use endless::{Align, Axis, LogicalIndex, PhysicalSlot, Rect, Vector, Viewport};
use endless_adapter::{EngineOptions, Pager, ScrollContainer, ScrollSignal};

struct Strip {
    page: f64,
    offset: f64,
    bound: Vec<(PhysicalSlot, String)>,
}

impl ScrollContainer for Strip {
    type Content = String;

    fn frame(&self) -> Rect {
        Rect::new(0.0, 0.0, self.page, 300.0)
    }

    fn offset(&self) -> Vector {
        Vector::new(self.offset, 0.0)
    }

    fn set_offset(&mut self, offset: Vector) {
        self.offset = offset.x;
    }

    fn content_extent(&self) -> Vector {
        Vector::new(100_000_000.0 * self.page, 300.0)
    }

    fn for_each_visible_slot(&self, f: &mut dyn FnMut(Viewport)) {
        let slot = (self.offset / self.page) as PhysicalSlot;
        f(Viewport {
            slot,
            rect: Rect::new(slot as f64 * self.page - self.offset, 0.0, self.page, 300.0),
        });
    }

    fn scroll_to(&mut self, slot: PhysicalSlot, _align: Align, animated: bool) {
        println!("scroll_to slot={slot} animated={animated}");
        self.offset = slot as f64 * self.page;
    }

    fn insert_slots(&mut self, _at: PhysicalSlot, _count: usize) {}

    fn append_slots(&mut self, _count: usize) {}

    fn reload(&mut self) {
        self.bound.clear();
    }

    fn layout_if_needed(&mut self) {}

    fn set_paging_coupling(&mut self, enabled: bool) {
        println!("paging coupling={enabled}");
    }

    fn bind(&mut self, slot: PhysicalSlot, content: String) {
        self.bound.push((slot, content));
    }
}

fn main() {
    let options = EngineOptions::pager()
        .with_axis(Axis::Horizontal)
        .with_on_current_index_changed(Some(|i| println!("current index -> {i}")));
    let mut pager = Pager::new(options, |i: LogicalIndex| format!("page {i}"));
    let mut strip = Strip {
        page: 320.0,
        offset: 0.0,
        bound: Vec::new(),
    };
    pager.attach(&mut strip);

    pager.request_scroll_to(5, true, &mut strip);
    println!("state={:?}", pager.fast_scroll_state());
    println!("mid-flight content={:?}", pager.content_for_slot(50_000_003));

    pager.handle_signal(ScrollSignal::DidEndScrollAnimation, &mut strip);
    println!("state={:?} bound={:?}", pager.fast_scroll_state(), strip.bound);
}
