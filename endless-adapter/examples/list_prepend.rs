// Example: an infinite list that grows upward without moving the visible content.
use endless::{Align, Axis, LogicalIndex, PhysicalSlot, Rect, Vector, Viewport};
use endless_adapter::{EngineOptions, InfiniteList, ScrollContainer, ScrollSignal, measured};

struct Column {
    extents: Vec<f64>,
    offset: f64,
}

impl Column {
    fn start(&self, slot: PhysicalSlot) -> f64 {
        self.extents.iter().take(slot).sum()
    }
}

impl ScrollContainer for Column {
    type Content = String;

    fn frame(&self) -> Rect {
        Rect::new(0.0, 0.0, 390.0, 800.0)
    }

    fn offset(&self) -> Vector {
        Vector::new(0.0, self.offset)
    }

    fn set_offset(&mut self, offset: Vector) {
        self.offset = offset.y;
    }

    fn content_extent(&self) -> Vector {
        Vector::new(390.0, self.extents.iter().sum())
    }

    fn for_each_visible_slot(&self, f: &mut dyn FnMut(Viewport)) {
        let mut y = 0.0;
        for (slot, extent) in self.extents.iter().enumerate() {
            if y + extent > self.offset && y < self.offset + 800.0 {
                f(Viewport {
                    slot,
                    rect: Rect::new(0.0, y - self.offset, 390.0, *extent),
                });
            }
            y += extent;
        }
    }

    fn scroll_to(&mut self, slot: PhysicalSlot, _align: Align, _animated: bool) {
        self.offset = self.start(slot);
    }

    fn insert_slots(&mut self, at: PhysicalSlot, count: usize) {
        for _ in 0..count {
            self.extents.insert(at, 80.0);
        }
    }

    fn append_slots(&mut self, count: usize) {
        self.extents.extend(std::iter::repeat_n(80.0, count));
    }

    fn reload(&mut self) {}

    fn layout_if_needed(&mut self) {}

    fn set_paging_coupling(&mut self, _enabled: bool) {}

    fn bind(&mut self, _slot: PhysicalSlot, _content: String) {}
}

fn main() {
    let options = EngineOptions::list()
        .with_axis(Axis::Vertical)
        .with_on_current_index_changed(Some(|i| println!("current index -> {i}")));
    let renderer = measured(|i: LogicalIndex| format!("row {i}"), |_, _| 80.0);
    let mut list = InfiniteList::new(options, renderer);

    let mut column = Column {
        extents: vec![80.0; list.slot_count()],
        offset: 0.0,
    };
    list.attach(&mut column);
    println!("attached at offset={}", column.offset);

    println!("row 0 is {:?}", list.item_size(list.anchor(), &column));

    // The user flings toward the top.
    column.offset = 300.0;
    list.handle_signal(ScrollSignal::DidScroll, 0, &mut column)
        .expect("consecutive chunks never fail");
    println!(
        "window={:?} anchor={} offset={}",
        list.loader().window(),
        list.anchor(),
        column.offset,
    );
    println!("current index={}", list.current_index());
}
