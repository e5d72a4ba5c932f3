use endless::{Align, Debounce, LogicalIndex, PhysicalSlot, Vector};

use crate::engine::{self, EngineCore};
use crate::{EngineOptions, ItemRenderer, ScrollContainer, ScrollSignal};

/// A pager over a small pool of slots.
///
/// The pool is centered on `pivot = pool_size / 2`; slot `p` shows `base + (p - pivot)`. Once
/// scrolling has been idle for `settle_debounce_ms`, the pager folds the distance travelled into
/// `base` and jumps the container back to the pivot, so the pool never runs out in either
/// direction as long as users do not swipe past half of it between folds.
pub struct PoolPager<R> {
    options: EngineOptions,
    pool_size: usize,
    pivot: PhysicalSlot,
    selection: PhysicalSlot,
    base: LogicalIndex,
    settle: Debounce<()>,
    core: EngineCore<R>,
}

impl<R: ItemRenderer> PoolPager<R> {
    pub fn new(options: EngineOptions, renderer: R) -> Self {
        let pool_size = options.pool_size.max(3);
        let pivot = pool_size / 2;
        let settle = Debounce::new(options.settle_debounce_ms);
        Self {
            options,
            pool_size,
            pivot,
            selection: pivot,
            base: 0,
            settle,
            core: EngineCore::new(renderer),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn slot_count(&self) -> usize {
        self.pool_size
    }

    pub fn pivot(&self) -> PhysicalSlot {
        self.pivot
    }

    /// Slot the container is currently settled on (or heading to).
    pub fn selection(&self) -> PhysicalSlot {
        self.selection
    }

    /// Logical index shown at the pivot slot.
    pub fn base(&self) -> LogicalIndex {
        self.base
    }

    pub fn current_index(&self) -> LogicalIndex {
        self.core.current()
    }

    pub fn is_attached(&self) -> bool {
        self.core.is_attached()
    }

    pub fn renderer(&self) -> &R {
        self.core.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.core.renderer_mut()
    }

    pub fn index_for_slot(&self, slot: PhysicalSlot) -> Option<LogicalIndex> {
        if slot >= self.pool_size {
            return None;
        }
        Some(self.base + (slot as LogicalIndex - self.pivot as LogicalIndex))
    }

    /// Logical index under the current selection, before any pending fold.
    pub fn displayed_index(&self) -> LogicalIndex {
        self.base + (self.selection as LogicalIndex - self.pivot as LogicalIndex)
    }

    pub fn attach<C>(&mut self, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        self.core.set_attached(true);
        container.set_paging_coupling(self.options.paging_enabled);
        container.scroll_to(self.selection, Align::Center, false);
    }

    pub fn teardown(&mut self) {
        self.core.set_attached(false);
        self.settle.cancel();
    }

    pub fn item_size<C: ScrollContainer>(&self, container: &C) -> Vector {
        let frame = container.frame();
        engine::slot_size(self.options.axis, frame, self.options.fixed_extent())
    }

    pub fn content_for_slot(&mut self, slot: PhysicalSlot) -> Option<R::Content> {
        let index = self.index_for_slot(slot)?;
        self.core.content(index)
    }

    /// Tracks the selected slot and (re)arms the fold.
    pub fn handle_signal<C: ScrollContainer>(
        &mut self,
        signal: ScrollSignal,
        now_ms: u64,
        container: &C,
    ) {
        if !self.core.is_attached() {
            return;
        }
        // Deceleration follows; its end reports the final offset.
        if signal == (ScrollSignal::DidEndDragging { will_decelerate: true }) {
            return;
        }
        let offset = self.options.axis.main(container.offset());
        let viewport = self.options.axis.main_size(container.frame());
        if let Some(page) = engine::page_for_offset(offset, viewport, self.page_size(container)) {
            let last = (self.pool_size - 1) as i64;
            self.selection = page.clamp(0, last) as PhysicalSlot;
        }
        vtrace!(offset, selection = self.selection, "PoolPager: offset changed");
        self.settle.push(now_ms, ());
    }

    /// Moves to `index` by a single slot step, whatever the distance.
    ///
    /// `base` is rewritten so the slot one step away already shows `index`; the fold that follows
    /// settles on it. A second request before the fold retargets from the displayed index.
    pub fn request_scroll_to<C>(
        &mut self,
        index: LogicalIndex,
        animated: bool,
        now_ms: u64,
        container: &mut C,
    ) where
        C: ScrollContainer<Content = R::Content>,
    {
        if !self.core.is_attached() {
            return;
        }
        let displayed = self.displayed_index();
        if index == displayed {
            return;
        }
        let step: LogicalIndex = if index > displayed { 1 } else { -1 };
        self.base = index - step;
        self.selection = if step > 0 { self.pivot + 1 } else { self.pivot - 1 };
        vdebug!(index, base = self.base, selection = self.selection, "PoolPager::request_scroll_to");

        container.reload();
        container.scroll_to(self.selection, Align::Center, animated);

        if animated {
            self.settle.push(now_ms, ());
        } else {
            self.settle.cancel();
            self.fold(container);
        }
    }

    /// Folds the pool once scrolling has been idle long enough.
    pub fn tick<C>(&mut self, now_ms: u64, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        if !self.core.is_attached() {
            return;
        }
        if self.settle.poll(now_ms).is_some() {
            self.fold(container);
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.settle.next_deadline()
    }

    fn page_size<C: ScrollContainer>(&self, container: &C) -> f64 {
        self.options
            .fixed_extent()
            .unwrap_or_else(|| self.options.axis.main_size(container.frame()))
    }

    fn fold<C>(&mut self, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        let delta = self.selection as LogicalIndex - self.pivot as LogicalIndex;
        self.base += delta;
        self.selection = self.pivot;
        if delta != 0 {
            vdebug!(delta, base = self.base, "PoolPager: folded into base");
            container.scroll_to(self.pivot, Align::Center, false);
            container.reload();
        }
        let on_change = self.options.on_current_index_changed.as_ref();
        self.core.set_current(self.base, on_change);
    }
}

impl<R: core::fmt::Debug> core::fmt::Debug for PoolPager<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolPager")
            .field("options", &self.options)
            .field("pool_size", &self.pool_size)
            .field("pivot", &self.pivot)
            .field("selection", &self.selection)
            .field("base", &self.base)
            .field("settle", &self.settle)
            .field("core", &self.core)
            .finish()
    }
}
