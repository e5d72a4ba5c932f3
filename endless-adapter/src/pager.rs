use endless::{
    Align, FastScrollState, IndexMapper, LogicalIndex, PhysicalSlot, SettleSignal, Vector,
};

use crate::engine::{self, EngineCore};
use crate::{EngineOptions, ItemRenderer, ScrollContainer, ScrollSignal};

/// A fixed-extent pager over a very large slot substrate.
///
/// Logical index 0 sits at the middle slot, so users can page a long way in either direction
/// before running into an edge. Programmatic jumps pass through a fast-scroll gate: content is not
/// rendered for the slots the container flies past, and the visible slots are bound once the
/// container settles.
///
/// The container is expected to report `slot_count()` slots of `item_size()` each.
pub struct Pager<R> {
    options: EngineOptions,
    mapper: IndexMapper,
    core: EngineCore<R>,
}

impl<R: ItemRenderer> Pager<R> {
    pub fn new(options: EngineOptions, renderer: R) -> Self {
        let mapper = IndexMapper::centered(options.pager_capacity);
        vdebug!(
            capacity = mapper.capacity(),
            anchor = mapper.anchor(),
            "Pager::new"
        );
        Self {
            options,
            mapper,
            core: EngineCore::new(renderer),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn slot_count(&self) -> usize {
        self.mapper.capacity()
    }

    pub fn mapper(&self) -> IndexMapper {
        self.mapper
    }

    pub fn anchor(&self) -> usize {
        self.mapper.anchor()
    }

    pub fn current_index(&self) -> LogicalIndex {
        self.core.current()
    }

    pub fn fast_scroll_state(&self) -> FastScrollState {
        self.core.gate.state()
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

    /// Couples the pager to a container and positions it on the current index.
    pub fn attach<C>(&mut self, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        self.core.set_attached(true);
        container.set_paging_coupling(self.options.paging_enabled);
        let slot = self.mapper.physical_slot(self.core.current());
        container.scroll_to(slot, Align::Center, false);
    }

    /// Stops reacting to signals and requests.
    pub fn teardown(&mut self) {
        self.core.set_attached(false);
        self.core.gate.settle();
    }

    /// Size of every slot.
    pub fn item_size<C: ScrollContainer>(&self, container: &C) -> Vector {
        let frame = container.frame();
        engine::slot_size(self.options.axis, frame, self.options.fixed_extent())
    }

    /// Content for a slot the container is laying out, or `None` during a fast scroll.
    pub fn content_for_slot(&mut self, slot: PhysicalSlot) -> Option<R::Content> {
        if !self.mapper.contains_slot(slot) {
            return None;
        }
        self.core.content(self.mapper.logical_index(slot))
    }

    /// Pages to `index`.
    ///
    /// Requests for the current index (or the target of the jump in flight), and requests outside
    /// the substrate, are ignored. Any other request during a jump retargets it.
    pub fn request_scroll_to<C>(&mut self, index: LogicalIndex, animated: bool, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        if !self.core.is_attached() {
            return;
        }
        let Some(slot) = self.mapper.checked_physical_slot(index) else {
            vwarn!(index, capacity = self.mapper.capacity(), "Pager: index outside substrate");
            return;
        };
        // While a jump is in flight, `current` is stale; compare against where the jump is going.
        let already_there = match self.core.gate.target() {
            Some(target) => target == slot,
            None => index == self.core.current(),
        };
        if already_there {
            return;
        }

        self.core.gate.request_jump(slot);
        container.set_paging_coupling(false);
        container.scroll_to(slot, Align::Center, animated);
        container.set_paging_coupling(self.options.paging_enabled);

        if !animated {
            self.settle(container);
        }
    }

    /// Feeds a container signal. Only settle signals have an effect.
    pub fn handle_signal<C>(&mut self, signal: ScrollSignal, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        if !self.core.is_attached() {
            return;
        }
        if signal
            .settle_signal()
            .is_some_and(SettleSignal::is_settle)
        {
            self.settle(container);
        }
    }

    /// Logical index of the page under the viewport center at `offset`.
    pub fn index_for_offset(
        &self,
        offset: f64,
        viewport: f64,
        page_size: f64,
    ) -> Option<LogicalIndex> {
        let page = engine::page_for_offset(offset, viewport, page_size)?;
        let slot = PhysicalSlot::try_from(page).ok()?;
        self.mapper
            .contains_slot(slot)
            .then(|| self.mapper.logical_index(slot))
    }

    fn page_size<C: ScrollContainer>(&self, container: &C) -> f64 {
        self.options
            .fixed_extent()
            .unwrap_or_else(|| self.options.axis.main_size(container.frame()))
    }

    fn settle<C>(&mut self, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        let offset = self.options.axis.main(container.offset());
        let viewport = self.options.axis.main_size(container.frame());
        let page_size = self.page_size(container);
        match self.index_for_offset(offset, viewport, page_size) {
            Some(index) => {
                let on_change = self.options.on_current_index_changed.as_ref();
                self.core.set_current(index, on_change);
            }
            None => {
                vwarn!(offset, page_size, "Pager: settled offset does not map to a page");
            }
        }

        if self.core.gate.settle().is_some() {
            let mapper = self.mapper;
            self.core.materialize_visible(container, |slot| {
                mapper.contains_slot(slot).then(|| mapper.logical_index(slot))
            });
        }
    }
}

impl<R: core::fmt::Debug> core::fmt::Debug for Pager<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pager")
            .field("options", &self.options)
            .field("mapper", &self.mapper)
            .field("core", &self.core)
            .finish()
    }
}
