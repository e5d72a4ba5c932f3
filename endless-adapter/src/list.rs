use endless::{
    Align, Chunk, ChunkSource, ConsecutiveChunks, FastScrollState, IndexMapper, LoadDirection,
    LoadError, LogicalIndex, PhysicalSlot, Rect, SettleSignal, Vector, ViewportTracker,
    WindowLoader,
};

use crate::engine::{self, EngineCore};
use crate::{EngineOptions, ItemRenderer, ScrollContainer, ScrollSignal};

/// A variable-extent list whose window of logical indices grows at both ends as the user scrolls.
///
/// Slot `0` always shows `window().start()`. Prepending a chunk inserts slots at `0`, so the
/// engine corrects the container offset by the extent the new slots added and the visible content
/// does not move.
///
/// The current index is detected from slot geometry (see [`ViewportTracker`]) rather than from the
/// scroll offset, so it works with items of any size.
pub struct InfiniteList<R, S = ConsecutiveChunks> {
    options: EngineOptions,
    loader: WindowLoader<S>,
    tracker: ViewportTracker,
    core: EngineCore<R>,
}

impl<R: ItemRenderer> InfiniteList<R> {
    pub fn new(options: EngineOptions, renderer: R) -> Self {
        Self::with_source(options, renderer, ConsecutiveChunks)
    }
}

impl<R: ItemRenderer, S: ChunkSource> InfiniteList<R, S> {
    /// Creates a list whose chunks are admitted by `source`.
    pub fn with_source(options: EngineOptions, renderer: R, source: S) -> Self {
        let loader = WindowLoader::with_source(options.loader, source);
        let tracker = ViewportTracker::new(options.detection, options.axis);
        vdebug!(
            start = loader.window().start(),
            end = loader.window().end(),
            "InfiniteList::new"
        );
        Self {
            options,
            loader,
            tracker,
            core: EngineCore::new(renderer),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn slot_count(&self) -> usize {
        self.loader.window().len()
    }

    pub fn loader(&self) -> &WindowLoader<S> {
        &self.loader
    }

    pub fn mapper(&self) -> IndexMapper {
        self.loader.mapper()
    }

    pub fn anchor(&self) -> usize {
        self.loader.anchor()
    }

    pub fn tracker(&self) -> &ViewportTracker {
        &self.tracker
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

    pub fn source_mut(&mut self) -> &mut S {
        self.loader.source_mut()
    }

    /// Allows loading again at edges a permanent failure closed.
    pub fn reset_exhausted(&mut self) {
        self.loader.reset_exhausted();
    }

    /// Couples the list to a container and aligns the current index to the start of the viewport.
    pub fn attach<C>(&mut self, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        self.core.set_attached(true);
        container.set_paging_coupling(self.options.paging_enabled);
        let current = self.core.current();
        if let Some(slot) = self.loader.slot_of(current) {
            container.scroll_to(slot, Align::Start, false);
        }
        self.tracker.seed(current);
    }

    /// Stops reacting to signals and drops pending detection work.
    pub fn teardown(&mut self) {
        self.core.set_attached(false);
        self.core.gate.settle();
        self.tracker.cancel();
    }

    /// Size of `slot`: the renderer's measurement, else the fixed extent, else the container's
    /// main size.
    pub fn item_size<C: ScrollContainer>(&self, slot: PhysicalSlot, container: &C) -> Vector {
        let frame = container.frame();
        let cross = self.options.axis.cross_size(frame);
        let main = self
            .loader
            .index_at(slot)
            .and_then(|index| self.core.measured_extent(index, cross))
            .or_else(|| self.options.fixed_extent());
        engine::slot_size(self.options.axis, frame, main)
    }

    /// Content for a slot the container is laying out, or `None` during a fast scroll.
    pub fn content_for_slot(&mut self, slot: PhysicalSlot) -> Option<R::Content> {
        let index = self.loader.index_at(slot)?;
        self.core.content(index)
    }

    /// The detection area in the container's frame space, when the policy enables the overlay.
    pub fn overlay<C: ScrollContainer>(&self, container: &C) -> Option<Rect> {
        self.tracker.overlay(container.frame())
    }

    /// Feeds a container signal.
    ///
    /// Scroll signals may grow the window by one chunk; a failed chunk load is returned after the
    /// rest of the signal has been processed.
    pub fn handle_signal<C>(
        &mut self,
        signal: ScrollSignal,
        now_ms: u64,
        container: &mut C,
    ) -> Result<(), LoadError>
    where
        C: ScrollContainer<Content = R::Content>,
    {
        if !self.core.is_attached() {
            return Ok(());
        }
        match signal {
            ScrollSignal::DidScroll => {
                let grown = self.grow_if_needed(container);
                if self.tracker.track(now_ms, self.core.gate.is_scrolling()) {
                    self.detect(&*container);
                }
                grown
            }
            other => {
                if other.settle_signal().is_some_and(SettleSignal::is_settle) {
                    self.settle(now_ms, container);
                }
                Ok(())
            }
        }
    }

    /// Runs detection work whose throttle window has elapsed.
    pub fn tick<C: ScrollContainer>(&mut self, now_ms: u64, container: &C) {
        if !self.core.is_attached() {
            return;
        }
        if self.tracker.poll(now_ms, self.core.gate.is_scrolling()) {
            self.detect(container);
        }
    }

    /// When the host should call [`Self::tick`] next.
    pub fn next_deadline(&self) -> Option<u64> {
        self.tracker.next_deadline()
    }

    /// Scrolls `index` to the start of the viewport.
    ///
    /// Indices outside the loaded window, and the current index, are ignored.
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
        let Some(slot) = self.loader.slot_of(index) else {
            vtrace!(index, "InfiniteList: scroll target not loaded");
            return;
        };
        // A request that does not move the container never gets an animation-end signal.
        let already_there = match self.core.gate.target() {
            Some(target) => target == slot,
            None => index == self.core.current(),
        };
        if already_there {
            return;
        }
        self.core.gate.request_jump(slot);
        container.scroll_to(slot, Align::Start, animated);
        if !animated {
            self.settle(now_ms, container);
        }
    }

    /// Starts a chunk load in `direction` regardless of scroll position and applies it.
    pub fn load<C>(&mut self, direction: LoadDirection, container: &mut C) -> Result<(), LoadError>
    where
        C: ScrollContainer,
    {
        if let Some(chunk) = self.loader.load(direction)? {
            self.apply_chunk(chunk, container);
        }
        Ok(())
    }

    fn grow_if_needed<C: ScrollContainer>(&mut self, container: &mut C) -> Result<(), LoadError> {
        let axis = self.options.axis;
        let extent = axis.main(container.content_extent());
        if extent.is_nan() || extent <= 0.0 {
            return Ok(());
        }
        let offset = axis.main(container.offset());
        let viewport = axis.main_size(container.frame());
        let from_start = offset;
        let from_end = extent - viewport - offset;

        if let Some(chunk) = self.loader.notify_scroll_position(from_start, from_end)? {
            self.apply_chunk(chunk, container);
        }
        Ok(())
    }

    fn apply_chunk<C: ScrollContainer>(&mut self, chunk: Chunk, container: &mut C) {
        match chunk.direction {
            LoadDirection::Forward => container.append_slots(chunk.len()),
            LoadDirection::Backward => {
                let axis = self.options.axis;
                let old_offset = container.offset();
                let old_extent = axis.main(container.content_extent());
                container.insert_slots(0, chunk.len());
                container.layout_if_needed();
                let new_extent = axis.main(container.content_extent());
                let corrected = WindowLoader::<S>::corrected_offset(
                    axis.main(old_offset),
                    old_extent,
                    new_extent,
                );
                vdebug!(
                    from = axis.main(old_offset),
                    to = corrected,
                    "InfiniteList: offset corrected after prepend"
                );
                container.set_offset(axis.with_main(old_offset, corrected));
                if let Some(target) = self.core.gate.target() {
                    self.core.gate.request_jump(target + chunk.len());
                }
            }
        }
        self.loader.finish(chunk);
    }

    fn detect<C: ScrollContainer>(&mut self, container: &C) {
        let frame = container.frame();
        let mapper = self.loader.mapper();
        let visible = self.core.visible_slots(container);
        let found = self.tracker.resolve(
            frame,
            visible
                .iter()
                .copied()
                .filter(|vp| mapper.contains_slot(vp.slot)),
            |slot| mapper.logical_index(slot),
        );
        if let Some(index) = found {
            let on_change = self.options.on_current_index_changed.as_ref();
            self.core.set_current(index, on_change);
        }
    }

    fn settle<C>(&mut self, now_ms: u64, container: &mut C)
    where
        C: ScrollContainer<Content = R::Content>,
    {
        if self.core.gate.settle().is_some() {
            let mapper = self.loader.mapper();
            self.core.materialize_visible(container, |slot| {
                mapper.contains_slot(slot).then(|| mapper.logical_index(slot))
            });
        }
        if self.tracker.track(now_ms, false) {
            self.detect(&*container);
        }
    }
}

impl<R: core::fmt::Debug, S: core::fmt::Debug> core::fmt::Debug for InfiniteList<R, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InfiniteList")
            .field("options", &self.options)
            .field("loader", &self.loader)
            .field("tracker", &self.tracker)
            .field("core", &self.core)
            .finish()
    }
}
