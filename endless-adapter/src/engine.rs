use alloc::vec::Vec;

use endless::{Axis, FastScrollGate, LogicalIndex, PhysicalSlot, Rect, Vector, Viewport};

use crate::{ItemRenderer, OnCurrentIndexChanged, ScrollContainer};

/// State every engine mode shares: the renderer, the fast-scroll gate, and current-index
/// bookkeeping. Modes compose it rather than specialize it.
#[derive(Debug)]
pub(crate) struct EngineCore<R> {
    renderer: R,
    pub(crate) gate: FastScrollGate,
    current: LogicalIndex,
    attached: bool,
    visible: Vec<Viewport>,
}

impl<R: ItemRenderer> EngineCore<R> {
    pub(crate) fn new(renderer: R) -> Self {
        Self {
            renderer,
            gate: FastScrollGate::new(),
            current: 0,
            attached: false,
            visible: Vec::new(),
        }
    }

    pub(crate) fn renderer(&self) -> &R {
        &self.renderer
    }

    pub(crate) fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub(crate) fn current(&self) -> LogicalIndex {
        self.current
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    /// Content for a layout pass. `None` while a fast scroll is in flight; the renderer is not
    /// called at all in that case.
    pub(crate) fn content(&mut self, index: LogicalIndex) -> Option<R::Content> {
        if !self.gate.allows_materialization() {
            return None;
        }
        Some(self.renderer.render(index))
    }

    pub(crate) fn measured_extent(&self, index: LogicalIndex, cross: f64) -> Option<f64> {
        self.renderer
            .measured_extent(index, cross)
            .filter(|e| e.is_finite() && *e >= 0.0)
    }

    /// Snapshot of the container's visible slots, reusing an internal buffer.
    pub(crate) fn visible_slots<C: ScrollContainer>(&mut self, container: &C) -> &[Viewport] {
        self.visible.clear();
        let visible = &mut self.visible;
        container.for_each_visible_slot(&mut |vp| visible.push(vp));
        &self.visible
    }

    /// Renders and binds every currently visible slot. Returns the number of slots bound.
    pub(crate) fn materialize_visible<C>(
        &mut self,
        container: &mut C,
        to_logical: impl Fn(PhysicalSlot) -> Option<LogicalIndex>,
    ) -> usize
    where
        C: ScrollContainer<Content = R::Content>,
    {
        self.visible_slots(&*container);
        let mut bound = 0usize;
        for vp in &self.visible {
            let Some(index) = to_logical(vp.slot) else {
                continue;
            };
            container.bind(vp.slot, self.renderer.render(index));
            bound += 1;
        }
        vdebug!(bound, "materialized visible slots");
        bound
    }

    /// Records a new current index and notifies the consumer if it changed.
    pub(crate) fn set_current(
        &mut self,
        index: LogicalIndex,
        on_change: Option<&OnCurrentIndexChanged>,
    ) -> bool {
        if self.current == index {
            return false;
        }
        vdebug!(from = self.current, to = index, "current index changed");
        self.current = index;
        if let Some(cb) = on_change {
            cb(index);
        }
        true
    }
}

/// Page under the viewport center: `floor((offset + viewport / 2) / page_size)`.
///
/// Slots are scrolled to with [`endless::Align::Center`], so the viewport center is the only point
/// that lands inside the target page for any page size. Returns `None` for a non-positive page
/// size.
pub(crate) fn page_for_offset(offset: f64, viewport: f64, page_size: f64) -> Option<i64> {
    if page_size.is_nan() || page_size <= 0.0 || !offset.is_finite() || !viewport.is_finite() {
        return None;
    }
    Some(floor_i64((offset + viewport / 2.0) / page_size))
}

fn floor_i64(v: f64) -> i64 {
    let t = v as i64;
    if (t as f64) > v { t - 1 } else { t }
}

/// Main-axis size: the fixed extent if set, else the container's own main size.
pub(crate) fn slot_size(axis: Axis, frame: Rect, main: Option<f64>) -> Vector {
    let main = main.unwrap_or_else(|| axis.main_size(frame));
    axis.with_main(frame.size(), main)
}
