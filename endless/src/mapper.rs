use crate::{LogicalIndex, PhysicalSlot};

/// Default substrate size for fake-infinite pagers.
///
/// The anchor sits at the middle, leaving `DEFAULT_PAGER_CAPACITY / 2` slots of headroom in each
/// direction.
pub const DEFAULT_PAGER_CAPACITY: usize = 100_000_000;

/// Relates unbounded logical indices to bounded physical slots via an anchor offset:
/// `slot = index + anchor`.
///
/// In pager mode the anchor is fixed at `capacity / 2` for the mapper's lifetime. In list mode the
/// anchor grows by the chunk size every time a chunk is prepended ([`Self::grow_front`]), so
/// already-materialized items keep their logical index while their slot shifts up.
///
/// Mapping an index outside `[-anchor, capacity - anchor)` exceeds the reserved headroom. That is
/// a documented limit rather than a handled error: [`Self::physical_slot`] debug-asserts, logs,
/// and saturates; use [`Self::checked_physical_slot`] to test first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexMapper {
    anchor: usize,
    capacity: usize,
}

impl IndexMapper {
    /// A pager mapper: `capacity` slots with the anchor at the middle.
    pub fn centered(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            anchor: capacity / 2,
            capacity,
        }
    }

    pub fn with_anchor(anchor: usize, capacity: usize) -> Self {
        debug_assert!(
            anchor <= capacity,
            "IndexMapper: anchor out of range (anchor={anchor}, capacity={capacity})"
        );
        Self { anchor, capacity }
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Smallest logical index that still maps into the substrate.
    pub fn min_index(&self) -> LogicalIndex {
        -(self.anchor as LogicalIndex)
    }

    /// One past the largest logical index that still maps into the substrate.
    pub fn end_index(&self) -> LogicalIndex {
        (self.capacity - self.anchor) as LogicalIndex
    }

    pub fn contains_index(&self, index: LogicalIndex) -> bool {
        self.checked_physical_slot(index).is_some()
    }

    pub fn contains_slot(&self, slot: PhysicalSlot) -> bool {
        slot < self.capacity
    }

    pub fn checked_physical_slot(&self, index: LogicalIndex) -> Option<PhysicalSlot> {
        let anchor = LogicalIndex::try_from(self.anchor).ok()?;
        let slot = index.checked_add(anchor)?;
        let slot = PhysicalSlot::try_from(slot).ok()?;
        (slot < self.capacity).then_some(slot)
    }

    pub fn physical_slot(&self, index: LogicalIndex) -> PhysicalSlot {
        if let Some(slot) = self.checked_physical_slot(index) {
            return slot;
        }
        vwarn!(
            index,
            anchor = self.anchor,
            capacity = self.capacity,
            "IndexMapper: logical index exceeds substrate headroom"
        );
        debug_assert!(
            self.contains_index(index),
            "IndexMapper: logical index exceeds substrate headroom (index={index}, anchor={}, capacity={})",
            self.anchor,
            self.capacity
        );
        if index < self.min_index() {
            0
        } else {
            self.capacity.saturating_sub(1)
        }
    }

    pub fn logical_index(&self, slot: PhysicalSlot) -> LogicalIndex {
        slot as LogicalIndex - self.anchor as LogicalIndex
    }

    /// Opens `count` new slots below slot 0.
    ///
    /// Every existing slot shifts up by `count`; logical indices are unchanged.
    pub fn grow_front(&mut self, count: usize) {
        self.anchor = self.anchor.saturating_add(count);
        self.capacity = self.capacity.saturating_add(count);
        vtrace!(count, anchor = self.anchor, "IndexMapper::grow_front");
    }

    /// Opens `count` new slots past the current end. Existing slots are untouched.
    pub fn grow_back(&mut self, count: usize) {
        self.capacity = self.capacity.saturating_add(count);
    }
}
