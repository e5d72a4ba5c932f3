use alloc::sync::Arc;

use endless::{Axis, DEFAULT_PAGER_CAPACITY, DetectionPolicy, LoaderOptions, LogicalIndex};

/// Fired when the engine's current logical index changes.
pub type OnCurrentIndexChanged = Arc<dyn Fn(LogicalIndex) + Send + Sync>;

/// Configuration shared by [`crate::Pager`], [`crate::InfiniteList`] and [`crate::PoolPager`].
///
/// Each engine reads the fields relevant to its mode and ignores the rest.
#[derive(Clone)]
pub struct EngineOptions {
    pub axis: Axis,
    /// Whether the container snaps to page boundaries.
    pub paging_enabled: bool,
    /// Main-axis extent used for every slot. `None` uses the container's own main size (pager) or
    /// the renderer's measurement (list).
    pub fixed_item_extent: Option<f64>,
    /// Current-item detection (list mode).
    pub detection: DetectionPolicy,
    /// Window growth (list mode).
    pub loader: LoaderOptions,
    /// Substrate size for [`crate::Pager`]. The anchor sits at `pager_capacity / 2`.
    pub pager_capacity: usize,
    /// Slot pool size for [`crate::PoolPager`].
    pub pool_size: usize,
    /// Idle time after the last offset change before [`crate::PoolPager`] recenters.
    pub settle_debounce_ms: u64,
    pub on_current_index_changed: Option<OnCurrentIndexChanged>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::pager()
    }
}

impl EngineOptions {
    /// Horizontal, paging enabled.
    pub fn pager() -> Self {
        Self {
            axis: Axis::Horizontal,
            paging_enabled: true,
            fixed_item_extent: None,
            detection: DetectionPolicy::default(),
            loader: LoaderOptions::default(),
            pager_capacity: DEFAULT_PAGER_CAPACITY,
            pool_size: 50,
            settle_debounce_ms: 200,
            on_current_index_changed: None,
        }
    }

    /// Vertical, paging disabled.
    pub fn list() -> Self {
        Self {
            axis: Axis::Vertical,
            paging_enabled: false,
            ..Self::pager()
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_paging_enabled(mut self, paging_enabled: bool) -> Self {
        self.paging_enabled = paging_enabled;
        self
    }

    pub fn with_fixed_item_extent(mut self, extent: Option<f64>) -> Self {
        self.fixed_item_extent = extent;
        self
    }

    pub fn with_detection(mut self, detection: DetectionPolicy) -> Self {
        self.detection = detection;
        self
    }

    pub fn with_loader(mut self, loader: LoaderOptions) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_pager_capacity(mut self, capacity: usize) -> Self {
        self.pager_capacity = capacity;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_settle_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.settle_debounce_ms = delay_ms;
        self
    }

    pub fn with_on_current_index_changed(
        mut self,
        f: Option<impl Fn(LogicalIndex) + Send + Sync + 'static>,
    ) -> Self {
        self.on_current_index_changed = f.map(|f| Arc::new(f) as _);
        self
    }

    /// Fixed extent if it is usable (finite and positive).
    pub(crate) fn fixed_extent(&self) -> Option<f64> {
        self.fixed_item_extent
            .filter(|e| e.is_finite() && *e > 0.0)
    }
}

impl core::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("axis", &self.axis)
            .field("paging_enabled", &self.paging_enabled)
            .field("fixed_item_extent", &self.fixed_item_extent)
            .field("detection", &self.detection)
            .field("loader", &self.loader)
            .field("pager_capacity", &self.pager_capacity)
            .field("pool_size", &self.pool_size)
            .field("settle_debounce_ms", &self.settle_debounce_ms)
            .finish_non_exhaustive()
    }
}
