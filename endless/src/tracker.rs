use crate::schedule::Throttle;
use crate::{Axis, LogicalIndex, PhysicalSlot, Rect, Viewport};

/// Geometric criterion and cadence for "current item" detection.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionPolicy {
    /// Fraction of the container's main-axis size covered by the detection area (0.0 to 1.0).
    pub detect_area_ratio: f64,
    /// Main-axis offset of the detection area's origin from the container origin.
    pub origin_offset: f64,
    /// Fraction of a slot's area that must lie inside the detection area (0.0 to 1.0).
    pub fulfill_threshold: f64,
    /// Minimum spacing between detection passes.
    pub throttle_interval_ms: u64,
    /// Whether the host should draw the detection area for debugging.
    pub show_overlay: bool,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            detect_area_ratio: 0.8,
            origin_offset: 0.0,
            fulfill_threshold: 0.8,
            throttle_interval_ms: 100,
            show_overlay: false,
        }
    }
}

impl DetectionPolicy {
    pub fn with_detect_area_ratio(mut self, ratio: f64) -> Self {
        self.detect_area_ratio = ratio;
        self
    }

    pub fn with_origin_offset(mut self, offset: f64) -> Self {
        self.origin_offset = offset;
        self
    }

    pub fn with_fulfill_threshold(mut self, threshold: f64) -> Self {
        self.fulfill_threshold = threshold;
        self
    }

    pub fn with_throttle_interval_ms(mut self, interval_ms: u64) -> Self {
        self.throttle_interval_ms = interval_ms;
        self
    }

    pub fn with_show_overlay(mut self, show_overlay: bool) -> Self {
        self.show_overlay = show_overlay;
        self
    }

    /// Clamps ratios into `[0, 1]`. NaN becomes the default value.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        Self {
            detect_area_ratio: unit_or(self.detect_area_ratio, defaults.detect_area_ratio),
            fulfill_threshold: unit_or(self.fulfill_threshold, defaults.fulfill_threshold),
            origin_offset: if self.origin_offset.is_finite() {
                self.origin_offset
            } else {
                defaults.origin_offset
            },
            ..self
        }
    }
}

fn unit_or(v: f64, fallback: f64) -> f64 {
    if v.is_nan() { fallback } else { v.clamp(0.0, 1.0) }
}

/// Throttled detection of which visible slot is "current".
///
/// A pass scans the visible slots in container order and picks the first one whose overlap with
/// the detection area covers at least `fulfill_threshold` of its own area. The resulting logical
/// index is emitted only when it differs from the previous emission.
///
/// Signals are coalesced by a trailing-edge [`Throttle`]: the host calls [`Self::track`] on every
/// scroll change and [`Self::poll`] from its timer tick, and runs a pass (reading the container's
/// geometry at that moment) whenever either returns `true`. While a fast scroll is in progress
/// both return `false` and the pass is dropped rather than queued.
#[derive(Clone, Copy, Debug)]
pub struct ViewportTracker {
    policy: DetectionPolicy,
    axis: Axis,
    throttle: Throttle<()>,
    last_emitted: Option<LogicalIndex>,
}

impl ViewportTracker {
    pub fn new(policy: DetectionPolicy, axis: Axis) -> Self {
        let policy = policy.normalized();
        Self {
            throttle: Throttle::new(policy.throttle_interval_ms),
            policy,
            axis,
            last_emitted: None,
        }
    }

    pub fn policy(&self) -> &DetectionPolicy {
        &self.policy
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn last_emitted(&self) -> Option<LogicalIndex> {
        self.last_emitted
    }

    /// Sets the value the next emission is compared against.
    pub fn seed(&mut self, index: LogicalIndex) {
        self.last_emitted = Some(index);
    }

    /// Records a scroll-changed signal. Returns `true` when a pass should run now.
    pub fn track(&mut self, now_ms: u64, suppressed: bool) -> bool {
        if suppressed {
            return false;
        }
        self.throttle.push(now_ms, ()).is_some()
    }

    /// Fires a trailing pass whose throttle window has elapsed.
    pub fn poll(&mut self, now_ms: u64, suppressed: bool) -> bool {
        let due = self.throttle.poll(now_ms).is_some();
        if due && suppressed {
            vtrace!(now_ms, "ViewportTracker: trailing pass skipped during fast scroll");
            return false;
        }
        due
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.throttle.next_deadline()
    }

    pub fn cancel(&mut self) {
        self.throttle.cancel();
    }

    pub fn detection_area(&self, frame: Rect) -> Rect {
        let ratio = self.policy.detect_area_ratio;
        let offset = self.policy.origin_offset;
        match self.axis {
            Axis::Vertical => Rect {
                x: frame.x,
                y: frame.y + offset,
                width: frame.width,
                height: frame.height * ratio,
            },
            Axis::Horizontal => Rect {
                x: frame.x + offset,
                y: frame.y,
                width: frame.width * ratio,
                height: frame.height,
            },
        }
    }

    /// The detection area to draw, when the policy asks for a debug overlay.
    pub fn overlay(&self, frame: Rect) -> Option<Rect> {
        self.policy
            .show_overlay
            .then(|| self.detection_area(frame))
    }

    pub fn is_fulfilled(&self, slot_rect: &Rect, area: &Rect) -> bool {
        let slot_area = slot_rect.area();
        if slot_area <= 0.0 {
            return false;
        }
        let overlap = slot_rect.intersection(area).map_or(0.0, |r| r.area());
        overlap >= slot_area * self.policy.fulfill_threshold
    }

    /// First fulfilled viewport in scan order, if any.
    pub fn first_fulfilled(
        &self,
        frame: Rect,
        viewports: impl IntoIterator<Item = Viewport>,
    ) -> Option<Viewport> {
        let area = self.detection_area(frame);
        viewports
            .into_iter()
            .find(|vp| self.is_fulfilled(&vp.rect, &area))
    }

    /// Runs one detection pass and returns the newly current index, if it changed.
    pub fn resolve(
        &mut self,
        frame: Rect,
        viewports: impl IntoIterator<Item = Viewport>,
        to_logical: impl Fn(PhysicalSlot) -> LogicalIndex,
    ) -> Option<LogicalIndex> {
        let viewport = self.first_fulfilled(frame, viewports)?;
        let index = to_logical(viewport.slot);
        if self.last_emitted == Some(index) {
            return None;
        }
        vdebug!(index, slot = viewport.slot, "ViewportTracker: current index changed");
        self.last_emitted = Some(index);
        Some(index)
    }
}
