//! Headless index virtualization for endless pagers and lists.
//!
//! For orchestrators that drive these pieces against a real scroll container, see the
//! `endless-adapter` crate.
//!
//! The crate relates a conceptually unbounded, signed item index ([`LogicalIndex`]) to a slot in
//! a bounded render substrate ([`PhysicalSlot`]) and provides the state machines needed to keep
//! that mapping usable while the user scrolls:
//! - [`IndexMapper`]: anchor arithmetic between logical indices and physical slots
//! - [`FastScrollGate`]: suppresses content materialization during programmatic jumps
//! - [`ViewportTracker`]: throttled detection of the "current" visible slot
//! - [`WindowLoader`]: a contiguous, bidirectionally growable window of logical indices
//!
//! It is UI-agnostic and never reads a clock. A host is expected to provide:
//! - container geometry (frame, offset, content extent, visible slot rects)
//! - a millisecond timestamp for every time-dependent call (`now_ms`)
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod gate;
mod mapper;
mod schedule;
mod tracker;
mod types;
mod window;


pub use gate::{FastScrollGate, FastScrollState, SettleSignal};
pub use mapper::{DEFAULT_PAGER_CAPACITY, IndexMapper};
pub use schedule::{Debounce, Throttle};
pub use tracker::{DetectionPolicy, ViewportTracker};
pub use types::{Align, Axis, LogicalIndex, PhysicalSlot, Rect, Vector, Viewport};
pub use window::{
    Chunk, ChunkSource, ConsecutiveChunks, LoadDirection, LoadError, LoaderOptions, Window,
    WindowLoader,
};
