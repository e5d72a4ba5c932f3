//! Orchestrators for the `endless` crate.
//!
//! The `endless` crate is UI-agnostic and only holds index arithmetic and state machines. This
//! crate composes those pieces against a host-provided scroll container for three usage modes:
//!
//! - [`Pager`]: a fixed-extent, fake-infinite pager over a very large substrate
//! - [`InfiniteList`]: a variable-extent list whose window grows at both ends
//! - [`PoolPager`]: a pager over a small slot pool that recenters after scrolling settles
//!
//! Hosts implement [`ScrollContainer`] and [`ItemRenderer`], own both the engine and the container,
//! and pass `&mut container` into every engine call. The engine never stores a reference to the
//! container, so there are no ownership cycles to break on teardown.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod container;
mod engine;
mod list;
mod options;
mod pager;
mod pool;
mod renderer;

#[cfg(test)]
mod tests;

pub use container::{ScrollContainer, ScrollSignal};
pub use list::InfiniteList;
pub use options::{EngineOptions, OnCurrentIndexChanged};
pub use pager::Pager;
pub use pool::PoolPager;
pub use renderer::{ItemRenderer, Measured, measured};
