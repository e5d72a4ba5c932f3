use core::ops::Range;

use crate::{IndexMapper, LogicalIndex, PhysicalSlot};

/// The contiguous range of logical indices materialized in list mode.
///
/// Stored as a half-open range, so it is contiguous, strictly increasing and duplicate-free by
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    start: LogicalIndex,
    end: LogicalIndex,
}

impl Window {
    pub fn new(start: LogicalIndex, end: LogicalIndex) -> Self {
        debug_assert!(start <= end, "Window: start > end ({start} > {end})");
        Self {
            start,
            end: end.max(start),
        }
    }

    /// `[-half, half)`.
    pub fn symmetric(half: usize) -> Self {
        let half = half as LogicalIndex;
        Self::new(-half, half)
    }

    pub fn start(&self) -> LogicalIndex {
        self.start
    }

    /// Exclusive.
    pub fn end(&self) -> LogicalIndex {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn first(&self) -> Option<LogicalIndex> {
        (!self.is_empty()).then_some(self.start)
    }

    pub fn last(&self) -> Option<LogicalIndex> {
        (!self.is_empty()).then_some(self.end - 1)
    }

    pub fn contains(&self, index: LogicalIndex) -> bool {
        self.start <= index && index < self.end
    }

    /// Position of `index` inside the window, which is also its physical slot in list mode.
    pub fn position(&self, index: LogicalIndex) -> Option<PhysicalSlot> {
        self.contains(index)
            .then(|| (index - self.start) as PhysicalSlot)
    }

    pub fn get(&self, position: usize) -> Option<LogicalIndex> {
        (position < self.len()).then(|| self.start + position as LogicalIndex)
    }

    pub fn range(&self) -> Range<LogicalIndex> {
        self.start..self.end
    }

    pub fn iter(&self) -> Range<LogicalIndex> {
        self.range()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadDirection {
    /// Append after the current maximum.
    Forward,
    /// Prepend before the current minimum.
    Backward,
}

/// A batch of consecutive logical indices added at one end of the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub direction: LoadDirection,
    pub start: LogicalIndex,
    /// Exclusive.
    pub end: LogicalIndex,
}

impl Chunk {
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<LogicalIndex> {
        self.start..self.end
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("transient failure loading chunk {start}..{end}")]
    Transient {
        start: LogicalIndex,
        end: LogicalIndex,
    },
    #[error("chunk {start}..{end} is permanently unavailable")]
    Permanent {
        start: LogicalIndex,
        end: LogicalIndex,
    },
}

impl LoadError {
    pub fn transient(chunk: Chunk) -> Self {
        Self::Transient {
            start: chunk.start,
            end: chunk.end,
        }
    }

    pub fn permanent(chunk: Chunk) -> Self {
        Self::Permanent {
            start: chunk.start,
            end: chunk.end,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

/// Backs a chunk before it joins the window.
///
/// Implementations that fetch remote data report failures here; the loader guarantees a failed
/// load leaves the window untouched.
pub trait ChunkSource {
    fn load(&mut self, chunk: Chunk) -> Result<(), LoadError>;
}

impl<F> ChunkSource for F
where
    F: FnMut(Chunk) -> Result<(), LoadError>,
{
    fn load(&mut self, chunk: Chunk) -> Result<(), LoadError> {
        self(chunk)
    }
}

/// Chunks are plain consecutive integers; loading never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsecutiveChunks;

impl ChunkSource for ConsecutiveChunks {
    fn load(&mut self, _chunk: Chunk) -> Result<(), LoadError> {
        Ok(())
    }
}

/// Growth policy for [`WindowLoader`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoaderOptions {
    /// The window is seeded as `[-initial_half, initial_half)`.
    pub initial_half: usize,
    /// Number of indices added per load.
    pub chunk_size: usize,
    /// Distance from the content start below which a backward chunk is loaded.
    pub top_buffer: f64,
    /// Distance from the content end below which a forward chunk is loaded.
    pub bottom_buffer: f64,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            initial_half: 24,
            chunk_size: 12,
            top_buffer: 400.0,
            bottom_buffer: 100.0,
        }
    }
}

impl LoaderOptions {
    pub fn with_initial_half(mut self, initial_half: usize) -> Self {
        self.initial_half = initial_half;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_buffers(mut self, top_buffer: f64, bottom_buffer: f64) -> Self {
        self.top_buffer = top_buffer;
        self.bottom_buffer = bottom_buffer;
        self
    }

    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let buffer = |v: f64, fallback: f64| if v.is_finite() { v.max(0.0) } else { fallback };
        Self {
            chunk_size: self.chunk_size.max(1),
            top_buffer: buffer(self.top_buffer, defaults.top_buffer),
            bottom_buffer: buffer(self.bottom_buffer, defaults.bottom_buffer),
            ..self
        }
    }
}

/// Maintains a finite, contiguous window of logical indices that grows in both directions as the
/// user nears either end.
///
/// Forward growth is a pure append. Backward growth shifts every existing slot up by the chunk
/// size: the anchor advances by exactly that amount, and the host must preserve the visual
/// position by advancing its scroll offset by the measured content-extent delta
/// (see [`WindowLoader::corrected_offset`]).
///
/// At most one load is in flight. A load starts in [`Self::notify_scroll_position`] (or
/// [`Self::load`]) and ends when the host calls [`Self::finish`] after it has updated the
/// container; signals arriving in between are ignored.
#[derive(Clone, Debug)]
pub struct WindowLoader<S = ConsecutiveChunks> {
    options: LoaderOptions,
    window: Window,
    mapper: IndexMapper,
    in_flight: Option<Chunk>,
    exhausted_forward: bool,
    exhausted_backward: bool,
    source: S,
}

impl WindowLoader<ConsecutiveChunks> {
    pub fn new(options: LoaderOptions) -> Self {
        Self::with_source(options, ConsecutiveChunks)
    }
}

impl<S: ChunkSource> WindowLoader<S> {
    pub fn with_source(options: LoaderOptions, source: S) -> Self {
        let options = options.normalized();
        let window = Window::symmetric(options.initial_half);
        vdebug!(
            initial_half = options.initial_half,
            chunk_size = options.chunk_size,
            "WindowLoader::new"
        );
        Self {
            mapper: IndexMapper::with_anchor(options.initial_half, window.len()),
            options,
            window,
            in_flight: None,
            exhausted_forward: false,
            exhausted_backward: false,
            source,
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn mapper(&self) -> IndexMapper {
        self.mapper
    }

    pub fn anchor(&self) -> usize {
        self.mapper.anchor()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<Chunk> {
        self.in_flight
    }

    /// Whether a permanent failure stopped growth in `direction`.
    pub fn is_exhausted(&self, direction: LoadDirection) -> bool {
        match direction {
            LoadDirection::Forward => self.exhausted_forward,
            LoadDirection::Backward => self.exhausted_backward,
        }
    }

    pub fn reset_exhausted(&mut self) {
        self.exhausted_forward = false;
        self.exhausted_backward = false;
    }

    pub fn slot_of(&self, index: LogicalIndex) -> Option<PhysicalSlot> {
        self.window.position(index)
    }

    pub fn index_at(&self, slot: PhysicalSlot) -> Option<LogicalIndex> {
        self.window.get(slot)
    }

    /// Reacts to a scroll position update.
    ///
    /// Distances are measured along the scroll axis from the viewport to the content start and
    /// end. The end is checked first; at most one chunk is started per call.
    ///
    /// Returns the chunk that joined the window; the caller must apply it to the container and
    /// then call [`Self::finish`].
    pub fn notify_scroll_position(
        &mut self,
        distance_from_start: f64,
        distance_from_end: f64,
    ) -> Result<Option<Chunk>, LoadError> {
        if self.in_flight.is_some() {
            vtrace!(
                in_flight = ?self.in_flight,
                "WindowLoader: load in flight, ignoring scroll position"
            );
            return Ok(None);
        }

        let direction = if distance_from_end < self.options.bottom_buffer && !self.exhausted_forward
        {
            LoadDirection::Forward
        } else if distance_from_start < self.options.top_buffer && !self.exhausted_backward {
            LoadDirection::Backward
        } else {
            return Ok(None);
        };

        self.load(direction)
    }

    /// Starts a load in `direction` regardless of scroll position.
    ///
    /// Returns `Ok(None)` when a load is already in flight.
    pub fn load(&mut self, direction: LoadDirection) -> Result<Option<Chunk>, LoadError> {
        if self.in_flight.is_some() {
            return Ok(None);
        }

        let chunk = self.next_chunk(direction);
        self.in_flight = Some(chunk);

        if let Err(err) = self.source.load(chunk) {
            self.in_flight = None;
            if !err.is_retryable() {
                match direction {
                    LoadDirection::Forward => self.exhausted_forward = true,
                    LoadDirection::Backward => self.exhausted_backward = true,
                }
            }
            vwarn!(
                start = chunk.start,
                end = chunk.end,
                retryable = err.is_retryable(),
                "WindowLoader: chunk load failed"
            );
            return Err(err);
        }

        let count = chunk.len();
        match direction {
            LoadDirection::Forward => {
                self.window = Window::new(self.window.start, chunk.end);
                self.mapper.grow_back(count);
            }
            LoadDirection::Backward => {
                self.window = Window::new(chunk.start, self.window.end);
                self.mapper.grow_front(count);
            }
        }
        vdebug!(
            start = chunk.start,
            end = chunk.end,
            anchor = self.mapper.anchor(),
            "WindowLoader: chunk joined window"
        );
        Ok(Some(chunk))
    }

    /// Ends the in-flight load once the container reflects it.
    pub fn finish(&mut self, chunk: Chunk) {
        debug_assert_eq!(
            self.in_flight,
            Some(chunk),
            "WindowLoader::finish called for a chunk that is not in flight"
        );
        if self.in_flight == Some(chunk) {
            self.in_flight = None;
        }
    }

    /// Scroll offset that keeps content visually still after a prepend:
    /// `old_offset + (new_extent - old_extent)`.
    pub fn corrected_offset(old_offset: f64, old_extent: f64, new_extent: f64) -> f64 {
        old_offset + (new_extent - old_extent)
    }

    fn next_chunk(&self, direction: LoadDirection) -> Chunk {
        let n = self.options.chunk_size as LogicalIndex;
        match direction {
            LoadDirection::Forward => Chunk {
                direction,
                start: self.window.end,
                end: self.window.end.saturating_add(n),
            },
            LoadDirection::Backward => Chunk {
                direction,
                start: self.window.start.saturating_sub(n),
                end: self.window.start,
            },
        }
    }
}
