/// Consumer-facing item identity. Conceptually unbounded and may be negative.
pub type LogicalIndex = i64;

/// A position in the bounded render substrate, in `[0, capacity)`.
pub type PhysicalSlot = usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// Component of `v` along the scroll axis.
    pub fn main(self, v: Vector) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    pub fn cross(self, v: Vector) -> f64 {
        match self {
            Self::Horizontal => v.y,
            Self::Vertical => v.x,
        }
    }

    /// Returns `v` with its main-axis component replaced by `main`.
    pub fn with_main(self, v: Vector, main: f64) -> Vector {
        match self {
            Self::Horizontal => Vector { x: main, y: v.y },
            Self::Vertical => Vector { x: v.x, y: main },
        }
    }

    pub fn main_size(self, rect: Rect) -> f64 {
        self.main(rect.size())
    }

    pub fn cross_size(self, rect: Rect) -> f64 {
        self.cross(rect.size())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Vector {
        Vector {
            x: self.width,
            y: self.height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Area of the rect. Degenerate (negative-size) rects have zero area.
    pub fn area(&self) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width * self.height
    }

    /// Overlapping region of two rects, or `None` when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if max_x <= x || max_y <= y {
            return None;
        }
        Some(Rect {
            x,
            y,
            width: max_x - x,
            height: max_y - y,
        })
    }
}

/// A candidate visible slot and its geometry, as reported by the scroll container.
///
/// `rect` must be expressed in the same coordinate space as the container frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub slot: PhysicalSlot,
    pub rect: Rect,
}
