//! Geometry primitives

use serde::{Deserialize, Serialize};

/// A width/height pair in layout units (points).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub width: f32,
    pub height: f32,
}

impl SizeSpec {
    pub const ZERO: SizeSpec = SizeSpec {
        width: 0.0,
        height: 0.0,
    };

    /// Unbounded size, used as the default maximum size of a node
    pub const UNBOUNDED: SizeSpec = SizeSpec {
        width: f32::MAX,
        height: f32::MAX,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Add an outline (or any delta) onto this size
    pub fn plus(self, dx: f32, dy: f32) -> Self {
        Self {
            width: self.width + dx,
            height: self.height + dy,
        }
    }

    pub fn minus(self, dx: f32, dy: f32) -> Self {
        self.plus(-dx, -dy)
    }

    /// Component-wise maximum
    pub fn max(self, other: SizeSpec) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Clamp both components into `[min, max]`; `min` wins on conflict.
    pub fn clamp(self, min: SizeSpec, max: SizeSpec) -> Self {
        Self {
            width: self.width.min(max.width).max(min.width),
            height: self.height.min(max.height).max(min.height),
        }
    }

    /// Clamp negative components to zero
    pub fn non_negative(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: self.height.max(0.0),
        }
    }
}

/// A rectangle in page coordinates (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(x: f32, y: f32, size: SizeSpec) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> SizeSpec {
        SizeSpec::new(self.width, self.height)
    }

    /// Shrink the rectangle by the given edges, never below zero size
    pub fn inset(&self, edges: &Edges) -> Rect {
        Rect {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: (self.width - edges.x_sum()).max(0.0),
            height: (self.height - edges.y_sum()).max(0.0),
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Four edge values, used for margin and padding
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Edges = Edges {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Vertical and horizontal values, CSS shorthand order
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn x_sum(&self) -> f32 {
        self.left + self.right
    }

    pub fn y_sum(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn is_non_negative(&self) -> bool {
        self.top >= 0.0 && self.right >= 0.0 && self.bottom >= 0.0 && self.left >= 0.0
    }
}
