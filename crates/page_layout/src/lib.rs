//! Page Layout - Box model sizing and vertical pagination
//!
//! This crate lays out a tree of styled boxes, rows of columns, stacks of
//! rows and tables under a width/height budget, and splits trees that
//! overflow a page into a fitting fragment and a continuation.

mod box_element;
mod context;
mod error;
mod geometry;
mod grid;
mod hbox;
mod leaf;
mod node;
mod outline;
mod paginator;
mod render;
mod sizing;
mod split;
mod table;
mod text;
mod vbox;

pub use box_element::*;
pub use context::*;
pub use error::*;
pub use geometry::*;
pub use grid::{BorderGridStrategy, GridRange};
pub use hbox::*;
pub use leaf::*;
pub use node::*;
pub use outline::*;
pub use paginator::*;
pub use render::PageRenderer;
pub use sizing::{HeightSpec, SpecKind, WidthSpec};
pub use split::*;
pub use table::*;
pub use text::*;
pub use vbox::*;
