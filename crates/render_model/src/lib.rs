//! Render Model - Page layout to render items
//!
//! This crate records what laid out pages paint as serializable render
//! items that can be drawn by a frontend renderer.

mod display_list;
mod error;
mod render_item;

pub use display_list::*;
pub use error::*;
pub use render_item::*;
