//! Error types for render model

use page_layout::LayoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Render model serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unbalanced clip stack on page {page_index}: {open} clip(s) left open")]
    UnbalancedClip { page_index: usize, open: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;
