//! Error types for page layout

use crate::NodeId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid state for node {node_id}: {message}")]
    InvalidState { node_id: NodeId, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Layout tree exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { max_depth: usize },

    #[error("Pagination exceeded {max_pages} pages")]
    TooManyPages { max_pages: usize },

    #[error("Invalid layout config: {0}")]
    Config(#[from] serde_json::Error),
}

impl LayoutError {
    pub(crate) fn invalid_state(node_id: NodeId, message: impl Into<String>) -> Self {
        Self::InvalidState {
            node_id,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Non-fatal layout diagnostics.
///
/// Producers routinely lay out "close enough" under floating point rounding,
/// so overflows are reported instead of failing the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutWarning {
    /// Children use more width than the container offers
    WidthOverflow {
        node_id: NodeId,
        used: f32,
        available: f32,
    },
    /// Children use more height than a non-splittable container offers
    HeightOverflow {
        node_id: NodeId,
        used: f32,
        available: f32,
    },
    /// Content could not be split and was placed on a page it overflows
    UnsplittableOverflow {
        node_id: NodeId,
        page_index: usize,
        height: f32,
        available: f32,
    },
}

impl LayoutWarning {
    /// The node the warning was raised for
    pub fn node_id(&self) -> NodeId {
        match self {
            LayoutWarning::WidthOverflow { node_id, .. }
            | LayoutWarning::HeightOverflow { node_id, .. }
            | LayoutWarning::UnsplittableOverflow { node_id, .. } => *node_id,
        }
    }
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::WidthOverflow {
                node_id,
                used,
                available,
            } => write!(f, "node {node_id} uses width {used} of {available}"),
            LayoutWarning::HeightOverflow {
                node_id,
                used,
                available,
            } => write!(f, "node {node_id} uses height {used} of {available}"),
            LayoutWarning::UnsplittableOverflow {
                node_id,
                page_index,
                height,
                available,
            } => write!(
                f,
                "node {node_id} on page {page_index} is {height} tall but only {available} is available"
            ),
        }
    }
}
