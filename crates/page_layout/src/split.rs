//! Split results produced by vertical pagination

use crate::{Element, LayoutNode, Result, SizeSpec};
use serde::{Deserialize, Serialize};

/// A prepared fragment together with its net and full size
#[derive(Debug, Clone)]
pub struct ElementWithSize {
    pub element: Element,
    /// Net size, excluding the element's outline
    pub size: SizeSpec,
    /// Size including the element's outline
    pub full_size: SizeSpec,
}

impl ElementWithSize {
    /// Wrap an already prepared element, reading its sizes back
    pub fn new(element: impl Into<Element>) -> Result<Self> {
        let element = element.into();
        let size = element.prepared_size()?;
        let full_size = element.full_size()?;
        Ok(Self {
            element,
            size,
            full_size,
        })
    }
}

/// Why a split produced no fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotSplitReason {
    /// The prepared height already fits the available height
    AlreadyFits,
    /// The node, or a child that overflows, cannot be divided
    NotSplittable,
    /// A fragment would have contained nothing but header rows
    HeaderOnlyResult,
}

/// Outcome of `split_vert`
#[derive(Debug, Clone)]
pub enum SplitOutcome {
    NotSplit(NotSplitReason),
    Split {
        /// Fragment that fits the available height
        first: ElementWithSize,
        /// Continuation for the next page
        second: ElementWithSize,
    },
}

impl SplitOutcome {
    pub fn is_split(&self) -> bool {
        matches!(self, SplitOutcome::Split { .. })
    }

    pub fn not_split_reason(&self) -> Option<NotSplitReason> {
        match self {
            SplitOutcome::NotSplit(reason) => Some(*reason),
            SplitOutcome::Split { .. } => None,
        }
    }

    pub fn into_fragments(self) -> Option<(ElementWithSize, ElementWithSize)> {
        match self {
            SplitOutcome::Split { first, second } => Some((first, second)),
            SplitOutcome::NotSplit(_) => None,
        }
    }
}
