//! Declarative border grids for tables

use crate::{BorderEdges, BorderStyle, LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How borders are drawn over a rectangular range of table cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderGridStrategy {
    /// Remove all cell borders
    #[default]
    None,
    /// Every edge of every cell
    Full,
    /// Inner lines only
    FullNoOuter,
    /// A frame around the range
    OuterOnly,
    /// Horizontal lines including the top and bottom of the range
    HorizontalAll,
    /// Horizontal lines between rows only
    HorizontalNoOuter,
    /// Vertical lines including the left and right of the range
    VerticalAll,
    /// Vertical lines between columns only
    VerticalNoOuter,
}

/// Where a cell sits relative to the edges of the grid range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellPosition {
    pub first_row: bool,
    pub last_row: bool,
    pub first_column: bool,
    pub last_column: bool,
}

impl BorderGridStrategy {
    /// Border edges for one cell under this strategy
    pub(crate) fn edges_for(self, position: CellPosition, border: BorderStyle) -> BorderEdges {
        let pick = |draw: bool| draw.then_some(border);
        let (top, right, bottom, left) = match self {
            Self::None => (false, false, false, false),
            Self::Full => (true, true, true, true),
            Self::FullNoOuter => (
                !position.first_row,
                !position.last_column,
                !position.last_row,
                !position.first_column,
            ),
            Self::OuterOnly => (
                position.first_row,
                position.last_column,
                position.last_row,
                position.first_column,
            ),
            Self::HorizontalAll => (true, false, true, false),
            Self::HorizontalNoOuter => (!position.first_row, false, !position.last_row, false),
            Self::VerticalAll => (false, true, false, true),
            Self::VerticalNoOuter => (false, !position.last_column, false, !position.first_column),
        };
        BorderEdges {
            top: pick(top),
            right: pick(right),
            bottom: pick(bottom),
            left: pick(left),
        }
    }
}

/// A rectangular range of table rows and grid columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRange {
    pub rows: Range<usize>,
    pub columns: Range<usize>,
}

impl GridRange {
    pub fn new(rows: Range<usize>, columns: Range<usize>) -> Self {
        Self { rows, columns }
    }

    /// The whole table
    pub fn all(row_count: usize, column_count: usize) -> Self {
        Self::new(0..row_count, 0..column_count)
    }

    pub(crate) fn validate(&self, row_count: usize, column_count: usize) -> Result<()> {
        if self.rows.is_empty() || self.columns.is_empty() {
            return Err(LayoutError::invalid_config(format!(
                "grid range {self:?} is empty"
            )));
        }
        if self.rows.end > row_count || self.columns.end > column_count {
            return Err(LayoutError::invalid_config(format!(
                "grid range {self:?} exceeds table of {row_count} rows and {column_count} columns"
            )));
        }
        Ok(())
    }

    /// Position of a cell spanning `span` grid columns from `column`, or
    /// `None` when the cell starts outside the range.
    pub(crate) fn position(&self, row: usize, column: usize, span: usize) -> Option<CellPosition> {
        if !self.rows.contains(&row) || !self.columns.contains(&column) {
            return None;
        }
        Some(CellPosition {
            first_row: row == self.rows.start,
            last_row: row + 1 == self.rows.end,
            first_column: column == self.columns.start,
            last_column: column + span >= self.columns.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner() -> CellPosition {
        CellPosition {
            first_row: true,
            last_row: false,
            first_column: true,
            last_column: false,
        }
    }

    #[test]
    fn test_full_draws_every_edge() {
        let edges = BorderGridStrategy::Full.edges_for(corner(), BorderStyle::new(1.0));
        assert!(edges.is_uniform());
        assert!(edges.top.is_some());
    }

    #[test]
    fn test_no_outer_skips_range_edges() {
        let edges = BorderGridStrategy::FullNoOuter.edges_for(corner(), BorderStyle::new(1.0));
        assert!(edges.top.is_none());
        assert!(edges.left.is_none());
        assert!(edges.right.is_some());
        assert!(edges.bottom.is_some());
    }

    #[test]
    fn test_outer_only_frames_range() {
        let edges = BorderGridStrategy::OuterOnly.edges_for(corner(), BorderStyle::new(1.0));
        assert!(edges.top.is_some());
        assert!(edges.left.is_some());
        assert!(edges.right.is_none());
        assert!(edges.bottom.is_none());
    }

    #[test]
    fn test_horizontal_and_vertical() {
        let border = BorderStyle::new(1.0);
        let horizontal = BorderGridStrategy::HorizontalNoOuter.edges_for(corner(), border);
        assert_eq!(horizontal.widths().y_sum(), 1.0);
        assert_eq!(horizontal.widths().x_sum(), 0.0);

        let vertical = BorderGridStrategy::VerticalAll.edges_for(corner(), border);
        assert_eq!(vertical.widths().x_sum(), 2.0);
        assert_eq!(vertical.widths().y_sum(), 0.0);
    }

    #[test]
    fn test_none_clears() {
        let edges = BorderGridStrategy::None.edges_for(corner(), BorderStyle::new(1.0));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_range_validation() {
        assert!(GridRange::new(0..2, 0..3).validate(2, 3).is_ok());
        assert!(GridRange::new(0..3, 0..3).validate(2, 3).is_err());
        assert!(GridRange::new(1..1, 0..3).validate(2, 3).is_err());
    }

    #[test]
    fn test_position_with_span() {
        let range = GridRange::new(0..2, 1..3);
        assert_eq!(range.position(0, 0, 1), None);
        let position = range.position(1, 1, 2).unwrap();
        assert!(position.last_row && position.first_column && position.last_column);
    }
}
