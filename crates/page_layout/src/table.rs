//! Table - a typed facade over a VBox of HBox rows of cells
//!
//! The table only resolves column spans into per-row width specs and styles
//! cells through border grids. Size negotiation and splitting are delegated
//! to the inner VBox.

use crate::grid::{BorderGridStrategy, GridRange};
use crate::render::paint_outline;
use crate::{
    BorderRadius, BorderStyle, BoxElement, Element, ElementWithSize, HBox, HeightSpec,
    LayoutContext, LayoutError, LayoutNode, NodeKind, NodeState, PageRenderer, Rect,
    RenderContext, Result, SizeSpec, SpecKind, SplitOutcome, VBox, WidthSpec,
};

/// A table cell: a box spanning one or more table columns
#[derive(Debug, Clone)]
pub struct Cell {
    inner: BoxElement,
    col_span: usize,
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl Cell {
    /// A cell holding `element`; splittable when the element is
    pub fn new(element: impl Into<Element>) -> Self {
        let element = element.into();
        let splittable = element.is_vert_splittable();
        let mut inner = BoxElement::with_element(element);
        inner.state_mut().set_vert_splittable_unchecked(splittable);
        Self { inner, col_span: 1 }
    }

    pub fn empty() -> Self {
        Self {
            inner: BoxElement::new(),
            col_span: 1,
        }
    }

    pub fn with_col_span(mut self, col_span: usize) -> Self {
        self.col_span = col_span;
        self
    }

    pub fn col_span(&self) -> usize {
        self.col_span
    }

    /// The box carrying the cell's style and content
    pub fn inner(&self) -> &BoxElement {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut BoxElement {
        &mut self.inner
    }

    fn wrap_fragment(&self, part: ElementWithSize) -> Result<ElementWithSize> {
        let Element::Box(inner) = part.element else {
            return Err(LayoutError::invalid_state(
                self.id(),
                "cell split produced a non-box fragment",
            ));
        };
        ElementWithSize::new(Cell {
            inner,
            col_span: self.col_span,
        })
    }
}

impl LayoutNode for Cell {
    fn kind(&self) -> NodeKind {
        NodeKind::Cell
    }

    fn state(&self) -> &NodeState {
        self.inner.state()
    }

    fn state_mut(&mut self) -> &mut NodeState {
        self.inner.state_mut()
    }

    fn on_prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        self.inner.on_prepare(ctx, available)
    }

    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        match self.inner.on_split_vert(ctx, available_width, available_height)? {
            SplitOutcome::Split { first, second } => Ok(SplitOutcome::Split {
                first: self.wrap_fragment(first)?,
                second: self.wrap_fragment(second)?,
            }),
            not_split => Ok(not_split),
        }
    }

    fn on_render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()> {
        self.inner.on_render(ctx, renderer)
    }

    fn stretch_to(&mut self, min: SizeSpec) {
        self.inner.stretch_to(min);
    }
}

/// A grid of cells with per-column width specs and repeated header rows
#[derive(Debug, Clone)]
pub struct Table {
    state: NodeState,
    column_widths: Vec<WidthSpec>,
    body: VBox,
}

impl Table {
    /// Create a table; every column needs an absolute, percentage or star width
    pub fn new(column_widths: Vec<WidthSpec>) -> Result<Self> {
        if column_widths.is_empty() {
            return Err(LayoutError::invalid_config("a table needs at least one column"));
        }
        for width in &column_widths {
            if width.kind() == SpecKind::Auto {
                return Err(LayoutError::invalid_config(
                    "table columns cannot use auto widths",
                ));
            }
            width.validate()?;
        }
        Ok(Self {
            state: NodeState::new(true),
            column_widths,
            body: VBox::new(),
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn column_widths(&self) -> &[WidthSpec] {
        &self.column_widths
    }

    pub fn row_count(&self) -> usize {
        self.body.row_count()
    }

    /// The stack of rows backing this table
    pub fn body(&self) -> &VBox {
        &self.body
    }

    /// Row `index` as laid out
    pub fn row(&self, index: usize) -> Option<&HBox> {
        match self.body.row(index)?.element() {
            Element::HBox(row) => Some(row),
            _ => None,
        }
    }

    /// The `index`-th cell of row `row` (cells, not grid columns)
    pub fn cell(&self, row: usize, index: usize) -> Option<&Cell> {
        match self.row(row)?.column(index)?.element() {
            Element::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn header_row_count(&self) -> usize {
        self.body.header_row_count()
    }

    pub fn set_header_row_count(&mut self, count: usize) -> Result<&mut Self> {
        self.state.ensure_unprepared("change the header row count")?;
        self.body.set_header_row_count(count)?;
        Ok(self)
    }

    pub fn add_row(&mut self, cells: impl IntoIterator<Item = Cell>) -> Result<&mut Self> {
        self.add_and_return_row(cells)?;
        Ok(self)
    }

    /// Add an auto-height row and return its HBox
    pub fn add_and_return_row(&mut self, cells: impl IntoIterator<Item = Cell>) -> Result<&mut HBox> {
        self.add_row_with_height(cells, HeightSpec::Auto)
    }

    pub fn add_row_with_height(
        &mut self,
        cells: impl IntoIterator<Item = Cell>,
        height: HeightSpec,
    ) -> Result<&mut HBox> {
        self.state.ensure_unprepared("add a row")?;
        let mut row = HBox::new();
        row.set_vert_splittable(true)?;

        let mut column = 0;
        for cell in cells {
            let span = cell.col_span;
            if span == 0 {
                return Err(LayoutError::invalid_config("column span must be at least 1"));
            }
            if column + span > self.column_count() {
                return Err(LayoutError::invalid_config(format!(
                    "row spans {} columns but the table has {}",
                    column + span,
                    self.column_count()
                )));
            }
            let width = self.span_width(column, span)?;
            row.add_column(cell, width)?;
            column += span;
        }

        let row = self.body.add_and_return_row(row, height)?.element_mut();
        match row {
            Element::HBox(row) => Ok(row),
            _ => Err(LayoutError::invalid_state(self.state.id(), "table row is not an hbox")),
        }
    }

    /// Width spec for a cell covering `span` columns from `start`
    fn span_width(&self, start: usize, span: usize) -> Result<WidthSpec> {
        let spanned = &self.column_widths[start..start + span];
        if span == 1 {
            return Ok(spanned[0]);
        }

        let kind = self.column_widths[0].kind();
        if self.column_widths.iter().any(|width| width.kind() != kind) {
            return Err(LayoutError::invalid_config(
                "column spans need all table columns to share one width type",
            ));
        }
        let total: f32 = spanned.iter().filter_map(|width| width.value()).sum();
        match kind {
            SpecKind::Star => Ok(WidthSpec::perc(
                span as f32 * 100.0 / self.column_count() as f32,
            )),
            SpecKind::Absolute => Ok(WidthSpec::abs(total)),
            SpecKind::Percentage => Ok(WidthSpec::perc(total)),
            SpecKind::Auto => Err(LayoutError::invalid_config(
                "table columns cannot use auto widths",
            )),
        }
    }

    /// Apply a border grid to every cell
    pub fn apply_grid(&mut self, strategy: BorderGridStrategy, border: BorderStyle) -> Result<&mut Self> {
        let range = GridRange::all(self.row_count(), self.column_count());
        self.apply_grid_range(range, strategy, border)
    }

    /// Set the borders of cells starting inside `range`
    pub fn apply_grid_range(
        &mut self,
        range: GridRange,
        strategy: BorderGridStrategy,
        border: BorderStyle,
    ) -> Result<&mut Self> {
        self.state.ensure_unprepared("apply a border grid")?;
        range.validate(self.row_count(), self.column_count())?;

        for (row_index, row) in self.body.rows_mut().iter_mut().enumerate() {
            let Element::HBox(hbox) = row.element_mut() else {
                continue;
            };
            let mut column = 0;
            for cell_column in hbox.columns_mut() {
                let Element::Cell(cell) = cell_column.element_mut() else {
                    continue;
                };
                let span = cell.col_span;
                if let Some(position) = range.position(row_index, column, span) {
                    cell.state_mut()
                        .set_border(strategy.edges_for(position, border))?;
                }
                column += span;
            }
        }
        tracing::debug!(
            target: "page_layout::prepare",
            table = %self.state.id(),
            ?strategy,
            rows = ?range.rows,
            columns = ?range.columns,
            "border grid applied"
        );
        Ok(self)
    }

    fn wrap_fragment(&self, state: NodeState, part: ElementWithSize) -> Result<ElementWithSize> {
        let Element::VBox(body) = part.element else {
            return Err(LayoutError::invalid_state(
                self.state.id(),
                "table body split produced a non-vbox fragment",
            ));
        };
        let mut table = Table {
            state,
            column_widths: self.column_widths.clone(),
            body,
        };
        table.state.mark_prepared_exact(part.full_size);
        ElementWithSize::new(table)
    }
}

impl LayoutNode for Table {
    fn kind(&self) -> NodeKind {
        NodeKind::Table
    }

    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn on_prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        let body_available = available
            .minus(self.state.outline_x_sum(), self.state.outline_y_sum())
            .non_negative();
        let size = self.body.prepare(ctx, body_available)?;
        Ok(size.plus(self.body.outline_x_sum(), self.body.outline_y_sum()))
    }

    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        match self.body.split_vert(ctx, available_width, available_height)? {
            SplitOutcome::Split { first, second } => {
                let suppress = ctx.config().suppress_leading_edge_on_continuation;
                Ok(SplitOutcome::Split {
                    first: self.wrap_fragment(self.state.fresh_copy(), first)?,
                    second: self.wrap_fragment(self.state.continuation(suppress), second)?,
                })
            }
            not_split => Ok(not_split),
        }
    }

    fn on_render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()> {
        let size = self
            .state
            .render_size()?
            .plus(self.state.outline_x_sum(), self.state.outline_y_sum());
        let outer = Rect::from_size(ctx.x(), ctx.y(), size);
        let content = paint_outline(
            self.state.outline(),
            outer,
            None,
            BorderRadius::default(),
            renderer,
        );
        self.body.render(&RenderContext::at(content), renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BorderEdges, Edges, LayoutConfig, Leaf, NotSplitReason, TextContent};

    fn ctx() -> LayoutContext {
        LayoutContext::new(LayoutConfig::default())
    }

    fn cell(width: f32, height: f32) -> Cell {
        Cell::new(Leaf::spacer(width, height))
    }

    fn stars(count: usize) -> Vec<WidthSpec> {
        vec![WidthSpec::Star; count]
    }

    #[test]
    fn test_new_rejects_empty_and_auto() {
        assert!(Table::new(vec![]).is_err());
        assert!(Table::new(vec![WidthSpec::Star, WidthSpec::Auto]).is_err());
        assert!(Table::new(vec![WidthSpec::abs(-1.0)]).is_err());
    }

    #[test]
    fn test_cells_stretch_to_row_height() {
        let mut table = Table::new(stars(2)).unwrap();
        table.add_row([cell(10.0, 10.0), cell(10.0, 30.0)]).unwrap();
        table.prepare(&mut ctx(), SizeSpec::new(200.0, 500.0)).unwrap();

        let short = table.cell(0, 0).unwrap();
        assert_eq!(short.prepared_size().unwrap(), SizeSpec::new(10.0, 10.0));
        assert_eq!(short.state().render_size().unwrap(), SizeSpec::new(100.0, 30.0));
    }

    #[test]
    fn test_star_span_becomes_percentage() {
        let mut table = Table::new(stars(4)).unwrap();
        let row = table
            .add_and_return_row([cell(1.0, 1.0).with_col_span(3), cell(1.0, 1.0)])
            .unwrap();
        assert_eq!(row.columns()[0].width(), WidthSpec::perc(75.0));
        assert_eq!(row.columns()[1].width(), WidthSpec::Star);
    }

    #[test]
    fn test_absolute_span_sums() {
        let mut table = Table::new(vec![WidthSpec::abs(30.0), WidthSpec::abs(50.0)]).unwrap();
        let row = table
            .add_and_return_row([cell(1.0, 1.0).with_col_span(2)])
            .unwrap();
        assert_eq!(row.columns()[0].width(), WidthSpec::abs(80.0));
    }

    #[test]
    fn test_span_rejections() {
        let mut table = Table::new(stars(2)).unwrap();
        assert!(matches!(
            table.add_row([cell(1.0, 1.0).with_col_span(2), cell(1.0, 1.0)]),
            Err(LayoutError::InvalidConfiguration(_))
        ));
        assert!(table.add_row([cell(1.0, 1.0).with_col_span(0)]).is_err());

        let mut mixed = Table::new(vec![WidthSpec::abs(30.0), WidthSpec::Star]).unwrap();
        assert!(matches!(
            mixed.add_row([cell(1.0, 1.0).with_col_span(2)]),
            Err(LayoutError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_split_repeats_header_and_keeps_columns() {
        let mut table = Table::new(stars(2)).unwrap();
        table.add_row([cell(10.0, 20.0), cell(10.0, 20.0)]).unwrap();
        for _ in 0..4 {
            table.add_row([cell(10.0, 50.0), cell(10.0, 50.0)]).unwrap();
        }
        table.set_header_row_count(1).unwrap();
        let mut layout = ctx();
        table.prepare(&mut layout, SizeSpec::new(200.0, 1000.0)).unwrap();

        let (first, second) = table
            .split_vert(&mut layout, 200.0, 130.0)
            .unwrap()
            .into_fragments()
            .unwrap();
        let (Element::Table(first_table), Element::Table(second_table)) =
            (&first.element, &second.element)
        else {
            panic!("expected table fragments");
        };
        assert_eq!(first_table.row_count(), 3);
        assert_eq!(second_table.row_count(), 3);
        assert_eq!(first.size.height, 120.0);
        assert_eq!(second_table.column_widths(), table.column_widths());
        assert_ne!(first_table.id(), table.id());
    }

    #[test]
    fn test_split_row_restretches_kept_cell() {
        let lines: Vec<String> = (0..10).map(|index| format!("line {index}")).collect();
        let text = TextContent::new(lines.join("\n"), 10.0).with_line_height(10.0);
        let mut table = Table::new(stars(2)).unwrap();
        table
            .add_row([cell(10.0, 20.0), Cell::new(Leaf::new(text))])
            .unwrap();
        let mut layout = ctx();
        table.prepare(&mut layout, SizeSpec::new(200.0, 1000.0)).unwrap();
        assert_eq!(table.cell(0, 0).unwrap().state().render_size().unwrap().height, 100.0);

        let (first, _) = table
            .split_vert(&mut layout, 200.0, 45.0)
            .unwrap()
            .into_fragments()
            .unwrap();
        let Element::Table(first_table) = &first.element else {
            panic!("expected a table fragment");
        };
        let row_height = first_table.row(0).unwrap().prepared_size().unwrap().height;
        assert_eq!(row_height, 40.0);
        let kept = first_table.cell(0, 0).unwrap();
        assert_eq!(kept.state().render_size().unwrap(), SizeSpec::new(100.0, 40.0));
        // The source table keeps its own stretch
        assert_eq!(table.cell(0, 0).unwrap().state().render_size().unwrap().height, 100.0);
    }

    #[test]
    fn test_split_already_fits() {
        let mut table = Table::new(stars(1)).unwrap();
        table.add_row([cell(10.0, 20.0)]).unwrap();
        let mut layout = ctx();
        table.prepare(&mut layout, SizeSpec::new(100.0, 100.0)).unwrap();
        let outcome = table.split_vert(&mut layout, 100.0, 50.0).unwrap();
        assert_eq!(outcome.not_split_reason(), Some(NotSplitReason::AlreadyFits));
    }

    #[test]
    fn test_apply_full_grid() {
        let mut table = Table::new(stars(3)).unwrap();
        table.add_row([cell(1.0, 1.0).with_col_span(2), cell(1.0, 1.0)]).unwrap();
        table.add_row([cell(1.0, 1.0), cell(1.0, 1.0), cell(1.0, 1.0)]).unwrap();
        let border = BorderStyle::new(0.5);
        table.apply_grid(BorderGridStrategy::Full, border).unwrap();

        for (row, cells) in [(0, 2), (1, 3)] {
            for index in 0..cells {
                assert_eq!(
                    *table.cell(row, index).unwrap().state().outline().border(),
                    BorderEdges::all(border)
                );
            }
        }
    }

    #[test]
    fn test_apply_grid_range_outer_only() {
        let mut table = Table::new(stars(3)).unwrap();
        for _ in 0..3 {
            table.add_row([cell(1.0, 1.0), cell(1.0, 1.0), cell(1.0, 1.0)]).unwrap();
        }
        let border = BorderStyle::new(1.0);
        table
            .apply_grid_range(GridRange::new(1..3, 1..3), BorderGridStrategy::OuterOnly, border)
            .unwrap();

        let outside = table.cell(0, 0).unwrap().state().outline().border();
        assert!(outside.is_empty());
        let top_left = table.cell(1, 1).unwrap().state().outline().border().widths();
        assert_eq!(top_left, Edges::new(1.0, 0.0, 0.0, 1.0));
        let bottom_right = table.cell(2, 2).unwrap().state().outline().border().widths();
        assert_eq!(bottom_right, Edges::new(0.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn test_apply_grid_errors() {
        let mut table = Table::new(stars(2)).unwrap();
        table.add_row([cell(1.0, 1.0), cell(1.0, 1.0)]).unwrap();
        assert!(matches!(
            table.apply_grid_range(
                GridRange::new(0..2, 0..2),
                BorderGridStrategy::Full,
                BorderStyle::default()
            ),
            Err(LayoutError::InvalidConfiguration(_))
        ));

        table.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();
        assert!(matches!(
            table.apply_grid(BorderGridStrategy::Full, BorderStyle::default()),
            Err(LayoutError::InvalidState { .. })
        ));
    }
}
