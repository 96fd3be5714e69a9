//! HBox - a horizontal row of columns
//!
//! Column widths are negotiated in three passes: fixed (absolute and
//! percentage) columns first, then auto columns bounded by a share of the
//! remaining width, then star columns splitting whatever is left.

use crate::render::paint_outline;
use crate::sizing::share;
use crate::{
    BorderRadius, Element, ElementWithSize, LayoutContext, LayoutNode, LayoutWarning, Leaf,
    NodeKind, NodeState, NotSplitReason, PageRenderer, Rect, RenderContext, Result, SizeSpec,
    SpecKind, SplitOutcome, WidthSpec,
};

/// One column of an HBox; carries no outline of its own
#[derive(Debug, Clone)]
pub struct Column {
    element: Element,
    width: WidthSpec,
}

impl Column {
    pub fn new(element: impl Into<Element>, width: WidthSpec) -> Self {
        Self {
            element: element.into(),
            width,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub(crate) fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    pub fn width(&self) -> WidthSpec {
        self.width
    }
}

/// Running totals while columns are prepared
#[derive(Debug, Default)]
struct ColumnTally {
    used_width: f32,
    max_content_height: f32,
    max_column_height: f32,
}

/// A row of columns laid out left to right
#[derive(Debug, Clone)]
pub struct HBox {
    state: NodeState,
    columns: Vec<Column>,
    /// Column width and height including the child's outline
    prepared_column_sizes: Vec<SizeSpec>,
    /// Net prepared size of each child
    prepared_element_sizes: Vec<SizeSpec>,
}

impl Default for HBox {
    fn default() -> Self {
        Self::new()
    }
}

impl HBox {
    pub fn new() -> Self {
        Self {
            state: NodeState::new(false),
            columns: Vec::new(),
            prepared_column_sizes: Vec::new(),
            prepared_element_sizes: Vec::new(),
        }
    }

    pub fn add_column(&mut self, element: impl Into<Element>, width: WidthSpec) -> Result<&mut Self> {
        self.add_and_return_column(element, width)?;
        Ok(self)
    }

    /// Add a column and return it
    pub fn add_and_return_column(
        &mut self,
        element: impl Into<Element>,
        width: WidthSpec,
    ) -> Result<&mut Column> {
        self.state.ensure_unprepared("add a column")?;
        width.validate()?;
        self.columns.push(Column::new(element, width));
        let index = self.columns.len() - 1;
        Ok(&mut self.columns[index])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn prepared_column_sizes(&self) -> &[SizeSpec] {
        &self.prepared_column_sizes
    }

    pub fn prepared_element_sizes(&self) -> &[SizeSpec] {
        &self.prepared_element_sizes
    }

    fn record(
        &mut self,
        tally: &mut ColumnTally,
        index: usize,
        column_width: f32,
        element_size: SizeSpec,
    ) {
        let column_height = element_size.height + self.columns[index].element.outline_y_sum();
        self.prepared_column_sizes[index] = SizeSpec::new(column_width, column_height);
        self.prepared_element_sizes[index] = element_size;
        tally.used_width += column_width;
        tally.max_content_height = tally.max_content_height.max(element_size.height);
        tally.max_column_height = tally.max_column_height.max(column_height);
    }

    /// Let block children fill the column and the full row height
    fn stretch_children(&mut self, max_content_height: f32) {
        for (column, size) in self.columns.iter_mut().zip(&self.prepared_column_sizes) {
            let width = size.width - column.element.outline_x_sum();
            column
                .element
                .stretch_to(SizeSpec::new(width, max_content_height));
        }
    }

    fn indices_of(&self, kind: SpecKind) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.width.kind() == kind)
            .map(|(index, _)| index)
            .collect()
    }

    /// Build a prepared fragment sharing this HBox's style and column widths
    fn fragment(
        &self,
        state: NodeState,
        columns: Vec<Column>,
        column_sizes: Vec<SizeSpec>,
        element_sizes: Vec<SizeSpec>,
    ) -> Result<ElementWithSize> {
        let max_content_height = element_sizes.iter().map(|s| s.height).fold(0.0, f32::max);
        let max_column_height = column_sizes.iter().map(|s| s.height).fold(0.0, f32::max);
        let mut hbox = HBox {
            state,
            columns,
            prepared_column_sizes: column_sizes,
            prepared_element_sizes: element_sizes,
        };
        // Whole columns still carry the stretch of the unsplit row
        for column in &mut hbox.columns {
            column.element.state_mut().reset_render();
        }
        hbox.stretch_children(max_content_height);
        let width = self.state.prepared_size()?.width;
        hbox.state
            .mark_prepared_exact(SizeSpec::new(width, max_column_height));
        ElementWithSize::new(hbox)
    }
}

impl LayoutNode for HBox {
    fn kind(&self) -> NodeKind {
        NodeKind::HBox
    }

    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn on_prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        let element_width = (available.width - self.state.outline_x_sum()).max(0.0);
        let element_height = (available.height - self.state.outline_y_sum()).max(0.0);
        let count = self.columns.len();
        self.prepared_column_sizes = vec![SizeSpec::ZERO; count];
        self.prepared_element_sizes = vec![SizeSpec::ZERO; count];

        let auto_columns = self.indices_of(SpecKind::Auto);
        let star_columns = self.indices_of(SpecKind::Star);
        let mut tally = ColumnTally::default();

        // Absolute and percentage columns
        for index in 0..count {
            let Some(width) = self.columns[index].width.effective_value(element_width) else {
                continue;
            };
            let size = self.columns[index]
                .element
                .prepare(ctx, SizeSpec::new(width, element_height))?;
            self.record(&mut tally, index, width, size);
        }

        // Auto columns: content decides, bounded by an equal share
        if !auto_columns.is_empty() {
            let rest_width = element_width - tally.used_width;
            let share_per_column = share(rest_width, auto_columns.len() + star_columns.len());
            let auto_budget = share_per_column * auto_columns.len() as f32;

            let mut slack = 0.0;
            let mut oversized = Vec::new();
            for &index in &auto_columns {
                let element = &mut self.columns[index].element;
                let size = element.prepare(ctx, SizeSpec::new(auto_budget, element_height))?;
                let natural_width = size.width + element.outline_x_sum();
                if natural_width <= share_per_column {
                    slack += share_per_column - natural_width;
                    self.record(&mut tally, index, natural_width, size);
                } else {
                    oversized.push((index, natural_width));
                }
            }

            // Hand the unused slack to oversized columns by demand
            let oversized_total: f32 = oversized.iter().map(|(_, natural)| natural).sum();
            for (index, natural_width) in oversized {
                let bonus = if oversized_total > 0.0 {
                    slack * natural_width / oversized_total
                } else {
                    0.0
                };
                let width = (share_per_column + bonus).min(natural_width).max(0.0);
                let size = self.columns[index]
                    .element
                    .prepare(ctx, SizeSpec::new(width, element_height))?;
                self.record(&mut tally, index, width, size);
            }
        }

        // Star columns split what is left
        if !star_columns.is_empty() {
            let rest_width = (element_width - tally.used_width).max(0.0);
            let star_width = share(rest_width, star_columns.len());
            for &index in &star_columns {
                let size = self.columns[index]
                    .element
                    .prepare(ctx, SizeSpec::new(star_width, element_height))?;
                self.record(&mut tally, index, star_width, size);
            }
        }

        self.stretch_children(tally.max_content_height);

        if ctx.exceeds(tally.used_width, element_width) {
            ctx.warn(LayoutWarning::WidthOverflow {
                node_id: self.state.id(),
                used: tally.used_width,
                available: element_width,
            });
        }
        if !self.state.is_vert_splittable() && ctx.exceeds(tally.max_column_height, element_height)
        {
            ctx.warn(LayoutWarning::HeightOverflow {
                node_id: self.state.id(),
                used: tally.max_column_height,
                available: element_height,
            });
        }

        Ok(SizeSpec::new(tally.used_width, tally.max_column_height))
    }

    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        _available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        let needs_split = self
            .columns
            .iter()
            .zip(&self.prepared_column_sizes)
            .any(|(column, size)| {
                ctx.exceeds(size.height, available_height) && column.element.is_vert_splittable()
            });
        if !needs_split {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
        }

        let count = self.columns.len();
        let mut first_columns = Vec::with_capacity(count);
        let mut second_columns = Vec::with_capacity(count);
        let mut first_column_sizes = Vec::with_capacity(count);
        let mut second_column_sizes = Vec::with_capacity(count);
        let mut first_element_sizes = Vec::with_capacity(count);
        let mut second_element_sizes = Vec::with_capacity(count);
        let mut any_split = false;

        for (index, column) in self.columns.iter().enumerate() {
            let column_size = self.prepared_column_sizes[index];
            let element = &column.element;

            if !ctx.exceeds(column_size.height, available_height) {
                first_columns.push(column.clone());
                first_column_sizes.push(column_size);
                first_element_sizes.push(self.prepared_element_sizes[index]);

                let mut placeholder = Leaf::spacer(column_size.width, 0.0);
                let placeholder_size = placeholder
                    .state_mut()
                    .mark_prepared_exact(SizeSpec::new(column_size.width, 0.0));
                second_columns.push(Column::new(placeholder, column.width));
                second_column_sizes.push(SizeSpec::new(column_size.width, 0.0));
                second_element_sizes.push(placeholder_size);
                continue;
            }

            // A row is as tall as its tallest column
            if !element.is_vert_splittable() {
                return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
            }
            let outcome = element.split_vert(
                ctx,
                column_size.width - element.outline_x_sum(),
                available_height - element.outline_y_sum(),
            )?;
            let Some((head, tail)) = outcome.into_fragments() else {
                return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
            };
            any_split = true;

            first_column_sizes.push(SizeSpec::new(column_size.width, head.full_size.height));
            first_element_sizes.push(head.size);
            first_columns.push(Column::new(head.element, column.width));
            second_column_sizes.push(SizeSpec::new(column_size.width, tail.full_size.height));
            second_element_sizes.push(tail.size);
            second_columns.push(Column::new(tail.element, column.width));
        }

        if !any_split {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
        }

        let mut first_state = self.state.fresh_copy();
        first_state.set_vert_splittable_unchecked(false);
        let mut second_state = self
            .state
            .continuation(ctx.config().suppress_leading_edge_on_continuation);
        second_state.set_vert_splittable_unchecked(true);

        Ok(SplitOutcome::Split {
            first: self.fragment(first_state, first_columns, first_column_sizes, first_element_sizes)?,
            second: self.fragment(
                second_state,
                second_columns,
                second_column_sizes,
                second_element_sizes,
            )?,
        })
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

        let mut x = content.x;
        for (column, column_size) in self.columns.iter().zip(&self.prepared_column_sizes) {
            let column_ctx = RenderContext::new(x, content.y, column_size.width, content.height);
            column.element.render(&column_ctx, renderer)?;
            x += column_size.width;
        }
        Ok(())
    }
}
