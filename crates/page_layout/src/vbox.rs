//! VBox - a vertical stack of rows
//!
//! Heights are negotiated like HBox widths. The first `header_row_count`
//! rows are repeated at the top of every fragment a split produces.

use crate::render::paint_outline;
use crate::sizing::share;
use crate::{
    BorderRadius, Element, ElementWithSize, HeightSpec, LayoutContext, LayoutNode, LayoutWarning,
    NodeKind, NodeState, NotSplitReason, PageRenderer, Rect, RenderContext, Result, SizeSpec,
    SpecKind, SplitOutcome,
};

/// One row of a VBox; carries no outline of its own
#[derive(Debug, Clone)]
pub struct Row {
    element: Element,
    height: HeightSpec,
}

impl Row {
    pub fn new(element: impl Into<Element>, height: HeightSpec) -> Self {
        Self {
            element: element.into(),
            height,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub(crate) fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    pub fn height(&self) -> HeightSpec {
        self.height
    }
}

#[derive(Debug, Default)]
struct RowTally {
    used_height: f32,
    max_content_width: f32,
    max_row_width: f32,
}

/// Rows laid out top to bottom
#[derive(Debug, Clone)]
pub struct VBox {
    state: NodeState,
    rows: Vec<Row>,
    header_row_count: usize,
    /// Row width and height including the child's outline
    prepared_row_sizes: Vec<SizeSpec>,
    /// Net prepared size of each child
    prepared_element_sizes: Vec<SizeSpec>,
}

impl Default for VBox {
    fn default() -> Self {
        Self::new()
    }
}

impl VBox {
    pub fn new() -> Self {
        Self {
            state: NodeState::new(true),
            rows: Vec::new(),
            header_row_count: 0,
            prepared_row_sizes: Vec::new(),
            prepared_element_sizes: Vec::new(),
        }
    }

    pub fn add_row(&mut self, element: impl Into<Element>, height: HeightSpec) -> Result<&mut Self> {
        self.add_and_return_row(element, height)?;
        Ok(self)
    }

    /// Add a row and return it
    pub fn add_and_return_row(
        &mut self,
        element: impl Into<Element>,
        height: HeightSpec,
    ) -> Result<&mut Row> {
        self.state.ensure_unprepared("add a row")?;
        height.validate()?;
        self.rows.push(Row::new(element, height));
        let index = self.rows.len() - 1;
        Ok(&mut self.rows[index])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn header_row_count(&self) -> usize {
        self.header_row_count
    }

    /// Number of leading rows repeated on every fragment
    pub fn set_header_row_count(&mut self, count: usize) -> Result<&mut Self> {
        self.state.ensure_unprepared("change the header row count")?;
        self.header_row_count = count;
        Ok(self)
    }

    pub fn prepared_row_sizes(&self) -> &[SizeSpec] {
        &self.prepared_row_sizes
    }

    pub fn prepared_element_sizes(&self) -> &[SizeSpec] {
        &self.prepared_element_sizes
    }

    fn record(&mut self, tally: &mut RowTally, index: usize, row_height: f32, element_size: SizeSpec) {
        let row_width = element_size.width + self.rows[index].element.outline_x_sum();
        self.prepared_row_sizes[index] = SizeSpec::new(row_width, row_height);
        self.prepared_element_sizes[index] = element_size;
        tally.used_height += row_height;
        tally.max_content_width = tally.max_content_width.max(element_size.width);
        tally.max_row_width = tally.max_row_width.max(row_width);
    }

    /// Let block children fill the widest row and their own row height
    fn stretch_children(&mut self, max_content_width: f32) {
        for (row, size) in self.rows.iter_mut().zip(&self.prepared_row_sizes) {
            let height = size.height - row.element.outline_y_sum();
            row.element
                .stretch_to(SizeSpec::new(max_content_width, height));
        }
    }

    fn indices_of(&self, kind: SpecKind) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.height.kind() == kind)
            .map(|(index, _)| index)
            .collect()
    }

    fn fragment(
        &self,
        state: NodeState,
        rows: Vec<Row>,
        row_sizes: Vec<SizeSpec>,
        element_sizes: Vec<SizeSpec>,
    ) -> Result<ElementWithSize> {
        let max_content_width = element_sizes.iter().map(|s| s.width).fold(0.0, f32::max);
        let used_height: f32 = row_sizes.iter().map(|s| s.height).sum();
        let mut vbox = VBox {
            state,
            rows,
            header_row_count: self.header_row_count,
            prepared_row_sizes: row_sizes,
            prepared_element_sizes: element_sizes,
        };
        vbox.stretch_children(max_content_width);
        let width = self.state.prepared_size()?.width;
        vbox.state
            .mark_prepared_exact(SizeSpec::new(width, used_height));
        ElementWithSize::new(vbox)
    }
}

/// Rows collected for one side of a split
#[derive(Debug, Default)]
struct RowFragment {
    rows: Vec<Row>,
    row_sizes: Vec<SizeSpec>,
    element_sizes: Vec<SizeSpec>,
    height: f32,
}

impl RowFragment {
    fn push(&mut self, row: Row, row_size: SizeSpec, element_size: SizeSpec) {
        self.height += row_size.height;
        self.rows.push(row);
        self.row_sizes.push(row_size);
        self.element_sizes.push(element_size);
    }

    fn push_split(&mut self, part: ElementWithSize, row_width: f32) {
        let row_size = SizeSpec::new(row_width, part.full_size.height);
        self.push(Row::new(part.element, HeightSpec::Auto), row_size, part.size);
    }
}

impl LayoutNode for VBox {
    fn kind(&self) -> NodeKind {
        NodeKind::VBox
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
        let count = self.rows.len();
        self.prepared_row_sizes = vec![SizeSpec::ZERO; count];
        self.prepared_element_sizes = vec![SizeSpec::ZERO; count];

        let auto_rows = self.indices_of(SpecKind::Auto);
        let star_rows = self.indices_of(SpecKind::Star);
        let mut tally = RowTally::default();

        for index in 0..count {
            let Some(height) = self.rows[index].height.effective_value(element_height) else {
                continue;
            };
            let size = self.rows[index]
                .element
                .prepare(ctx, SizeSpec::new(element_width, height))?;
            self.record(&mut tally, index, height, size);
        }

        if !auto_rows.is_empty() {
            let rest_height = element_height - tally.used_height;
            let share_per_row = share(rest_height, auto_rows.len() + star_rows.len());
            let auto_budget = share_per_row * auto_rows.len() as f32;

            let mut slack = 0.0;
            let mut oversized = Vec::new();
            for &index in &auto_rows {
                let element = &mut self.rows[index].element;
                let size = element.prepare(ctx, SizeSpec::new(element_width, auto_budget))?;
                let natural_height = size.height + element.outline_y_sum();
                if natural_height <= share_per_row {
                    slack += share_per_row - natural_height;
                    self.record(&mut tally, index, natural_height, size);
                } else {
                    oversized.push((index, natural_height));
                }
            }

            let oversized_total: f32 = oversized.iter().map(|(_, natural)| natural).sum();
            for (index, natural_height) in oversized {
                let bonus = if oversized_total > 0.0 {
                    slack * natural_height / oversized_total
                } else {
                    0.0
                };
                let height = (share_per_row + bonus).min(natural_height).max(0.0);
                let element = &mut self.rows[index].element;
                let size = element.prepare(ctx, SizeSpec::new(element_width, height))?;
                // Content that cannot shrink keeps its own height
                let row_height = size.height + element.outline_y_sum();
                self.record(&mut tally, index, row_height, size);
            }
        }

        if !star_rows.is_empty() {
            let rest_height = element_height - tally.used_height;
            if rest_height > 0.0 {
                let star_height = share(rest_height, star_rows.len());
                for &index in &star_rows {
                    let size = self.rows[index]
                        .element
                        .prepare(ctx, SizeSpec::new(element_width, star_height))?;
                    self.record(&mut tally, index, star_height, size);
                }
            } else {
                // Nothing left: star rows take their natural height
                for &index in &star_rows {
                    let element = &mut self.rows[index].element;
                    let size = element.prepare(ctx, SizeSpec::new(element_width, element_height))?;
                    let row_height = size.height + element.outline_y_sum();
                    self.record(&mut tally, index, row_height, size);
                }
            }
        }

        self.stretch_children(tally.max_content_width);

        if ctx.exceeds(tally.max_row_width, element_width) {
            ctx.warn(LayoutWarning::WidthOverflow {
                node_id: self.state.id(),
                used: tally.max_row_width,
                available: element_width,
            });
        }
        if !self.state.is_vert_splittable() && ctx.exceeds(tally.used_height, element_height) {
            ctx.warn(LayoutWarning::HeightOverflow {
                node_id: self.state.id(),
                used: tally.used_height,
                available: element_height,
            });
        }

        Ok(SizeSpec::new(tally.max_row_width, tally.used_height))
    }

    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        _available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        if available_height <= 0.0 {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
        }

        let header_rows = self.header_row_count.min(self.rows.len());
        let mut first = RowFragment::default();
        let mut second = RowFragment::default();
        for index in 0..header_rows {
            let row_size = self.prepared_row_sizes[index];
            let element_size = self.prepared_element_sizes[index];
            first.push(self.rows[index].clone(), row_size, element_size);
            second.push(self.rows[index].clone(), row_size, element_size);
        }

        let mut filling_first = true;
        for index in header_rows..self.rows.len() {
            let row = &self.rows[index];
            let row_size = self.prepared_row_sizes[index];
            let element_size = self.prepared_element_sizes[index];

            if !filling_first {
                second.push(row.clone(), row_size, element_size);
                continue;
            }
            if !ctx.exceeds(first.height + row_size.height, available_height) {
                first.push(row.clone(), row_size, element_size);
                continue;
            }

            // First row that overflows; everything after it goes to `second`
            filling_first = false;
            let element = &row.element;
            let remaining = available_height - first.height - element.outline_y_sum();
            let fragments = if element.is_vert_splittable() && remaining > 0.0 {
                element
                    .split_vert(ctx, row_size.width - element.outline_x_sum(), remaining)?
                    .into_fragments()
            } else {
                None
            };
            match fragments {
                Some((head, tail)) => {
                    first.push_split(head, row_size.width);
                    second.push_split(tail, row_size.width);
                }
                None => second.push(row.clone(), row_size, element_size),
            }
        }

        if first.rows.len() <= header_rows || second.rows.len() <= header_rows {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::HeaderOnlyResult));
        }

        let suppress = ctx.config().suppress_leading_edge_on_continuation;
        Ok(SplitOutcome::Split {
            first: self.fragment(
                self.state.fresh_copy(),
                first.rows,
                first.row_sizes,
                first.element_sizes,
            )?,
            second: self.fragment(
                self.state.continuation(suppress),
                second.rows,
                second.row_sizes,
                second.element_sizes,
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

        let mut y = content.y;
        for (row, row_size) in self.rows.iter().zip(&self.prepared_row_sizes) {
            let row_ctx = RenderContext::new(content.x, y, content.width, row_size.height);
            row.element.render(&row_ctx, renderer)?;
            y += row_size.height;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingRenderer;
    use crate::{BoxElement, LayoutConfig, Leaf, TextContent};

    fn ctx() -> LayoutContext {
        LayoutContext::new(LayoutConfig::default())
    }

    fn heights(vbox: &VBox) -> Vec<f32> {
        vbox.prepared_row_sizes().iter().map(|s| s.height).collect()
    }

    /// `lines` one-character lines, 10pt each
    fn lines(lines: usize) -> Leaf {
        let text = vec!["x"; lines].join("\n");
        Leaf::new(TextContent::new(text, 10.0).with_line_height(10.0))
    }

    fn table_like(header: f32, rows: usize, row_height: f32) -> VBox {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(100.0, header), HeightSpec::Auto).unwrap();
        for _ in 0..rows {
            vbox.add_row(Leaf::spacer(100.0, row_height), HeightSpec::Auto)
                .unwrap();
        }
        vbox.set_header_row_count(1).unwrap();
        vbox
    }

    #[test]
    fn test_absolute_auto_star_rows() {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(10.0, 10.0), HeightSpec::abs(40.0)).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 30.0), HeightSpec::Auto).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 10.0), HeightSpec::Star).unwrap();
        let size = vbox.prepare(&mut ctx(), SizeSpec::new(100.0, 200.0)).unwrap();

        assert_eq!(heights(&vbox), vec![40.0, 30.0, 130.0]);
        assert_eq!(size.height, 200.0);
    }

    #[test]
    fn test_star_rows_fall_back_to_natural_height() {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(10.0, 150.0), HeightSpec::abs(150.0)).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 25.0), HeightSpec::Star).unwrap();
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 100.0)).unwrap();

        assert_eq!(heights(&vbox), vec![150.0, 25.0]);
    }

    #[test]
    fn test_percentage_rows() {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(10.0, 10.0), HeightSpec::perc(25.0)).unwrap();
        vbox.prepare(&mut ctx(), SizeSpec::new(100.0, 200.0)).unwrap();
        assert_eq!(heights(&vbox), vec![50.0]);
    }

    #[test]
    fn test_block_children_stretched_to_widest_row() {
        let mut vbox = VBox::new();
        vbox.add_row(
            BoxElement::with_element(Leaf::spacer(20.0, 5.0)),
            HeightSpec::abs(12.0),
        )
        .unwrap();
        vbox.add_row(Leaf::spacer(60.0, 5.0), HeightSpec::Auto).unwrap();
        vbox.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();

        let Element::Box(block) = vbox.rows()[0].element() else {
            panic!("expected a box");
        };
        assert_eq!(block.state().render_size().unwrap(), SizeSpec::new(60.0, 12.0));
    }

    #[test]
    fn test_height_overflow_warning_when_not_splittable() {
        let mut vbox = VBox::new();
        vbox.set_vert_splittable(false).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 80.0), HeightSpec::Auto).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 80.0), HeightSpec::Auto).unwrap();
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 100.0)).unwrap();
        assert!(matches!(
            layout.warnings(),
            [LayoutWarning::HeightOverflow { .. }]
        ));
    }

    #[test]
    fn test_split_at_row_boundary_repeats_header() {
        let mut vbox = table_like(20.0, 5, 50.0);
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 1000.0)).unwrap();

        let (first, second) = vbox
            .split_vert(&mut layout, 100.0, 120.0)
            .unwrap()
            .into_fragments()
            .unwrap();
        let (Element::VBox(first_box), Element::VBox(second_box)) = (&first.element, &second.element)
        else {
            panic!("expected vbox fragments");
        };
        assert_eq!(first_box.row_count(), 3);
        assert_eq!(second_box.row_count(), 4);
        assert_eq!(first.size.height, 120.0);
        assert_eq!(second.size.height, 170.0);
        assert_eq!(first_box.header_row_count(), 1);
        assert_eq!(
            first_box.rows()[0].element().id(),
            second_box.rows()[0].element().id()
        );
    }

    #[test]
    fn test_split_inside_row() {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(10.0, 30.0), HeightSpec::Auto).unwrap();
        vbox.add_row(lines(10), HeightSpec::Auto).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 5.0), HeightSpec::Auto).unwrap();
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 1000.0)).unwrap();

        let (first, second) = vbox
            .split_vert(&mut layout, 100.0, 75.0)
            .unwrap()
            .into_fragments()
            .unwrap();
        let Element::VBox(second_box) = &second.element else {
            panic!("expected a vbox");
        };
        // 30 + 4 lines
        assert_eq!(first.size.height, 70.0);
        // 6 lines + trailing row
        assert_eq!(second.size.height, 65.0);
        assert_eq!(second_box.rows()[0].height(), HeightSpec::Auto);
    }

    #[test]
    fn test_split_header_only_rejected() {
        let mut vbox = table_like(20.0, 2, 50.0);
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 1000.0)).unwrap();

        let outcome = vbox.split_vert(&mut layout, 100.0, 40.0).unwrap();
        assert_eq!(
            outcome.not_split_reason(),
            Some(NotSplitReason::HeaderOnlyResult)
        );
    }

    #[test]
    fn test_split_within_tolerance_already_fits() {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(100.0, 50.0), HeightSpec::Auto).unwrap();
        vbox.add_row(Leaf::spacer(100.0, 50.005), HeightSpec::Auto).unwrap();
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 1000.0)).unwrap();

        let outcome = vbox.split_vert(&mut layout, 100.0, 100.0).unwrap();
        assert_eq!(outcome.not_split_reason(), Some(NotSplitReason::AlreadyFits));
        assert_eq!(layout.stats().split_attempts, 0);
    }

    #[test]
    fn test_split_zero_height_refused() {
        let mut vbox = table_like(0.0, 2, 50.0);
        let mut layout = ctx();
        vbox.prepare(&mut layout, SizeSpec::new(100.0, 1000.0)).unwrap();
        let outcome = vbox.split_vert(&mut layout, 100.0, 0.0).unwrap();
        assert_eq!(outcome.not_split_reason(), Some(NotSplitReason::NotSplittable));
    }

    #[test]
    fn test_header_count_after_prepare_fails() {
        let mut vbox = table_like(20.0, 1, 10.0);
        vbox.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();
        assert!(vbox.set_header_row_count(0).is_err());
    }

    #[test]
    fn test_render_stacks_rows() {
        let mut vbox = VBox::new();
        vbox.add_row(Leaf::spacer(10.0, 10.0), HeightSpec::Auto).unwrap();
        vbox.add_row(Leaf::spacer(10.0, 20.0), HeightSpec::abs(25.0)).unwrap();
        vbox.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();

        let mut renderer = RecordingRenderer::default();
        vbox.render(&RenderContext::new(5.0, 7.0, 100.0, 100.0), &mut renderer)
            .unwrap();
        let ys: Vec<f32> = renderer.rects.iter().map(|(_, rect)| rect.y).collect();
        assert_eq!(ys, vec![7.0, 7.0, 17.0]);
    }
}
