//! Leaf nodes wrapping opaque, measurable content

use crate::render::paint_outline;
use crate::{
    BorderRadius, ElementWithSize, LayoutContext, LayoutNode, NodeKind, NodeState,
    NotSplitReason, PageRenderer, Rect, RenderContext, Result, SizeSpec, SplitOutcome,
};
use std::fmt;

/// Content at the leaves of the layout tree (text runs, images, spacers).
///
/// The layout core only sees the net size reported by `measure` and, for
/// splittable content, the two halves produced by `split`.
pub trait ContentMeasurer: ContentClone + fmt::Debug + Send + Sync {
    /// Net content size for the given net available space
    fn measure(&mut self, available: SizeSpec) -> SizeSpec;

    fn is_splittable(&self) -> bool {
        false
    }

    /// Divide the measured content so the first half fits `available_height`
    fn split(
        &self,
        _available_width: f32,
        _available_height: f32,
    ) -> Option<(Box<dyn ContentMeasurer>, Box<dyn ContentMeasurer>)> {
        None
    }

    /// Paint the content into its content rectangle
    fn paint(&self, content: Rect, renderer: &mut dyn PageRenderer);
}

pub trait ContentClone {
    fn clone_box(&self) -> Box<dyn ContentMeasurer>;
}

impl<T> ContentClone for T
where
    T: 'static + ContentMeasurer + Clone,
{
    fn clone_box(&self) -> Box<dyn ContentMeasurer> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ContentMeasurer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Fixed-size content; never splits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacer {
    size: SizeSpec,
}

impl Spacer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: SizeSpec::new(width, height).non_negative(),
        }
    }
}

impl ContentMeasurer for Spacer {
    fn measure(&mut self, _available: SizeSpec) -> SizeSpec {
        self.size
    }

    fn paint(&self, _content: Rect, _renderer: &mut dyn PageRenderer) {}
}

/// A leaf node: outline bookkeeping around measurable content
#[derive(Debug, Clone)]
pub struct Leaf {
    state: NodeState,
    content: Box<dyn ContentMeasurer>,
}

impl Leaf {
    pub fn new(content: impl ContentMeasurer + 'static) -> Self {
        Self::from_boxed(Box::new(content))
    }

    pub fn from_boxed(content: Box<dyn ContentMeasurer>) -> Self {
        Self {
            state: NodeState::new(content.is_splittable()),
            content,
        }
    }

    /// An invisible fixed-size leaf
    pub fn spacer(width: f32, height: f32) -> Self {
        Self::new(Spacer::new(width, height))
    }

    pub fn content(&self) -> &dyn ContentMeasurer {
        self.content.as_ref()
    }

    fn fragment(
        state: NodeState,
        mut content: Box<dyn ContentMeasurer>,
        available: SizeSpec,
    ) -> Result<ElementWithSize> {
        let size = content.measure(available);
        let mut leaf = Leaf { state, content };
        leaf.state.mark_prepared_exact(size);
        ElementWithSize::new(leaf)
    }
}

impl LayoutNode for Leaf {
    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }

    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn on_prepare(&mut self, _ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        let net = available
            .minus(self.state.outline_x_sum(), self.state.outline_y_sum())
            .non_negative();
        Ok(self.content.measure(net))
    }

    fn on_split_vert(
        &self,
        _ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        let Some((head, tail)) = self.content.split(available_width, available_height) else {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
        };
        let first = Self::fragment(
            self.state.fresh_copy(),
            head,
            SizeSpec::new(available_width, available_height),
        )?;
        let second = Self::fragment(
            self.state.fresh_copy(),
            tail,
            SizeSpec::new(available_width, f32::MAX),
        )?;
        Ok(SplitOutcome::Split { first, second })
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
        self.content.paint(content, renderer);
        Ok(())
    }
}
