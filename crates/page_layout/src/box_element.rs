//! Box - a styled container with at most one child

use crate::{
    BorderRadius, Color, Element, ElementWithSize, Edges, LayoutContext, LayoutNode, NodeKind,
    NodeState, NotSplitReason, Outline, PageRenderer, Rect, RenderContext, Result, SizeSpec,
    SplitOutcome,
};
use serde::{Deserialize, Serialize};

/// Horizontal placement of a box's child inside a wider render area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    /// Offset of content of `prepared` length inside `render` length
    pub fn indent(self, render: f32, prepared: f32) -> f32 {
        let free = (render - prepared).max(0.0);
        match self {
            HorizontalAlign::Left => 0.0,
            HorizontalAlign::Center => free / 2.0,
            HorizontalAlign::Right => free,
        }
    }
}

/// Vertical placement of a box's child inside a taller render area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    pub fn indent(self, render: f32, prepared: f32) -> f32 {
        let free = (render - prepared).max(0.0);
        match self {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => free / 2.0,
            VerticalAlign::Bottom => free,
        }
    }
}

/// Presentation attributes of a box, carried over to split fragments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    /// Take the full width offered by the parent when rendering
    pub full_width: bool,
    pub fill_color: Option<Color>,
    pub border_radius: BorderRadius,
    /// Clip the child to the padding box
    pub clip_content: bool,
    /// Link annotation target covering the border box
    pub link: Option<String>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            full_width: true,
            fill_color: None,
            border_radius: BorderRadius::default(),
            clip_content: false,
            link: None,
        }
    }
}

/// The nested rectangles of a rendered box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    /// Outer bounds including the margin
    pub outer: Rect,
    /// Area enclosed by the border, filled with the background
    pub border_box: Rect,
    /// Area inside the border
    pub padding_box: Rect,
    /// Area available to the child
    pub content_box: Rect,
    /// Corner radii fitted to the border box; `None` for square corners
    pub radius: Option<BorderRadius>,
}

impl BoxShape {
    pub fn new(outline: &Outline, outer: Rect, radius: BorderRadius) -> Self {
        let border_box = outer.inset(outline.margin());
        let padding_box = border_box.inset(&outline.border().widths());
        let content_box = padding_box.inset(outline.padding());
        let radius = if radius.is_zero() {
            None
        } else {
            Some(radius.fitted(border_box.width, border_box.height))
        };
        Self {
            outer,
            border_box,
            padding_box,
            content_box,
            radius,
        }
    }
}

/// A container with a single optional child
#[derive(Debug, Clone)]
pub struct BoxElement {
    state: NodeState,
    element: Option<Box<Element>>,
    style: BoxStyle,
}

impl Default for BoxElement {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxElement {
    pub fn new() -> Self {
        Self {
            state: NodeState::new(false),
            element: None,
            style: BoxStyle::default(),
        }
    }

    pub fn with_element(element: impl Into<Element>) -> Self {
        Self {
            element: Some(Box::new(element.into())),
            ..Self::new()
        }
    }

    pub(crate) fn from_parts(state: NodeState, element: Option<Element>, style: BoxStyle) -> Self {
        Self {
            state,
            element: element.map(Box::new),
            style,
        }
    }

    pub fn element(&self) -> Option<&Element> {
        self.element.as_deref()
    }

    pub fn style(&self) -> &BoxStyle {
        &self.style
    }

    pub fn set_element(&mut self, element: impl Into<Element>) -> Result<&mut Self> {
        self.state.ensure_unprepared("set element")?;
        self.element = Some(Box::new(element.into()));
        Ok(self)
    }

    pub fn set_horizontal_align(&mut self, align: HorizontalAlign) -> Result<&mut Self> {
        self.state.ensure_unprepared("set alignment")?;
        self.style.horizontal_align = align;
        Ok(self)
    }

    pub fn set_vertical_align(&mut self, align: VerticalAlign) -> Result<&mut Self> {
        self.state.ensure_unprepared("set alignment")?;
        self.style.vertical_align = align;
        Ok(self)
    }

    pub fn set_full_width(&mut self, full_width: bool) -> Result<&mut Self> {
        self.state.ensure_unprepared("set full width")?;
        self.style.full_width = full_width;
        Ok(self)
    }

    pub fn set_fill_color(&mut self, color: Option<Color>) -> Result<&mut Self> {
        self.state.ensure_unprepared("set fill color")?;
        self.style.fill_color = color;
        Ok(self)
    }

    pub fn set_border_radius(&mut self, radius: BorderRadius) -> Result<&mut Self> {
        self.state.ensure_unprepared("set border radius")?;
        self.style.border_radius = radius;
        Ok(self)
    }

    pub fn set_clip_content(&mut self, clip: bool) -> Result<&mut Self> {
        self.state.ensure_unprepared("set clipping")?;
        self.style.clip_content = clip;
        Ok(self)
    }

    pub fn set_link(&mut self, target: impl Into<String>) -> Result<&mut Self> {
        self.state.ensure_unprepared("set link")?;
        self.style.link = Some(target.into());
        Ok(self)
    }

    /// Offset of the child inside a content area of `render` size
    pub fn content_offset(&self, render: SizeSpec) -> Result<(f32, f32)> {
        let prepared = self.state.prepared_size()?;
        Ok((
            self.style.horizontal_align.indent(render.width, prepared.width),
            self.style.vertical_align.indent(render.height, prepared.height),
        ))
    }

    /// Outer rectangle painted for the given parent assignment
    pub fn render_bounds(&self, ctx: &RenderContext) -> Result<Rect> {
        let own = self
            .state
            .render_size()?
            .plus(self.state.outline_x_sum(), self.state.outline_y_sum());
        let width = if self.style.full_width {
            ctx.width().max(own.width)
        } else {
            own.width
        };
        Ok(Rect::new(ctx.x(), ctx.y(), width, own.height))
    }

    /// Border-radius aware geometry of this box for the given parent assignment
    pub fn shape(&self, ctx: &RenderContext) -> Result<BoxShape> {
        Ok(BoxShape::new(
            self.state.outline(),
            self.render_bounds(ctx)?,
            self.style.border_radius,
        ))
    }

    /// Wrap a prepared child fragment in a fresh copy of this box's style
    fn wrap_fragment(
        &self,
        state: NodeState,
        fragment: ElementWithSize,
        width: f32,
    ) -> Result<ElementWithSize> {
        let height = fragment.full_size.height;
        let mut wrapper = BoxElement::from_parts(state, Some(fragment.element), self.style.clone());
        wrapper.state.mark_prepared_exact(SizeSpec::new(width, height));
        ElementWithSize::new(wrapper)
    }
}

impl LayoutNode for BoxElement {
    fn kind(&self) -> NodeKind {
        NodeKind::Box
    }

    fn state(&self) -> &NodeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    fn on_prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        let Some(element) = self.element.as_deref_mut() else {
            return Ok(SizeSpec::ZERO);
        };
        let child_available = available
            .minus(self.state.outline_x_sum(), self.state.outline_y_sum())
            .non_negative();
        let child_size = element.prepare(ctx, child_available)?;
        Ok(child_size.plus(element.outline_x_sum(), element.outline_y_sum()))
    }

    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        let Some(element) = self.element.as_deref() else {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
        };
        let outcome = element.split_vert(
            ctx,
            available_width - element.outline_x_sum(),
            available_height - element.outline_y_sum(),
        )?;
        let (first, second) = match outcome {
            SplitOutcome::Split { first, second } => (first, second),
            not_split => return Ok(not_split),
        };

        let width = self.state.prepared_size()?.width;
        let suppress = ctx.config().suppress_leading_edge_on_continuation;
        Ok(SplitOutcome::Split {
            first: self.wrap_fragment(self.state.fresh_copy(), first, width)?,
            second: self.wrap_fragment(self.state.continuation(suppress), second, width)?,
        })
    }

    fn on_render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()> {
        let shape = self.shape(ctx)?;
        if let Some(color) = self.style.fill_color {
            renderer.fill_rect(shape.border_box, color, shape.radius);
        }
        if !self.state.outline().border().is_empty() {
            renderer.stroke_border(shape.border_box, self.state.outline().border(), shape.radius);
        }
        if let Some(target) = &self.style.link {
            renderer.place_link(shape.border_box, target);
        }

        let Some(element) = self.element.as_deref() else {
            return Ok(());
        };
        let (dx, dy) = self.content_offset(shape.content_box.size())?;
        let child_height = element.full_size()?.height;
        let child_ctx = RenderContext::new(
            shape.content_box.x + dx,
            shape.content_box.y + dy,
            (shape.content_box.width - dx).max(0.0),
            child_height,
        );

        if self.style.clip_content {
            let border = self.state.outline().border().widths();
            let inner_radius = shape.radius.map(|radius| shrink_radius(radius, &border));
            renderer.push_clip(shape.padding_box, inner_radius);
            let result = element.render(&child_ctx, renderer);
            renderer.pop_clip();
            result
        } else {
            element.render(&child_ctx, renderer)
        }
    }

    fn stretch_to(&mut self, min: SizeSpec) {
        self.state.stretch_render(min);
    }
}

/// Radii of the padding box inside a rounded border
fn shrink_radius(radius: BorderRadius, border: &Edges) -> BorderRadius {
    BorderRadius {
        top_left: (radius.top_left - border.top.max(border.left)).max(0.0),
        top_right: (radius.top_right - border.top.max(border.right)).max(0.0),
        bottom_right: (radius.bottom_right - border.bottom.max(border.right)).max(0.0),
        bottom_left: (radius.bottom_left - border.bottom.max(border.left)).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::RecordingRenderer;
    use crate::{BorderEdges, BorderStyle, LayoutConfig, LayoutError, Leaf, TextContent};

    fn ctx() -> LayoutContext {
        LayoutContext::new(LayoutConfig::default())
    }

    fn text_box(lines: usize) -> BoxElement {
        let text = vec!["x"; lines].join("\n");
        let mut content = BoxElement::with_element(Leaf::new(
            TextContent::new(text, 10.0).with_line_height(10.0),
        ));
        content.set_vert_splittable(true).unwrap();
        content
    }

    #[test]
    fn test_empty_box_is_zero_sized() {
        let mut node = BoxElement::new();
        node.set_padding(Edges::all(3.0)).unwrap();
        let size = node.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();
        assert_eq!(size, SizeSpec::ZERO);
        assert_eq!(node.full_size().unwrap(), SizeSpec::new(6.0, 6.0));
    }

    #[test]
    fn test_prepare_adds_child_outline() {
        let mut child = Leaf::spacer(40.0, 20.0);
        child.set_margin(Edges::all(5.0)).unwrap();
        let mut node = BoxElement::with_element(child);
        node.set_padding(Edges::all(2.0)).unwrap();

        let size = node.prepare(&mut ctx(), SizeSpec::new(200.0, 200.0)).unwrap();
        assert_eq!(size, SizeSpec::new(50.0, 30.0));
        assert_eq!(node.full_size().unwrap(), SizeSpec::new(54.0, 34.0));
    }

    #[test]
    fn test_setters_fail_after_prepare() {
        let mut node = BoxElement::with_element(Leaf::spacer(1.0, 1.0));
        node.prepare(&mut ctx(), SizeSpec::new(10.0, 10.0)).unwrap();
        assert!(matches!(
            node.set_element(Leaf::spacer(2.0, 2.0)),
            Err(LayoutError::InvalidState { .. })
        ));
        assert!(node.set_margin(Edges::all(1.0)).is_err());
        assert!(node.set_horizontal_align(HorizontalAlign::Center).is_err());
    }

    #[test]
    fn test_alignment_offsets() {
        let mut node = BoxElement::with_element(Leaf::spacer(40.0, 20.0));
        node.set_horizontal_align(HorizontalAlign::Center).unwrap();
        node.set_vertical_align(VerticalAlign::Bottom).unwrap();
        node.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();

        let (dx, dy) = node.content_offset(SizeSpec::new(100.0, 50.0)).unwrap();
        assert_eq!(dx, 30.0);
        assert_eq!(dy, 30.0);

        let (dx, dy) = node.content_offset(SizeSpec::new(10.0, 10.0)).unwrap();
        assert_eq!((dx, dy), (0.0, 0.0));
    }

    #[test]
    fn test_split_already_fits() {
        let mut node = text_box(3);
        node.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();
        let outcome = node.split_vert(&mut ctx(), 100.0, 30.0).unwrap();
        assert_eq!(outcome.not_split_reason(), Some(NotSplitReason::AlreadyFits));
    }

    #[test]
    fn test_split_wraps_child_fragments() {
        let mut node = text_box(5);
        node.set_margin(Edges::all(4.0)).unwrap();
        node.set_border(BorderEdges::all(BorderStyle::new(1.0))).unwrap();
        node.set_fill_color(Some(Color::GRAY)).unwrap();
        let mut layout = ctx();
        node.prepare(&mut layout, SizeSpec::new(100.0, 100.0)).unwrap();
        assert_eq!(node.prepared_size().unwrap().height, 50.0);

        let (first, second) = node
            .split_vert(&mut layout, 90.0, 25.0)
            .unwrap()
            .into_fragments()
            .unwrap();
        assert_eq!(first.size.height, 20.0);
        assert_eq!(second.size.height, 30.0);

        let Element::Box(first_box) = &first.element else {
            panic!("expected box fragment");
        };
        let Element::Box(second_box) = &second.element else {
            panic!("expected box fragment");
        };
        assert_eq!(first_box.state().outline(), node.state().outline());
        assert_eq!(second_box.state().outline().margin().top, 0.0);
        assert!(second_box.state().outline().border().top.is_none());
        assert_eq!(second_box.style().fill_color, Some(Color::GRAY));
        assert_eq!(second.full_size.height, 30.0 + 4.0 + 1.0);
        assert_ne!(first_box.id(), node.id());
    }

    #[test]
    fn test_split_keeps_leading_edge_when_configured() {
        let mut node = text_box(5);
        node.set_margin(Edges::all(4.0)).unwrap();
        let mut layout =
            LayoutContext::new(LayoutConfig::default().with_leading_edge_suppression(false));
        node.prepare(&mut layout, SizeSpec::new(100.0, 100.0)).unwrap();
        let (_, second) = node
            .split_vert(&mut layout, 90.0, 25.0)
            .unwrap()
            .into_fragments()
            .unwrap();
        assert_eq!(second.element.state().outline().margin().top, 4.0);
    }

    #[test]
    fn test_split_propagates_child_refusal() {
        let mut node = BoxElement::with_element(Leaf::spacer(10.0, 100.0));
        node.set_vert_splittable(true).unwrap();
        node.prepare(&mut ctx(), SizeSpec::new(100.0, 200.0)).unwrap();
        let outcome = node.split_vert(&mut ctx(), 100.0, 50.0).unwrap();
        assert_eq!(outcome.not_split_reason(), Some(NotSplitReason::NotSplittable));
    }

    #[test]
    fn test_render_fill_border_and_child() {
        let mut node = BoxElement::with_element(Leaf::spacer(20.0, 10.0));
        node.set_padding(Edges::all(2.0)).unwrap();
        node.set_border(BorderEdges::all(BorderStyle::new(1.0))).unwrap();
        node.set_fill_color(Some(Color::WHITE)).unwrap();
        node.set_horizontal_align(HorizontalAlign::Right).unwrap();
        node.set_link("https://example.com").unwrap();
        node.prepare(&mut ctx(), SizeSpec::new(100.0, 100.0)).unwrap();

        let mut renderer = RecordingRenderer::default();
        node.render(&RenderContext::new(0.0, 0.0, 100.0, 16.0), &mut renderer)
            .unwrap();

        assert_eq!(renderer.ops[0], "fill 0 0 100 16");
        assert_eq!(renderer.ops[1], "border straight 0 0 100 16");
        assert_eq!(renderer.ops[2], "link https://example.com");
        assert_eq!(renderer.rects[1], (NodeKind::Leaf, Rect::new(77.0, 3.0, 20.0, 10.0)));
    }

    #[test]
    fn test_render_requires_prepare() {
        let node = BoxElement::new();
        let mut renderer = RecordingRenderer::default();
        assert!(node
            .render(&RenderContext::new(0.0, 0.0, 10.0, 10.0), &mut renderer)
            .is_err());
    }

    #[test]
    fn test_rounded_shape() {
        let mut node = BoxElement::with_element(Leaf::spacer(20.0, 10.0));
        node.set_border_radius(BorderRadius::all(4.0)).unwrap();
        node.set_margin(Edges::all(1.0)).unwrap();
        node.prepare(&mut ctx(), SizeSpec::new(50.0, 50.0)).unwrap();
        let shape = node.shape(&RenderContext::new(0.0, 0.0, 50.0, 12.0)).unwrap();
        assert_eq!(shape.border_box, Rect::new(1.0, 1.0, 48.0, 10.0));
        assert_eq!(shape.radius, Some(BorderRadius::all(4.0)));
    }
}
