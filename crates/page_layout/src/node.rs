//! Node identity, lifecycle state and the `LayoutNode` capability shared by
//! every element variant.

use crate::{
    BorderEdges, BorderStyle, BoxElement, Cell, Edges, HBox, LayoutContext, LayoutError, Leaf,
    NotSplitReason, Outline, PageRenderer, RenderContext, Result, Side, SizeSpec, SplitOutcome,
    Table, VBox,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a layout node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new random NodeId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of node variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Box,
    HBox,
    VBox,
    Table,
    Cell,
    Leaf,
}

/// Lifecycle and outline bookkeeping composed into every node.
///
/// A node starts unprepared; structural setters are only accepted until the
/// first successful `prepare`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    id: NodeId,
    outline: Outline,
    min_size: SizeSpec,
    max_size: SizeSpec,
    vert_splittable: bool,
    prepared_size: Option<SizeSpec>,
    render_size: Option<SizeSpec>,
}

impl NodeState {
    pub fn new(vert_splittable: bool) -> Self {
        Self {
            id: NodeId::new(),
            outline: Outline::default(),
            min_size: SizeSpec::ZERO,
            max_size: SizeSpec::UNBOUNDED,
            vert_splittable,
            prepared_size: None,
            render_size: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn outline_x_sum(&self) -> f32 {
        self.outline.outline_x_sum()
    }

    pub fn outline_y_sum(&self) -> f32 {
        self.outline.outline_y_sum()
    }

    pub fn min_size(&self) -> SizeSpec {
        self.min_size
    }

    pub fn max_size(&self) -> SizeSpec {
        self.max_size
    }

    pub fn is_vert_splittable(&self) -> bool {
        self.vert_splittable
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared_size.is_some()
    }

    /// Net prepared size, excluding this node's outline
    pub fn prepared_size(&self) -> Result<SizeSpec> {
        self.prepared_size
            .ok_or_else(|| LayoutError::invalid_state(self.id, "node has not been prepared"))
    }

    /// Prepared size plus this node's outline
    pub fn full_size(&self) -> Result<SizeSpec> {
        let prepared = self.prepared_size()?;
        Ok(prepared.plus(self.outline_x_sum(), self.outline_y_sum()))
    }

    /// Net size used when painting; at least the prepared size
    pub fn render_size(&self) -> Result<SizeSpec> {
        match self.render_size {
            Some(size) => Ok(size),
            None => self.prepared_size(),
        }
    }

    pub fn ensure_unprepared(&self, operation: &str) -> Result<()> {
        if self.is_prepared() {
            Err(LayoutError::invalid_state(
                self.id,
                format!("cannot {operation} after the node was prepared"),
            ))
        } else {
            Ok(())
        }
    }

    pub fn set_margin(&mut self, margin: Edges) -> Result<()> {
        self.ensure_unprepared("set margin")?;
        self.outline.set_margin(margin)
    }

    pub fn set_padding(&mut self, padding: Edges) -> Result<()> {
        self.ensure_unprepared("set padding")?;
        self.outline.set_padding(padding)
    }

    pub fn set_border(&mut self, border: BorderEdges) -> Result<()> {
        self.ensure_unprepared("set border")?;
        self.outline.set_border(border)
    }

    pub fn set_border_edge(&mut self, side: Side, style: Option<BorderStyle>) -> Result<()> {
        self.ensure_unprepared("set border")?;
        self.outline.set_border_edge(side, style)
    }

    pub fn set_min_size(&mut self, min_size: SizeSpec) -> Result<()> {
        self.ensure_unprepared("set min size")?;
        check_size("min size", min_size)?;
        self.min_size = min_size;
        Ok(())
    }

    pub fn set_max_size(&mut self, max_size: SizeSpec) -> Result<()> {
        self.ensure_unprepared("set max size")?;
        check_size("max size", max_size)?;
        self.max_size = max_size;
        Ok(())
    }

    pub fn set_vert_splittable(&mut self, vert_splittable: bool) -> Result<()> {
        self.ensure_unprepared("change splittability")?;
        self.vert_splittable = vert_splittable;
        Ok(())
    }

    /// Freeze the computed net size, clamped into the min/max overrides.
    pub(crate) fn mark_prepared(&mut self, net: SizeSpec) -> SizeSpec {
        let prepared = net.non_negative().clamp(self.min_size, self.max_size);
        self.prepared_size = Some(prepared);
        self.render_size = Some(prepared);
        prepared
    }

    /// Freeze a size computed by a split; fragments ignore min/max overrides.
    pub(crate) fn mark_prepared_exact(&mut self, net: SizeSpec) -> SizeSpec {
        let prepared = net.non_negative();
        self.prepared_size = Some(prepared);
        self.render_size = Some(prepared);
        prepared
    }

    /// Grow the render size to at least `min`; never shrinks it.
    pub(crate) fn stretch_render(&mut self, min: SizeSpec) {
        if let Some(prepared) = self.prepared_size {
            let current = self.render_size.unwrap_or(prepared);
            self.render_size = Some(current.max(min.non_negative()));
        }
    }

    /// Drop any stretch so the render size equals the prepared size again
    pub(crate) fn reset_render(&mut self) {
        self.render_size = self.prepared_size;
    }

    /// Unprepared copy of this node's style under a fresh id
    pub(crate) fn fresh_copy(&self) -> NodeState {
        NodeState {
            id: NodeId::new(),
            prepared_size: None,
            render_size: None,
            ..self.clone()
        }
    }

    /// Unprepared copy for the second fragment of a split
    pub(crate) fn continuation(&self, suppress_leading_edge: bool) -> NodeState {
        let mut state = self.fresh_copy();
        if suppress_leading_edge {
            state.outline = state.outline.without_leading_edge();
        }
        state
    }

    pub(crate) fn set_vert_splittable_unchecked(&mut self, vert_splittable: bool) {
        self.vert_splittable = vert_splittable;
    }
}

fn check_size(what: &str, size: SizeSpec) -> Result<()> {
    if size.width >= 0.0 && size.height >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::invalid_config(format!(
            "{what} must not be negative, got {size:?}"
        )))
    }
}

/// The prepare / split / render contract every node fulfils.
///
/// Implementors provide the `on_*` hooks; the provided methods add the
/// lifecycle checks, depth guard and bookkeeping around them.
pub trait LayoutNode {
    fn kind(&self) -> NodeKind;

    fn state(&self) -> &NodeState;

    fn state_mut(&mut self) -> &mut NodeState;

    /// Compute the net content size given the available space including this
    /// node's outline.
    fn on_prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec>;

    /// Split a prepared, splittable node whose prepared height exceeds
    /// `available_height`. Both arguments are net of this node's outline.
    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome>;

    /// Paint into the outer rectangle assigned by the parent
    fn on_render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()>;

    /// Block-style nodes grow their render size to `min`; others ignore it.
    fn stretch_to(&mut self, _min: SizeSpec) {}

    fn id(&self) -> NodeId {
        self.state().id()
    }

    fn outline_x_sum(&self) -> f32 {
        self.state().outline_x_sum()
    }

    fn outline_y_sum(&self) -> f32 {
        self.state().outline_y_sum()
    }

    fn is_vert_splittable(&self) -> bool {
        self.state().is_vert_splittable()
    }

    fn is_prepared(&self) -> bool {
        self.state().is_prepared()
    }

    fn prepared_size(&self) -> Result<SizeSpec> {
        self.state().prepared_size()
    }

    fn full_size(&self) -> Result<SizeSpec> {
        self.state().full_size()
    }

    fn prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        ctx.nested(|ctx| {
            let net = self.on_prepare(ctx, available)?;
            let prepared = self.state_mut().mark_prepared(net);
            ctx.record_prepared();
            tracing::trace!(
                target: "page_layout::prepare",
                node = %self.id(),
                kind = ?self.kind(),
                available_width = available.width,
                available_height = available.height,
                width = prepared.width,
                height = prepared.height,
                "node prepared"
            );
            Ok(prepared)
        })
    }

    fn split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        let prepared = self.prepared_size()?;
        if !ctx.exceeds(prepared.height, available_height) {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::AlreadyFits));
        }
        if !self.is_vert_splittable() {
            return Ok(SplitOutcome::NotSplit(NotSplitReason::NotSplittable));
        }
        ctx.record_split_attempt();
        let outcome =
            ctx.nested(|ctx| self.on_split_vert(ctx, available_width, available_height))?;
        match &outcome {
            SplitOutcome::Split { first, second } => {
                ctx.record_fragments(2);
                tracing::debug!(
                    target: "page_layout::split",
                    node = %self.id(),
                    kind = ?self.kind(),
                    available_height,
                    first_height = first.size.height,
                    second_height = second.size.height,
                    "node split"
                );
            }
            SplitOutcome::NotSplit(reason) => {
                tracing::trace!(
                    target: "page_layout::split",
                    node = %self.id(),
                    kind = ?self.kind(),
                    ?reason,
                    "node not split"
                );
            }
        }
        Ok(outcome)
    }

    fn render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()> {
        self.prepared_size()?;
        renderer.begin_node(self.id(), self.kind(), ctx.bounds);
        let result = self.on_render(ctx, renderer);
        renderer.end_node(self.id());
        result
    }

    fn set_margin(&mut self, margin: Edges) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_margin(margin)?;
        Ok(self)
    }

    fn set_padding(&mut self, padding: Edges) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_padding(padding)?;
        Ok(self)
    }

    fn set_border(&mut self, border: BorderEdges) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_border(border)?;
        Ok(self)
    }

    fn set_border_edge(&mut self, side: Side, style: Option<BorderStyle>) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_border_edge(side, style)?;
        Ok(self)
    }

    fn set_min_size(&mut self, min_size: SizeSpec) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_min_size(min_size)?;
        Ok(self)
    }

    fn set_max_size(&mut self, max_size: SizeSpec) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_max_size(max_size)?;
        Ok(self)
    }

    fn set_exact_size(&mut self, size: SizeSpec) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_min_size(size)?;
        self.state_mut().set_max_size(size)?;
        Ok(self)
    }

    fn set_vert_splittable(&mut self, vert_splittable: bool) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.state_mut().set_vert_splittable(vert_splittable)?;
        Ok(self)
    }
}

/// A node in the layout tree
#[derive(Debug, Clone)]
pub enum Element {
    Box(BoxElement),
    HBox(HBox),
    VBox(VBox),
    Table(Table),
    Cell(Cell),
    Leaf(Leaf),
}

macro_rules! dispatch {
    ($value:expr, $node:ident => $body:expr) => {
        match $value {
            Element::Box($node) => $body,
            Element::HBox($node) => $body,
            Element::VBox($node) => $body,
            Element::Table($node) => $body,
            Element::Cell($node) => $body,
            Element::Leaf($node) => $body,
        }
    };
}

impl LayoutNode for Element {
    fn kind(&self) -> NodeKind {
        dispatch!(self, node => node.kind())
    }

    fn state(&self) -> &NodeState {
        dispatch!(self, node => node.state())
    }

    fn state_mut(&mut self) -> &mut NodeState {
        dispatch!(self, node => node.state_mut())
    }

    fn on_prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        dispatch!(self, node => node.on_prepare(ctx, available))
    }

    fn on_split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        dispatch!(self, node => node.on_split_vert(ctx, available_width, available_height))
    }

    fn on_render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()> {
        dispatch!(self, node => node.on_render(ctx, renderer))
    }

    fn stretch_to(&mut self, min: SizeSpec) {
        dispatch!(self, node => node.stretch_to(min))
    }

    fn prepare(&mut self, ctx: &mut LayoutContext, available: SizeSpec) -> Result<SizeSpec> {
        dispatch!(self, node => node.prepare(ctx, available))
    }

    fn split_vert(
        &self,
        ctx: &mut LayoutContext,
        available_width: f32,
        available_height: f32,
    ) -> Result<SplitOutcome> {
        dispatch!(self, node => node.split_vert(ctx, available_width, available_height))
    }

    fn render(&self, ctx: &RenderContext, renderer: &mut dyn PageRenderer) -> Result<()> {
        dispatch!(self, node => node.render(ctx, renderer))
    }
}

impl From<BoxElement> for Element {
    fn from(node: BoxElement) -> Self {
        Element::Box(node)
    }
}

impl From<HBox> for Element {
    fn from(node: HBox) -> Self {
        Element::HBox(node)
    }
}

impl From<VBox> for Element {
    fn from(node: VBox) -> Self {
        Element::VBox(node)
    }
}

impl From<Table> for Element {
    fn from(node: Table) -> Self {
        Element::Table(node)
    }
}

impl From<Cell> for Element {
    fn from(node: Cell) -> Self {
        Element::Cell(node)
    }
}

impl From<Leaf> for Element {
    fn from(node: Leaf) -> Self {
        Element::Leaf(node)
    }
}
