//! Display list renderer
//!
//! Records every primitive a layout tree paints as a `RenderItem`, so pages
//! can be serialized and drawn by a frontend later.

use crate::{PageRender, RenderError, RenderItem, RenderModel, Result};
use page_layout::{BorderEdges, BorderRadius, Color, NodeId, NodeKind, Page, PageRenderer, Rect};

/// A `PageRenderer` that collects render items for one page
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    items: Vec<RenderItem>,
    record_nodes: bool,
    clip_depth: usize,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also record node start/end markers with their bounds
    pub fn with_node_markers(mut self) -> Self {
        self.record_nodes = true;
        self
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<RenderItem> {
        self.items
    }

    /// Clips pushed and not yet popped
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.clip_depth = 0;
    }
}

impl PageRenderer for DisplayList {
    fn begin_node(&mut self, id: NodeId, kind: NodeKind, bounds: Rect) {
        if self.record_nodes {
            self.items.push(RenderItem::NodeStart {
                node_id: id.to_string(),
                kind: format!("{kind:?}"),
                bounds: bounds.into(),
            });
        }
    }

    fn end_node(&mut self, id: NodeId) {
        if self.record_nodes {
            self.items.push(RenderItem::NodeEnd {
                node_id: id.to_string(),
            });
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, radius: Option<BorderRadius>) {
        self.items.push(RenderItem::Rectangle {
            bounds: rect.into(),
            fill: color.into(),
            radii: radius.map(Into::into),
        });
    }

    fn stroke_border(&mut self, rect: Rect, edges: &BorderEdges, radius: Option<BorderRadius>) {
        self.items.push(RenderItem::Border {
            bounds: rect.into(),
            border: edges.into(),
            radii: radius.map(Into::into),
        });
    }

    fn push_clip(&mut self, rect: Rect, radius: Option<BorderRadius>) {
        self.clip_depth += 1;
        self.items.push(RenderItem::PushClip {
            bounds: rect.into(),
            radii: radius.map(Into::into),
        });
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            tracing::warn!(target: "render_model::display_list", "pop_clip without push_clip ignored");
            return;
        }
        self.clip_depth -= 1;
        self.items.push(RenderItem::PopClip);
    }

    fn place_link(&mut self, rect: Rect, target: &str) {
        self.items.push(RenderItem::Link {
            bounds: rect.into(),
            target: target.to_string(),
        });
    }

    fn draw_text(&mut self, x: f32, baseline: f32, text: &str, font_size: f32, color: Color) {
        if text.is_empty() {
            return;
        }
        self.items.push(RenderItem::GlyphRun(crate::GlyphRun {
            text: text.to_string(),
            font_size: font_size as f64,
            color: color.into(),
            x: x as f64,
            y: baseline as f64,
        }));
    }
}

/// Render one page into a display list
pub fn render_page(page: &Page) -> Result<PageRender> {
    let mut list = DisplayList::new();
    page.render(&mut list)?;
    if list.clip_depth() > 0 {
        return Err(RenderError::UnbalancedClip {
            page_index: page.index(),
            open: list.clip_depth(),
        });
    }
    Ok(PageRender {
        page_index: page.index() as u32,
        width: page.page_width() as f64,
        height: page.page_height() as f64,
        items: list.into_items(),
    })
}

/// Render paginated output into a render model
pub fn render_pages(pages: &[Page]) -> Result<RenderModel> {
    let mut model = RenderModel::new();
    for page in pages {
        let rendered = render_page(page)?;
        tracing::debug!(
            target: "render_model::display_list",
            page = page.index(),
            items = rendered.items.len(),
            "page rendered"
        );
        model.add_page(rendered);
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_markers_are_opt_in() {
        let id = NodeId::new();
        let bounds = Rect::new(0.0, 0.0, 5.0, 5.0);

        let mut plain = DisplayList::new();
        plain.begin_node(id, NodeKind::Box, bounds);
        plain.end_node(id);
        assert!(plain.items().is_empty());

        let mut marked = DisplayList::new().with_node_markers();
        marked.begin_node(id, NodeKind::Box, bounds);
        marked.end_node(id);
        assert_eq!(marked.items().len(), 2);
        assert!(matches!(&marked.items()[0], RenderItem::NodeStart { kind, .. } if kind == "Box"));
    }

    #[test]
    fn test_unmatched_pop_clip_ignored() {
        let mut list = DisplayList::new();
        list.pop_clip();
        assert!(list.items().is_empty());

        list.push_clip(Rect::new(0.0, 0.0, 1.0, 1.0), None);
        assert_eq!(list.clip_depth(), 1);
        list.pop_clip();
        assert_eq!(list.clip_depth(), 0);
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn test_empty_text_skipped() {
        let mut list = DisplayList::new();
        list.draw_text(0.0, 10.0, "", 12.0, Color::BLACK);
        assert!(list.items().is_empty());
    }
}
