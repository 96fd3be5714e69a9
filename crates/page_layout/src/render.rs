//! The drawing sink consumed by node rendering

use crate::{BorderEdges, BorderRadius, Color, NodeId, NodeKind, Outline, Rect};

/// Paints prepared nodes onto a page.
///
/// Implementations decide how primitives become output (PDF operators, a
/// display list, a raster). Node rendering only computes geometry and calls
/// into this trait.
pub trait PageRenderer {
    /// Called before a node paints anything, with its outer bounds
    fn begin_node(&mut self, _id: NodeId, _kind: NodeKind, _bounds: Rect) {}

    /// Called after a node and all of its children painted
    fn end_node(&mut self, _id: NodeId) {}

    fn fill_rect(&mut self, rect: Rect, color: Color, radius: Option<BorderRadius>);

    /// Stroke the present edges around `rect` (the border box)
    fn stroke_border(&mut self, rect: Rect, edges: &BorderEdges, radius: Option<BorderRadius>);

    fn push_clip(&mut self, rect: Rect, radius: Option<BorderRadius>);

    fn pop_clip(&mut self);

    fn place_link(&mut self, rect: Rect, target: &str);

    fn draw_text(&mut self, x: f32, baseline: f32, text: &str, font_size: f32, color: Color);
}

/// Paint fill and border for `outline` inside `outer`, returning the content
/// rectangle.
pub(crate) fn paint_outline(
    outline: &Outline,
    outer: Rect,
    fill: Option<Color>,
    radius: BorderRadius,
    renderer: &mut dyn PageRenderer,
) -> Rect {
    let border_box = outer.inset(outline.margin());
    let radius = if radius.is_zero() {
        None
    } else {
        Some(radius.fitted(border_box.width, border_box.height))
    };
    if let Some(color) = fill {
        renderer.fill_rect(border_box, color, radius);
    }
    if !outline.border().is_empty() {
        renderer.stroke_border(border_box, outline.border(), radius);
    }
    outer.inset(&outline.content_inset())
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRenderer;
    use super::*;
    use crate::{BorderStyle, Edges};

    #[test]
    fn test_paint_outline_returns_content_rect() {
        let mut outline = Outline::default();
        outline.set_margin(Edges::all(5.0)).unwrap();
        outline.set_border(BorderEdges::all(BorderStyle::new(1.0))).unwrap();
        outline.set_padding(Edges::all(2.0)).unwrap();

        let mut renderer = RecordingRenderer::default();
        let content = paint_outline(
            &outline,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Some(Color::WHITE),
            BorderRadius::default(),
            &mut renderer,
        );

        assert_eq!(content, Rect::new(8.0, 8.0, 84.0, 34.0));
        assert_eq!(
            renderer.ops,
            vec!["fill 5 5 90 40".to_string(), "border straight 5 5 90 40".to_string()]
        );
    }

    #[test]
    fn test_paint_outline_without_style_draws_nothing() {
        let mut renderer = RecordingRenderer::default();
        let content = paint_outline(
            &Outline::default(),
            Rect::new(1.0, 2.0, 3.0, 4.0),
            None,
            BorderRadius::all(2.0),
            &mut renderer,
        );
        assert_eq!(content, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert!(renderer.ops.is_empty());
    }
}
