//! Integration tests rendering paginated layouts into display lists

use page_layout::{
    BorderGridStrategy, BorderStyle, BoxElement, Cell, Color, Edges, HeightSpec, LayoutConfig,
    LayoutContext, LayoutNode, Leaf, PageConfig, Paginator, Table, TextContent, VBox, WidthSpec,
};
use proptest::prelude::*;
use render_model::{render_pages, RenderItem, RenderModel};

fn glyph_texts(model: &RenderModel) -> Vec<String> {
    model
        .pages
        .iter()
        .flat_map(|page| page.items.iter())
        .filter_map(|item| match item {
            RenderItem::GlyphRun(run) => Some(run.text.clone()),
            _ => None,
        })
        .collect()
}

fn paragraph_stack(count: usize) -> VBox {
    let mut vbox = VBox::new();
    for index in 0..count {
        let text = TextContent::new(format!("paragraph {index}"), 10.0).with_line_height(12.0);
        vbox.add_row(Leaf::new(text), HeightSpec::Auto).unwrap();
    }
    vbox
}

#[test]
fn test_table_pages_render_header_each_page() {
    let mut table = Table::new(vec![WidthSpec::Star, WidthSpec::Star]).unwrap();
    table
        .add_row([
            Cell::new(Leaf::new(TextContent::new("Key", 10.0))),
            Cell::new(Leaf::new(TextContent::new("Value", 10.0))),
        ])
        .unwrap();
    for index in 0..30 {
        table
            .add_row([
                Cell::new(Leaf::new(TextContent::new(format!("k{index}"), 10.0))),
                Cell::new(Leaf::new(TextContent::new(format!("v{index}"), 10.0))),
            ])
            .unwrap();
    }
    table.set_header_row_count(1).unwrap();
    table
        .apply_grid(BorderGridStrategy::FullNoOuter, BorderStyle::new(0.5))
        .unwrap();

    let mut ctx = LayoutContext::new(LayoutConfig::default());
    let pages = Paginator::new(PageConfig::custom(300.0, 250.0))
        .paginate(&mut ctx, table)
        .unwrap();
    let model = render_pages(&pages).unwrap();

    assert_eq!(model.pages.len(), pages.len());
    assert!(model.pages.len() > 1);
    let texts = glyph_texts(&model);
    assert_eq!(
        texts.iter().filter(|text| *text == "Key").count(),
        model.pages.len()
    );
    for index in 0..30 {
        assert_eq!(texts.iter().filter(|text| **text == format!("k{index}")).count(), 1);
    }
    assert!(model.pages.iter().all(|page| page.items.iter().any(
        |item| matches!(item, RenderItem::Border { .. })
    )));
}

#[test]
fn test_styled_box_items_in_paint_order() {
    let mut element = BoxElement::with_element(Leaf::new(TextContent::new("hello", 10.0)));
    element
        .set_fill_color(Some(Color::GRAY))
        .unwrap()
        .set_clip_content(true)
        .unwrap()
        .set_link("https://example.com")
        .unwrap();
    element.set_padding(Edges::all(4.0)).unwrap();

    let mut ctx = LayoutContext::new(LayoutConfig::default());
    let pages = Paginator::new(PageConfig::letter())
        .paginate(&mut ctx, element)
        .unwrap();
    let model = render_pages(&pages).unwrap();

    let kinds: Vec<&str> = model.pages[0]
        .items
        .iter()
        .map(|item| match item {
            RenderItem::Rectangle { .. } => "fill",
            RenderItem::Link { .. } => "link",
            RenderItem::PushClip { .. } => "clip",
            RenderItem::GlyphRun(_) => "text",
            RenderItem::PopClip => "unclip",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["fill", "link", "clip", "text", "unclip"]);
}

#[test]
fn test_model_serializes_to_json() {
    let mut ctx = LayoutContext::new(LayoutConfig::default());
    let pages = Paginator::letter()
        .paginate(&mut ctx, paragraph_stack(3))
        .unwrap();
    let model = render_pages(&pages).unwrap();

    let json = model.to_json().unwrap();
    assert!(json.contains(r#""type":"GlyphRun""#));
    assert_eq!(RenderModel::from_json(&json).unwrap(), model);
}

proptest! {
    #[test]
    fn every_line_rendered_exactly_once(count in 1usize..120) {
        let mut ctx = LayoutContext::new(LayoutConfig::default());
        let pages = Paginator::new(PageConfig::custom(300.0, 300.0))
            .paginate(&mut ctx, paragraph_stack(count))
            .unwrap();
        let model = render_pages(&pages).unwrap();

        let texts = glyph_texts(&model);
        prop_assert_eq!(texts.len(), count);
        for (index, text) in texts.iter().enumerate() {
            prop_assert_eq!(text, &format!("paragraph {index}"));
        }
        prop_assert!(pages.iter().all(|page| !page.overflows()));
    }
}
