//! Render item types

use serde::{Deserialize, Serialize};

/// A rectangle in render coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

impl From<page_layout::Rect> for Rect {
    fn from(r: page_layout::Rect) -> Self {
        Self {
            x: r.x as f64,
            y: r.y as f64,
            width: r.width as f64,
            height: r.height as f64,
        }
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<page_layout::Color> for Color {
    fn from(c: page_layout::Color) -> Self {
        Self::rgba(c.r, c.g, c.b, c.a)
    }
}

/// Corner radii of a rounded rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl From<page_layout::BorderRadius> for CornerRadii {
    fn from(r: page_layout::BorderRadius) -> Self {
        Self {
            top_left: r.top_left as f64,
            top_right: r.top_right as f64,
            bottom_right: r.bottom_right as f64,
            bottom_left: r.bottom_left as f64,
        }
    }
}

/// Stroke dash style for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashStyleRender {
    Solid,
    Dash,
    Dot,
}

impl From<page_layout::DashPattern> for DashStyleRender {
    fn from(dash: page_layout::DashPattern) -> Self {
        match dash {
            page_layout::DashPattern::Solid => Self::Solid,
            page_layout::DashPattern::Dashed => Self::Dash,
            page_layout::DashPattern::Dotted => Self::Dot,
        }
    }
}

/// One border edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderEdgeRender {
    pub width: f64,
    pub color: Color,
    pub dash_style: DashStyleRender,
}

impl From<page_layout::BorderStyle> for BorderEdgeRender {
    fn from(style: page_layout::BorderStyle) -> Self {
        Self {
            width: style.width as f64,
            color: style.color.into(),
            dash_style: style.dash.into(),
        }
    }
}

/// Border render info (all four edges, absent edges are not drawn)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderRender {
    pub top: Option<BorderEdgeRender>,
    pub right: Option<BorderEdgeRender>,
    pub bottom: Option<BorderEdgeRender>,
    pub left: Option<BorderEdgeRender>,
}

impl From<&page_layout::BorderEdges> for BorderRender {
    fn from(edges: &page_layout::BorderEdges) -> Self {
        Self {
            top: edges.top.map(Into::into),
            right: edges.right.map(Into::into),
            bottom: edges.bottom.map(Into::into),
            left: edges.left.map(Into::into),
        }
    }
}

/// A line of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    /// The text to render
    pub text: String,
    /// Font size in points
    pub font_size: f64,
    /// Text color
    pub color: Color,
    /// Position (baseline start)
    pub x: f64,
    pub y: f64,
}

/// Render item types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    /// Start of a layout node's output
    NodeStart {
        node_id: String,
        kind: String,
        bounds: Rect,
    },
    /// End of a layout node's output
    NodeEnd { node_id: String },
    /// A glyph run (text)
    GlyphRun(GlyphRun),
    /// A filled rectangle
    Rectangle {
        bounds: Rect,
        fill: Color,
        radii: Option<CornerRadii>,
    },
    /// A border around a border box
    Border {
        bounds: Rect,
        border: BorderRender,
        radii: Option<CornerRadii>,
    },
    /// Start clipping to a rectangle
    PushClip {
        bounds: Rect,
        radii: Option<CornerRadii>,
    },
    /// Restore the clip before the matching `PushClip`
    PopClip,
    /// A clickable link area
    Link { bounds: Rect, target: String },
}

/// A rendered page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRender {
    pub page_index: u32,
    pub width: f64,
    pub height: f64,
    pub items: Vec<RenderItem>,
}

/// The complete render model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub pages: Vec<PageRender>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    pub fn add_page(&mut self, page: PageRender) {
        self.pages.push(page);
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
