//! Outline model - margin, border and padding around a node's content box

use crate::{Edges, LayoutError, Result};
use serde::{Deserialize, Serialize};

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
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Line pattern of a border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashPattern {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Style of a single border edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    /// Line width in points
    pub width: f32,
    pub color: Color,
    pub dash: DashPattern,
}

impl BorderStyle {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            color: Color::BLACK,
            dash: DashPattern::Solid,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// One side of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Border edges; an absent edge has zero width
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderEdges {
    pub top: Option<BorderStyle>,
    pub right: Option<BorderStyle>,
    pub bottom: Option<BorderStyle>,
    pub left: Option<BorderStyle>,
}

impl BorderEdges {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all(style: BorderStyle) -> Self {
        Self {
            top: Some(style),
            right: Some(style),
            bottom: Some(style),
            left: Some(style),
        }
    }

    pub fn edge(&self, side: Side) -> Option<BorderStyle> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set_edge(&mut self, side: Side, style: Option<BorderStyle>) {
        match side {
            Side::Top => self.top = style,
            Side::Right => self.right = style,
            Side::Bottom => self.bottom = style,
            Side::Left => self.left = style,
        }
    }

    pub fn widths(&self) -> Edges {
        let width = |edge: &Option<BorderStyle>| edge.map_or(0.0, |s| s.width);
        Edges::new(
            width(&self.top),
            width(&self.right),
            width(&self.bottom),
            width(&self.left),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// True when all present edges share one style
    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.right == self.bottom && self.bottom == self.left
    }

    fn validate(&self) -> Result<()> {
        for edge in [self.top, self.right, self.bottom, self.left].into_iter().flatten() {
            if !(edge.width >= 0.0) {
                return Err(LayoutError::invalid_config(format!(
                    "border width must be a non-negative number, got {}",
                    edge.width
                )));
            }
        }
        Ok(())
    }
}

/// Corner radii for rounded borders and fills
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl BorderRadius {
    pub fn all(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_right == 0.0
            && self.bottom_left == 0.0
    }

    /// Radii reduced so that adjacent corners never overlap inside `width` x `height`
    pub fn fitted(&self, width: f32, height: f32) -> Self {
        let horizontal = (self.top_left + self.top_right).max(self.bottom_left + self.bottom_right);
        let vertical = (self.top_left + self.bottom_left).max(self.top_right + self.bottom_right);
        let mut factor: f32 = 1.0;
        if horizontal > width && horizontal > 0.0 {
            factor = factor.min(width / horizontal);
        }
        if vertical > height && vertical > 0.0 {
            factor = factor.min(height / vertical);
        }
        Self {
            top_left: self.top_left * factor,
            top_right: self.top_right * factor,
            bottom_right: self.bottom_right * factor,
            bottom_left: self.bottom_left * factor,
        }
    }
}

/// The margin + border + padding envelope around a net content box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Outline {
    margin: Edges,
    border: BorderEdges,
    padding: Edges,
}

impl Outline {
    pub fn margin(&self) -> &Edges {
        &self.margin
    }

    pub fn border(&self) -> &BorderEdges {
        &self.border
    }

    pub fn padding(&self) -> &Edges {
        &self.padding
    }

    pub fn set_margin(&mut self, margin: Edges) -> Result<()> {
        check_edges("margin", &margin)?;
        self.margin = margin;
        Ok(())
    }

    pub fn set_padding(&mut self, padding: Edges) -> Result<()> {
        check_edges("padding", &padding)?;
        self.padding = padding;
        Ok(())
    }

    pub fn set_border(&mut self, border: BorderEdges) -> Result<()> {
        border.validate()?;
        self.border = border;
        Ok(())
    }

    pub fn set_border_edge(&mut self, side: Side, style: Option<BorderStyle>) -> Result<()> {
        let mut border = self.border;
        border.set_edge(side, style);
        self.set_border(border)
    }

    pub fn outline_x_sum(&self) -> f32 {
        self.margin.x_sum() + self.border.widths().x_sum() + self.padding.x_sum()
    }

    pub fn outline_y_sum(&self) -> f32 {
        self.margin.y_sum() + self.border.widths().y_sum() + self.padding.y_sum()
    }

    /// Distance from the outer edge to the content box on each side
    pub fn content_inset(&self) -> Edges {
        let border = self.border.widths();
        Edges::new(
            self.margin.top + border.top + self.padding.top,
            self.margin.right + border.right + self.padding.right,
            self.margin.bottom + border.bottom + self.padding.bottom,
            self.margin.left + border.left + self.padding.left,
        )
    }

    /// Copy of this outline without the top margin and top border, used for
    /// continuation fragments after a page break
    pub fn without_leading_edge(&self) -> Outline {
        let mut outline = *self;
        outline.margin.top = 0.0;
        outline.border.top = None;
        outline
    }
}

fn check_edges(what: &str, edges: &Edges) -> Result<()> {
    if edges.is_non_negative() {
        Ok(())
    } else {
        Err(LayoutError::invalid_config(format!(
            "{what} must not be negative, got {edges:?}"
        )))
    }
}
