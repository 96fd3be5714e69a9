//! Pagination
//!
//! Flows a prepared layout tree onto pages of a fixed content area by
//! repeatedly splitting the remaining content vertically.
//!
//! Key features:
//! - Standard page sizes (Letter, A4, Legal) and custom sizes
//! - Page margins
//! - Overflowing pages when content refuses to split
//! - A page cap from `LayoutConfig::max_pages`

use crate::{
    Edges, Element, LayoutContext, LayoutError, LayoutNode, LayoutWarning, NotSplitReason,
    PageRenderer, Rect, RenderContext, Result, SplitOutcome,
};
use serde::{Deserialize, Serialize};

/// Standard page sizes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// US Letter (8.5" x 11")
    #[default]
    Letter,
    /// A4 (210mm x 297mm)
    A4,
    /// Legal (8.5" x 14")
    Legal,
    /// Custom size in points
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Get the width and height in points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.276, 841.89),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Page geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_size: PageSize,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::letter()
    }
}

impl PageConfig {
    /// Letter with one inch margins
    pub fn letter() -> Self {
        Self::sized(PageSize::Letter)
    }

    /// A4 with one inch margins
    pub fn a4() -> Self {
        Self::sized(PageSize::A4)
    }

    /// Legal with one inch margins
    pub fn legal() -> Self {
        Self::sized(PageSize::Legal)
    }

    pub fn custom(width: f32, height: f32) -> Self {
        Self::sized(PageSize::Custom { width, height })
    }

    fn sized(page_size: PageSize) -> Self {
        let (page_width, page_height) = page_size.dimensions();
        Self {
            page_size,
            page_width,
            page_height,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
        }
    }

    pub fn with_margins(mut self, margins: Edges) -> Self {
        self.margin_top = margins.top;
        self.margin_right = margins.right;
        self.margin_bottom = margins.bottom;
        self.margin_left = margins.left;
        self
    }

    pub fn content_width(&self) -> f32 {
        (self.page_width - self.margin_left - self.margin_right).max(0.0)
    }

    pub fn content_height(&self) -> f32 {
        (self.page_height - self.margin_top - self.margin_bottom).max(0.0)
    }

    /// The area inside the margins
    pub fn content_area(&self) -> Rect {
        Rect::new(
            self.margin_left,
            self.margin_top,
            self.content_width(),
            self.content_height(),
        )
    }
}

/// One laid out page
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    page_width: f32,
    page_height: f32,
    content_area: Rect,
    element: Element,
    tolerance: f32,
}

impl Page {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    pub fn content_area(&self) -> Rect {
        self.content_area
    }

    /// The fragment placed on this page
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// True when the element is taller than the content area beyond the
    /// layout tolerance
    pub fn overflows(&self) -> bool {
        self.element
            .full_size()
            .map(|size| size.height - self.content_area.height > self.tolerance)
            .unwrap_or(false)
    }

    /// Render the page's element at the content origin
    pub fn render(&self, renderer: &mut dyn PageRenderer) -> Result<()> {
        let height = self.element.full_size()?.height;
        let ctx = RenderContext::new(
            self.content_area.x,
            self.content_area.y,
            self.content_area.width,
            height,
        );
        self.element.render(&ctx, renderer)
    }
}

/// Splits a layout tree across pages
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PageConfig,
}

impl Paginator {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Paginator for Letter pages
    pub fn letter() -> Self {
        Self::new(PageConfig::letter())
    }

    /// Paginator for A4 pages
    pub fn a4() -> Self {
        Self::new(PageConfig::a4())
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PageConfig {
        &mut self.config
    }

    /// Prepare `root` for the content area and split it into pages
    pub fn paginate(&self, ctx: &mut LayoutContext, root: impl Into<Element>) -> Result<Vec<Page>> {
        let content_area = self.config.content_area();
        let mut current: Element = root.into();
        current.prepare(ctx, content_area.size())?;

        let max_pages = ctx.config().max_pages;
        let mut pages = Vec::new();
        loop {
            if pages.len() >= max_pages {
                return Err(LayoutError::TooManyPages { max_pages });
            }
            let available_width = content_area.width - current.outline_x_sum();
            let available_height = content_area.height - current.outline_y_sum();
            let outcome = current.split_vert(ctx, available_width, available_height)?;

            match outcome {
                SplitOutcome::Split { first, second } => {
                    pages.push(self.page(ctx, pages.len(), first.element));
                    current = second.element;
                }
                SplitOutcome::NotSplit(reason) => {
                    if reason != NotSplitReason::AlreadyFits {
                        ctx.warn(LayoutWarning::UnsplittableOverflow {
                            node_id: current.id(),
                            page_index: pages.len(),
                            height: current.full_size()?.height,
                            available: content_area.height,
                        });
                    }
                    pages.push(self.page(ctx, pages.len(), current));
                    break;
                }
            }
        }

        tracing::debug!(
            target: "page_layout::paginate",
            pages = pages.len(),
            content_width = content_area.width,
            content_height = content_area.height,
            "pagination complete"
        );
        Ok(pages)
    }

    fn page(&self, ctx: &LayoutContext, index: usize, element: Element) -> Page {
        tracing::trace!(
            target: "page_layout::paginate",
            page = index,
            node = %element.id(),
            "page filled"
        );
        Page {
            index,
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            content_area: self.config.content_area(),
            element,
            tolerance: ctx.config().epsilon,
        }
    }
}
