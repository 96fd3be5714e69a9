//! Plain text content broken into lines
//!
//! Break opportunities follow UAX #14 via `unicode-linebreak`; glyph advances
//! come from a pluggable `FontMetrics`. Shaping and font loading are outside
//! this crate.

use crate::{Color, ContentMeasurer, PageRenderer, Rect, SizeSpec};
use std::fmt;
use std::sync::Arc;

/// Small tolerance so that exact fits are not lost to rounding
const FIT_TOLERANCE: f32 = 0.001;

/// Advance widths for a font
pub trait FontMetrics: fmt::Debug + Send + Sync {
    /// Horizontal advance of `text` at `font_size`
    fn advance(&self, text: &str, font_size: f32) -> f32;

    /// Distance from the top of a line box to the baseline
    fn ascent(&self, font_size: f32) -> f32 {
        font_size * 0.8
    }
}

/// Every character advances by the same fraction of the font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
    pub em_ratio: f32,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl FontMetrics for FixedAdvanceMetrics {
    fn advance(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.em_ratio
    }
}

/// Text leaf content, splittable between lines
#[derive(Debug, Clone)]
pub struct TextContent {
    text: String,
    font_size: f32,
    line_height: f32,
    color: Color,
    metrics: Arc<dyn FontMetrics>,
    lines: Vec<String>,
    /// Fragments produced by a split keep their lines as they are
    pre_broken: bool,
}

impl TextContent {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            line_height: font_size * 1.2,
            color: Color::BLACK,
            metrics: Arc::new(FixedAdvanceMetrics::default()),
            lines: Vec::new(),
            pre_broken: false,
        }
    }

    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height.max(0.0);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines from the last measurement
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    fn with_lines(&self, lines: &[String]) -> TextContent {
        TextContent {
            text: lines.join("\n"),
            lines: lines.to_vec(),
            pre_broken: true,
            ..self.clone()
        }
    }

    fn line_width(&self, line: &str) -> f32 {
        self.metrics.advance(line.trim_end(), self.font_size)
    }

    /// Greedy line breaking at the allowed and mandatory opportunities
    fn break_lines(&self, max_width: f32) -> Vec<String> {
        use unicode_linebreak::{linebreaks, BreakOpportunity};

        let mut lines = Vec::new();
        let mut current = String::new();
        let mut segment_start = 0;

        for (offset, opportunity) in linebreaks(&self.text) {
            let segment = &self.text[segment_start..offset];
            segment_start = offset;

            let candidate_width = self.metrics.advance(
                format!("{current}{segment}").trim_end(),
                self.font_size,
            );
            if !current.is_empty() && candidate_width > max_width + FIT_TOLERANCE {
                lines.push(std::mem::take(&mut current).trim_end().to_string());
            }
            current.push_str(segment);

            if opportunity == BreakOpportunity::Mandatory {
                let line = std::mem::take(&mut current);
                lines.push(line.trim_end().to_string());
            }
        }
        if !current.is_empty() {
            lines.push(current.trim_end().to_string());
        }
        lines
    }
}

impl ContentMeasurer for TextContent {
    fn measure(&mut self, available: SizeSpec) -> SizeSpec {
        if !self.pre_broken {
            self.lines = if self.text.is_empty() {
                Vec::new()
            } else {
                self.break_lines(available.width)
            };
        }
        let width = self
            .lines
            .iter()
            .map(|line| self.line_width(line))
            .fold(0.0, f32::max);
        SizeSpec::new(width, self.lines.len() as f32 * self.line_height)
    }

    fn is_splittable(&self) -> bool {
        true
    }

    fn split(
        &self,
        _available_width: f32,
        available_height: f32,
    ) -> Option<(Box<dyn ContentMeasurer>, Box<dyn ContentMeasurer>)> {
        if self.line_height <= 0.0 {
            return None;
        }
        let fitting = ((available_height + FIT_TOLERANCE) / self.line_height).floor();
        if fitting < 1.0 {
            return None;
        }
        let fitting = fitting as usize;
        if fitting >= self.lines.len() {
            return None;
        }
        let (head, tail) = self.lines.split_at(fitting);
        Some((
            Box::new(self.with_lines(head)),
            Box::new(self.with_lines(tail)),
        ))
    }

    fn paint(&self, content: Rect, renderer: &mut dyn PageRenderer) {
        let ascent = self.metrics.ascent(self.font_size);
        for (index, line) in self.lines.iter().enumerate() {
            let baseline = content.y + index as f32 * self.line_height + ascent;
            renderer.draw_text(content.x, baseline, line, self.font_size, self.color);
        }
    }
}
