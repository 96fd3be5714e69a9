//! Axis sizing policies for HBox columns and VBox rows

use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// The sizing policy family of a width or height spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecKind {
    /// Fixed length in points
    Absolute,
    /// Percentage of the available length
    Percentage,
    /// Equal share of the remaining length
    Star,
    /// Sized from content, bounded by a share of the remaining length
    Auto,
}

impl SpecKind {
    /// Whether the value resolves without looking at siblings
    pub fn is_fixed(self) -> bool {
        matches!(self, SpecKind::Absolute | SpecKind::Percentage)
    }
}

/// How the width of an HBox column is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WidthSpec {
    Absolute(f32),
    Percentage(f32),
    Star,
    Auto,
}

impl WidthSpec {
    pub fn abs(points: f32) -> Self {
        WidthSpec::Absolute(points)
    }

    pub fn perc(percent: f32) -> Self {
        WidthSpec::Percentage(percent)
    }

    pub fn kind(&self) -> SpecKind {
        match self {
            WidthSpec::Absolute(_) => SpecKind::Absolute,
            WidthSpec::Percentage(_) => SpecKind::Percentage,
            WidthSpec::Star => SpecKind::Star,
            WidthSpec::Auto => SpecKind::Auto,
        }
    }

    /// The raw value for Absolute and Percentage specs
    pub fn value(&self) -> Option<f32> {
        match self {
            WidthSpec::Absolute(v) | WidthSpec::Percentage(v) => Some(*v),
            WidthSpec::Star | WidthSpec::Auto => None,
        }
    }

    /// Resolve Absolute/Percentage against the available width.
    /// Star and Auto need sibling negotiation and yield `None`.
    pub fn effective_value(&self, available: f32) -> Option<f32> {
        effective_value(self.kind(), self.value(), available)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_value("width", self.value())
    }
}

/// How the height of a VBox row is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeightSpec {
    Absolute(f32),
    Percentage(f32),
    Star,
    Auto,
}

impl HeightSpec {
    pub fn abs(points: f32) -> Self {
        HeightSpec::Absolute(points)
    }

    pub fn perc(percent: f32) -> Self {
        HeightSpec::Percentage(percent)
    }

    pub fn kind(&self) -> SpecKind {
        match self {
            HeightSpec::Absolute(_) => SpecKind::Absolute,
            HeightSpec::Percentage(_) => SpecKind::Percentage,
            HeightSpec::Star => SpecKind::Star,
            HeightSpec::Auto => SpecKind::Auto,
        }
    }

    pub fn value(&self) -> Option<f32> {
        match self {
            HeightSpec::Absolute(v) | HeightSpec::Percentage(v) => Some(*v),
            HeightSpec::Star | HeightSpec::Auto => None,
        }
    }

    pub fn effective_value(&self, available: f32) -> Option<f32> {
        effective_value(self.kind(), self.value(), available)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_value("height", self.value())
    }
}

fn effective_value(kind: SpecKind, value: Option<f32>, available: f32) -> Option<f32> {
    match (kind, value) {
        (SpecKind::Absolute, Some(v)) => Some(v),
        (SpecKind::Percentage, Some(v)) => Some(available * v / 100.0),
        _ => None,
    }
}

fn validate_value(axis: &str, value: Option<f32>) -> Result<()> {
    match value {
        Some(v) if !(v >= 0.0) => Err(LayoutError::invalid_config(format!(
            "{axis} spec value must be a non-negative number, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Equal share of `rest` among `count` items; zero items contribute nothing.
pub(crate) fn share(rest: f32, count: usize) -> f32 {
    if count == 0 {
        0.0
    } else {
        rest / count as f32
    }
}
