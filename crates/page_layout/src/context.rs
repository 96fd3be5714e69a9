//! Layout configuration and the per-call contexts threaded through
//! preparation, splitting and rendering.

use crate::{LayoutError, LayoutWarning, Rect, Result};
use serde::{Deserialize, Serialize};

/// Tolerance for width/height overflow diagnostics
pub const DEFAULT_EPSILON: f32 = 0.01;

/// Default maximum nesting depth of a layout tree
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum recursion depth for prepare/split before `TooDeep` is returned
    pub max_depth: usize,
    /// Overflow below this amount is not reported
    pub epsilon: f32,
    /// Drop the top margin and top border on the continuation fragment of a
    /// split box
    pub suppress_leading_edge_on_continuation: bool,
    /// Upper bound on pages produced by the paginator
    pub max_pages: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            epsilon: DEFAULT_EPSILON,
            suppress_leading_edge_on_continuation: true,
            max_pages: 10_000,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON config; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        if config.max_depth == 0 {
            return Err(LayoutError::invalid_config("max_depth must be at least 1"));
        }
        if !(config.epsilon >= 0.0) {
            return Err(LayoutError::invalid_config("epsilon must not be negative"));
        }
        Ok(config)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_leading_edge_suppression(mut self, suppress: bool) -> Self {
        self.suppress_leading_edge_on_continuation = suppress;
        self
    }
}

/// Counters describing the work done through a context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Number of `prepare` calls that completed
    pub prepared_nodes: usize,
    /// Number of split attempts that reached a node's own split logic
    pub split_attempts: usize,
    /// Number of fragments produced by successful splits
    pub fragments_created: usize,
}

/// Mutable state for one layout pass over a tree.
///
/// Carries the configuration, the recursion depth guard, collected warnings
/// and statistics. A context is never shared between trees being laid out at
/// the same time.
#[derive(Debug, Default)]
pub struct LayoutContext {
    config: LayoutConfig,
    depth: usize,
    warnings: Vec<LayoutWarning>,
    stats: LayoutStats,
}

impl LayoutContext {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            depth: 0,
            warnings: Vec::new(),
            stats: LayoutStats::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<LayoutWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Record a non-fatal diagnostic
    pub fn warn(&mut self, warning: LayoutWarning) {
        tracing::warn!(target: "page_layout::prepare", node = %warning.node_id(), "{}", warning);
        self.warnings.push(warning);
    }

    /// Whether `used` exceeds `available` by more than the tolerance
    pub fn exceeds(&self, used: f32, available: f32) -> bool {
        used - available > self.config.epsilon
    }

    /// Run `f` one level deeper in the tree, failing with `TooDeep` past the
    /// configured limit.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.config.max_depth {
            return Err(LayoutError::TooDeep {
                max_depth: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn record_prepared(&mut self) {
        self.stats.prepared_nodes += 1;
    }

    pub(crate) fn record_split_attempt(&mut self) {
        self.stats.split_attempts += 1;
    }

    pub(crate) fn record_fragments(&mut self, count: usize) {
        self.stats.fragments_created += count;
    }
}

/// Where a node is painted: the outer rectangle assigned by its parent.
///
/// Read-only for the duration of one render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Outer bounds of the node including its outline
    pub bounds: Rect,
}

impl RenderContext {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Rect::new(x, y, width, height),
        }
    }

    pub fn at(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    pub fn width(&self) -> f32 {
        self.bounds.width
    }

    pub fn height(&self) -> f32 {
        self.bounds.height
    }
}
