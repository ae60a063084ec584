//! Default grid placement for activity nodes.

use crate::config::LayoutConfig;
use crate::types::Position;

/// Row-major grid layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    config: LayoutConfig,
}

impl GridLayout {
    /// Layout from config; a zero column count is treated as one
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        // a zero column count would divide by zero below
        let columns = config.columns.max(1);
        Self {
            config: LayoutConfig { columns, ..config },
        }
    }

    /// Position of the `index`-th slot
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn slot(&self, index: usize) -> Position {
        let column = index % self.config.columns;
        let row = index / self.config.columns;
        Position::new(
            self.config.origin.x + column as f64 * self.config.spacing_x,
            self.config.origin.y + row as f64 * self.config.spacing_y,
        )
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
