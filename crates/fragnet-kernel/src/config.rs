//! Fragnet configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration.

use crate::error::ConfigError;
use crate::types::{LinkType, Position};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragnetConfig {
    /// Default grid layout for seeded and freshly placed activities
    pub layout: LayoutConfig,
    /// Pending link settings when linking mode starts
    pub linking: LinkDefaults,
    /// Duration given to activities created inside the editor
    pub new_activity_duration_days: u32,
}

impl FragnetConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With grid column count
    #[inline]
    #[must_use]
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.layout.columns = columns;
        self
    }

    /// With default link type and lag
    #[inline]
    #[must_use]
    pub fn with_link_defaults(mut self, link_type: LinkType, lag_days: i32) -> Self {
        self.linking = LinkDefaults { link_type, lag_days };
        self
    }

    /// With duration for new activities
    #[inline]
    #[must_use]
    pub fn with_new_activity_duration(mut self, days: u32) -> Self {
        self.new_activity_duration_days = days;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject layouts that cannot place nodes
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.columns == 0 {
            return Err(ConfigError::Invalid("layout.columns must be at least 1".into()));
        }
        for (name, value) in [("spacing_x", layout.spacing_x), ("spacing_y", layout.spacing_y)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "layout.{name} must be a positive number, got {value}"
                )));
            }
        }
        if !layout.origin.x.is_finite() || !layout.origin.y.is_finite() {
            return Err(ConfigError::Invalid("layout.origin must be finite".into()));
        }
        Ok(())
    }
}

impl Default for FragnetConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            linking: LinkDefaults::default(),
            new_activity_duration_days: 1,
        }
    }
}

/// Grid layout parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Nodes per row
    pub columns: usize,
    /// Horizontal distance between slots
    pub spacing_x: f64,
    /// Vertical distance between rows
    pub spacing_y: f64,
    /// Position of the first slot
    pub origin: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            spacing_x: 200.0,
            spacing_y: 120.0,
            origin: Position::new(50.0, 50.0),
        }
    }
}

/// Link settings applied when linking mode starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDefaults {
    /// Relationship type for new links
    pub link_type: LinkType,
    /// Lag for new links
    pub lag_days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = FragnetConfig::from_toml_str("").unwrap();
        assert_eq!(config, FragnetConfig::default());
        assert_eq!(config.layout.columns, 4);
        assert_eq!(config.new_activity_duration_days, 1);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = FragnetConfig::from_toml_str(
            r#"
            new_activity_duration_days = 3

            [layout]
            columns = 2

            [linking]
            link_type = "SS"
            lag_days = -1
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.columns, 2);
        assert_eq!(config.layout.spacing_x, 200.0);
        assert_eq!(config.linking.link_type, LinkType::StartToStart);
        assert_eq!(config.linking.lag_days, -1);
        assert_eq!(config.new_activity_duration_days, 3);
    }

    #[test]
    fn zero_columns_rejected() {
        let err = FragnetConfig::from_toml_str("[layout]\ncolumns = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_spacing_rejected() {
        let err = FragnetConfig::from_toml_str("[layout]\nspacing_y = -5.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("spacing_y")));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = FragnetConfig::from_toml_str("[layout\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn builder_methods() {
        let config = FragnetConfig::new()
            .with_columns(6)
            .with_link_defaults(LinkType::FinishToFinish, 2)
            .with_new_activity_duration(5);
        assert_eq!(config.layout.columns, 6);
        assert_eq!(config.linking.link_type, LinkType::FinishToFinish);
        assert_eq!(config.linking.lag_days, 2);
        assert_eq!(config.new_activity_duration_days, 5);
    }
}
