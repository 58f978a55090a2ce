use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid alignment: {0} (expected left, center or right)")]
    InvalidAlignment(String),

    #[error("invalid maximum width: {0}")]
    InvalidMaxWidth(f32),

    #[error("invalid font size: {0}")]
    InvalidFontSize(f32),
}

/// Horizontal placement of each line inside the overall bounding width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Offset of a line of `line_width` inside `total_width`.
    pub fn offset(self, line_width: f32, total_width: f32) -> f32 {
        let slack = (total_width - line_width).max(0.0);
        match self {
            Alignment::Left => 0.0,
            Alignment::Center => slack / 2.0,
            Alignment::Right => slack,
        }
    }
}

impl FromStr for Alignment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            _ => Err(ConfigError::InvalidAlignment(value.to_string())),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        f.write_str(label)
    }
}

/// Settings for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Passed through to the measurement service.
    pub font_size: f32,
    /// Lines wider than this are wrapped. `None` only breaks at newlines.
    pub max_width: Option<f32>,
    pub alignment: Alignment,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            max_width: None,
            alignment: Alignment::Left,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, font_size: f32) -> Result<Self, ConfigError> {
        self.font_size = check_font_size(font_size)?;
        Ok(self)
    }

    pub fn with_max_width(mut self, max_width: Option<f32>) -> Result<Self, ConfigError> {
        self.max_width = check_max_width(max_width)?;
        Ok(self)
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_font_size(self.font_size)?;
        check_max_width(self.max_width)?;
        Ok(())
    }
}

pub(crate) fn check_font_size(font_size: f32) -> Result<f32, ConfigError> {
    if font_size.is_finite() && font_size > 0.0 {
        Ok(font_size)
    } else {
        Err(ConfigError::InvalidFontSize(font_size))
    }
}

pub(crate) fn check_max_width(max_width: Option<f32>) -> Result<Option<f32>, ConfigError> {
    match max_width {
        Some(width) if !width.is_finite() || width < 0.0 => {
            Err(ConfigError::InvalidMaxWidth(width))
        }
        other => Ok(other),
    }
}
