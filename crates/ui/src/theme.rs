use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::bar::Orientation;
use crate::UiError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub orientation: Orientation,
    /// Any ratatui color name or `#rrggbb`.
    pub bar_color: String,
    pub clip_color: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            bar_color: "green".to_string(),
            clip_color: "red".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeterTheme {
    pub bar: Color,
    /// Filler background while the input clipped recently.
    pub clip: Color,
    /// Filler background otherwise.
    pub idle: Color,
}

impl Default for MeterTheme {
    fn default() -> Self {
        Self {
            bar: Color::Green,
            clip: Color::Red,
            idle: Color::Reset,
        }
    }
}

impl MeterTheme {
    pub fn from_config(config: &DisplayConfig) -> Result<Self, UiError> {
        Ok(Self {
            bar: parse_color("bar_color", &config.bar_color)?,
            clip: parse_color("clip_color", &config.clip_color)?,
            idle: Color::Reset,
        })
    }

    pub fn filler(&self, clipped_recently: bool) -> Color {
        if clipped_recently {
            self.clip
        } else {
            self.idle
        }
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, UiError> {
    Color::from_str(value).map_err(|_| UiError::InvalidColor {
        field,
        value: value.to_string(),
    })
}
