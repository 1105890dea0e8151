//! White-label theme applied to every view

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualConfig {
    pub logo_url: String,
    pub primary_color: String,
    pub background_color: String,
}

impl VisualConfig {
    /// Primary colour as RGB, if it is a valid `#rrggbb` value
    pub fn primary_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_hex_color(&self.primary_color)
    }
}

/// Parse a `#rrggbb` colour
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
