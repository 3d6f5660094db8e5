//! Party color palette for graph nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An RGBA color as written to graph files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    0.7
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0.7 }
    }

    /// The four channels as strings, in `r, g, b, a` order.
    pub fn channels(&self) -> [String; 4] {
        [
            self.r.to_string(),
            self.g.to_string(),
            self.b.to_string(),
            self.a.to_string(),
        ]
    }
}

/// Fixed party-to-color lookup with a fallback for unlisted parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPalette {
    /// Color for any party not in `parties`.
    #[serde(default = "default_color")]
    pub default: Color,

    /// Colors keyed by party code as it appears in display labels.
    #[serde(default = "default_parties")]
    pub parties: BTreeMap<String, Color>,
}

impl Default for PartyPalette {
    fn default() -> Self {
        Self {
            default: default_color(),
            parties: default_parties(),
        }
    }
}

fn default_color() -> Color {
    Color::rgb(70, 70, 70)
}

fn default_parties() -> BTreeMap<String, Color> {
    [
        ("Con", Color::rgb(0, 0, 220)),
        ("Lab", Color::rgb(220, 0, 0)),
        ("LDem", Color::rgb(250, 250, 50)),
        ("SNP", Color::rgb(250, 130, 0)),
        ("Green", Color::rgb(0, 220, 0)),
        ("DUP", Color::rgb(30, 240, 240)),
    ]
    .into_iter()
    .map(|(party, color)| (party.to_string(), color))
    .collect()
}

impl PartyPalette {
    /// Color for a party code, falling back to the default.
    pub fn color_for(&self, party: &str) -> Color {
        self.parties.get(party).copied().unwrap_or(self.default)
    }
}
