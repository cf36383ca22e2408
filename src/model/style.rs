// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use std::fmt;

/// An opaque RGB color carried on node styles.
///
/// Inbound values accept `#rrggbb` hex (case-insensitive) or one of the fixed
/// named colors; outbound formatting is always lowercase hex. This is the one
/// piece of input validation in the command surface, so the accepted grammar
/// must stay put for existing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

const NAMED_COLORS: [(&str, Color); 8] = [
    ("red", Color::from_rgb(0xff, 0x00, 0x00)),
    ("blue", Color::from_rgb(0x00, 0x00, 0xff)),
    ("green", Color::from_rgb(0x00, 0xff, 0x00)),
    ("yellow", Color::from_rgb(0xff, 0xff, 0x00)),
    ("orange", Color::from_rgb(0xff, 0xa5, 0x00)),
    ("white", Color::from_rgb(0xff, 0xff, 0xff)),
    ("black", Color::from_rgb(0x00, 0x00, 0x00)),
    ("gray", Color::from_rgb(0x80, 0x80, 0x80)),
];

impl Color {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let lowered = input.to_ascii_lowercase();
        if let Some((_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == lowered) {
            return Ok(*color);
        }

        let hex = lowered.strip_prefix('#').ok_or_else(|| ColorParseError {
            value: input.to_owned(),
        })?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError {
                value: input.to_owned(),
            });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError {
                value: input.to_owned(),
            })
        };
        Ok(Self {
            red: channel(0..2)?,
            green: channel(2..4)?,
            blue: channel(4..6)?,
        })
    }

    /// `#rrggbb`, each channel as two lowercase hex digits.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    value: String,
}

impl ColorParseError {
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid color: {}", self.value)
    }
}

impl std::error::Error for ColorParseError {}

/// Visual styling of one node.
///
/// Bold/italic/size are write-only as far as snapshots are concerned; only
/// the style name and the two colors are projected back out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeStyle {
    name: Option<String>,
    text_color: Option<Color>,
    background_color: Option<Color>,
    bold: bool,
    italic: bool,
    font_size: Option<u16>,
}

impl NodeStyle {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn text_color(&self) -> Option<Color> {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = Some(color);
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = Some(color);
    }

    pub fn bold(&self) -> bool {
        self.bold
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    pub fn italic(&self) -> bool {
        self.italic
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.italic = italic;
    }

    pub fn font_size(&self) -> Option<u16> {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = Some(size);
    }
}
