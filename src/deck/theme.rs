//! Named color themes applied when no template is supplied.

use crate::common::RGBColor;
use phf::phf_map;

/// Background and font colors of a named theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeColors {
    pub background: Option<RGBColor>,
    pub font: Option<RGBColor>,
}

impl ThemeColors {
    const fn new(background: RGBColor, font: RGBColor) -> Self {
        Self {
            background: Some(background),
            font: Some(font),
        }
    }
}

static THEMES: phf::Map<&'static str, ThemeColors> = phf_map! {
    "Default" => ThemeColors { background: None, font: None },
    "Dark" => ThemeColors::new(RGBColor::new(0x32, 0x32, 0x32), RGBColor::new(0xFF, 0xFF, 0xFF)),
    "Corporate" => ThemeColors::new(RGBColor::new(0xF0, 0xF0, 0xF0), RGBColor::new(0x00, 0x00, 0x00)),
    "Creative" => ThemeColors::new(RGBColor::new(0xFF, 0xE4, 0xC4), RGBColor::new(0x4B, 0x00, 0x82)),
};

/// Look up a theme by name. Unknown names behave like "Default".
pub fn theme_colors(name: &str) -> ThemeColors {
    match THEMES.get(name) {
        Some(colors) => *colors,
        None => {
            log::warn!("Unknown theme '{}', using Default", name);
            ThemeColors::default()
        },
    }
}

/// Names of the built-in themes.
pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_themes() {
        let dark = theme_colors("Dark");
        assert_eq!(dark.background.map(|c| c.to_hex()).as_deref(), Some("323232"));
        assert_eq!(dark.font.map(|c| c.to_hex()).as_deref(), Some("FFFFFF"));

        let creative = theme_colors("Creative");
        assert_eq!(creative.background.map(|c| c.to_hex()).as_deref(), Some("FFE4C4"));
        assert_eq!(creative.font.map(|c| c.to_hex()).as_deref(), Some("4B0082"));

        assert_eq!(theme_colors("Default"), ThemeColors::default());
        assert_eq!(theme_names().count(), 4);
    }

    #[test]
    fn test_unknown_theme_is_default() {
        assert_eq!(theme_colors("Neon"), ThemeColors::default());
    }
}
