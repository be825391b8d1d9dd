//! Color themes for the storefront TUI.
//!
//! Colors are plain RGB tokens so contrast can be checked numerically (see
//! tests/theme_accessibility.rs); `Rgb::color()` converts for ratatui.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

/// Resolved color tokens for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgb,
    /// Panel fill behind lists and tables; contrast targets measure on this.
    pub panel: Rgb,
    pub text: Rgb,
    pub text_dim: Rgb,
    pub accent: Rgb,
    pub focus_border: Rgb,
    pub unfocused_border: Rgb,
    pub selection_bg: Rgb,
    pub selection_fg: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
    pub error: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::orchard()
    }
}

impl Theme {
    pub fn from_name(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "orchard" => Ok(Theme::orchard()),
            "nord" => Ok(Theme::nord()),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::amber_crt()),
            "green" | "greenphosphor" | "green-phosphor" => Ok(Theme::green_phosphor()),
            _ => Err(format!(
                "Unknown theme '{s}'. Available: orchard, nord, amber-crt, green-phosphor"
            )),
        }
    }

    pub const ALL: [&'static str; 4] = ["orchard", "nord", "amber-crt", "green-phosphor"];

    /// Default theme: dark green-tinted panels with produce-green accents.
    pub fn orchard() -> Self {
        Self {
            name: "orchard",
            background: Rgb(12, 16, 12),
            panel: Rgb(24, 32, 26),
            text: Rgb(225, 232, 222),
            text_dim: Rgb(156, 168, 156),
            accent: Rgb(124, 200, 146),
            focus_border: Rgb(124, 200, 146),
            unfocused_border: Rgb(70, 80, 70),
            selection_bg: Rgb(44, 70, 50),
            selection_fg: Rgb(235, 240, 232),
            success: Rgb(140, 210, 140),
            warning: Rgb(230, 200, 110),
            error: Rgb(235, 130, 120),
        }
    }

    /// Nord-inspired muted blues.
    pub fn nord() -> Self {
        Self {
            name: "nord",
            background: Rgb(46, 52, 64),
            panel: Rgb(59, 66, 82),
            text: Rgb(236, 239, 244),
            text_dim: Rgb(180, 188, 200),
            accent: Rgb(136, 192, 208),
            focus_border: Rgb(136, 192, 208),
            unfocused_border: Rgb(76, 86, 106),
            selection_bg: Rgb(67, 76, 94),
            selection_fg: Rgb(236, 239, 244),
            success: Rgb(163, 190, 140),
            warning: Rgb(235, 203, 139),
            error: Rgb(208, 135, 112),
        }
    }

    /// Amber CRT: orange text on black.
    pub fn amber_crt() -> Self {
        Self {
            name: "amber-crt",
            background: Rgb(0, 0, 0),
            panel: Rgb(16, 16, 16),
            text: Rgb(255, 176, 0),
            text_dim: Rgb(200, 140, 0),
            accent: Rgb(255, 204, 0),
            focus_border: Rgb(255, 204, 0),
            unfocused_border: Rgb(120, 84, 16),
            selection_bg: Rgb(64, 44, 0),
            selection_fg: Rgb(255, 214, 96),
            success: Rgb(200, 255, 120),
            warning: Rgb(255, 160, 40),
            error: Rgb(255, 96, 64),
        }
    }

    /// Green phosphor: classic terminal green on black.
    pub fn green_phosphor() -> Self {
        Self {
            name: "green-phosphor",
            background: Rgb(0, 0, 0),
            panel: Rgb(16, 16, 16),
            text: Rgb(51, 255, 51),
            text_dim: Rgb(0, 170, 0),
            accent: Rgb(102, 255, 102),
            focus_border: Rgb(102, 255, 102),
            unfocused_border: Rgb(0, 100, 0),
            selection_bg: Rgb(0, 64, 0),
            selection_fg: Rgb(160, 255, 160),
            success: Rgb(102, 255, 102),
            warning: Rgb(255, 255, 102),
            error: Rgb(255, 102, 102),
        }
    }

    pub fn all_themes() -> Vec<Theme> {
        vec![
            Theme::orchard(),
            Theme::nord(),
            Theme::amber_crt(),
            Theme::green_phosphor(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in Theme::ALL {
            assert!(Theme::from_name(name).is_ok(), "theme {name}");
        }
        assert!(Theme::from_name("solarized").is_err());
    }

    #[test]
    fn aliases_resolve_to_the_same_theme() {
        assert_eq!(Theme::from_name("amber").unwrap().name, "amber-crt");
        assert_eq!(Theme::from_name("GREEN").unwrap().name, "green-phosphor");
    }
}
