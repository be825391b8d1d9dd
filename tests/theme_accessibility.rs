//! WCAG AA compliance tests for theme color contrast ratios
//!
//! Validates that every selectable theme meets accessibility standards:
//! - Text/panel: ≥4.5:1 (WCAG AA for normal text)
//! - Dim text/panel: ≥4.5:1 (WCAG AA for normal text)
//! - Accent and status colors/panel: ≥3.0:1 (WCAG AA for UI components)

use farmstand::theme::{Rgb, Theme};

/// Calculate relative luminance for sRGB color (WCAG formula)
fn relative_luminance(Rgb(r, g, b): Rgb) -> f64 {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let r = if r <= 0.03928 { r / 12.92 } else { ((r + 0.055) / 1.055).powf(2.4) };
    let g = if g <= 0.03928 { g / 12.92 } else { ((g + 0.055) / 1.055).powf(2.4) };
    let b = if b <= 0.03928 { b / 12.92 } else { ((b + 0.055) / 1.055).powf(2.4) };

    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Calculate contrast ratio between two colors (WCAG formula)
fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

#[test]
fn text_on_panel_meets_wcag_aa() {
    for theme in Theme::all_themes() {
        let contrast = contrast_ratio(theme.text, theme.panel);
        assert!(
            contrast >= 4.5,
            "[{}] text/panel contrast {:.2}:1 fails WCAG AA (need ≥4.5:1)",
            theme.name,
            contrast
        );
    }
}

#[test]
fn dim_text_on_panel_meets_wcag_aa() {
    for theme in Theme::all_themes() {
        let contrast = contrast_ratio(theme.text_dim, theme.panel);
        assert!(
            contrast >= 4.5,
            "[{}] dim text/panel contrast {:.2}:1 fails WCAG AA (need ≥4.5:1)",
            theme.name,
            contrast
        );
    }
}

#[test]
fn accent_on_panel_meets_component_contrast() {
    for theme in Theme::all_themes() {
        let contrast = contrast_ratio(theme.accent, theme.panel);
        assert!(
            contrast >= 3.0,
            "[{}] accent/panel contrast {:.2}:1 fails WCAG AA (need ≥3.0:1)",
            theme.name,
            contrast
        );
    }
}

#[test]
fn status_colors_on_panel_meet_component_contrast() {
    for theme in Theme::all_themes() {
        for (label, color) in
            [("success", theme.success), ("warning", theme.warning), ("error", theme.error)]
        {
            let contrast = contrast_ratio(color, theme.panel);
            assert!(
                contrast >= 3.0,
                "[{}] {label}/panel contrast {:.2}:1 fails WCAG AA (need ≥3.0:1)",
                theme.name,
                contrast
            );
        }
    }
}

#[test]
fn selection_fg_is_readable_on_selection_bg() {
    for theme in Theme::all_themes() {
        let contrast = contrast_ratio(theme.selection_fg, theme.selection_bg);
        assert!(
            contrast >= 4.5,
            "[{}] selection contrast {:.2}:1 fails WCAG AA (need ≥4.5:1)",
            theme.name,
            contrast
        );
    }
}
