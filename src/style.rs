use iced::theme::palette::Extended;
use iced::widget::button;
use iced::widget::canvas::{LineDash, Stroke};
use iced::{Border, Color, Theme};

pub fn dashed_line(theme: &Theme) -> Stroke<'_> {
    let palette = theme.extended_palette();

    Stroke::with_color(
        Stroke {
            width: 1.0,
            line_dash: LineDash {
                segments: &[4.0, 4.0],
                offset: 8,
            },
            ..Default::default()
        },
        palette
            .secondary
            .strong
            .color
            .scale_alpha(if palette.is_dark { 0.8 } else { 1.0 }),
    )
}

/// Stroke color for committed annotation shapes.
pub fn shape_color(palette: &Extended) -> Color {
    palette.secondary.strong.color
}

/// Stroke color for the shape currently being dragged out.
pub fn draft_shape_color(palette: &Extended) -> Color {
    palette.primary.weak.color
}

/// Accent for the selected shape and its anchor handles.
pub fn selection_color(palette: &Extended) -> Color {
    palette.primary.strong.color
}

/// Parses a `#rrggbb` or `#rrggbbaa` drawing color override.
pub fn hex_to_color(hex: &str) -> Option<Color> {
    if hex.len() != 7 && hex.len() != 9 {
        return None;
    }
    if !hex.starts_with('#') {
        return None;
    }

    // Checked slicing: the length gate counts bytes, so multi-byte
    // input could still straddle a char boundary.
    let r = u8::from_str_radix(hex.get(1..3)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(3..5)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(5..7)?, 16).ok()?;
    let a = if hex.len() == 9 {
        u8::from_str_radix(hex.get(7..9)?, 16).ok()?
    } else {
        u8::MAX
    };

    Some(Color {
        r: f32::from(r) / 255.0,
        g: f32::from(g) / 255.0,
        b: f32::from(b) / 255.0,
        a: f32::from(a) / 255.0,
    })
}

/// Toolbar buttons show which tool is active.
pub fn toolbar_button(active: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme, status| {
        let palette = theme.extended_palette();

        let background = if active {
            palette.primary.weak.color
        } else {
            match status {
                button::Status::Hovered => palette.background.strong.color,
                _ => palette.background.weak.color,
            }
        };

        button::Style {
            background: Some(background.into()),
            text_color: if active {
                palette.primary.weak.text
            } else {
                palette.background.base.text
            },
            border: Border {
                radius: 3.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_overrides() {
        let color = hex_to_color("#FF8000").unwrap();
        assert!((color.r - 1.0).abs() < 1e-6);
        assert!((color.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);

        assert_eq!(hex_to_color("#FF800080").map(|c| c.a), Some(128.0 / 255.0));
        assert!(hex_to_color("FF8000").is_none());
        assert!(hex_to_color("#F80").is_none());
        // 9 bytes but not 9 hex digits.
        assert!(hex_to_color("#0ßßß0").is_none());
    }
}
