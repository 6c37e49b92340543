use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::util::stable_pair;

pub(super) const NA_COLOR: Color32 = Color32::from_rgb(128, 128, 128);

const PALETTE: [Color32; 8] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(23, 190, 207),
];

const NAMED_COLORS: [(&str, Color32); 20] = [
    ("black", Color32::from_rgb(0, 0, 0)),
    ("silver", Color32::from_rgb(192, 192, 192)),
    ("gray", Color32::from_rgb(128, 128, 128)),
    ("grey", Color32::from_rgb(128, 128, 128)),
    ("white", Color32::from_rgb(255, 255, 255)),
    ("maroon", Color32::from_rgb(128, 0, 0)),
    ("red", Color32::from_rgb(255, 0, 0)),
    ("purple", Color32::from_rgb(128, 0, 128)),
    ("fuchsia", Color32::from_rgb(255, 0, 255)),
    ("green", Color32::from_rgb(0, 128, 0)),
    ("lime", Color32::from_rgb(0, 255, 0)),
    ("olive", Color32::from_rgb(128, 128, 0)),
    ("yellow", Color32::from_rgb(255, 255, 0)),
    ("navy", Color32::from_rgb(0, 0, 128)),
    ("blue", Color32::from_rgb(0, 0, 255)),
    ("teal", Color32::from_rgb(0, 128, 128)),
    ("aqua", Color32::from_rgb(0, 255, 255)),
    ("orange", Color32::from_rgb(255, 165, 0)),
    ("steelblue", Color32::from_rgb(70, 130, 180)),
    ("crimson", Color32::from_rgb(220, 20, 60)),
];

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Accepts `#rgb`, `#rrggbb` and a handful of CSS color names.
pub(super) fn parse_color(text: &str) -> Option<Color32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => {
                let channel = |index: usize| {
                    u8::from_str_radix(&hex[index..index + 1], 16).ok().map(|v| v * 17)
                };
                Some(Color32::from_rgb(channel(0)?, channel(1)?, channel(2)?))
            }
            6 => {
                let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
                Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
        .map(|(_, color)| *color)
}

/// Stable palette entry for a case whose color column is unusable.
pub(super) fn fallback_color(id: &str) -> Color32 {
    let (x, _) = stable_pair(id);
    let slot = (((x + 1.0) / 2.0) * PALETTE.len() as f32) as usize;
    PALETTE[slot.min(PALETTE.len() - 1)]
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.left_top() + pan;

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Layout space has its origin at the chart's top-left corner.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.left_top() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.left_top() - pan) / zoom
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn hex_and_named_colors_parse() {
        assert_eq!(parse_color("#336699"), Some(Color32::from_rgb(0x33, 0x66, 0x99)));
        assert_eq!(parse_color(" #fa0 "), Some(Color32::from_rgb(0xff, 0xaa, 0x00)));
        assert_eq!(parse_color("SteelBlue"), Some(Color32::from_rgb(70, 130, 180)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn fallback_color_is_stable_per_id() {
        assert_eq!(fallback_color("42"), fallback_color("42"));
        assert!(PALETTE.contains(&fallback_color("anything")));
    }

    #[test]
    fn screen_and_world_coordinates_invert() {
        let rect = Rect::from_min_size(pos2(200.0, 40.0), vec2(800.0, 600.0));
        let pan = vec2(-30.0, 12.0);
        let world = vec2(120.0, 75.0);
        let screen = world_to_screen(rect, pan, 1.5, world);
        assert_eq!(screen, pos2(200.0 - 30.0 + 180.0, 40.0 + 12.0 + 112.5));
        assert_eq!(screen_to_world(rect, pan, 1.5, screen), world);
    }

    #[test]
    fn opacity_sets_alpha_only() {
        assert_eq!(with_opacity(Color32::from_rgb(10, 20, 30), 0.5).a(), 128);
        assert_eq!(with_opacity(NA_COLOR, 0.8).a(), 204);
    }
}
