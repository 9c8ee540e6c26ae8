//! Color palettes for freshly created widgets.

use rand::seq::SliceRandom;

/// A two-stop gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub color: &'static str,
    pub color2: &'static str,
}

pub const GRADIENTS: [Gradient; 12] = [
    Gradient { color: "#D9C8FF", color2: "#B092FF" },
    Gradient { color: "#84fab0", color2: "#8fd3f4" },
    Gradient { color: "#fccb90", color2: "#d57eeb" },
    Gradient { color: "#e0c3fc", color2: "#8ec5fc" },
    Gradient { color: "#f093fb", color2: "#f5576c" },
    Gradient { color: "#4facfe", color2: "#00f2fe" },
    Gradient { color: "#43e97b", color2: "#38f9d7" },
    Gradient { color: "#fa709a", color2: "#fee140" },
    Gradient { color: "#a18cd1", color2: "#fbc2eb" },
    Gradient { color: "#ff9a9e", color2: "#fecfef" },
    Gradient { color: "#d4fc79", color2: "#96e6a1" },
    Gradient { color: "#ff7e5f", color2: "#feb47b" },
];

pub const FOLDER_COLORS: [&str; 8] = [
    "rgba(167, 197, 255, 0.25)",
    "rgba(197, 167, 255, 0.25)",
    "rgba(167, 255, 201, 0.25)",
    "rgba(255, 167, 224, 0.25)",
    "rgba(255, 224, 167, 0.25)",
    "rgba(167, 244, 255, 0.25)",
    "rgba(255, 185, 167, 0.25)",
    "rgba(220, 167, 255, 0.25)",
];

/// Used when a hex color cannot be parsed.
pub const FALLBACK_RGBA: &str = "rgba(197, 167, 255, 0.25)";

pub fn random_gradient() -> Gradient {
    *GRADIENTS.choose(&mut rand::thread_rng()).unwrap_or(&GRADIENTS[0])
}

pub fn random_folder_color() -> &'static str {
    FOLDER_COLORS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FOLDER_COLORS[0])
}

/// Convert `#rgb` or `#rrggbb` into an `rgba(...)` string.
pub fn hex_to_rgba(hex: &str, opacity: f32) -> String {
    let Some(digits) = hex.strip_prefix('#') else {
        return FALLBACK_RGBA.to_string();
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return FALLBACK_RGBA.to_string();
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return FALLBACK_RGBA.to_string(),
    };
    match u32::from_str_radix(&expanded, 16) {
        Ok(c) => format!("rgba({},{},{},{})", (c >> 16) & 255, (c >> 8) & 255, c & 255, opacity),
        Err(_) => FALLBACK_RGBA.to_string(),
    }
}
