use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::Entity;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Entity colours (scatter points, filter labels)
// ---------------------------------------------------------------------------

/// One fixed colour per entity, so a jurisdiction keeps its colour however the
/// filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Entity, Color32>,
}

impl Default for ColorMap {
    fn default() -> Self {
        let mapping = Entity::ALL
            .into_iter()
            .zip(generate_palette(Entity::ALL.len()))
            .collect();
        Self { mapping }
    }
}

impl ColorMap {
    pub fn color_for(&self, entity: Entity) -> Color32 {
        self.mapping.get(&entity).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Sequential scale (bar charts)
// ---------------------------------------------------------------------------

/// Stops of a dark-purple → teal → yellow ramp.
const SCALE_STOPS: [(u8, u8, u8); 3] = [(68, 1, 84), (33, 145, 140), (253, 231, 37)];

/// Colour for `value` on a ramp spanning `[min, max]`. A degenerate range maps
/// to the middle of the ramp.
pub fn sequential_color(value: f64, min: f64, max: f64) -> Color32 {
    let range = max - min;
    let t = if range.abs() < f64::EPSILON {
        0.5
    } else {
        ((value - min) / range).clamp(0.0, 1.0) as f32
    };

    let stop = |i: usize| -> LinSrgb {
        let (r, g, b) = SCALE_STOPS[i];
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = if t < 0.5 {
        stop(0).mix(stop(1), t * 2.0)
    } else {
        stop(1).mix(stop(2), (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}
