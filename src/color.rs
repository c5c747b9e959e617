use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CnaCategory;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// ColorBrewer "Set1", the qualitative palette the boxplots are known by.
const SET1: [Color32; 9] = [
    Color32::from_rgb(228, 26, 28),
    Color32::from_rgb(55, 126, 184),
    Color32::from_rgb(77, 175, 74),
    Color32::from_rgb(152, 78, 163),
    Color32::from_rgb(255, 127, 0),
    Color32::from_rgb(255, 255, 51),
    Color32::from_rgb(166, 86, 40),
    Color32::from_rgb(247, 129, 191),
    Color32::from_rgb(153, 153, 153),
];

/// `n` distinct colours: Set1 first, then evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n <= SET1.len() {
        return SET1[..n].to_vec();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: CNA category → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per CNA category so a category looks the same in every plot.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<CnaCategory, Color32>,
}

impl CategoryColors {
    pub fn new(categories: &BTreeSet<CnaCategory>) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();
        CategoryColors { mapping }
    }

    pub fn color_for(&self, category: &CnaCategory) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}
