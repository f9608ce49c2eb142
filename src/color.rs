use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Category, SightingIcon, SightingStatus};

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Fixed marker colour of a category. Direct evidence of a bear is warm,
/// indirect evidence cool, and "other" is a muted grey-blue.
pub fn category_color(category: Category) -> Color32 {
    let (hue, saturation) = match category {
        Category::Icon(icon) => match icon {
            SightingIcon::Bear => (0.0, 0.80),
            SightingIcon::LikeBear => (28.0, 0.85),
            SightingIcon::Excrement => (45.0, 0.70),
            SightingIcon::Footprint => (140.0, 0.55),
            SightingIcon::Camera => (195.0, 0.70),
            SightingIcon::Voice => (275.0, 0.55),
            SightingIcon::Other => (220.0, 0.15),
        },
        Category::Status(status) => match status {
            SightingStatus::Sighted => (0.0, 0.80),
            SightingStatus::Suspected => (28.0, 0.85),
            SightingStatus::Droppings => (45.0, 0.70),
            SightingStatus::Footprint => (140.0, 0.55),
            SightingStatus::Other => (220.0, 0.15),
        },
    };
    hsl_to_color32(hue, saturation, 0.5)
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Colours of the categories offered by the active data variant.
/// Records without a category, or with one the variant never produces, use
/// the default colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Category, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(categories: &[Category]) -> Self {
        ColorMap {
            mapping: categories.iter().map(|&c| (c, category_color(c))).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a record's category.
    pub fn color_for(&self, category: Option<Category>) -> Color32 {
        category
            .and_then(|c| self.mapping.get(&c).copied())
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_colours_are_distinct() {
        let colours: Vec<Color32> = SightingIcon::PRIORITY
            .into_iter()
            .map(|icon| category_color(Category::Icon(icon)))
            .collect();
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn status_shares_the_matching_icon_colour() {
        assert_eq!(
            category_color(Category::Status(SightingStatus::Sighted)),
            category_color(Category::Icon(SightingIcon::Bear))
        );
        assert_eq!(
            category_color(Category::Status(SightingStatus::Footprint)),
            category_color(Category::Icon(SightingIcon::Footprint))
        );
    }

    #[test]
    fn unknown_and_absent_categories_are_gray() {
        let cm = ColorMap::new(&[
            Category::Icon(SightingIcon::Bear),
            Category::Icon(SightingIcon::Footprint),
        ]);
        assert_eq!(
            cm.color_for(Some(Category::Icon(SightingIcon::Bear))),
            category_color(Category::Icon(SightingIcon::Bear))
        );
        assert_eq!(cm.color_for(None), Color32::GRAY);
        assert_eq!(
            cm.color_for(Some(Category::Status(SightingStatus::Other))),
            Color32::GRAY
        );
    }
}
