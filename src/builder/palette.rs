//! Categorical color assignment.

use crate::colormap::{Color, CATEGORY_PALETTE};
use crate::legend::LegendEntry;

/// Assigns palette colors to categories in first-seen order.
///
/// The palette has twelve colors; the thirteenth distinct category reuses
/// the first color, and so on.
#[derive(Debug, Clone, Default)]
pub struct CategoryPalette {
    assigned: Vec<(String, Color)>,
}

impl CategoryPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of `category`, assigning the next palette slot on first sight.
    pub fn color_for(&mut self, category: &str) -> Color {
        if let Some((_, color)) = self.assigned.iter().find(|(c, _)| c == category) {
            return *color;
        }
        let color = Color::from_rgb_u32(CATEGORY_PALETTE[self.assigned.len() % CATEGORY_PALETTE.len()]);
        self.assigned.push((category.to_string(), color));
        color
    }

    /// Number of distinct categories seen so far.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Legend swatches in assignment order.
    pub fn entries(&self) -> Vec<LegendEntry> {
        self.assigned
            .iter()
            .map(|(category, color)| LegendEntry {
                category: category.clone(),
                color: *color,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_in_first_seen_order() {
        let mut palette = CategoryPalette::new();
        assert_eq!(palette.color_for("bus"), Color::RED);
        assert_eq!(palette.color_for("tram"), Color::GREEN);
        assert_eq!(palette.color_for("bus"), Color::RED);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn wraps_after_twelve() {
        let mut palette = CategoryPalette::new();
        for i in 0..12 {
            palette.color_for(&format!("c{i}"));
        }
        assert_eq!(palette.color_for("c12"), Color::RED);
        assert_eq!(palette.color_for("c13"), Color::GREEN);
        assert_eq!(palette.entries().len(), 14);
    }
}
