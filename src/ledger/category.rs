//! Fixed category set with display glyphs

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A transaction category.
///
/// Stored in the database as its lowercase slug (`"food"`, `"salary"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Dining,
    Transport,
    Fuel,
    Rent,
    Utilities,
    Shopping,
    Clothing,
    Healthcare,
    Medicine,
    Entertainment,
    Movies,
    Education,
    Tech,
    Travel,
    Hotel,
    Income,
    Salary,
    Other,
    Gifts,
}

/// Glyph shown for rows stored without a category
pub const UNCATEGORIZED_GLYPH: &str = "❔";
/// Label shown for rows stored without a category
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

impl Category {
    pub fn slug(&self) -> &'static str {
        (*self).into()
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Category::Food => "🍔",
            Category::Dining => "🍕",
            Category::Transport => "🚗",
            Category::Fuel => "⛽",
            Category::Rent => "🏠",
            Category::Utilities => "⚡",
            Category::Shopping => "🛒",
            Category::Clothing => "👕",
            Category::Healthcare => "🏥",
            Category::Medicine => "💊",
            Category::Entertainment => "🎉",
            Category::Movies => "🎬",
            Category::Education => "📚",
            Category::Tech => "💻",
            Category::Travel => "✈️",
            Category::Hotel => "🏨",
            Category::Income => "💰",
            Category::Salary => "💼",
            Category::Other => "📊",
            Category::Gifts => "🎁",
        }
    }

    /// Capitalised name, e.g. `"Food"`
    pub fn title(&self) -> String {
        let slug = self.slug();
        let mut chars = slug.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Button text, e.g. `"🍔 Food"`
    pub fn label(&self) -> String {
        format!("{} {}", self.glyph(), self.title())
    }

    /// Money received rather than spent
    pub fn is_income(&self) -> bool {
        matches!(self, Category::Income | Category::Salary)
    }

    /// Resolves free text typed by the user.
    ///
    /// Accepts the slug in any case (`"FOOD"`), the button label
    /// (`"🍔 Food"`) or the label without its glyph.
    pub fn from_input(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Ok(category) = Category::from_str(input) {
            return Some(category);
        }

        Category::iter().find(|category| category.label() == input).or_else(|| {
            // "🍔 Food" with a different glyph or stray variation selectors
            let mut words = input.split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some(glyph), Some(word), None) if !glyph.chars().any(char::is_alphanumeric) => {
                    Category::from_str(word).ok()
                }
                _ => None,
            }
        })
    }
}

/// Slug for an optional category, falling back to [`UNCATEGORIZED_SLUG`]
pub fn slug_or_uncategorized(category: Option<Category>) -> &'static str {
    category.map(|c| c.slug()).unwrap_or(UNCATEGORIZED_SLUG)
}

/// Glyph for an optional category
pub fn glyph_or_uncategorized(category: Option<Category>) -> &'static str {
    category.map(|c| c.glyph()).unwrap_or(UNCATEGORIZED_GLYPH)
}
