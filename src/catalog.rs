//! Closed enumerations shared by intake, filtering and the measurement rules.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Table,
    Console,
    Buffet,
    Bookcase,
    Wardrobe,
    ChestOfDrawers,
    Column,
    Mirror,
    Goblet,
    Seat,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Table,
        Category::Console,
        Category::Buffet,
        Category::Bookcase,
        Category::Wardrobe,
        Category::ChestOfDrawers,
        Category::Column,
        Category::Mirror,
        Category::Goblet,
        Category::Seat,
        Category::Other,
    ];

    /// Wire and database key.
    pub fn key(self) -> &'static str {
        match self {
            Category::Table => "table",
            Category::Console => "console",
            Category::Buffet => "buffet",
            Category::Bookcase => "bookcase",
            Category::Wardrobe => "wardrobe",
            Category::ChestOfDrawers => "chest_of_drawers",
            Category::Column => "column",
            Category::Mirror => "mirror",
            Category::Goblet => "goblet",
            Category::Seat => "seat",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Table => "Mesa",
            Category::Console => "Consola",
            Category::Buffet => "Buffet",
            Category::Bookcase => "Biblioteca",
            Category::Wardrobe => "Armario",
            Category::ChestOfDrawers => "Cómoda",
            Category::Column => "Columna",
            Category::Mirror => "Espejo",
            Category::Goblet => "Copa",
            Category::Seat => "Asiento",
            Category::Other => "Otro artículo",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Category::Table => "Mesas",
            Category::Console => "Consolas",
            Category::Buffet => "Buffets",
            Category::Bookcase => "Bibliotecas",
            Category::Wardrobe => "Armarios",
            Category::ChestOfDrawers => "Cómodas",
            Category::Column => "Columnas",
            Category::Mirror => "Espejos",
            Category::Goblet => "Copas",
            Category::Seat => "Asientos",
            Category::Other => "Otros artículos",
        }
    }

    /// Lenient lookup by key, singular or plural label. Unknown input maps to
    /// [`Category::Other`] so intake keeps working when new labels show up.
    pub fn from_label(input: &str) -> Category {
        Self::lookup(input).unwrap_or(Category::Other)
    }

    fn lookup(input: &str) -> Option<Category> {
        let needle = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| {
            c.key() == needle
                || c.label().to_lowercase() == needle
                || c.plural().to_lowercase() == needle
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownVariant {
            kind: "category",
            value: s.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    ElRastro,
    Regueros,
}

impl Store {
    pub const ALL: [Store; 2] = [Store::ElRastro, Store::Regueros];

    pub fn key(self) -> &'static str {
        match self {
            Store::ElRastro => "el_rastro",
            Store::Regueros => "regueros",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Store::ElRastro => "El Rastro",
            Store::Regueros => "Regueros",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Store {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|st| st.key() == needle || st.label().to_lowercase() == needle)
            .ok_or_else(|| UnknownVariant {
                kind: "store",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_accepts_keys_labels_and_plurals() {
        assert_eq!(Category::from_label("table"), Category::Table);
        assert_eq!(Category::from_label("Mesa"), Category::Table);
        assert_eq!(Category::from_label("  cómodas "), Category::ChestOfDrawers);
        assert_eq!(Category::from_label("Otros artículos"), Category::Other);
    }

    #[test]
    fn unknown_label_falls_back_to_other() {
        assert_eq!(Category::from_label("sofa-bed"), Category::Other);
        assert!("sofa-bed".parse::<Category>().is_err());
    }

    #[test]
    fn keys_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>(), Ok(category));
        }
        for store in Store::ALL {
            assert_eq!(store.key().parse::<Store>(), Ok(store));
        }
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&Category::ChestOfDrawers).unwrap();
        assert_eq!(json, "\"chest_of_drawers\"");
        let store: Store = serde_json::from_str("\"el_rastro\"").unwrap();
        assert_eq!(store, Store::ElRastro);
    }

    #[test]
    fn store_parses_display_label() {
        assert_eq!("El Rastro".parse::<Store>(), Ok(Store::ElRastro));
        assert!("Madrid".parse::<Store>().is_err());
    }
}
