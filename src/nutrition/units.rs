//! Unit kinds for nutrient profiles
//!
//! Every ingredient stores its nutrient values per one of three reference
//! amounts: 100 grams, 100 milliliters, or a single piece.

use serde::{Deserialize, Serialize};

/// Reference amount a nutrient profile is expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitKind {
    /// Values are per 100 grams (solids, powders)
    #[default]
    #[serde(rename = "100g")]
    Mass100g,
    /// Values are per 100 milliliters (liquids)
    #[serde(rename = "100ml")]
    Volume100ml,
    /// Values are per single piece (eggs, slices, bars)
    #[serde(rename = "piece")]
    Piece,
}

impl UnitKind {
    /// Unit a quantity of this kind is entered in
    pub fn quantity_unit(&self) -> &'static str {
        match self {
            UnitKind::Mass100g => "g",
            UnitKind::Volume100ml => "ml",
            UnitKind::Piece => "piece",
        }
    }

    /// Convert to database string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            UnitKind::Mass100g => "100g",
            UnitKind::Volume100ml => "100ml",
            UnitKind::Piece => "piece",
        }
    }

    /// Parse from a database string or a user-facing alias
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "100g" | "g" | "gram" | "grams" | "mass" | "weight" => Some(UnitKind::Mass100g),
            "100ml" | "ml" | "milliliter" | "milliliters" | "volume" => Some(UnitKind::Volume100ml),
            "piece" | "pieces" | "each" | "count" | "item" | "items" => Some(UnitKind::Piece),
            _ => None,
        }
    }

    /// True when profile values refer to a 100-unit reference amount
    pub fn is_per_hundred(&self) -> bool {
        !matches!(self, UnitKind::Piece)
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_db_strings() {
        assert_eq!(UnitKind::parse("100g"), Some(UnitKind::Mass100g));
        assert_eq!(UnitKind::parse("100ml"), Some(UnitKind::Volume100ml));
        assert_eq!(UnitKind::parse("piece"), Some(UnitKind::Piece));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(UnitKind::parse("Grams"), Some(UnitKind::Mass100g));
        assert_eq!(UnitKind::parse(" ml "), Some(UnitKind::Volume100ml));
        assert_eq!(UnitKind::parse("each"), Some(UnitKind::Piece));
        assert_eq!(UnitKind::parse("count"), Some(UnitKind::Piece));
        assert_eq!(UnitKind::parse("scoop"), None);
    }

    #[test]
    fn test_db_round_trip_for_every_kind() {
        for kind in [UnitKind::Mass100g, UnitKind::Volume100ml, UnitKind::Piece] {
            assert_eq!(UnitKind::parse(kind.to_db_str()), Some(kind));
        }
    }

    #[test]
    fn test_serde_uses_db_strings() {
        let json = serde_json::to_string(&UnitKind::Volume100ml).unwrap();
        assert_eq!(json, "\"100ml\"");
        let kind: UnitKind = serde_json::from_str("\"piece\"").unwrap();
        assert_eq!(kind, UnitKind::Piece);
    }
}
