//! Domain model for variable (ad hoc) expenses recorded via chat.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Fixed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Alimentacion,
    Transporte,
    Mercado,
    Rumba,
    Otros,
}

impl Category {
    /// User-facing Spanish label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Alimentacion => "Alimentación",
            Category::Transporte => "Transporte",
            Category::Mercado => "Mercado",
            Category::Rumba => "Rumba",
            Category::Otros => "Otros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alimentación" | "Alimentacion" => Ok(Category::Alimentacion),
            "Transporte" => Ok(Category::Transporte),
            "Mercado" => Ok(Category::Mercado),
            "Rumba" => Ok(Category::Rumba),
            "Otros" => Ok(Category::Otros),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// An ad hoc discretionary purchase recorded via chat.
///
/// Immutable once created; the only mutation is hard deletion by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpense {
    pub id: String,
    pub description: String,
    /// Amount in pesos
    pub amount: u64,
    pub category: Category,
    /// Creation timestamp; the date part drives same-day duplicate checks
    /// and month bucketing
    pub created_at: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_label_roundtrip() {
        for category in [
            Category::Alimentacion,
            Category::Transporte,
            Category::Mercado,
            Category::Rumba,
            Category::Otros,
        ] {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn accepts_unaccented_spelling() {
        assert_eq!("Alimentacion".parse::<Category>().unwrap(), Category::Alimentacion);
    }
}
