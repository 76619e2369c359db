//! Keyword-based expense categorization.
//!
//! Deterministic substring containment against a lowercased copy of the
//! description, evaluated in a fixed priority order - first match wins.
//! No fuzzy matching.

use super::models::Category;

const RULES: [(Category, &[&str]); 4] = [
    (
        Category::Alimentacion,
        &["almuerzo", "comida", "restaurante", "café", "tintico", "desayuno", "cena"],
    ),
    (
        Category::Transporte,
        &["uber", "taxi", "bus", "transporte", "gasolina", "parqueadero"],
    ),
    (Category::Mercado, &["mercado", "supermercado", "exito", "d1", "ara"]),
    (Category::Rumba, &["cerveza", "trago", "rumba", "bar"]),
];

/// Map a free-text description to a spending category.
pub fn categorize(description: &str) -> Category {
    let lower = description.to_lowercase();
    for (category, keywords) in RULES {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return category;
        }
    }
    Category::Otros
}
