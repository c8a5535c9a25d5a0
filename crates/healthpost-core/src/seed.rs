//! # Seed Data
//!
//! The medicine list the HealthPost front desk starts with.
//!
//! | id | name              | kind    | price  | stock |
//! |----|-------------------|---------|--------|-------|
//! | 1  | Paracetamol 500mg | Tablet  | $5.00  | 500   |
//! | 2  | Amoxicillin 250mg | Capsule | $8.50  | 300   |
//! | 3  | Ibuprofen 400mg   | Tablet  | $6.75  | 450   |
//! | 4  | Cetirizine 10mg   | Tablet  | $7.25  | 200   |
//! | 5  | Omeprazole 20mg   | Capsule | $12.50 | 150   |

use crate::catalog::Catalog;
use crate::money::Money;
use crate::types::CatalogItem;

const SEED: [(u32, &str, &str, i64, i64); 5] = [
    (1, "Paracetamol 500mg", "Tablet", 500, 500),
    (2, "Amoxicillin 250mg", "Capsule", 850, 300),
    (3, "Ibuprofen 400mg", "Tablet", 675, 450),
    (4, "Cetirizine 10mg", "Tablet", 725, 200),
    (5, "Omeprazole 20mg", "Capsule", 1250, 150),
];

/// Seed items in catalog order.
pub fn default_items() -> Vec<CatalogItem> {
    SEED.iter()
        .map(|&(id, name, kind, price_cents, stock)| CatalogItem {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            unit_price: Money::from_cents(price_cents),
            stock_qty: stock,
        })
        .collect()
}

/// A catalog holding the seed items.
pub fn default_catalog() -> Catalog {
    Catalog::from_items(default_items())
}
