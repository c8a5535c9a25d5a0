//! # Catalog
//!
//! The list of medicines that can be put on a bill.
//!
//! The billing screen only reads it (`find_by_id`, `search`). The inventory
//! screen edits it (`add_item`, `update_item`, `remove_item`).
//!
//! Items keep their insertion order; searches return matches in that order.

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::types::{CatalogItem, CatalogItemPatch, NewCatalogItem};
use crate::validation::{normalize_query, validate_item_name, validate_price, validate_stock};

/// In-memory medicine catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog { items: Vec::new() }
    }

    /// Creates a catalog from a seed list.
    ///
    /// Later duplicates of an id are dropped so lookups stay unambiguous.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Catalog::new();
        for item in items {
            if catalog.find_by_id(item.id).is_some() {
                debug!(id = item.id, "Skipping duplicate catalog id");
                continue;
            }
            catalog.items.push(item);
        }
        catalog
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks an item up by id.
    pub fn find_by_id(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items whose name contains `query`, ignoring case.
    ///
    /// An empty query returns every item.
    ///
    /// ```rust
    /// use healthpost_core::seed::default_catalog;
    ///
    /// let catalog = default_catalog();
    /// let hits = catalog.search("CILLIN");
    /// assert_eq!(hits.len(), 1);
    /// assert_eq!(hits[0].name, "Amoxicillin 250mg");
    /// ```
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = normalize_query(query);
        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Inventory screen filter: matches name or dosage form.
    pub fn search_inventory(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = normalize_query(query);
        self.items
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || item.name.to_lowercase().contains(&needle)
                    || item.kind.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // =========================================================================
    // Inventory Editing
    // =========================================================================

    /// Adds a new item and returns it. Ids are assigned as `max id + 1`.
    pub fn add_item(&mut self, new_item: NewCatalogItem) -> CoreResult<CatalogItem> {
        let name = validate_item_name(&new_item.name)?;
        validate_price(new_item.unit_price)?;
        validate_stock(new_item.stock_qty)?;

        let id = self.next_id();
        let item = CatalogItem {
            id,
            name,
            kind: new_item.kind.trim().to_string(),
            unit_price: new_item.unit_price,
            stock_qty: new_item.stock_qty,
        };

        info!(id, name = %item.name, price = %item.unit_price, "Catalog item added");
        self.items.push(item.clone());
        Ok(item)
    }

    /// Applies a partial update and returns the updated item.
    ///
    /// Nothing changes if any field fails validation.
    pub fn update_item(&mut self, id: u32, patch: CatalogItemPatch) -> CoreResult<CatalogItem> {
        let name = patch.name.as_deref().map(validate_item_name).transpose()?;
        if let Some(price) = patch.unit_price {
            validate_price(price)?;
        }
        if let Some(stock) = patch.stock_qty {
            validate_stock(stock)?;
        }

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CoreError::CatalogItemNotFound(id))?;

        if let Some(name) = name {
            item.name = name;
        }
        if let Some(kind) = patch.kind {
            item.kind = kind.trim().to_string();
        }
        if let Some(price) = patch.unit_price {
            item.unit_price = price;
        }
        if let Some(stock) = patch.stock_qty {
            item.stock_qty = stock;
        }

        info!(id, "Catalog item updated");
        Ok(item.clone())
    }

    /// Removes an item.
    ///
    /// `is_referenced` tells whether billing records still point at the id;
    /// referenced items are kept and `CatalogItemInUse` is returned.
    pub fn remove_item(
        &mut self,
        id: u32,
        is_referenced: impl FnOnce(u32) -> bool,
    ) -> CoreResult<CatalogItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(CoreError::CatalogItemNotFound(id))?;

        if is_referenced(id) {
            return Err(CoreError::CatalogItemInUse(id));
        }

        let removed = self.items.remove(index);
        info!(id, name = %removed.name, "Catalog item removed");
        Ok(removed)
    }

    fn next_id(&self) -> u32 {
        self.items.iter().map(|item| item.id).max().unwrap_or(0) + 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::seed::default_catalog;

    fn new_item(name: &str, cents: i64, stock: i64) -> NewCatalogItem {
        NewCatalogItem {
            name: name.to_string(),
            kind: "Syrup".to_string(),
            unit_price: Money::from_cents(cents),
            stock_qty: stock,
        }
    }

    #[test]
    fn test_find_by_id() {
        let catalog = default_catalog();
        assert_eq!(catalog.find_by_id(3).map(|i| i.name.as_str()), Some("Ibuprofen 400mg"));
        assert!(catalog.find_by_id(99).is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let catalog = default_catalog();

        let ids: Vec<u32> = catalog.search("MG").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let ids: Vec<u32> = catalog.search("para").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1]);

        assert!(catalog.search("aspirin").is_empty());
    }

    #[test]
    fn test_empty_query_returns_all() {
        let catalog = default_catalog();
        assert_eq!(catalog.search("").len(), catalog.len());
        assert_eq!(catalog.search("   ").len(), catalog.len());
    }

    #[test]
    fn test_search_inventory_matches_kind() {
        let catalog = default_catalog();
        let ids: Vec<u32> = catalog.search_inventory("capsule").iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 5]);

        // Billing search only looks at names
        assert!(catalog.search("capsule").is_empty());
    }

    #[test]
    fn test_duplicate_seed_ids_are_dropped() {
        let mut items = default_catalog().items().to_vec();
        let mut dup = items[0].clone();
        dup.name = "Duplicate".to_string();
        items.push(dup);

        let catalog = Catalog::from_items(items);
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.find_by_id(1).map(|i| i.name.as_str()), Some("Paracetamol 500mg"));
    }

    #[test]
    fn test_add_item_assigns_next_id() {
        let mut catalog = default_catalog();
        let item = catalog.add_item(new_item("  Cough Syrup ", 450, 40)).unwrap();

        assert_eq!(item.id, 6);
        assert_eq!(item.name, "Cough Syrup");
        assert_eq!(catalog.find_by_id(6), Some(&item));
    }

    #[test]
    fn test_add_item_validates() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_item(new_item(" ", 450, 40)).is_err());
        assert!(catalog.add_item(new_item("Syrup", -1, 40)).is_err());
        assert!(catalog.add_item(new_item("Syrup", 450, -1)).is_err());
        // 1e16 dollars; a 1000-unit line of it would not fit in i64 cents
        assert!(catalog
            .add_item(new_item("Syrup", 1_000_000_000_000_000, 40))
            .is_err());
        assert!(catalog.is_empty());

        let first = catalog.add_item(new_item("Syrup", 0, 0)).unwrap();
        assert_eq!(first.id, 1);
    }

    #[test]
    fn test_update_item() {
        let mut catalog = default_catalog();
        let patch = CatalogItemPatch {
            unit_price: Some(Money::from_cents(550)),
            stock_qty: Some(480),
            ..Default::default()
        };

        let updated = catalog.update_item(1, patch).unwrap();
        assert_eq!(updated.name, "Paracetamol 500mg");
        assert_eq!(updated.unit_price.cents(), 550);
        assert_eq!(updated.stock_qty, 480);
    }

    #[test]
    fn test_update_item_rejects_bad_patch_without_changes() {
        let mut catalog = default_catalog();
        let patch = CatalogItemPatch {
            name: Some("Renamed".to_string()),
            stock_qty: Some(-3),
            ..Default::default()
        };

        assert!(catalog.update_item(1, patch).is_err());
        assert_eq!(catalog.find_by_id(1).map(|i| i.name.as_str()), Some("Paracetamol 500mg"));

        assert_eq!(
            catalog.update_item(42, CatalogItemPatch::default()),
            Err(CoreError::CatalogItemNotFound(42))
        );
    }

    #[test]
    fn test_remove_item() {
        let mut catalog = default_catalog();

        assert_eq!(
            catalog.remove_item(2, |_| true),
            Err(CoreError::CatalogItemInUse(2))
        );
        assert!(catalog.find_by_id(2).is_some());

        let removed = catalog.remove_item(2, |_| false).unwrap();
        assert_eq!(removed.id, 2);
        assert!(catalog.find_by_id(2).is_none());

        assert_eq!(
            catalog.remove_item(2, |_| false),
            Err(CoreError::CatalogItemNotFound(2))
        );
    }
}
