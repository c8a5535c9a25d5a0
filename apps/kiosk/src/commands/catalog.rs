//! # Catalog Commands
//!
//! Medicine lookup for the billing screen and inventory edits for the
//! medicine-management screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use healthpost_core::{CatalogItem, CatalogItemPatch, Money, NewCatalogItem};

use crate::error::ApiError;
use crate::state::{AppState, KioskConfig};

/// Medicine as the front-end shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDto {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub price_label: String,
    pub stock: i64,
}

impl MedicineDto {
    pub fn new(item: &CatalogItem, config: &KioskConfig) -> Self {
        MedicineDto {
            id: item.id,
            name: item.name.clone(),
            kind: item.kind.clone(),
            price: item.unit_price.to_decimal(),
            price_label: config.format_currency(item.unit_price.cents()),
            stock: item.stock_qty,
        }
    }
}

/// `add_catalog_item` parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicine {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

/// `update_catalog_item` parameters. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineUpdate {
    pub item_id: u32,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

fn price_from_decimal(price: f64) -> Result<Money, ApiError> {
    Money::from_decimal(price)
        .ok_or_else(|| ApiError::validation("price must be a non-negative amount"))
}

/// Billing screen search: name contains query, ignoring case.
pub fn search_catalog(state: &AppState, query: &str) -> Vec<MedicineDto> {
    debug!(query, "search_catalog command");
    state
        .catalog
        .search(query)
        .into_iter()
        .map(|item| MedicineDto::new(item, &state.config))
        .collect()
}

/// Inventory screen search: name or type contains query.
pub fn search_inventory(state: &AppState, query: &str) -> Vec<MedicineDto> {
    debug!(query, "search_inventory command");
    state
        .catalog
        .search_inventory(query)
        .into_iter()
        .map(|item| MedicineDto::new(item, &state.config))
        .collect()
}

pub fn get_catalog_item(state: &AppState, item_id: u32) -> Result<MedicineDto, ApiError> {
    debug!(item_id, "get_catalog_item command");
    state
        .catalog
        .find_by_id(item_id)
        .map(|item| MedicineDto::new(item, &state.config))
        .ok_or_else(|| ApiError::not_found("Medicine", &item_id.to_string()))
}

pub fn add_catalog_item(state: &mut AppState, input: NewMedicine) -> Result<MedicineDto, ApiError> {
    debug!(name = %input.name, "add_catalog_item command");
    let item = state.catalog.add_item(NewCatalogItem {
        name: input.name,
        kind: input.kind,
        unit_price: price_from_decimal(input.price)?,
        stock_qty: input.stock,
    })?;
    Ok(MedicineDto::new(&item, &state.config))
}

pub fn update_catalog_item(
    state: &mut AppState,
    input: MedicineUpdate,
) -> Result<MedicineDto, ApiError> {
    debug!(item_id = input.item_id, "update_catalog_item command");
    let patch = CatalogItemPatch {
        name: input.name,
        kind: input.kind,
        unit_price: input.price.map(price_from_decimal).transpose()?,
        stock_qty: input.stock,
    };
    let item = state.catalog.update_item(input.item_id, patch)?;
    Ok(MedicineDto::new(&item, &state.config))
}

/// Removes a medicine unless the draft or a committed bill uses it.
pub fn remove_catalog_item(state: &mut AppState, item_id: u32) -> Result<MedicineDto, ApiError> {
    debug!(item_id, "remove_catalog_item command");
    let ledger = &state.ledger;
    let removed = state
        .catalog
        .remove_item(item_id, |id| ledger.references_catalog_item(id))?;
    Ok(MedicineDto::new(&removed, &state.config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn state() -> AppState {
        AppState::in_memory(KioskConfig::default())
    }

    #[test]
    fn test_search_catalog() {
        let state = state();
        let hits = search_catalog(&state, "ibu");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ibuprofen 400mg");
        assert_eq!(hits[0].price, 6.75);
        assert_eq!(hits[0].price_label, "$6.75");
    }

    #[test]
    fn test_add_and_update() {
        let mut state = state();
        let added = add_catalog_item(
            &mut state,
            NewMedicine {
                name: "ORS Sachet".to_string(),
                kind: "Powder".to_string(),
                price: 1.25,
                stock: 80,
            },
        )
        .unwrap();
        assert_eq!(added.id, 6);
        assert_eq!(search_inventory(&state, "powder").len(), 1);

        let updated = update_catalog_item(
            &mut state,
            MedicineUpdate {
                item_id: 6,
                name: None,
                kind: None,
                price: Some(1.5),
                stock: None,
            },
        )
        .unwrap();
        assert_eq!(updated.price_label, "$1.50");
        assert_eq!(updated.stock, 80);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut state = state();
        let err = add_catalog_item(
            &mut state,
            NewMedicine {
                name: "Bad".to_string(),
                kind: String::new(),
                price: -2.0,
                stock: 1,
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_remove_referenced_item_conflicts() {
        let mut state = state();
        let catalog = state.catalog.clone();
        state.ledger.add_line(&catalog, 1, 1).unwrap();

        let err = remove_catalog_item(&mut state, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        assert_eq!(remove_catalog_item(&mut state, 2).unwrap().id, 2);
        assert_eq!(
            get_catalog_item(&state, 2).unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
