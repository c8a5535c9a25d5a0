//! # Commands Module
//!
//! All commands exposed to the HealthPost front-end.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Command enum + dispatch)
//! ├── catalog.rs  ◄─── Medicine search, inventory edits
//! ├── billing.rs  ◄─── Draft lines, commit
//! ├── history.rs  ◄─── Recent bills, search, summary
//! └── config.rs   ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bridge Command Flow                                  │
//! │                                                                         │
//! │  {"id": 3, "cmd": "add_line", "itemId": 1, "quantity": 2}               │
//! │         │                                                               │
//! │         │ serde (tag = "cmd")                                           │
//! │         ▼                                                               │
//! │  Command::AddLine(AddLineParams { item_id: 1, quantity: 2 })            │
//! │         │                                                               │
//! │         │ dispatch(&mut AppState, command)                              │
//! │         ▼                                                               │
//! │  billing::add_line(...) -> Result<DraftResponse, ApiError>              │
//! │         │                                                               │
//! │         │ serde_json::to_value                                          │
//! │         ▼                                                               │
//! │  {"id": 3, "ok": true, "data": {"state": "building", ...}}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod billing;
pub mod catalog;
pub mod config;
pub mod history;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

use billing::{AddLineParams, CommitParams, RemoveLineParams};
use catalog::{MedicineUpdate, NewMedicine};

/// Free-text search parameters. A missing query matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub query: String,
}

/// Parameters naming one medicine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemParams {
    pub item_id: u32,
}

/// Parameters naming one bill.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillParams {
    pub bill_id: String,
}

/// A request, selected by its `cmd` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    // Catalog
    SearchCatalog(QueryParams),
    SearchInventory(QueryParams),
    GetCatalogItem(ItemParams),
    AddCatalogItem(NewMedicine),
    UpdateCatalogItem(MedicineUpdate),
    RemoveCatalogItem(ItemParams),

    // Draft
    GetDraft,
    AddLine(AddLineParams),
    RemoveLine(RemoveLineParams),
    DiscardDraft,
    CommitBill(CommitParams),

    // History
    ListBills,
    SearchBills(QueryParams),
    GetBill(BillParams),
    GetSummary,

    // Config
    GetConfig,
}

/// Runs a command and returns its JSON payload.
pub fn dispatch(state: &mut AppState, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::SearchCatalog(p) => to_data(catalog::search_catalog(state, &p.query)),
        Command::SearchInventory(p) => to_data(catalog::search_inventory(state, &p.query)),
        Command::GetCatalogItem(p) => to_data(catalog::get_catalog_item(state, p.item_id)?),
        Command::AddCatalogItem(p) => to_data(catalog::add_catalog_item(state, p)?),
        Command::UpdateCatalogItem(p) => to_data(catalog::update_catalog_item(state, p)?),
        Command::RemoveCatalogItem(p) => to_data(catalog::remove_catalog_item(state, p.item_id)?),

        Command::GetDraft => to_data(billing::get_draft(state)),
        Command::AddLine(p) => to_data(billing::add_line(state, p)?),
        Command::RemoveLine(p) => to_data(billing::remove_line(state, p)),
        Command::DiscardDraft => to_data(billing::discard_draft(state)),
        Command::CommitBill(p) => to_data(billing::commit_bill(state, p)?),

        Command::ListBills => to_data(history::list_bills(state)),
        Command::SearchBills(p) => to_data(history::search_bills(state, &p.query)),
        Command::GetBill(p) => to_data(history::get_bill(state, &p.bill_id)?),
        Command::GetSummary => to_data(history::get_summary(state)),

        Command::GetConfig => to_data(config::get_config(state)),
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Command {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            parse(json!({ "cmd": "add_line", "itemId": 3, "quantity": 2 })),
            Command::AddLine(AddLineParams { item_id: 3, quantity: 2 })
        ));
        assert!(matches!(
            parse(json!({ "cmd": "add_line", "itemId": 3 })),
            Command::AddLine(AddLineParams { quantity: 1, .. })
        ));
        assert!(matches!(parse(json!({ "cmd": "get_draft", "id": 9 })), Command::GetDraft));
        assert!(matches!(
            parse(json!({ "cmd": "search_bills" })),
            Command::SearchBills(QueryParams { ref query }) if query.is_empty()
        ));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let result: Result<Command, _> = serde_json::from_value(json!({ "cmd": "refund_bill" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_dispatch_get_config() {
        let mut state = AppState::in_memory(Default::default());
        let data = dispatch(&mut state, Command::GetConfig).unwrap();
        assert_eq!(data["facilityName"], "HealthPost Clinic");
        assert_eq!(data["historyKey"], "healthpost-bills");
        assert!(data.get("databasePath").is_none());
    }
}
