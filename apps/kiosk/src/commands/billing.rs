//! # Billing Commands
//!
//! Draft bill manipulation and commit.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Lifecycle                                      │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │  │  Empty   │────►│ Building │────►│ Committed│ ──► (back to Empty)    │
//! │  └──────────┘     └──────────┘     └──────────┘                        │
//! │        ▲               │              commit_bill                       │
//! │        │          add_line                                              │
//! │        │          remove_line                                           │
//! │        │               │                                                │
//! │        └── discard_draft                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use healthpost_core::history::LineRecord;
use healthpost_core::{DraftState, LineId};

use crate::commands::history::BillDto;
use crate::error::ApiError;
use crate::state::AppState;

/// Draft contents and running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub state: DraftState,
    pub items: Vec<LineRecord>,
    pub total: f64,
    pub total_label: String,
}

impl DraftResponse {
    fn new(state: &AppState) -> Self {
        let total = state.ledger.current_total();
        DraftResponse {
            state: state.ledger.draft_state(),
            items: state.ledger.draft().iter().map(LineRecord::from).collect(),
            total: total.to_decimal(),
            total_label: state.format_money(total),
        }
    }
}

fn one() -> i64 {
    1
}

/// `add_line` parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineParams {
    pub item_id: u32,
    #[serde(default = "one")]
    pub quantity: i64,
}

/// `remove_line` parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLineParams {
    pub line_id: String,
}

/// `commit_bill` parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitParams {
    pub patient_name: String,
    #[serde(default)]
    pub patient_id: Option<String>,
}

pub fn get_draft(state: &AppState) -> DraftResponse {
    debug!("get_draft command");
    DraftResponse::new(state)
}

pub fn add_line(state: &mut AppState, params: AddLineParams) -> Result<DraftResponse, ApiError> {
    debug!(item_id = params.item_id, quantity = params.quantity, "add_line command");
    state
        .ledger
        .add_line(&state.catalog, params.item_id, params.quantity)?;
    Ok(DraftResponse::new(state))
}

/// Unknown line ids leave the draft as it is.
pub fn remove_line(state: &mut AppState, params: RemoveLineParams) -> DraftResponse {
    debug!(line_id = %params.line_id, "remove_line command");
    state.ledger.remove_line(&LineId::new(params.line_id));
    DraftResponse::new(state)
}

pub fn discard_draft(state: &mut AppState) -> DraftResponse {
    debug!("discard_draft command");
    state.ledger.discard_draft();
    DraftResponse::new(state)
}

pub fn commit_bill(state: &mut AppState, params: CommitParams) -> Result<BillDto, ApiError> {
    debug!("commit_bill command");
    let bill = state
        .ledger
        .commit(&params.patient_name, params.patient_id.as_deref())?;
    info!(bill_id = %bill.bill_id, facility = %state.config.facility_name, "Bill issued");
    Ok(BillDto::new(&bill, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::KioskConfig;

    fn state() -> AppState {
        AppState::in_memory(KioskConfig::default())
    }

    fn add(state: &mut AppState, item_id: u32, quantity: i64) -> Result<DraftResponse, ApiError> {
        add_line(state, AddLineParams { item_id, quantity })
    }

    #[test]
    fn test_add_and_remove_lines() {
        let mut state = state();

        add(&mut state, 1, 2).unwrap();
        let draft = add(&mut state, 3, 1).unwrap();
        assert_eq!(draft.state, DraftState::Building);
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.total, 16.75);
        assert_eq!(draft.total_label, "$16.75");

        let line_id = match &draft.items[0].id {
            healthpost_core::history::RecordId::Text(id) => id.clone(),
            other => panic!("unexpected line id {:?}", other),
        };
        let draft = remove_line(&mut state, RemoveLineParams { line_id });
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.total_label, "$6.75");
    }

    #[test]
    fn test_add_line_errors() {
        let mut state = state();
        assert_eq!(add(&mut state, 77, 1).unwrap_err().code, ErrorCode::InvalidInput);
        assert_eq!(add(&mut state, 1, 0).unwrap_err().code, ErrorCode::InvalidInput);
        assert_eq!(get_draft(&state).state, DraftState::Empty);
    }

    #[test]
    fn test_commit_bill() {
        let mut state = state();
        add(&mut state, 1, 2).unwrap();
        add(&mut state, 3, 1).unwrap();

        let bill = commit_bill(
            &mut state,
            CommitParams {
                patient_name: "Jane Doe".to_string(),
                patient_id: None,
            },
        )
        .unwrap();

        assert_eq!(bill.record.id, "B001");
        assert_eq!(bill.record.patient_id.as_deref(), Some("N/A"));
        assert_eq!(bill.record.total_amount, 16.75);
        assert_eq!(bill.total_label, "$16.75");
        assert_eq!(get_draft(&state).state, DraftState::Empty);
    }

    #[test]
    fn test_commit_errors() {
        let mut state = state();
        let params = || CommitParams {
            patient_name: " ".to_string(),
            patient_id: None,
        };

        assert_eq!(
            commit_bill(&mut state, params()).unwrap_err().code,
            ErrorCode::ValidationError
        );

        add(&mut state, 1, 1).unwrap();
        assert_eq!(
            commit_bill(&mut state, params()).unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(discard_draft(&mut state).state, DraftState::Empty);
    }
}
