//! # History Commands
//!
//! Recent-bills screen: list, search, detail view and the summary cards.

use serde::Serialize;
use tracing::debug;

use healthpost_core::history::BillRecord;
use healthpost_core::Bill;

use crate::error::ApiError;
use crate::state::AppState;

/// A committed bill in the front-end's shape, plus a display total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    #[serde(flatten)]
    pub record: BillRecord,
    pub total_label: String,
}

impl BillDto {
    pub fn new(bill: &Bill, state: &AppState) -> Self {
        BillDto {
            record: BillRecord::from(bill),
            total_label: state.format_money(bill.total_amount()),
        }
    }
}

/// Summary cards above the bill table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub total_bills: usize,
    pub total_revenue: f64,
    pub total_revenue_label: String,
    pub paid_bills: usize,
    pub pending_bills: usize,
}

/// Every committed bill, oldest first.
pub fn list_bills(state: &AppState) -> Vec<BillDto> {
    debug!("list_bills command");
    state
        .ledger
        .history()
        .iter()
        .map(|bill| BillDto::new(bill, state))
        .collect()
}

/// Bills whose patient name or id contains the query.
pub fn search_bills(state: &AppState, query: &str) -> Vec<BillDto> {
    debug!(query, "search_bills command");
    state
        .ledger
        .find_history(query)
        .into_iter()
        .map(|bill| BillDto::new(bill, state))
        .collect()
}

pub fn get_bill(state: &AppState, bill_id: &str) -> Result<BillDto, ApiError> {
    debug!(bill_id, "get_bill command");
    state
        .ledger
        .find_bill(bill_id)
        .map(|bill| BillDto::new(bill, state))
        .ok_or_else(|| ApiError::not_found("Bill", bill_id))
}

pub fn get_summary(state: &AppState) -> SummaryDto {
    debug!("get_summary command");
    let summary = state.ledger.summary();
    SummaryDto {
        total_bills: summary.total_bills,
        total_revenue: summary.total_revenue.to_decimal(),
        total_revenue_label: state.format_money(summary.total_revenue),
        paid_bills: summary.paid_bills,
        pending_bills: summary.pending_bills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::KioskConfig;

    fn state_with_bills() -> AppState {
        let mut state = AppState::in_memory(KioskConfig::default());
        let catalog = state.catalog.clone();
        for (name, item, qty) in [("Jane Doe", 1, 2), ("John Smith", 5, 1)] {
            state.ledger.add_line(&catalog, item, qty).unwrap();
            state.ledger.commit(name, None).unwrap();
        }
        state
    }

    #[test]
    fn test_list_and_search() {
        let state = state_with_bills();
        assert_eq!(list_bills(&state).len(), 2);

        let hits = search_bills(&state, "smith");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.id, "B002");
        assert_eq!(hits[0].total_label, "$12.50");
    }

    #[test]
    fn test_get_bill() {
        let state = state_with_bills();
        assert_eq!(get_bill(&state, "B001").unwrap().record.patient_name, "Jane Doe");
        assert_eq!(get_bill(&state, "B009").unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_summary() {
        let summary = get_summary(&state_with_bills());
        assert_eq!(summary.total_bills, 2);
        assert_eq!(summary.paid_bills, 2);
        assert_eq!(summary.total_revenue_label, "$22.50");
    }

    #[test]
    fn test_bill_dto_is_flat() {
        let state = state_with_bills();
        let json = serde_json::to_value(get_bill(&state, "B001").unwrap()).unwrap();
        assert_eq!(json["id"], "B001");
        assert_eq!(json["totalAmount"], 10.0);
        assert_eq!(json["totalLabel"], "$10.00");
        assert!(json["items"].is_array());
    }
}
