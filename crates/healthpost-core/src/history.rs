//! # History Slot Format
//!
//! Encodes and decodes the bill history blob.
//!
//! ## Format
//! ```json
//! [
//!   {
//!     "id": "B001",
//!     "patientName": "Jane Doe",
//!     "patientId": "N/A",
//!     "date": "2023-05-15",
//!     "time": "09:45 AM",
//!     "totalAmount": 16.75,
//!     "status": "Paid",
//!     "items": [
//!       { "id": "…", "medicineId": 1, "name": "Paracetamol 500mg",
//!         "price": 5.0, "quantity": 2, "total": 10.0 }
//!     ]
//!   }
//! ]
//! ```
//!
//! ## Loading Is Lenient
//! The slot is written by earlier sessions and can be edited by hand, so
//! nothing in it is trusted:
//! - missing slot or unparseable JSON → empty history
//! - a record that fails validation is skipped, the rest are kept
//!
//! A record is valid when every amount is a non-negative number, every
//! quantity is >= 1, each line total equals price × quantity and the bill
//! total equals the sum of its lines.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::money::Money;
use crate::types::{Bill, BillStatus, LineId, LineItem};
use crate::validation::{normalize_patient_ref, validate_price, validate_quantity};
use crate::{DATE_FORMAT, NO_PATIENT_REF, TIME_FORMAT};

// =============================================================================
// Records
// =============================================================================

/// One bill as stored in the history slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub id: String,
    pub patient_name: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub date: String,
    pub time: String,
    pub total_amount: f64,
    pub status: BillStatus,
    pub items: Vec<LineRecord>,
}

/// One bill line as stored in the history slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    pub id: RecordId,
    pub medicine_id: u32,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub total: f64,
}

/// Line ids were numeric timestamps in early data and strings since.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    fn into_line_id(self) -> LineId {
        match self {
            RecordId::Number(n) => LineId::new(n.to_string()),
            RecordId::Text(s) => LineId::new(s),
        }
    }
}

/// Why a stored record was rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },

    #[error("{field} does not add up: stored {stored}, computed {computed}")]
    Mismatch {
        field: &'static str,
        stored: Money,
        computed: Money,
    },
}

// =============================================================================
// Domain ⇄ Record
// =============================================================================

impl From<&Bill> for BillRecord {
    fn from(bill: &Bill) -> Self {
        BillRecord {
            id: bill.bill_id.clone(),
            patient_name: bill.patient_name.clone(),
            patient_id: Some(
                bill.patient_ref
                    .clone()
                    .unwrap_or_else(|| NO_PATIENT_REF.to_string()),
            ),
            date: bill.date_label(),
            time: bill.time_label(),
            total_amount: bill.total_amount().to_decimal(),
            status: bill.status,
            items: bill.lines.iter().map(LineRecord::from).collect(),
        }
    }
}

impl From<&LineItem> for LineRecord {
    fn from(line: &LineItem) -> Self {
        LineRecord {
            id: RecordId::Text(line.line_id.as_str().to_string()),
            medicine_id: line.catalog_item_id,
            name: line.name.clone(),
            price: line.unit_price_at_add_time.to_decimal(),
            quantity: line.quantity,
            total: line.line_total().to_decimal(),
        }
    }
}

impl TryFrom<LineRecord> for LineItem {
    type Error = RecordError;

    fn try_from(record: LineRecord) -> Result<Self, Self::Error> {
        if validate_quantity(record.quantity).is_err() {
            return Err(RecordError::Invalid {
                field: "quantity",
                value: record.quantity.to_string(),
            });
        }

        let price = decimal("price", record.price)?;
        if validate_price(price).is_err() {
            return Err(RecordError::Invalid {
                field: "price",
                value: record.price.to_string(),
            });
        }
        let stored_total = decimal("line total", record.total)?;

        let line = LineItem {
            line_id: record.id.into_line_id(),
            catalog_item_id: record.medicine_id,
            name: record.name,
            unit_price_at_add_time: price,
            quantity: record.quantity,
        };

        if line.line_total() != stored_total {
            return Err(RecordError::Mismatch {
                field: "line total",
                stored: stored_total,
                computed: line.line_total(),
            });
        }

        Ok(line)
    }
}

impl TryFrom<BillRecord> for Bill {
    type Error = RecordError;

    fn try_from(record: BillRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(RecordError::Missing("bill id"));
        }
        if record.patient_name.trim().is_empty() {
            return Err(RecordError::Missing("patient name"));
        }
        if record.items.is_empty() {
            return Err(RecordError::Missing("bill items"));
        }

        let date = NaiveDate::parse_from_str(record.date.trim(), DATE_FORMAT).map_err(|_| {
            RecordError::Invalid {
                field: "date",
                value: record.date.clone(),
            }
        })?;
        let time = parse_time(&record.time)?;
        let stored_total = decimal("total amount", record.total_amount)?;

        let lines = record
            .items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let bill = Bill {
            bill_id: record.id,
            patient_name: record.patient_name,
            patient_ref: normalize_patient_ref(record.patient_id.as_deref()),
            created_at: date.and_time(time),
            lines,
            status: record.status,
        };

        let computed = bill
            .lines
            .iter()
            .try_fold(Money::zero(), |sum, line| {
                line.checked_line_total().and_then(|total| sum.checked_add(total))
            })
            .ok_or_else(|| RecordError::Invalid {
                field: "total amount",
                value: stored_total.to_string(),
            })?;

        if computed != stored_total {
            return Err(RecordError::Mismatch {
                field: "total amount",
                stored: stored_total,
                computed,
            });
        }

        Ok(bill)
    }
}

fn decimal(field: &'static str, amount: f64) -> Result<Money, RecordError> {
    Money::from_decimal(amount).ok_or_else(|| RecordError::Invalid {
        field,
        value: amount.to_string(),
    })
}

/// Accepts `hh:mm AM` and, for hand-edited data, 24-hour `HH:MM`.
fn parse_time(raw: &str) -> Result<NaiveTime, RecordError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| RecordError::Invalid {
            field: "time",
            value: raw.to_string(),
        })
}

// =============================================================================
// Slot Encoding
// =============================================================================

/// Serializes the history as a JSON array.
pub fn encode_history(bills: &[Bill]) -> Result<String, serde_json::Error> {
    let records: Vec<BillRecord> = bills.iter().map(BillRecord::from).collect();
    serde_json::to_string(&records)
}

/// Parses a history blob, keeping every valid bill in stored order.
pub fn decode_history(blob: &str) -> Vec<Bill> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(blob) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "History slot is not a JSON array, starting empty");
            return Vec::new();
        }
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record: BillRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed bill record");
                    return None;
                }
            };

            let bill_id = record.id.clone();
            match Bill::try_from(record) {
                Ok(bill) => Some(bill),
                Err(e) => {
                    warn!(index, bill_id = %bill_id, error = %e, "Skipping invalid bill record");
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    fn sample_bill() -> Bill {
        Bill {
            bill_id: "B001".to_string(),
            patient_name: "Jane Doe".to_string(),
            patient_ref: None,
            created_at: at("2023-05-15", "14:05"),
            lines: vec![
                LineItem {
                    line_id: LineId::new("line-1"),
                    catalog_item_id: 1,
                    name: "Paracetamol 500mg".to_string(),
                    unit_price_at_add_time: Money::from_cents(500),
                    quantity: 2,
                },
                LineItem {
                    line_id: LineId::new("line-2"),
                    catalog_item_id: 3,
                    name: "Ibuprofen 400mg".to_string(),
                    unit_price_at_add_time: Money::from_cents(675),
                    quantity: 1,
                },
            ],
            status: BillStatus::Paid,
        }
    }

    #[test]
    fn test_encoded_shape() {
        let json = encode_history(&[sample_bill()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let bill = &value[0];

        assert_eq!(bill["id"], "B001");
        assert_eq!(bill["patientName"], "Jane Doe");
        assert_eq!(bill["patientId"], "N/A");
        assert_eq!(bill["date"], "2023-05-15");
        assert_eq!(bill["time"], "02:05 PM");
        assert_eq!(bill["totalAmount"], 16.75);
        assert_eq!(bill["status"], "Paid");
        assert_eq!(bill["items"][0]["medicineId"], 1);
        assert_eq!(bill["items"][0]["price"], 5.0);
        assert_eq!(bill["items"][0]["total"], 10.0);
    }

    #[test]
    fn test_roundtrip_is_field_for_field() {
        let mut with_ref = sample_bill();
        with_ref.bill_id = "B002".to_string();
        with_ref.patient_ref = Some("P-1002".to_string());
        with_ref.status = BillStatus::Pending;

        let bills = vec![sample_bill(), with_ref];
        let decoded = decode_history(&encode_history(&bills).unwrap());
        assert_eq!(decoded, bills);
    }

    #[test]
    fn test_garbage_decodes_to_empty() {
        assert!(decode_history("").is_empty());
        assert!(decode_history("not json").is_empty());
        assert!(decode_history("{\"id\": \"B001\"}").is_empty());
    }

    #[test]
    fn test_numeric_line_ids_and_24h_time_are_accepted() {
        let blob = r#"[{
            "id": "B001", "patientName": "John Smith", "patientId": "N/A",
            "date": "2023-05-15", "time": "09:45",
            "totalAmount": 10.0, "status": "Paid",
            "items": [{ "id": 1684142700000, "medicineId": 1, "name": "Paracetamol 500mg",
                        "price": 5.0, "quantity": 2, "total": 10.0 }]
        }]"#;

        let bills = decode_history(blob);
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].lines[0].line_id.as_str(), "1684142700000");
        assert_eq!(bills[0].time_label(), "09:45 AM");
        assert_eq!(bills[0].patient_ref, None);
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let good = BillRecord::from(&sample_bill());

        let mut wrong_total = good.clone();
        wrong_total.id = "B002".to_string();
        wrong_total.total_amount = 99.0;

        let mut bad_qty = good.clone();
        bad_qty.id = "B003".to_string();
        bad_qty.items[0].quantity = 0;

        let mut blank_name = good.clone();
        blank_name.id = "B004".to_string();
        blank_name.patient_name = "  ".to_string();

        let mut bad_date = good.clone();
        bad_date.id = "B005".to_string();
        bad_date.date = "15/05/2023".to_string();

        let mut values: Vec<serde_json::Value> = [good, wrong_total, bad_qty, blank_name, bad_date]
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        values.push(serde_json::json!({ "id": "B006", "status": "Refunded" }));

        let decoded = decode_history(&serde_json::to_string(&values).unwrap());
        let ids: Vec<&str> = decoded.iter().map(|b| b.bill_id.as_str()).collect();
        assert_eq!(ids, vec!["B001"]);
    }

    #[test]
    fn test_oversized_amounts_are_skipped() {
        let blob = r#"[
            { "id": "B001", "patientName": "Jane Doe", "patientId": "N/A",
              "date": "2023-05-15", "time": "09:45 AM", "totalAmount": 1e19, "status": "Paid",
              "items": [{ "id": "a", "medicineId": 1, "name": "Paracetamol 500mg",
                          "price": 1e16, "quantity": 1000, "total": 1e19 }] },
            { "id": "B002", "patientName": "Jane Doe", "patientId": "N/A",
              "date": "2023-05-15", "time": "09:45 AM", "totalAmount": 50000.0, "status": "Paid",
              "items": [{ "id": "b", "medicineId": 1, "name": "Paracetamol 500mg",
                          "price": 5.0, "quantity": 10000, "total": 50000.0 }] },
            { "id": "B003", "patientName": "Jane Doe", "patientId": "N/A",
              "date": "2023-05-15", "time": "09:45 AM", "totalAmount": 10.0, "status": "Paid",
              "items": [{ "id": "c", "medicineId": 1, "name": "Paracetamol 500mg",
                          "price": 5.0, "quantity": 2, "total": 10.0 }] }
        ]"#;

        let ids: Vec<String> = decode_history(blob).into_iter().map(|b| b.bill_id).collect();
        assert_eq!(ids, vec!["B003".to_string()]);
    }

    #[test]
    fn test_placeholder_patient_ref_reads_as_none() {
        let mut record = BillRecord::from(&sample_bill());
        record.patient_id = Some("n/a".to_string());
        assert_eq!(Bill::try_from(record).unwrap().patient_ref, None);
    }

    #[test]
    fn test_line_total_mismatch_is_rejected() {
        let mut record = LineRecord::from(&sample_bill().lines[0]);
        record.total = 12.0;
        assert!(matches!(
            LineItem::try_from(record),
            Err(RecordError::Mismatch { field: "line total", .. })
        ));
    }
}
