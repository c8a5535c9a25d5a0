//! # JSON-Lines Bridge
//!
//! The front-end talks to the kiosk over stdin/stdout, one JSON object per
//! line in each direction.
//!
//! ```text
//! stdin  → {"id": 1, "cmd": "search_catalog", "query": "para"}
//! stdout ← {"id": 1, "ok": true, "data": [{"id": 1, "name": "Paracetamol 500mg", ...}]}
//!
//! stdin  → {"id": 2, "cmd": "add_line", "itemId": 99}
//! stdout ← {"id": 2, "ok": false, "error": {"code": "INVALID_INPUT", "message": "..."}}
//! ```
//!
//! A bad line gets a `BAD_REQUEST` answer and the loop moves on. EOF ends
//! the session. Logs go to stderr, never to stdout.

use serde::Serialize;
use serde_json::Value;
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

use crate::commands::{dispatch, Command};
use crate::error::ApiError;
use crate::state::AppState;

/// One answer line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Echo of the request id, `null` when absent or unreadable.
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    fn success(id: Value, data: Value) -> Self {
        Response {
            id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(id: Value, error: ApiError) -> Self {
        Response {
            id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Handles a single request line.
pub fn handle_line(state: &mut AppState, line: &str) -> Response {
    let request: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Unreadable request line");
            return Response::failure(Value::Null, ApiError::from(e));
        }
    };

    let id = request.get("id").cloned().unwrap_or(Value::Null);

    let command: Command = match serde_json::from_value(request) {
        Ok(command) => command,
        Err(e) => {
            warn!(error = %e, "Rejected request");
            return Response::failure(id, ApiError::from(e));
        }
    };

    match dispatch(state, command) {
        Ok(data) => Response::success(id, data),
        Err(error) => {
            debug!(code = ?error.code, message = %error.message, "Command failed");
            Response::failure(id, error)
        }
    }
}

/// Serves requests until EOF. Returns the number of requests handled.
pub fn serve<R: BufRead, W: Write>(input: R, mut output: W, state: &mut AppState) -> io::Result<usize> {
    let mut handled = 0;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(state, &line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }

    info!(requests = handled, "Input closed, ending session");
    Ok(handled)
}
