//! The JSON payload used for error responses.
//!
//! Every error body has the same shape:
//!
//! ```json
//! { "error_type": "expansion_error", "error_message": "...", "meta": { ... } }
//! ```
use std::fmt::Display;

use serde_json::{Value, json};

/// Build an error body.
pub fn error_body(error_type: &str, error_message: impl Display, meta: Value) -> Value {
    json!({
        "error_type": error_type,
        "error_message": error_message.to_string(),
        "meta": meta,
    })
}
