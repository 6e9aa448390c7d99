//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Repository identifiers
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_NEW_SNAPSHOT_ID: &str = "new_snapshot_id";
pub const FIELD_KEY: &str = "key";

// Collection sizes
pub const FIELD_OP_COUNT: &str = "op_count";
pub const FIELD_HISTORY_LEN: &str = "history_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
