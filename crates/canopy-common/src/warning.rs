//! Deduplicated warnings routed through the `log` facade.
//!
//! Malformed markup tends to repeat the same mistake many times (an unclosed
//! `<p>` per paragraph, a stray `&` per URL). Every occurrence is still
//! recorded by the parser; only the first one per component and message is
//! forwarded to the logger.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already logged (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Log a warning once per unique `(component, message)` pair.
///
/// Returns `true` if this call forwarded the warning to the logger.
///
/// # Example
/// ```ignore
/// warn_once("HTML Tokenizer", "missing-semicolon-after-character-reference");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_log {
        log::warn!(target: "canopy", "[{component}] {message}");
    }
    should_log
}

/// Clear all recorded warnings (call when starting a new parse)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
