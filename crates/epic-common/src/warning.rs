//! Deduplicated warnings.
//!
//! A dev server re-renders the same page on every request, so a malformed page
//! would otherwise repeat the same parse error in the log forever. Each unique
//! `[component] message` pair is forwarded to `tracing` once per process (or
//! once per [`clear_warnings`] epoch).

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex, PoisonError};

/// Set of warnings we've already emitted.
static WARNED: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(|| Mutex::new(HashSet::new()));

/// Warn about a recoverable problem (emitted once per unique message).
///
/// # Example
/// ```
/// use epic_common::warning::warn_once;
///
/// warn_once("HTML", "eof-in-tag parse error (TagName state)");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let is_new = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key);

    if is_new {
        tracing::warn!(component, "{message}");
    }
}

/// Forget all recorded warnings so they can be reported again.
pub fn clear_warnings() {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
