//! Filling missing values from defaults, at two levels.
//!
//! Tree level: [`fill_defaults`] copies keys a live document lacks from a
//! defaults document, recursing where both sides hold a table. Live values
//! always win.
//!
//! Instance level: [`merge_instances`] walks the descriptor table of two
//! instances of the same schema type. Entry fields adopt the default
//! instance's default slot (resetting only entries never explicitly set,
//! per the entry contract); nested schema fields recurse; plain fields are
//! left alone.

use toml::{Table, Value};

use crate::schema::{FieldBinding, Schema};

/// Copy every key present in `defaults` but absent in `live` into `live`.
/// If both sides have a table for the same key, recurse.
/// Otherwise, `live`'s value wins.
pub fn fill_defaults(mut live: Table, defaults: Table) -> Table {
    for (key, default_val) in defaults {
        match (live.remove(&key), default_val) {
            (Some(Value::Table(live_tbl)), Value::Table(default_tbl)) => {
                live.insert(key, Value::Table(fill_defaults(live_tbl, default_tbl)));
            }
            (Some(existing), _) => {
                live.insert(key, existing);
            }
            (None, default_val) => {
                live.insert(key, default_val);
            }
        }
    }
    live
}

/// Fold the defaults instance's entry defaults into `live`, recursively.
pub fn merge_instances<S: Schema>(live: &mut S, defaults: &S) {
    for field in S::fields() {
        let Some(binding) = field.binding else {
            continue;
        };
        match binding {
            FieldBinding::Entry { merge, .. } => merge(live, defaults),
            FieldBinding::Nested { merge, .. } => merge(live, defaults),
            FieldBinding::Plain { .. } => {}
        }
    }
}
