//! The marshal engine: recursive conversion between schema instances and
//! generic document trees.
//!
//! Partial-failure semantics are deliberate and asymmetric:
//!
//! - A **validator rejection** aborts the whole [`populate`] call with the
//!   field's dotted path, the offending value, and the declared allowed
//!   values.
//! - A **shape or coercion mismatch** is local to one field: it is logged
//!   and the field keeps its prior value, so a single bad key never blocks
//!   an application from starting.

use toml::{Table, Value};

use crate::error::ConfigError;
use crate::schema::{FieldBinding, Schema};

/// Serialize a schema instance into a document tree.
///
/// Keys appear in declared field order. Entry fields flagged
/// `skip_default` and currently at their default are omitted entirely.
pub fn serialize<S: Schema>(instance: &S) -> Table {
    let mut tree = Table::new();
    for field in S::fields() {
        let Some(binding) = field.binding else {
            continue;
        };
        match binding {
            FieldBinding::Plain { get, .. } => {
                tree.insert(field.name.to_owned(), get(instance));
            }
            FieldBinding::Entry {
                serialize,
                is_default,
                ..
            } => {
                if field.skip_default && is_default(instance) {
                    continue;
                }
                tree.insert(field.name.to_owned(), serialize(instance));
            }
            FieldBinding::Nested { serialize, .. } => {
                tree.insert(field.name.to_owned(), Value::Table(serialize(instance)));
            }
        }
    }
    tree
}

/// Populate a schema instance from a document tree.
///
/// Keys absent from the tree leave their fields untouched, as do unbound
/// descriptors. The only hard failure is a validator rejection.
pub fn populate<S: Schema>(target: &mut S, tree: &Table) -> Result<(), ConfigError> {
    populate_at(target, tree, "")
}

pub(crate) fn populate_at<S: Schema>(
    target: &mut S,
    tree: &Table,
    parent: &str,
) -> Result<(), ConfigError> {
    for field in S::fields() {
        let Some(raw) = tree.get(field.name) else {
            continue;
        };
        let Some(binding) = field.binding else {
            continue;
        };
        let path = join_path(parent, field.name);

        // Validators see the raw tree value, before any transformer runs.
        if let Some(validator) = &field.validator
            && !(validator.predicate)(raw)
        {
            return Err(ConfigError::Invalid {
                path,
                value: raw.clone(),
                allowed: validator.allowed.iter().map(|s| s.to_string()).collect(),
            });
        }

        let mut value = raw.clone();
        for transformer in &field.transformers {
            value = transformer(value);
        }

        match binding {
            FieldBinding::Nested {
                populate: descend, ..
            } => {
                if let Value::Table(sub) = &value {
                    descend(target, sub, &path)?;
                } else {
                    log::warn!("expected a table at '{path}', found {value:?}; section left unchanged");
                }
            }
            FieldBinding::Entry { deserialize, .. } => deserialize(target, &value),
            FieldBinding::Plain { set, .. } => {
                if !set(target, &value) {
                    log::warn!("cannot convert {value:?} at '{path}'; field left unchanged");
                }
            }
        }
    }
    Ok(())
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}.{name}")
    }
}
