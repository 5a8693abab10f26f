//! Renders a schema instance as a commented TOML document.
//!
//! Scalar fields of a section are written before its sub-tables, so a value
//! line can never land under the wrong bracketed header regardless of the
//! order fields were declared in. Nested schema types and tables of scalars
//! render as `[parent.path.name]` sections, each preceded by its declared
//! comment with every line prefixed `# `.
//!
//! Individual `key = value` lines are delegated to the tree adapter; a value
//! it cannot render is logged and replaced with a comment line so the rest
//! of the document still completes.

use toml::{Table, Value};

use crate::schema::{FieldBinding, FieldDescriptor, Schema};

/// Render the instance as a TOML document string.
pub fn to_document<S: Schema>(instance: &S) -> String {
    let mut out = String::new();
    write_section(instance, &mut out, "");
    out
}

pub(crate) fn write_section<S: Schema>(instance: &S, out: &mut String, parent: &str) {
    if !S::comment().is_empty() {
        write_comment(out, S::comment());
    }

    // Scalars of this section first.
    for field in S::fields() {
        if let Some(value) = scalar_value(&field, instance) {
            if let Some(comment) = field.comment {
                write_comment(out, comment);
            }
            write_line(out, field.name, &value);
        }
    }

    // Then sub-tables and nested sections.
    for field in S::fields() {
        let Some(binding) = field.binding else {
            continue;
        };
        match binding {
            FieldBinding::Nested { write, .. } => {
                out.push('\n');
                if let Some(comment) = field.comment {
                    write_comment(out, comment);
                }
                out.push_str(&format!("[{parent}{}]\n", field.name));
                write(instance, out, &format!("{parent}{}.", field.name));
            }
            FieldBinding::Entry {
                serialize,
                is_default,
                ..
            } => {
                if field.skip_default && is_default(instance) {
                    continue;
                }
                if let Value::Table(map) = serialize(instance) {
                    out.push('\n');
                    if let Some(comment) = field.comment {
                        write_comment(out, comment);
                    }
                    write_map(out, parent, field.name, &map);
                }
            }
            FieldBinding::Plain { get, .. } => {
                if let Value::Table(map) = get(instance) {
                    out.push('\n');
                    if let Some(comment) = field.comment {
                        write_comment(out, comment);
                    }
                    write_map(out, parent, field.name, &map);
                }
            }
        }
    }
}

/// The field's serialized value, if it belongs in the scalar pass.
fn scalar_value<S: Schema>(field: &FieldDescriptor<S>, instance: &S) -> Option<Value> {
    match field.binding.as_ref()? {
        FieldBinding::Plain { get, .. } => {
            let value = get(instance);
            (!value.is_table()).then_some(value)
        }
        FieldBinding::Entry {
            serialize,
            is_default,
            ..
        } => {
            if field.skip_default && is_default(instance) {
                return None;
            }
            let value = serialize(instance);
            (!value.is_table()).then_some(value)
        }
        FieldBinding::Nested { .. } => None,
    }
}

/// A mapping that isn't a schema type: bracketed header only when at least
/// one value is a scalar, then one line or sub-map per entry.
fn write_map(out: &mut String, parent: &str, key: &str, map: &Table) {
    if !map.values().all(Value::is_table) {
        out.push_str(&format!("[{parent}{key}]\n"));
    }
    for (entry_key, entry_value) in map {
        if let Value::Table(sub) = entry_value {
            write_map(out, &format!("{parent}{key}."), entry_key, sub);
        } else {
            write_line(out, entry_key, entry_value);
        }
    }
}

fn write_line(out: &mut String, key: &str, value: &Value) {
    let mut single = Table::new();
    single.insert(key.to_owned(), value.clone());
    match toml::to_string(&single) {
        Ok(rendered) => out.push_str(&rendered),
        Err(err) => {
            log::warn!("failed to render value for '{key}': {err}");
            out.push_str(&format!("# Failed to serialize field with name: {key}\n"));
        }
    }
}

fn write_comment(out: &mut String, comment: &str) {
    for line in comment.split('\n') {
        out.push_str(&format!("# {line}\n"));
    }
}
