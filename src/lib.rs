//! Typed, observable configuration binding between Rust structs and TOML
//! documents. Define a struct, list its fields once, and go.
//!
//! Tomlbind marshals a strongly-typed configuration graph to and from a
//! TOML document tree: loading with per-field validation and transformation,
//! merging missing values from defaults, and writing back a human-readable,
//! comment-annotated document.
//!
//! ```ignore
//! let provider = TomlProvider::new();
//! let config: AppConfig = provider.load_or_default(&path, true)?;
//!
//! config.volume.subscribe(|v| println!("volume is now {v}"));
//! provider.save(&config, &path)?;
//! ```
//!
//! That loads `path` if it exists, falls back to a freshly constructed
//! default instance (persisting it) if it doesn't, and hands you a typed
//! struct whose entry fields announce every change.
//!
//! # Design: one descriptor table drives everything
//!
//! A config struct implements [`Schema`]: a `Default` impl producing the
//! default-valued instance, and a [`fields`](Schema::fields) table declaring
//! each participating field: its document key, comment, optional validator
//! and transformers, and how to reach it. Every operation derives from that
//! one table:
//!
//! - **Loading** walks the table against the parsed tree, coercing scalars,
//!   recursing into nested schema types, and handing entry wrappers their
//!   raw values.
//! - **Saving** walks the same table the other way, rendering comments and
//!   `[section]` headers as it goes.
//! - **Merging** folds a defaults instance (or defaults document) into a
//!   live one, key by key, without disturbing anything the live side set.
//!
//! There is no separate schema file and no registry; adding a field to the
//! table makes it load, save, merge, and render everywhere at once.
//!
//! # Three kinds of fields
//!
//! A descriptor binds its field one of three ways:
//!
//! - **Plain** ([`FieldDescriptor::plain`]) — an ordinary typed value,
//!   reached through getter/setter function pointers. Scalar coercion is
//!   fixed: tree integers are `i64` and narrow to `i32`/`i16` by truncating
//!   cast, tree floats narrow to `f32` the same way, and enumerated values
//!   ([`FieldDescriptor::enumerated`]) look up variants by canonical name,
//!   falling back to the first declared variant.
//! - **Entry** ([`FieldDescriptor::entry`]) — an observable value cell
//!   ([`ConfigEntry`] and friends) carrying its own default and change
//!   listeners. Entries have their own serialize/deserialize contract and
//!   can be omitted from output while they sit at their default
//!   ([`skip_default`](FieldDescriptor::skip_default)).
//! - **Nested** ([`FieldDescriptor::nested`]) — another schema type,
//!   recursed into and rendered as a `[parent.name]` section.
//!
//! # Failure philosophy
//!
//! A malformed individual value must not keep an application from starting.
//! Shape and coercion mismatches are logged through the `log` facade and the
//! affected field keeps its prior value; the rest of the document proceeds.
//! Only two things abort a load: a document the tree adapter cannot parse,
//! and a field rejected by its declared validator. The latter carries the
//! field's dotted path, the offending value, and the allowed values, since
//! it represents an explicit contract the document broke.
//!
//! # Observability
//!
//! Entry wrappers notify subscribed listeners synchronously, and only on
//! actual change: setting an entry to the value it already holds is a
//! no-op, while [`reset`](ConfigEntry::reset) always fires. Notification iterates a snapshot, so a [`Subscription`] can be
//! cancelled from another thread, or by a listener during its own
//! notification, without corrupting the iteration.
//!
//! # Saving
//!
//! The document writer emits declared comments (`# `-prefixed, line by
//! line), keeps every scalar above the section headers of its level, and
//! renders nested schema types and tables of scalars as dotted bracketed
//! sections. [`TomlProvider::save`] creates parent directories on demand
//! and skips the write entirely when the rendered bytes hash identically
//! to the file already on disk, keeping timestamps stable for watchers.

pub mod entry;
pub mod error;
pub mod schema;
pub mod value;

mod marshal;
mod merge;
mod provider;
mod writer;

#[cfg(test)]
mod fixtures;

pub use entry::{
    BoolEntry, BoundedEntry, ConfigEntry, DoubleEntry, EntryMerge, EnumEntry, IntEntry,
    SerializableEntry, Subscription,
};
pub use error::ConfigError;
pub use marshal::{populate, serialize};
pub use merge::{fill_defaults, merge_instances};
pub use provider::TomlProvider;
pub use schema::{FieldDescriptor, Schema, Transformer, Validator};
pub use value::{ConfigEnum, EntryValue};
pub use writer::to_document;
