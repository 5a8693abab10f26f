//! Schema declaration: the [`Schema`] trait and per-field descriptors.
//!
//! A schema type is a plain struct with a `Default` impl (the fresh
//! default-valued instance) and a [`fields`](Schema::fields) table naming
//! each participating field. The descriptor table is the single source of
//! truth for every operation: loading, serializing, merging, and document
//! writing all walk the same descriptors in declared order.
//!
//! A descriptor binds a field one of three ways, dispatched by exhaustive
//! match in the engines:
//!
//! - **plain** — typed getter/setter function pointers, wired through the
//!   scalar coercion layer in [`value`](crate::value);
//! - **entry** — an observable [`entry`](crate::entry) wrapper with its own
//!   serialize/deserialize contract;
//! - **nested** — another schema type, recursed into.
//!
//! A descriptor may also be [`unbound`](FieldDescriptor::unbound): declared
//! but with no accessors. Unbound fields are skipped silently and uniformly
//! by load, save, serialize, and merge.

use toml::{Table, Value};

use crate::entry::{EntryMerge, SerializableEntry};
use crate::error::ConfigError;
use crate::value::{ConfigEnum, EntryValue};
use crate::{marshal, merge, writer};

/// A struct that can be marshaled to and from a document tree.
///
/// `Default` doubles as the zero-argument constructor producing a fresh
/// default-valued instance. Schema types may nest to unlimited depth but
/// never cyclically.
pub trait Schema: Default + 'static {
    /// The ordered field-descriptor table. Cheap to rebuild; recomputed per
    /// marshal pass.
    fn fields() -> Vec<FieldDescriptor<Self>>;

    /// Comment emitted at the top of the section this type renders into.
    fn comment() -> &'static str {
        ""
    }
}

/// A predicate over a raw tree value, plus the human-readable allowed values
/// reported when it rejects.
pub struct Validator {
    pub(crate) predicate: fn(&Value) -> bool,
    pub(crate) allowed: &'static [&'static str],
}

/// A pure value-to-value transformation, applied before a value is used.
pub type Transformer = fn(Value) -> Value;

/// Resolved per-field metadata driving marshal, unmarshal, merge, and write.
pub struct FieldDescriptor<S> {
    pub(crate) name: &'static str,
    pub(crate) comment: Option<&'static str>,
    pub(crate) skip_default: bool,
    pub(crate) validator: Option<Validator>,
    pub(crate) transformers: Vec<Transformer>,
    pub(crate) binding: Option<FieldBinding<S>>,
}

pub(crate) enum FieldBinding<S> {
    Plain {
        get: Box<dyn Fn(&S) -> Value>,
        /// Returns `false` when the tree value's shape doesn't coerce; the
        /// engine logs and keeps the field's prior value.
        set: Box<dyn Fn(&mut S, &Value) -> bool>,
    },
    Entry {
        serialize: Box<dyn Fn(&S) -> Value>,
        deserialize: Box<dyn Fn(&mut S, &Value)>,
        is_default: Box<dyn Fn(&S) -> bool>,
        merge: Box<dyn Fn(&mut S, &S)>,
    },
    Nested {
        serialize: Box<dyn Fn(&S) -> Table>,
        populate: Box<dyn Fn(&mut S, &Table, &str) -> Result<(), ConfigError>>,
        write: Box<dyn Fn(&S, &mut String, &str)>,
        merge: Box<dyn Fn(&mut S, &S)>,
    },
}

impl<S: Schema> FieldDescriptor<S> {
    fn new(name: &'static str, binding: Option<FieldBinding<S>>) -> Self {
        Self {
            name,
            comment: None,
            skip_default: false,
            validator: None,
            transformers: Vec::new(),
            binding,
        }
    }

    /// A plain field holding any [`EntryValue`] type.
    pub fn plain<T>(name: &'static str, get: fn(&S) -> T, set: fn(&mut S, T)) -> Self
    where
        T: EntryValue + 'static,
    {
        Self::new(
            name,
            Some(FieldBinding::Plain {
                get: Box::new(move |s| get(s).to_tree()),
                set: Box::new(move |s, raw| match T::from_tree(raw) {
                    Some(value) => {
                        set(s, value);
                        true
                    }
                    None => false,
                }),
            }),
        )
    }

    /// A plain field holding a [`ConfigEnum`], stored as its canonical name.
    ///
    /// An unmatched name falls back to the first declared variant.
    pub fn enumerated<T>(name: &'static str, get: fn(&S) -> T, set: fn(&mut S, T)) -> Self
    where
        T: ConfigEnum,
    {
        Self::new(
            name,
            Some(FieldBinding::Plain {
                get: Box::new(move |s| Value::String(get(s).name().to_owned())),
                set: Box::new(move |s, raw| match raw.as_str() {
                    Some(text) => {
                        let value = T::from_name(text).unwrap_or(T::variants()[0]);
                        set(s, value);
                        true
                    }
                    None => false,
                }),
            }),
        )
    }

    /// A field holding an entry wrapper.
    pub fn entry<T>(name: &'static str, get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Self
    where
        T: SerializableEntry + EntryMerge + 'static,
    {
        Self::new(
            name,
            Some(FieldBinding::Entry {
                serialize: Box::new(move |s| get(s).serialize_entry()),
                deserialize: Box::new(move |s, raw| get_mut(s).deserialize_entry(raw)),
                is_default: Box::new(move |s| get(s).is_default()),
                merge: Box::new(move |live, defaults| {
                    get_mut(live).merge_default_from(get(defaults));
                }),
            }),
        )
    }

    /// A field holding a nested schema type.
    pub fn nested<T>(name: &'static str, get: fn(&S) -> &T, get_mut: fn(&mut S) -> &mut T) -> Self
    where
        T: Schema,
    {
        Self::new(
            name,
            Some(FieldBinding::Nested {
                serialize: Box::new(move |s| marshal::serialize(get(s))),
                populate: Box::new(move |s, tree, path| {
                    marshal::populate_at(get_mut(s), tree, path)
                }),
                write: Box::new(move |s, out, parent| {
                    writer::write_section(get(s), out, parent);
                }),
                merge: Box::new(move |live, defaults| {
                    merge::merge_instances(get_mut(live), get(defaults));
                }),
            }),
        )
    }

    /// A declared field with no accessors. Skipped by every operation.
    pub fn unbound(name: &'static str) -> Self {
        Self::new(name, None)
    }

    pub fn comment(mut self, comment: &'static str) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Omit this field from serialized output while its entry sits at its
    /// default value. Only meaningful on entry bindings.
    pub fn skip_default(mut self) -> Self {
        self.skip_default = true;
        self
    }

    /// Attach a validator. A rejected value aborts the whole unmarshal call.
    pub fn validate(
        mut self,
        predicate: fn(&Value) -> bool,
        allowed: &'static [&'static str],
    ) -> Self {
        self.validator = Some(Validator { predicate, allowed });
        self
    }

    /// Append a transformer. Transformers run in declared order, each output
    /// threading into the next.
    pub fn transform(mut self, transformer: Transformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::ServerConfig;

    #[test]
    fn fields_come_back_in_declared_order() {
        let names: Vec<&str> = ServerConfig::fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["host", "port", "debug", "database"]);
    }

    #[test]
    fn unbound_descriptor_has_no_binding() {
        let field: FieldDescriptor<ServerConfig> = FieldDescriptor::unbound("ghost");
        assert!(field.binding.is_none());
    }

    #[test]
    fn builder_modifiers_accumulate() {
        let field: FieldDescriptor<ServerConfig> =
            FieldDescriptor::plain("port", |c: &ServerConfig| c.port, |c, v| c.port = v)
                .comment("The port.")
                .skip_default()
                .transform(|v| v)
                .transform(|v| v);
        assert_eq!(field.comment, Some("The port."));
        assert!(field.skip_default);
        assert_eq!(field.transformers.len(), 2);
    }
}
