//! Observable value cells usable as schema field values.
//!
//! A [`ConfigEntry`] holds a current value and a default value and notifies
//! subscribed listeners when the value changes. Unlike a plain field, an
//! entry carries its own serialize/deserialize contract: a document value
//! whose shape doesn't fit is discarded and the prior value kept, so one bad
//! key never takes the rest of the document down with it.
//!
//! Listener notification uses a snapshot discipline: the listener list is
//! cloned under its lock before any callback runs, so a [`Subscription`] may
//! be cancelled without corrupting an iteration in flight, even by a
//! listener mid-notification or from another thread.
//!
//! Specializations:
//!
//! - [`BoolEntry`] adds [`invert`](ConfigEntry::invert).
//! - [`BoundedEntry`] clamps `set` into an inclusive `[min, max]` range
//!   (aliased as [`IntEntry`] and [`DoubleEntry`]).
//! - [`EnumEntry`] serializes variants by canonical name.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use toml::Value;

use crate::value::{ConfigEnum, EntryValue};

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct ListenerTable<E> {
    next_id: u64,
    slots: Vec<(u64, Listener<E>)>,
}

struct ListenerSet<E> {
    inner: Arc<Mutex<ListenerTable<E>>>,
}

impl<E> ListenerSet<E> {
    fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ListenerTable {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListenerTable<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add(&self, listener: Listener<E>) -> Subscription<E> {
        let mut table = self.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.slots.push((id, listener));
        Subscription {
            id,
            table: Arc::downgrade(&self.inner),
        }
    }

    /// Snapshot the current listeners. Mutations after this point affect the
    /// next notification, not the one in flight.
    fn snapshot(&self) -> Vec<Listener<E>> {
        self.lock()
            .slots
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn clear(&self) {
        self.lock().slots.clear();
    }
}

/// Handle for a registered change listener.
///
/// Detached from the entry: it can be cancelled from any thread, at any time,
/// including from inside a listener while a notification is running. Dropping
/// the handle does *not* unsubscribe.
pub struct Subscription<E> {
    id: u64,
    table: Weak<Mutex<ListenerTable<E>>>,
}

impl<E> Subscription<E> {
    /// Remove the listener. A no-op if the entry is already gone.
    pub fn cancel(&self) {
        if let Some(table) = self.table.upgrade() {
            let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
            table.slots.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> Clone for Subscription<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            table: Weak::clone(&self.table),
        }
    }
}

/// An owned mutable cell holding a current value and a default value.
///
/// Construction immediately applies the default as the current value; the
/// value is never unset afterwards.
pub struct ConfigEntry<E> {
    value: E,
    default: E,
    touched: bool,
    listeners: ListenerSet<E>,
}

impl<E: Clone + PartialEq> ConfigEntry<E> {
    pub fn new(default: E) -> Self {
        Self {
            value: default.clone(),
            default,
            touched: false,
            listeners: ListenerSet::new(),
        }
    }

    pub fn value(&self) -> &E {
        &self.value
    }

    pub fn default_value(&self) -> &E {
        &self.default
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Update the value, notifying listeners only if it actually changed.
    pub fn set(&mut self, value: E) {
        self.touched = true;
        if self.value != value {
            self.value = value;
            self.notify();
        }
    }

    /// Restore the value to the default. Always notifies.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
        self.notify();
    }

    /// Replace the default. If no value has ever been explicitly set, the new
    /// default is also applied as the current value (through [`reset`](Self::reset)).
    pub fn set_default(&mut self, default: E) {
        self.default = default;
        if !self.touched {
            self.reset();
        }
    }

    /// Register a change listener. Listeners run synchronously, in
    /// registration order, on every value change.
    pub fn subscribe(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription<E> {
        self.listeners.add(Arc::new(listener))
    }

    pub fn clear_listeners(&self) {
        self.listeners.clear();
    }

    /// Silent assignment used by deserialization: no listener notification,
    /// but the entry counts as explicitly set from then on.
    pub(crate) fn assign(&mut self, value: E) {
        self.value = value;
        self.touched = true;
    }

    fn notify(&self) {
        for listener in self.listeners.snapshot() {
            listener(&self.value);
        }
    }
}

impl ConfigEntry<bool> {
    /// Flip the value and re-set it.
    pub fn invert(&mut self) {
        self.set(!self.value);
    }
}

impl<E: fmt::Debug> fmt::Debug for ConfigEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("value", &self.value)
            .field("default", &self.default)
            .finish()
    }
}

// Listener sets are identity-bound to one entry and never compared.
impl<E: PartialEq> PartialEq for ConfigEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.default == other.default
    }
}

/// A boolean entry with [`invert`](ConfigEntry::invert).
pub type BoolEntry = ConfigEntry<bool>;

/// The entry wrapper capability consumed by the marshal engine.
///
/// Deserialization is lenient by contract: a tree value whose shape doesn't
/// fit the entry leaves the prior value untouched and never raises.
pub trait SerializableEntry {
    fn serialize_entry(&self) -> Value;
    fn deserialize_entry(&mut self, raw: &Value);
    fn is_default(&self) -> bool;
}

/// How an entry adopts the default from its counterpart in a default
/// instance during an instance-level merge.
pub trait EntryMerge {
    fn merge_default_from(&mut self, source: &Self);
}

impl<E: EntryValue> SerializableEntry for ConfigEntry<E> {
    fn serialize_entry(&self) -> Value {
        self.value.to_tree()
    }

    fn deserialize_entry(&mut self, raw: &Value) {
        match E::from_tree(raw) {
            Some(value) => self.assign(value),
            None => log::warn!("cannot read entry value from {raw:?}; keeping previous value"),
        }
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }
}

impl<E: EntryValue> EntryMerge for ConfigEntry<E> {
    fn merge_default_from(&mut self, source: &Self) {
        self.set_default(source.default.clone());
    }
}

/// A numeric entry clamped to an inclusive `[min, max]` range.
///
/// Clamping applies to [`set`](Self::set) and to deserialization, and is
/// disabled entirely when `min == max`.
pub struct BoundedEntry<E> {
    inner: ConfigEntry<E>,
    min: E,
    max: E,
}

pub type IntEntry = BoundedEntry<i64>;
pub type DoubleEntry = BoundedEntry<f64>;

impl<E: EntryValue + PartialOrd + Copy> BoundedEntry<E> {
    pub fn new(default: E, min: E, max: E) -> Self {
        Self {
            inner: ConfigEntry::new(default),
            min,
            max,
        }
    }

    pub fn value(&self) -> E {
        *self.inner.value()
    }

    pub fn default_value(&self) -> E {
        *self.inner.default_value()
    }

    pub fn min(&self) -> E {
        self.min
    }

    pub fn max(&self) -> E {
        self.max
    }

    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    pub fn set(&mut self, value: E) {
        self.inner.set(self.clamp(value));
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Redefine the default together with new bounds, atomically.
    pub fn set_default(&mut self, default: E, min: E, max: E) {
        self.min = min;
        self.max = max;
        self.inner.set_default(default);
    }

    pub fn subscribe(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription<E> {
        self.inner.subscribe(listener)
    }

    pub fn clear_listeners(&self) {
        self.inner.clear_listeners();
    }

    fn clamp(&self, value: E) -> E {
        if self.min == self.max {
            return value;
        }
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

impl<E: EntryValue + PartialOrd + Copy> SerializableEntry for BoundedEntry<E> {
    fn serialize_entry(&self) -> Value {
        self.inner.serialize_entry()
    }

    fn deserialize_entry(&mut self, raw: &Value) {
        match E::from_tree(raw) {
            Some(value) => {
                let clamped = self.clamp(value);
                self.inner.assign(clamped);
            }
            None => log::warn!("cannot read entry value from {raw:?}; keeping previous value"),
        }
    }

    fn is_default(&self) -> bool {
        self.inner.is_default()
    }
}

impl<E: EntryValue + PartialOrd + Copy> EntryMerge for BoundedEntry<E> {
    // Adopts the default only; this entry's own bounds stay in force.
    fn merge_default_from(&mut self, source: &Self) {
        self.inner.set_default(source.default_value());
    }
}

impl<E: fmt::Debug> fmt::Debug for BoundedEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedEntry")
            .field("value", &self.inner.value)
            .field("default", &self.inner.default)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

impl<E: PartialEq> PartialEq for BoundedEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.min == other.min && self.max == other.max
    }
}

/// An entry holding an enumerated value, serialized by canonical name.
///
/// Deserializing a string that matches no variant keeps the prior value.
pub struct EnumEntry<E: ConfigEnum> {
    inner: ConfigEntry<E>,
}

impl<E: ConfigEnum> EnumEntry<E> {
    pub fn new(default: E) -> Self {
        Self {
            inner: ConfigEntry::new(default),
        }
    }

    pub fn value(&self) -> E {
        *self.inner.value()
    }

    pub fn default_value(&self) -> E {
        *self.inner.default_value()
    }

    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    pub fn set(&mut self, value: E) {
        self.inner.set(value);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn set_default(&mut self, default: E) {
        self.inner.set_default(default);
    }

    pub fn subscribe(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription<E> {
        self.inner.subscribe(listener)
    }

    pub fn clear_listeners(&self) {
        self.inner.clear_listeners();
    }
}

impl<E: ConfigEnum> SerializableEntry for EnumEntry<E> {
    fn serialize_entry(&self) -> Value {
        Value::String(self.inner.value().name().to_owned())
    }

    fn deserialize_entry(&mut self, raw: &Value) {
        let Some(name) = raw.as_str() else {
            log::warn!("expected a string for enum entry, found {raw:?}; keeping previous value");
            return;
        };
        match E::from_name(name) {
            Some(value) => self.inner.assign(value),
            None => log::warn!("unknown variant '{name}'; keeping previous value"),
        }
    }

    fn is_default(&self) -> bool {
        self.inner.is_default()
    }
}

impl<E: ConfigEnum> EntryMerge for EnumEntry<E> {
    fn merge_default_from(&mut self, source: &Self) {
        self.inner.set_default(source.default_value());
    }
}

impl<E: ConfigEnum + fmt::Debug> fmt::Debug for EnumEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumEntry")
            .field("value", &self.inner.value)
            .field("default", &self.inner.default)
            .finish()
    }
}

impl<E: ConfigEnum> PartialEq for EnumEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}
