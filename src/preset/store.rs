use super::storage::PresetSlot;
use super::{
    ensure_seeds, sanitize_name, sanitize_value, Preset, PresetKind, PresetPatch, StoredPreset,
};
use crate::error::StorageError;
use log::{debug, info, warn};
use rand::Rng;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;
use yew::Callback;

/// Handle returned by [`PresetStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u32);

impl Subscription {
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Subscription {
    fn from(id: u32) -> Self {
        Subscription(id)
    }
}

/// Owns one preset catalog and its persisted mirror.
///
/// Every mutation replaces the list snapshot, writes it back to the slot
/// and then notifies subscribers with it. The seed entries of `K` are
/// always present.
///
/// All methods take `&self`. Listeners run after every internal borrow is
/// released, so a listener may read or mutate the store it is subscribed
/// to.
pub struct PresetStore<K: PresetKind, S: PresetSlot> {
    presets: RefCell<Rc<Vec<Preset>>>,
    listeners: RefCell<Vec<(Subscription, Callback<Rc<Vec<Preset>>>)>>,
    next_subscription: Cell<u32>,
    slot: S,
    _kind: PhantomData<K>,
}

impl<K: PresetKind, S: PresetSlot> PresetStore<K, S> {
    /// Hydrate from `slot`, repairing whatever is stored there, and write the
    /// repaired list back.
    pub fn load(slot: S) -> Self {
        let presets = ensure_seeds::<K>(read_presets::<K, S>(&slot));
        info!("Loaded {} {} presets", presets.len(), K::LABEL);
        let store = Self {
            presets: RefCell::new(Rc::new(presets)),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            slot,
            _kind: PhantomData,
        };
        store.persist();
        store
    }

    /// Shared snapshot of the current list in insertion order, as delivered
    /// to subscribers.
    pub fn list(&self) -> Rc<Vec<Preset>> {
        Rc::clone(&*self.presets.borrow())
    }

    pub fn get_by_id(&self, id: &str) -> Option<Preset> {
        self.presets.borrow().iter().find(|p| p.id == id).cloned()
    }

    /// Append a preset. Returns `false` (and changes nothing) for an empty
    /// name or a value that is not positive after rounding.
    pub fn add(&self, name: &str, value: f64) -> bool {
        let (Some(name), Some(value)) = (sanitize_name(name), sanitize_value::<K>(value)) else {
            debug!("Rejected {} preset '{}' ({})", K::LABEL, name, value);
            return false;
        };

        let mut id = create_id(K::LABEL);
        while self.get_by_id(&id).is_some() {
            id = create_id(K::LABEL);
        }

        let mut next = (*self.list()).clone();
        next.push(Preset { id, name, value });
        self.replace(next);
        true
    }

    /// Remove by id. Seeds come straight back, so removing one is a no-op
    /// and returns `false`, as does an unknown id.
    pub fn remove(&self, id: &str) -> bool {
        let current = self.list();
        let next = ensure_seeds::<K>(current.iter().filter(|p| p.id != id).cloned().collect());
        if next.len() == current.len() {
            return false;
        }
        self.replace(next);
        true
    }

    /// Apply `patch` to the preset with `id`. Changed fields are validated
    /// like [`add`](Self::add); an invalid patch or unknown id returns
    /// `false` without touching the list.
    pub fn update(&self, id: &str, patch: PresetPatch) -> bool {
        let current = self.list();
        let Some(index) = current.iter().position(|p| p.id == id) else {
            return false;
        };

        let mut updated = current[index].clone();
        if let Some(name) = patch.name.as_deref() {
            match sanitize_name(name) {
                Some(clean) => updated.name = clean,
                None => return false,
            }
        }
        if let Some(value) = patch.value {
            match sanitize_value::<K>(value) {
                Some(clean) => updated.value = clean,
                None => return false,
            }
        }

        let mut next = (*current).clone();
        next[index] = updated;
        self.replace(next);
        true
    }

    /// Register `callback`; it receives the current list right away and
    /// again after every mutation.
    pub fn subscribe(&self, callback: Callback<Rc<Vec<Preset>>>) -> Subscription {
        let subscription = Subscription(self.next_subscription.get());
        self.next_subscription
            .set(self.next_subscription.get().wrapping_add(1));
        self.listeners
            .borrow_mut()
            .push((subscription, callback.clone()));
        callback.emit(self.list());
        subscription
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.listeners
            .borrow_mut()
            .retain(|(s, _)| *s != subscription);
    }

    fn replace(&self, presets: Vec<Preset>) {
        *self.presets.borrow_mut() = Rc::new(presets);
        self.persist();
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.list();
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener.emit(Rc::clone(&snapshot));
        }
    }

    fn persist(&self) {
        let records: Vec<serde_json::Value> =
            self.list().iter().map(|p| p.to_record::<K>()).collect();

        let result = serde_json::to_string(&records)
            .map_err(StorageError::from)
            .and_then(|raw| self.slot.write(K::STORAGE_KEY, &raw));
        if let Err(e) = result {
            warn!("Failed to save {} presets: {}", K::LABEL, e);
        }
    }
}

/// Read and sanitize the stored list. Anything unusable yields the seeds.
fn read_presets<K: PresetKind, S: PresetSlot>(slot: &S) -> Vec<Preset> {
    let raw = match slot.read(K::STORAGE_KEY) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return K::seeds(),
        Err(e) => {
            warn!("Failed to read {} presets: {}", K::LABEL, e);
            return K::seeds();
        }
    };

    let entries = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(_) => {
            warn!("Stored {} presets are not a list, using defaults", K::LABEL);
            return K::seeds();
        }
        Err(e) => {
            warn!("Failed to parse {} presets: {}", K::LABEL, e);
            return K::seeds();
        }
    };

    let sanitized: Vec<Preset> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<StoredPreset>(entry).ok())
        .filter_map(|stored| stored.into_preset::<K>(|| create_id(K::LABEL)))
        .collect();

    if sanitized.is_empty() {
        debug!("No valid stored {} presets, using defaults", K::LABEL);
        return K::seeds();
    }
    sanitized
}

/// `<prefix>-<uuid v4>`.
fn create_id(prefix: &str) -> String {
    let bits: u128 = rand::rng().random();
    format!(
        "{}-{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        prefix,
        (bits >> 96) as u32,
        (bits >> 80) as u16,
        ((bits >> 64) as u16 & 0x0fff) | 0x4000,
        ((bits >> 48) as u16 & 0x3fff) | 0x8000,
        bits & 0xffff_ffff_ffff,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_look_like_prefixed_uuids() {
        let id = create_id("machine");
        assert!(id.starts_with("machine-"));
        let uuid = &id["machine-".len()..];
        assert_eq!(uuid.len(), 36);
        assert_eq!(uuid.as_bytes()[14], b'4');
        assert_ne!(create_id("machine"), id);
    }
}
