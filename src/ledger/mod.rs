//! Device ownership ledger.
//!
//! One JSON file per device category maps a [`DeviceIdentity`] to the device
//! nodes the container owns for it:
//!
//! ```json
//! {
//!   "23410043ABC123": ["/dev/ttyACM0"]
//! }
//! ```
//!
//! There is no locking. The host invokes the add and remove hooks one at a
//! time, and that serialization is the only thing protecting the
//! load-modify-save cycle in [`LedgerStore`].

mod store;

pub use store::LedgerStore;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::devices::DeviceIdentity;

/// Owned devices of one category (or the union of several).
///
/// Entries keep insertion order, so a file rewritten after an add or remove
/// lists devices in the order they were first owned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: IndexMap<String, Vec<String>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &DeviceIdentity) -> bool {
        self.entries.contains_key(identity.as_str())
    }

    pub fn get(&self, identity: &DeviceIdentity) -> Option<&[String]> {
        self.entries.get(identity.as_str()).map(Vec::as_slice)
    }

    /// Insert or replace an entry, returning the previous node list.
    pub fn insert(&mut self, identity: &DeviceIdentity, nodes: Vec<String>) -> Option<Vec<String>> {
        self.entries.insert(identity.as_str().to_string(), nodes)
    }

    pub fn remove(&mut self, identity: &DeviceIdentity) -> Option<Vec<String>> {
        self.entries.shift_remove(identity.as_str())
    }

    /// Copy every entry of `other` into `self`; `other` wins on clashes and
    /// a clashing key keeps its original position.
    pub fn merge(&mut self, other: Ledger) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Result of [`LedgerStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The device is now owned.
    Added(DeviceIdentity),
    /// The device was already owned; nothing was written.
    AlreadyOwned(DeviceIdentity),
}

/// Result of [`LedgerStore::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The device is no longer owned.
    Removed(DeviceIdentity),
    /// The device was not owned; nothing was written.
    NotOwned(DeviceIdentity),
}
