//! File-backed ledger store.
//!
//! Ledgers live at `<dir>/current_owned_<category>_devices.json`. Reads are
//! lenient: a missing, unreadable or malformed file is an empty ledger. Writes
//! replace the whole file and surface failures as
//! [`DevhookError::Storage`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{AddOutcome, Ledger, RemoveOutcome};
use crate::config::{Config, WriteMode};
use crate::devices::{DeviceCategory, DeviceDescriptor};
use crate::error::{DevhookError, Result};

/// Categories reported when the config does not list any.
pub const DEFAULT_CATEGORIES: &[&str] = &["serial", "video"];

/// Handle on the per-category ledger files in one state directory.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
    categories: Vec<DeviceCategory>,
    write_mode: WriteMode,
}

impl LedgerStore {
    /// Store in `dir` with the default categories and atomic writes.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            categories: DEFAULT_CATEGORIES
                .iter()
                .filter_map(|c| DeviceCategory::new(c).ok())
                .collect(),
            write_mode: WriteMode::Atomic,
        }
    }

    /// Build a store from the `state` and `ledger` config sections.
    pub fn from_config(config: &Config) -> Result<Self> {
        let categories = config
            .ledger
            .categories
            .iter()
            .map(|c| {
                DeviceCategory::new(c)
                    .map_err(|_| DevhookError::Config(format!("ledger.categories: invalid '{}'", c)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(config.state.dir.clone())
            .with_categories(categories)
            .with_write_mode(config.ledger.write_mode))
    }

    pub fn with_categories(mut self, categories: Vec<DeviceCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn known_categories(&self) -> &[DeviceCategory] {
        &self.categories
    }

    pub fn is_known(&self, category: &DeviceCategory) -> bool {
        self.categories.contains(category)
    }

    pub fn ledger_path(&self, category: &DeviceCategory) -> PathBuf {
        self.dir
            .join(format!("current_owned_{}_devices.json", category.as_str()))
    }

    /// Read a category's ledger. Never fails.
    pub fn load(&self, category: &DeviceCategory) -> Ledger {
        let path = self.ledger_path(category);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(category = %category, "no ledger file yet");
                return Ledger::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable ledger treated as empty");
                return Ledger::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed ledger treated as empty");
                Ledger::new()
            }
        }
    }

    /// Replace a category's ledger file with `ledger`.
    pub fn save(&self, category: &DeviceCategory, ledger: &Ledger) -> Result<()> {
        let path = self.ledger_path(category);
        std::fs::create_dir_all(&self.dir).map_err(|e| DevhookError::storage(&self.dir, e))?;
        let json = serde_json::to_string_pretty(ledger)?;

        match self.write_mode {
            WriteMode::Direct => {
                std::fs::write(&path, json).map_err(|e| DevhookError::storage(&path, e))?;
            }
            WriteMode::Atomic => {
                let tmp = path.with_extension("tmp");
                std::fs::write(&tmp, json).map_err(|e| DevhookError::storage(&tmp, e))?;
                if let Err(e) = std::fs::rename(&tmp, &path) {
                    let _ = std::fs::remove_file(&tmp);
                    return Err(DevhookError::storage(&path, e));
                }
            }
        }
        debug!(category = %category, entries = ledger.len(), "ledger saved");
        Ok(())
    }

    /// Record ownership of a device.
    ///
    /// Leaves the file untouched if the identity is already present.
    pub fn add(&self, descriptor: &DeviceDescriptor) -> Result<AddOutcome> {
        let category = &descriptor.device_category;
        let identity = descriptor.identity();
        let mut ledger = self.load(category);

        if ledger.contains(&identity) {
            warn!(
                category = %category,
                identity = %identity,
                "duplicate add for an owned device"
            );
            return Ok(AddOutcome::AlreadyOwned(identity));
        }

        let nodes = descriptor.device_nodes();
        ledger.insert(&identity, nodes);
        self.save(category, &ledger)?;
        info!(category = %category, identity = %identity, "device owned");
        Ok(AddOutcome::Added(identity))
    }

    /// Drop ownership of a device.
    ///
    /// Leaves the file untouched if the identity is not present.
    pub fn remove(&self, descriptor: &DeviceDescriptor) -> Result<RemoveOutcome> {
        let category = &descriptor.device_category;
        let identity = descriptor.identity();
        let mut ledger = self.load(category);

        if ledger.remove(&identity).is_none() {
            warn!(
                category = %category,
                identity = %identity,
                "remove for a device that was not owned"
            );
            return Ok(RemoveOutcome::NotOwned(identity));
        }

        self.save(category, &ledger)?;
        info!(category = %category, identity = %identity, "device released");
        Ok(RemoveOutcome::Removed(identity))
    }

    /// One category's ledger, or the union of all known categories.
    pub fn fetch(&self, category: Option<&DeviceCategory>) -> Ledger {
        match category {
            Some(category) => self.load(category),
            None => {
                let mut all = Ledger::new();
                for category in &self.categories {
                    all.merge(self.load(category));
                }
                all
            }
        }
    }
}
