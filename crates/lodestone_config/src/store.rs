//! # Config Store
//!
//! The live configuration table, its reload listeners and its backing file.
//!
//! ## Locking
//!
//! The table sits behind an `RwLock`, the listener list behind a `Mutex`.
//! Neither lock is held while listeners run, so a listener may read the store
//! (or even register another listener) from inside [`ReloadListener::reload`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::value::{ConfigValue, TypedKey};

/// Category path → key name → value.
type Table = BTreeMap<String, BTreeMap<String, ConfigValue>>;

/// Category name meaning "the module's own category".
const MODULE_CATEGORY: &str = "-";

/// A module that re-reads configuration after it changes.
pub trait ReloadListener: Send + Sync {
    /// Called once after every effective change.
    fn reload(&self, config: &ConfigStore);
}

impl<F> ReloadListener for F
where
    F: Fn(&ConfigStore) + Send + Sync,
{
    fn reload(&self, config: &ConfigStore) {
        self(config);
    }
}

/// What a [`ConfigStore::set_value`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value changed and listeners were notified.
    Changed,
    /// The parsed value equals the stored one; nothing happened.
    Unchanged,
    /// The key is malformed, the value did not parse, or the tag disagrees
    /// with the stored kind. Nothing happened.
    Ignored,
    /// No such key in that category. Nothing happened.
    UnknownKey,
    /// Mutation is switched off for this store.
    Disabled,
}

impl SetOutcome {
    /// `true` only for [`SetOutcome::Changed`].
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Live configuration table.
pub struct ConfigStore {
    path: Option<PathBuf>,
    table: RwLock<Table>,
    listeners: Mutex<Vec<Arc<dyn ReloadListener>>>,
    // held from snapshot to write so saves land in snapshot order
    save_lock: Mutex<()>,
    mutation_enabled: AtomicBool,
}

impl ConfigStore {
    /// Creates an empty store with no backing file.
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(None, Table::new())
    }

    /// Opens the store backed by `path`, loading it if the file exists.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file exists but cannot be read,
    /// [`ConfigError::Parse`] if it is not a valid document.
    pub fn open(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();

        let table = if path.exists() {
            let source = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&source)?
        } else {
            Table::new()
        };

        debug!(path = %path.display(), categories = table.len(), "config store opened");
        Ok(Self::with_table(Some(path), table))
    }

    /// Creates an in-memory store from a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if `source` is not a valid document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(Self::with_table(None, toml::from_str(source)?))
    }

    fn with_table(path: Option<PathBuf>, table: Table) -> Self {
        Self {
            path,
            table: RwLock::new(table),
            listeners: Mutex::new(Vec::new()),
            save_lock: Mutex::new(()),
            mutation_enabled: AtomicBool::new(true),
        }
    }

    /// Full category path for a module and a sub-category (`-` for none).
    #[must_use]
    pub fn full_category(module: &str, category: &str) -> String {
        if category == MODULE_CATEGORY {
            module.to_owned()
        } else {
            format!("{module}.{category}")
        }
    }

    /// Registers `name` in `category` with `default` unless it already exists,
    /// and returns the value now stored.
    pub fn define(&self, category: &str, name: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.table
            .write()
            .entry(category.to_owned())
            .or_default()
            .entry(name.to_owned())
            .or_insert_with(|| default.into())
            .clone()
    }

    /// The value of `name` in `category`.
    #[must_use]
    pub fn get(&self, category: &str, name: &str) -> Option<ConfigValue> {
        self.table.read().get(category)?.get(name).cloned()
    }

    /// `true` if `name` exists in `category`.
    #[must_use]
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.table
            .read()
            .get(category)
            .is_some_and(|keys| keys.contains_key(name))
    }

    /// The boolean at `name`, if present and a boolean.
    #[must_use]
    pub fn get_bool(&self, category: &str, name: &str) -> Option<bool> {
        self.get(category, name)?.as_bool()
    }

    /// The integer at `name`, if present and an integer.
    #[must_use]
    pub fn get_int(&self, category: &str, name: &str) -> Option<i32> {
        self.get(category, name)?.as_int()
    }

    /// The double at `name`, if present and a double.
    #[must_use]
    pub fn get_double(&self, category: &str, name: &str) -> Option<f64> {
        self.get(category, name)?.as_double()
    }

    /// The string at `name`, if present and a string.
    #[must_use]
    pub fn get_string(&self, category: &str, name: &str) -> Option<String> {
        match self.get(category, name)? {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// All category paths, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.table.read().keys().cloned().collect()
    }

    /// Sets a value from its string form.
    ///
    /// `key` is `T:name` (see [`TypedKey`]). The category path is `module` when
    /// `category` is `-`, else `module.category`. Bad input is never an error:
    /// it comes back as [`SetOutcome::Ignored`] or [`SetOutcome::UnknownKey`].
    ///
    /// On an effective change every listener is notified, then, if `persist`
    /// is set, the table is written to the backing file.
    ///
    /// # Errors
    ///
    /// Only persistence errors: [`ConfigError::NotPersistent`] without a
    /// backing file, [`ConfigError::Io`] / [`ConfigError::Serialize`] when the
    /// write fails. The in-memory change has already happened in that case.
    pub fn set_value(
        &self,
        module: &str,
        category: &str,
        key: &str,
        value: &str,
        persist: bool,
    ) -> ConfigResult<SetOutcome> {
        if !self.mutation_enabled() {
            return Ok(SetOutcome::Disabled);
        }

        let category = Self::full_category(module, category);
        let Some(typed) = TypedKey::parse(key) else {
            debug!(%category, key, "ignoring malformed config key");
            return Ok(SetOutcome::Ignored);
        };

        {
            let mut table = self.table.write();
            let Some(slot) = table
                .get_mut(&category)
                .and_then(|keys| keys.get_mut(typed.name))
            else {
                debug!(%category, key = typed.name, "ignoring unknown config key");
                return Ok(SetOutcome::UnknownKey);
            };

            if slot.kind() != typed.kind {
                debug!(%category, key = typed.name, "config key type mismatch");
                return Ok(SetOutcome::Ignored);
            }
            let Some(parsed) = typed.kind.parse(value) else {
                debug!(%category, key = typed.name, value, "unparseable config value");
                return Ok(SetOutcome::Ignored);
            };
            if *slot == parsed {
                return Ok(SetOutcome::Unchanged);
            }

            let previous = std::mem::replace(slot, parsed);
            info!(%category, key = typed.name, old = %previous, new = %slot, "config value changed");
        }

        self.reload_all();

        if persist {
            if let Err(error) = self.save() {
                warn!(%error, "config change applied but not persisted");
                return Err(error);
            }
        }
        Ok(SetOutcome::Changed)
    }

    /// Enables or disables [`Self::set_value`].
    pub fn set_mutation_enabled(&self, enabled: bool) {
        self.mutation_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether [`Self::set_value`] applies changes.
    #[must_use]
    pub fn mutation_enabled(&self) -> bool {
        self.mutation_enabled.load(Ordering::Relaxed)
    }

    /// Adds a listener notified after every effective change.
    pub fn register(&self, listener: Arc<dyn ReloadListener>) {
        self.listeners.lock().push(listener);
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Notifies every listener to re-read configuration.
    pub fn reload_all(&self) {
        // snapshot so listeners run without the lock
        let listeners: Vec<Arc<dyn ReloadListener>> = self.listeners.lock().clone();
        debug!(listeners = listeners.len(), "reloading config listeners");
        for listener in listeners {
            listener.reload(self);
        }
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Renders the whole table as a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] if a value cannot be represented.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(&*self.table.read())?)
    }

    /// Writes the table to the backing file, creating parent directories.
    ///
    /// Concurrent saves are serialized, and each writes a snapshot taken after
    /// every earlier save finished, so the file never regresses to an older
    /// table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotPersistent`] without a backing file,
    /// [`ConfigError::Io`] or [`ConfigError::Serialize`] when writing fails.
    pub fn save(&self) -> ConfigResult<()> {
        let path = self.path.as_ref().ok_or(ConfigError::NotPersistent)?;
        let _guard = self.save_lock.lock();
        let document = self.to_toml_string()?;

        let io_error = |source| ConfigError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, document).map_err(io_error)?;

        debug!(path = %path.display(), "config saved");
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.path)
            .field("categories", &self.table.read().len())
            .field("listeners", &self.listener_count())
            .field("mutation_enabled", &self.mutation_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn sample_store() -> ConfigStore {
        let store = ConfigStore::new();
        store.define("ores.clusters", "horizontal_size", 14);
        store.define("ores.clusters", "enabled", true);
        store.define("ores.clusters", "density", 0.5);
        store.define("ores", "block", "granite");
        store
    }

    fn counting_listener(store: &ConfigStore) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        store.register(Arc::new(move |_: &ConfigStore| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        count
    }

    #[test]
    fn test_full_category() {
        assert_eq!(ConfigStore::full_category("ores", "-"), "ores");
        assert_eq!(ConfigStore::full_category("ores", "clusters"), "ores.clusters");
    }

    #[test]
    fn test_define_keeps_existing() {
        let store = sample_store();
        assert_eq!(store.define("ores.clusters", "horizontal_size", 3), ConfigValue::Int(14));
        assert_eq!(store.get_int("ores.clusters", "horizontal_size"), Some(14));
        assert!(store.contains("ores", "block"));
        assert!(!store.contains("ores", "missing"));
        assert_eq!(store.categories(), vec!["ores".to_owned(), "ores.clusters".to_owned()]);
    }

    #[test]
    fn test_set_each_kind() {
        let store = sample_store();

        let set = |key, value| store.set_value("ores", "clusters", key, value, false).unwrap();
        assert_eq!(set("I:horizontal_size", "20"), SetOutcome::Changed);
        assert_eq!(set("B:enabled", "FALSE"), SetOutcome::Changed);
        assert_eq!(set("D:density", "0.75"), SetOutcome::Changed);
        assert_eq!(
            store.set_value("ores", "-", "S:block", "basalt", false).unwrap(),
            SetOutcome::Changed
        );

        assert_eq!(store.get_int("ores.clusters", "horizontal_size"), Some(20));
        assert_eq!(store.get_bool("ores.clusters", "enabled"), Some(false));
        assert_eq!(store.get_double("ores.clusters", "density"), Some(0.75));
        assert_eq!(store.get_string("ores", "block"), Some("basalt".to_owned()));
    }

    #[test]
    fn test_bad_input_is_ignored() {
        let store = sample_store();
        let count = counting_listener(&store);

        let set = |key, value| store.set_value("ores", "clusters", key, value, false).unwrap();
        assert_eq!(set("I:horizontal_size", "lots"), SetOutcome::Ignored);
        assert_eq!(set("I:horizontal_size", " 20 "), SetOutcome::Ignored);
        assert_eq!(set("D:horizontal_size", "2.5"), SetOutcome::Ignored);
        assert_eq!(set("Q:horizontal_size", "2"), SetOutcome::Ignored);
        assert_eq!(set("I", "2"), SetOutcome::Ignored);
        assert_eq!(set("I:depth", "2"), SetOutcome::UnknownKey);
        assert_eq!(
            store.set_value("caves", "-", "I:horizontal_size", "2", false).unwrap(),
            SetOutcome::UnknownKey
        );

        assert_eq!(store.get_int("ores.clusters", "horizontal_size"), Some(14));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listeners_only_on_change() {
        let store = sample_store();
        let count = counting_listener(&store);

        let set = |value| {
            store
                .set_value("ores", "clusters", "I:horizontal_size", value, false)
                .unwrap()
        };
        assert_eq!(set("14"), SetOutcome::Unchanged);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(set("15"), SetOutcome::Changed);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = sample_store();
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        store.register(Arc::new(move |config: &ConfigStore| {
            *sink.lock() = config.get_int("ores.clusters", "horizontal_size");
        }));

        store
            .set_value("ores", "clusters", "I:horizontal_size", "30", false)
            .unwrap();
        assert_eq!(*observed.lock(), Some(30));
    }

    #[test]
    fn test_disabled_store_ignores_writes() {
        let store = sample_store();
        store.set_mutation_enabled(false);

        let outcome = store
            .set_value("ores", "clusters", "I:horizontal_size", "30", false)
            .unwrap();
        assert_eq!(outcome, SetOutcome::Disabled);
        assert_eq!(store.get_int("ores.clusters", "horizontal_size"), Some(14));

        store.set_mutation_enabled(true);
        assert!(store.mutation_enabled());
    }

    #[test]
    fn test_persist_without_file_fails_after_apply() {
        let store = sample_store();
        let result = store.set_value("ores", "clusters", "I:horizontal_size", "30", true);

        assert!(matches!(result, Err(ConfigError::NotPersistent)));
        assert_eq!(store.get_int("ores.clusters", "horizontal_size"), Some(30));
    }

    #[test]
    fn test_toml_round_trip() {
        let store = sample_store();
        let document = store.to_toml_string().unwrap();
        let reloaded = ConfigStore::from_toml_str(&document).unwrap();

        assert_eq!(reloaded.get_int("ores.clusters", "horizontal_size"), Some(14));
        assert_eq!(reloaded.get_bool("ores.clusters", "enabled"), Some(true));
        assert_eq!(reloaded.get_double("ores.clusters", "density"), Some(0.5));
        assert_eq!(reloaded.get_string("ores", "block"), Some("granite".to_owned()));
    }
}
