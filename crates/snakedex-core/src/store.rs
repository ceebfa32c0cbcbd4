//! Persistent session and theme state.
//!
//! `AppStore` is the single owner of the two persisted slots (`token` and
//! `hs_theme`). It is cheap to clone and is handed to the UI runtime and to
//! CLI commands explicitly. Every write publishes a fresh [`StoreSnapshot`]
//! to subscribers.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use tokio::sync::watch;

use crate::config::paths;

/// Slot holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Slot holding the theme preference.
pub const THEME_KEY: &str = "hs_theme";

/// A string key/value store. Each call is atomic on its own.
pub trait SlotStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON object on disk, rewritten via temp file + rename.
pub struct FileSlotStorage {
    path: PathBuf,
}

impl FileSlotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse storage from {}", self.path.display()))
    }

    fn write_all(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(slots).context("Failed to serialize storage")?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&tmp_path)
            .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })
    }
}

impl SlotStorage for FileSlotStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.read_all()?;
        slots.insert(key.to_string(), value.to_string());
        self.write_all(&slots)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.read_all()?;
        if slots.remove(key).is_some() {
            self.write_all(&slots)?;
        }
        Ok(())
    }
}

/// In-process storage for tests.
#[derive(Default)]
pub struct MemorySlotStorage {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}

/// What the user chose for the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the terminal's color scheme
    #[default]
    Auto,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::Auto => "auto",
        }
    }

    /// Parses a stored value. Unknown values mean `Auto`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => ThemePreference::Light,
            "dark" => ThemePreference::Dark,
            _ => ThemePreference::Auto,
        }
    }
}

/// The resolved light/dark mode applied to the UI root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    fn resolve(preference: ThemePreference, system: ThemeMode) -> Self {
        match preference {
            ThemePreference::Light => ThemeMode::Light,
            ThemePreference::Dark => ThemeMode::Dark,
            ThemePreference::Auto => system,
        }
    }
}

/// Best-effort terminal color scheme from `COLORFGBG` ("fg;bg").
///
/// Background colors 0-6 and 8 are dark. Anything else, including a missing
/// variable, is treated as light.
pub fn system_theme() -> ThemeMode {
    system_theme_from(std::env::var("COLORFGBG").ok().as_deref())
}

fn system_theme_from(colorfgbg: Option<&str>) -> ThemeMode {
    let bg = colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match bg {
        Some(0..=6 | 8) => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// Observable view of the store. Never carries the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub has_session: bool,
    pub theme_preference: ThemePreference,
    pub theme: ThemeMode,
}

struct StoreInner {
    storage: Box<dyn SlotStorage>,
    system_theme: ThemeMode,
    // Serializes read-modify-write sequences across worker threads.
    write_lock: Mutex<()>,
    tx: watch::Sender<StoreSnapshot>,
}

/// Session and theme store shared by the UI and the CLI.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

impl AppStore {
    /// Opens the store at `${SNAKEDEX_HOME}/storage.json`.
    pub fn open_default() -> Result<Self> {
        Self::open(&paths::storage_path())
    }

    pub fn open(path: &Path) -> Result<Self> {
        Self::with_storage(Box::new(FileSlotStorage::new(path)), system_theme())
    }

    /// Empty in-memory store with a light system theme.
    pub fn in_memory() -> Self {
        let storage = Box::new(MemorySlotStorage::new());
        let snapshot = StoreSnapshot {
            has_session: false,
            theme_preference: ThemePreference::Auto,
            theme: ThemeMode::Light,
        };
        Self::from_parts(storage, ThemeMode::Light, snapshot)
    }

    pub fn with_storage(storage: Box<dyn SlotStorage>, system_theme: ThemeMode) -> Result<Self> {
        let has_session = read_token(storage.as_ref())?.is_some();
        let theme_preference = read_preference(storage.as_ref())?;
        let snapshot = StoreSnapshot {
            has_session,
            theme_preference,
            theme: ThemeMode::resolve(theme_preference, system_theme),
        };
        Ok(Self::from_parts(storage, system_theme, snapshot))
    }

    fn from_parts(
        storage: Box<dyn SlotStorage>,
        system_theme: ThemeMode,
        snapshot: StoreSnapshot,
    ) -> Self {
        let (tx, _rx) = watch::channel(snapshot);
        Self {
            inner: Arc::new(StoreInner {
                storage,
                system_theme,
                write_lock: Mutex::new(()),
                tx,
            }),
        }
    }

    pub fn session_token(&self) -> Result<Option<String>> {
        read_token(self.inner.storage.as_ref())
    }

    /// Whether a token is stored. Read failures count as "no session".
    pub fn has_session(&self) -> bool {
        match self.session_token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to read session slot");
                false
            }
        }
    }

    pub fn set_session_token(&self, token: &str) -> Result<()> {
        let _guard = self.lock();
        self.inner.storage.set(TOKEN_KEY, token)?;
        tracing::info!("session stored");
        self.publish();
        Ok(())
    }

    /// Removes the token. Returns whether one was present.
    pub fn clear_session(&self) -> Result<bool> {
        let _guard = self.lock();
        let had_token = read_token(self.inner.storage.as_ref())?.is_some();
        self.inner.storage.remove(TOKEN_KEY)?;
        if had_token {
            tracing::info!("session cleared");
        }
        self.publish();
        Ok(had_token)
    }

    pub fn theme_preference(&self) -> ThemePreference {
        self.inner.tx.borrow().theme_preference
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.inner.tx.borrow().theme
    }

    /// Persists `preference` and returns the resulting mode.
    pub fn set_theme_preference(&self, preference: ThemePreference) -> Result<ThemeMode> {
        let _guard = self.lock();
        self.inner.storage.set(THEME_KEY, preference.as_str())?;
        tracing::debug!(preference = preference.as_str(), "theme stored");
        Ok(self.publish().theme)
    }

    /// Flips the current mode and stores it as an explicit preference.
    pub fn toggle_theme(&self) -> Result<ThemeMode> {
        let next = self.theme_mode().toggled();
        let preference = match next {
            ThemeMode::Light => ThemePreference::Light,
            ThemeMode::Dark => ThemePreference::Dark,
        };
        self.set_theme_preference(preference)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        *self.inner.tx.borrow()
    }

    /// Receiver that observes every snapshot published after a write.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.inner.tx.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self) -> StoreSnapshot {
        let storage = self.inner.storage.as_ref();
        let current = self.snapshot();
        let has_session = read_token(storage).map_or(current.has_session, |t| t.is_some());
        let theme_preference = read_preference(storage).unwrap_or(current.theme_preference);
        let snapshot = StoreSnapshot {
            has_session,
            theme_preference,
            theme: ThemeMode::resolve(theme_preference, self.inner.system_theme),
        };
        self.inner.tx.send_replace(snapshot);
        snapshot
    }
}

fn read_token(storage: &dyn SlotStorage) -> Result<Option<String>> {
    Ok(storage
        .get(TOKEN_KEY)?
        .filter(|token| !token.trim().is_empty()))
}

fn read_preference(storage: &dyn SlotStorage) -> Result<ThemePreference> {
    Ok(storage
        .get(THEME_KEY)?
        .map_or(ThemePreference::Auto, |raw| ThemePreference::parse(&raw)))
}
