//! Settings persistence and the shared settings handle.
//!
//! Changes follow one ordering: write the new snapshot, persist it, then
//! refresh the open views so no pass reads a stale snapshot.

use crate::live::{refresh_views, ViewHost};
use crate::{Result, Settings};
use arc_swap::ArcSwap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared, cheaply cloneable view of the current settings.
///
/// Engines hold one of these and read the latest snapshot on every pass.
#[derive(Debug, Clone)]
pub struct SettingsHandle {
    inner: Arc<ArcSwap<Settings>>,
}

impl SettingsHandle {
    /// Create a handle holding `settings`.
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Settings> {
        self.inner.load_full()
    }

    /// Replace the snapshot.
    pub fn store(&self, settings: Settings) {
        self.inner.store(Arc::new(settings));
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Host persistence for the settings record.
pub trait SettingsStorage {
    /// Stored record, possibly partial; `None` when nothing is stored yet.
    fn load(&self) -> Result<Option<serde_json::Value>>;

    /// Persist the full record.
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<serde_json::Value>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}

/// One edit made through the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    ReplacementEnabled(bool),
    TokenPattern(String),
    ShowMissingPlaceholder(bool),
    MissingPlaceholderText(String),
    TooltipsEnabled(bool),
}

impl SettingChange {
    /// Whether open views must be redrawn. Tooltips only affect hover text.
    pub fn requires_refresh(&self) -> bool {
        !matches!(self, SettingChange::TooltipsEnabled(_))
    }

    fn apply_to(self, settings: &mut Settings) {
        match self {
            SettingChange::ReplacementEnabled(v) => settings.replacement_enabled = v,
            SettingChange::TokenPattern(v) => settings.token_pattern = v,
            SettingChange::ShowMissingPlaceholder(v) => settings.show_missing_placeholder = v,
            SettingChange::MissingPlaceholderText(v) => settings.missing_placeholder_text = v,
            SettingChange::TooltipsEnabled(v) => settings.tooltips_enabled = v,
        }
    }
}

/// The settings record together with its persistence.
pub struct SettingsStore<S: SettingsStorage> {
    storage: S,
    handle: SettingsHandle,
}

impl<S: SettingsStorage> SettingsStore<S> {
    /// Load settings from storage, falling back to defaults per missing key.
    pub fn load(storage: S) -> Result<Self> {
        let settings = match storage.load()? {
            Some(value) => Settings::from_stored(value)?,
            None => Settings::default(),
        };
        info!(
            enabled = settings.replacement_enabled,
            pattern = %settings.token_pattern,
            "Loaded settings"
        );

        Ok(Self {
            storage,
            handle: SettingsHandle::new(settings),
        })
    }

    /// Handle to pass to the engines.
    pub fn handle(&self) -> SettingsHandle {
        self.handle.clone()
    }

    /// Current snapshot.
    pub fn current(&self) -> Arc<Settings> {
        self.handle.load()
    }

    /// Persist the current snapshot.
    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.handle.load())
    }

    /// Apply one change: write it, persist it, then refresh open views
    /// unless the change only affects tooltips.
    ///
    /// The in-memory change and the refresh happen even if persisting fails;
    /// the persistence error is still returned.
    pub fn apply(&self, change: SettingChange, host: &mut dyn ViewHost) -> Result<()> {
        debug!(?change, "Applying settings change");
        let refresh = change.requires_refresh();

        let mut next = Settings::clone(&self.handle.load());
        change.apply_to(&mut next);
        self.handle.store(next);

        let saved = self.save();
        if refresh {
            refresh_views(host);
        }
        saved
    }
}
