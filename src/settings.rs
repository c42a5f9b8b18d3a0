use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

/// Delays between completing a session and the auto-chained transition.
/// UX polish from the original widget, not a timing contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDelays {
    pub mode_switch_ms: u64,
    pub auto_start_ms: u64,
}

impl Default for ChainDelays {
    fn default() -> Self {
        Self {
            mode_switch_ms: 2000,
            auto_start_ms: 1000,
        }
    }
}

impl ChainDelays {
    pub fn mode_switch(&self) -> Duration {
        Duration::from_millis(self.mode_switch_ms)
    }

    pub fn auto_start(&self) -> Duration {
        Duration::from_millis(self.auto_start_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub auto_start_break: bool,
    pub auto_start_study: bool,
    pub sound_notifications: bool,
    pub desktop_notifications: bool,
    #[serde(default)]
    pub chain_delays: ChainDelays,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            auto_start_break: true,
            auto_start_study: false,
            sound_notifications: true,
            desktop_notifications: true,
            chain_delays: ChainDelays::default(),
        }
    }
}

impl TimerSettings {
    /// All automatic behavior off; handy for hosts that want a plain timer.
    pub fn manual() -> Self {
        Self {
            auto_start_break: false,
            auto_start_study: false,
            sound_notifications: false,
            desktop_notifications: false,
            chain_delays: ChainDelays::default(),
        }
    }
}

/// Optional JSON-backed store for the settings panel. Loads defaults when the
/// file is missing or unreadable; persists on every update.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<TimerSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            TimerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn timer(&self) -> TimerSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update_timer(&self, settings: TimerSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &TimerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: TimerSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let settings = store.timer();
        assert!(settings.auto_start_break);
        assert!(!settings.auto_start_study);
        assert!(settings.sound_notifications);
        assert_eq!(settings.chain_delays.mode_switch_ms, 2000);
        assert_eq!(settings.chain_delays.auto_start_ms, 1000);
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut settings = store.timer();
        settings.auto_start_study = true;
        settings.sound_notifications = false;
        store.update_timer(settings).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        let settings = reopened.timer();
        assert!(settings.auto_start_study);
        assert!(!settings.sound_notifications);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert!(store.timer().auto_start_break);
    }
}
