//! Transport settings backed by `settings.json` (tauri-plugin-store).
//!
//! Defaults are seeded eagerly on startup so the store always reflects what
//! the backend will actually use; reads fall back to the same defaults when a
//! key is missing or malformed.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::synth::ToneConfig;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_ANNOUNCE_PLAY: bool = true;
pub const DEFAULT_TONE_HZ: f64 = 440.0;
pub const DEFAULT_TONE_GAIN: f64 = 0.2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportSettings {
    /// Fixed interval between clock polls.
    pub poll_interval_ms: u64,
    /// Broadcast a PLAY action before each forwarded toggle.
    pub announce_play: bool,
    pub tone_hz: f64,
    pub tone_gain: f64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            announce_play: DEFAULT_ANNOUNCE_PLAY,
            tone_hz: DEFAULT_TONE_HZ,
            tone_gain: DEFAULT_TONE_GAIN,
        }
    }
}

impl TransportSettings {
    /// Read settings from the store, sanitizing anything a hand-edited
    /// settings.json may contain.
    pub fn load(app: &AppHandle) -> Self {
        let defaults = Self::default();

        Self {
            poll_interval_ms: sanitize_poll_interval_ms(get_setting_from_store(
                app,
                "poll_interval_ms",
                defaults.poll_interval_ms,
            )),
            announce_play: get_setting_from_store(app, "announce_play", defaults.announce_play),
            tone_hz: sanitize_tone_hz(get_setting_from_store(app, "tone_hz", defaults.tone_hz)),
            tone_gain: sanitize_tone_gain(get_setting_from_store(
                app,
                "tone_gain",
                defaults.tone_gain,
            )),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn tone(&self) -> ToneConfig {
        ToneConfig {
            freq_hz: self.tone_hz as f32,
            gain: self.tone_gain as f32,
        }
    }
}

fn sanitize_poll_interval_ms(ms: u64) -> u64 {
    if ms == 0 {
        return DEFAULT_POLL_INTERVAL_MS;
    }
    ms.clamp(50, 10_000)
}

fn sanitize_tone_hz(hz: f64) -> f64 {
    if !hz.is_finite() || hz <= 0.0 {
        return DEFAULT_TONE_HZ;
    }
    hz.clamp(20.0, 20_000.0)
}

fn sanitize_tone_gain(gain: f64) -> f64 {
    if !gain.is_finite() || gain < 0.0 {
        return DEFAULT_TONE_GAIN;
    }
    gain.min(1.0)
}

/// Helper to read a setting from the store with a default fallback.
pub fn get_setting_from_store<T: serde::de::DeserializeOwned>(
    app: &AppHandle,
    key: &str,
    default: T,
) -> T {
    app.store("settings.json")
        .ok()
        .and_then(|store| store.get(key))
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or(default)
}

/// Seed `settings.json` with defaults for missing/null keys, without
/// overwriting existing values.
pub fn ensure_default_settings(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    use serde_json::{json, Value};

    let store = app.store("settings.json")?;

    let is_missing = |v: Option<Value>| -> bool { matches!(v, None | Some(Value::Null)) };

    let mut dirty = false;
    let mut set_if_missing = |key: &str, value: Value| {
        if is_missing(store.get(key)) {
            store.set(key.to_string(), value);
            dirty = true;
        }
    };

    set_if_missing("poll_interval_ms", json!(DEFAULT_POLL_INTERVAL_MS));
    set_if_missing("announce_play", json!(DEFAULT_ANNOUNCE_PLAY));
    set_if_missing("tone_hz", json!(DEFAULT_TONE_HZ));
    set_if_missing("tone_gain", json!(DEFAULT_TONE_GAIN));

    if dirty {
        // If saving fails, the runtime fallbacks still apply; don't crash.
        if let Err(e) = store.save() {
            log::warn!("Failed to save seeded default settings: {}", e);
        }
    }

    Ok(())
}
