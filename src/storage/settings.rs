//! Settings - Persisted user preferences
//!
//! Every option lives under its own key and is written as soon as it
//! changes. Stored values that don't decode as the expected type read back
//! as the default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::KeyValueStore;

pub const SOUND_ENABLED_KEY: &str = "soundEnabled";
pub const MUSIC_VOLUME_KEY: &str = "musicVolume";
pub const SFX_VOLUME_KEY: &str = "sfxVolume";
pub const CONTROL_SENSITIVITY_KEY: &str = "controlSensitivity";
pub const GRAPHICS_QUALITY_KEY: &str = "graphicsQuality";
pub const PLAYER_NAME_KEY: &str = "playerName";

/// Rendering quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphicsQuality {
    Low,
    Medium,
    High,
}

/// Snapshot of every option, with the shipped defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsValues {
    pub sound_enabled: bool,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub control_sensitivity: f32,
    pub graphics_quality: GraphicsQuality,
    pub player_name: String,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_volume: 0.7,
            sfx_volume: 0.8,
            control_sensitivity: 0.5,
            graphics_quality: GraphicsQuality::High,
            player_name: "Player".to_string(),
        }
    }
}

/// Settings service over a key-value store
pub struct Settings<S: KeyValueStore> {
    store: S,
    values: SettingsValues,
}

impl<S: KeyValueStore> Settings<S> {
    /// Load every option from `store`, falling back to defaults
    pub fn load(store: S) -> Self {
        let defaults = SettingsValues::default();
        let values = SettingsValues {
            sound_enabled: read(&store, SOUND_ENABLED_KEY, defaults.sound_enabled),
            music_volume: read(&store, MUSIC_VOLUME_KEY, defaults.music_volume).clamp(0.0, 1.0),
            sfx_volume: read(&store, SFX_VOLUME_KEY, defaults.sfx_volume).clamp(0.0, 1.0),
            control_sensitivity: read(&store, CONTROL_SENSITIVITY_KEY, defaults.control_sensitivity)
                .clamp(0.0, 1.0),
            graphics_quality: read(&store, GRAPHICS_QUALITY_KEY, defaults.graphics_quality),
            player_name: read(&store, PLAYER_NAME_KEY, defaults.player_name),
        };

        Self { store, values }
    }

    pub fn values(&self) -> &SettingsValues {
        &self.values
    }

    pub fn sound_enabled(&self) -> bool {
        self.values.sound_enabled
    }

    pub fn music_volume(&self) -> f32 {
        self.values.music_volume
    }

    pub fn sfx_volume(&self) -> f32 {
        self.values.sfx_volume
    }

    pub fn control_sensitivity(&self) -> f32 {
        self.values.control_sensitivity
    }

    pub fn graphics_quality(&self) -> GraphicsQuality {
        self.values.graphics_quality
    }

    pub fn player_name(&self) -> &str {
        &self.values.player_name
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.values.sound_enabled = enabled;
        self.persist(SOUND_ENABLED_KEY, &enabled);
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.values.music_volume = volume;
        self.persist(MUSIC_VOLUME_KEY, &volume);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.values.sfx_volume = volume;
        self.persist(SFX_VOLUME_KEY, &volume);
    }

    pub fn set_control_sensitivity(&mut self, sensitivity: f32) {
        let sensitivity = sensitivity.clamp(0.0, 1.0);
        self.values.control_sensitivity = sensitivity;
        self.persist(CONTROL_SENSITIVITY_KEY, &sensitivity);
    }

    pub fn set_graphics_quality(&mut self, quality: GraphicsQuality) {
        self.values.graphics_quality = quality;
        self.persist(GRAPHICS_QUALITY_KEY, &quality);
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.values.player_name = name.into();
        let name = self.values.player_name.clone();
        self.persist(PLAYER_NAME_KEY, &name);
    }

    /// Restore every default in a single store write
    pub fn reset(&mut self) {
        self.values = SettingsValues::default();

        let v = &self.values;
        let entries = [
            (SOUND_ENABLED_KEY, encode(&v.sound_enabled)),
            (MUSIC_VOLUME_KEY, encode(&v.music_volume)),
            (SFX_VOLUME_KEY, encode(&v.sfx_volume)),
            (CONTROL_SENSITIVITY_KEY, encode(&v.control_sensitivity)),
            (GRAPHICS_QUALITY_KEY, encode(&v.graphics_quality)),
            (PLAYER_NAME_KEY, encode(&v.player_name)),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        if let Err(e) = self.store.set_many(entries) {
            log::warn!("Failed to persist default settings: {}", e);
        }
        log::info!("Settings reset to defaults");
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.store.set(key, encode(value)) {
            log::warn!("Failed to persist setting {}: {}", key, e);
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Stored value coerced to `T`, or `default`
fn read<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            log::debug!("Setting {} has wrong type ({}), using default", key, e);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn empty_store_yields_defaults() {
        let settings = Settings::load(MemoryStore::new());
        assert_eq!(settings.values(), &SettingsValues::default());
    }

    #[test]
    fn reset_restores_documented_defaults() {
        let mut settings = Settings::load(MemoryStore::new());
        settings.set_sound_enabled(false);
        settings.set_music_volume(0.1);
        settings.set_sfx_volume(0.2);
        settings.set_control_sensitivity(0.9);
        settings.set_graphics_quality(GraphicsQuality::Low);
        settings.set_player_name("Zed");

        settings.reset();

        assert!(settings.sound_enabled());
        assert_eq!(settings.music_volume(), 0.7);
        assert_eq!(settings.sfx_volume(), 0.8);
        assert_eq!(settings.control_sensitivity(), 0.5);
        assert_eq!(settings.graphics_quality(), GraphicsQuality::High);
        assert_eq!(settings.player_name(), "Player");

        let reloaded = Settings::load(settings.store().clone());
        assert_eq!(reloaded.values(), &SettingsValues::default());
    }

    #[test]
    fn changes_persist_immediately() {
        let mut settings = Settings::load(MemoryStore::new());
        settings.set_music_volume(0.25);
        settings.set_graphics_quality(GraphicsQuality::Medium);
        settings.set_player_name("Ada");

        assert_eq!(settings.store().get(MUSIC_VOLUME_KEY), Some(json!(0.25)));

        let reloaded = Settings::load(settings.store().clone());
        assert_eq!(reloaded.music_volume(), 0.25);
        assert_eq!(reloaded.graphics_quality(), GraphicsQuality::Medium);
        assert_eq!(reloaded.player_name(), "Ada");
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(SOUND_ENABLED_KEY, json!("yes")).unwrap();
        store.set(MUSIC_VOLUME_KEY, json!({ "level": 3 })).unwrap();
        store.set(GRAPHICS_QUALITY_KEY, json!("Ultra")).unwrap();
        store.set(PLAYER_NAME_KEY, json!(42)).unwrap();

        let settings = Settings::load(store);
        assert!(settings.sound_enabled());
        assert_eq!(settings.music_volume(), 0.7);
        assert_eq!(settings.graphics_quality(), GraphicsQuality::High);
        assert_eq!(settings.player_name(), "Player");
    }

    #[test]
    fn volumes_are_clamped() {
        let mut settings = Settings::load(MemoryStore::new());
        settings.set_sfx_volume(3.0);
        settings.set_control_sensitivity(-1.0);
        assert_eq!(settings.sfx_volume(), 1.0);
        assert_eq!(settings.control_sensitivity(), 0.0);
    }
}
