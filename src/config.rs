use crate::engine::quiet_hours;
use anyhow::{bail, Context};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_enabled")]
    pub warnings_enabled: bool,
    #[serde(default = "default_enabled")]
    pub victory_enabled: bool,
    #[serde(default = "default_enabled")]
    pub terminal_sound_enabled: bool,
    #[serde(default)]
    pub cooldown_ms: u64,
    #[serde(default)]
    pub quiet_hours_start: String,
    #[serde(default)]
    pub quiet_hours_end: String,
    #[serde(default = "default_sound_pack")]
    pub sound_pack: String,
    #[serde(default)]
    pub error_tier_sounds: ErrorTierSounds,
    #[serde(default)]
    pub warning_tier_sounds: WarningTierSounds,
    #[serde(default)]
    pub custom_sound_folder: String,
    #[serde(default)]
    pub custom_warning_sound_folder: String,
    #[serde(default)]
    pub custom_sound_path: String,
    #[serde(default)]
    pub custom_warning_sound_path: String,
    #[serde(default)]
    pub custom_victory_sound_path: String,
    #[serde(default)]
    pub custom_terminal_sound_path: String,
    #[serde(default = "default_streak_threshold")]
    pub streak_threshold_toast: u32,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub media_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorTierSounds {
    #[serde(default)]
    pub tier1: String,
    #[serde(default)]
    pub tier2: String,
    #[serde(default)]
    pub tier3: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WarningTierSounds {
    #[serde(default)]
    pub tier1: String,
    #[serde(default)]
    pub tier2: String,
}

pub trait ConfigProvider {
    fn snapshot(&self) -> Config;
}

impl ConfigProvider for Config {
    fn snapshot(&self) -> Config {
        self.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub path: Option<PathBuf>,
}

impl ConfigFile {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigProvider for ConfigFile {
    fn snapshot(&self) -> Config {
        let loaded = match &self.path {
            Some(path) => Config::load_from_path(path),
            None => Config::load(),
        };

        loaded.unwrap_or_else(|err| {
            tracing::warn!(error = ?err, "config unreadable; using defaults");
            Config::default()
        })
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::project_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        if let Ok(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create config dir {}", parent.display()))?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()?;
        Self::default().save_to_path(&path)?;
        Ok(path)
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = BaseDirs::new().context("unable to resolve home directory")?;
        Ok(base.config_dir().join("faaah").join("config.json"))
    }

    /// The file a write should land in: whichever one `load` would read, or
    /// the per-user file when neither exists yet.
    pub fn writable_path() -> anyhow::Result<PathBuf> {
        if let Some(path) = Self::project_path() {
            if path.exists() {
                return Ok(path);
            }
        }
        Self::default_path()
    }

    pub fn media_root(&self) -> PathBuf {
        if let Some(dir) = &self.media_dir {
            return dir.clone();
        }

        let local = PathBuf::from("media");
        if local.exists() {
            return local;
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("media")))
            .unwrap_or(local)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            bail!("volume must be between 0.0 and 1.0");
        }

        if self.sound_pack.trim().is_empty() {
            bail!("sound_pack must not be empty");
        }

        if self.sound_pack.contains(['/', '\\']) || self.sound_pack.contains("..") {
            bail!("sound_pack must be a plain name: {}", self.sound_pack);
        }

        for (key, value) in [
            ("quiet_hours_start", &self.quiet_hours_start),
            ("quiet_hours_end", &self.quiet_hours_end),
        ] {
            if !value.trim().is_empty() {
                quiet_hours::parse_time_of_day(value).with_context(|| format!("invalid {key}"))?;
            }
        }

        if let Some(dir) = &self.media_dir {
            if !dir.is_dir() {
                bail!("media_dir not found: {}", dir.display());
            }
        }

        Ok(())
    }

    fn project_path() -> Option<PathBuf> {
        Some(PathBuf::from("faaah.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            warnings_enabled: default_enabled(),
            victory_enabled: default_enabled(),
            terminal_sound_enabled: default_enabled(),
            cooldown_ms: 0,
            quiet_hours_start: String::new(),
            quiet_hours_end: String::new(),
            sound_pack: default_sound_pack(),
            error_tier_sounds: ErrorTierSounds::default(),
            warning_tier_sounds: WarningTierSounds::default(),
            custom_sound_folder: String::new(),
            custom_warning_sound_folder: String::new(),
            custom_sound_path: String::new(),
            custom_warning_sound_path: String::new(),
            custom_victory_sound_path: String::new(),
            custom_terminal_sound_path: String::new(),
            streak_threshold_toast: default_streak_threshold(),
            volume: default_volume(),
            media_dir: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_sound_pack() -> String {
    "meme".to_string()
}

fn default_streak_threshold() -> u32 {
    10
}

fn default_volume() -> f32 {
    0.8
}
