//! Simulation configuration resource.
//!
//! Holds the constants the reference loop and the behaviors read from the
//! simulation state: the fallback floor, fall-speed cap, grid size and the
//! scoring rules. Values come from an INI file; anything missing keeps its
//! default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! floor_y = 500
//! max_fall_speed = 1000
//!
//! [level]
//! grid_size = 32
//! height = 15
//!
//! [session]
//! coin_score = 10
//! enemy_penalty = 5
//! contact_damage = 25
//! enemy_speed = 120
//!
//! [run]
//! dt = 0.016
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

pub const DEFAULT_FLOOR_Y: f32 = 500.0;
pub const DEFAULT_MAX_FALL_SPEED: f32 = 1000.0;
const DEFAULT_GRID_SIZE: f32 = 32.0;
const DEFAULT_LEVEL_HEIGHT: u32 = 15;
const DEFAULT_COIN_SCORE: u32 = 10;
const DEFAULT_ENEMY_PENALTY: u32 = 5;
const DEFAULT_CONTACT_DAMAGE: f32 = 25.0;
const DEFAULT_ENEMY_SPEED: f32 = 120.0;
const DEFAULT_DT: f32 = 0.016;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Fallback ground height used by gravity-driven behaviors.
    pub floor_y: f32,
    /// Cap on downward velocity in world units per second.
    pub max_fall_speed: f32,
    /// Size of one level grid cell in world units.
    pub grid_size: f32,
    /// Level height in grid cells; falling below it respawns the protagonist.
    pub level_height: u32,
    /// Points per collected coin.
    pub coin_score: u32,
    /// Points lost on adversary contact.
    pub enemy_penalty: u32,
    /// Damage dealt to a protagonist with a health behavior on adversary contact.
    pub contact_damage: f32,
    /// Adversary walking speed in world units per second.
    pub enemy_speed: f32,
    /// Fixed tick length used by headless runs, in seconds.
    pub dt: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            floor_y: DEFAULT_FLOOR_Y,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            grid_size: DEFAULT_GRID_SIZE,
            level_height: DEFAULT_LEVEL_HEIGHT,
            coin_score: DEFAULT_COIN_SCORE,
            enemy_penalty: DEFAULT_ENEMY_PENALTY,
            contact_damage: DEFAULT_CONTACT_DAMAGE,
            enemy_speed: DEFAULT_ENEMY_SPEED,
            dt: DEFAULT_DT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        info!(
            "Loaded config from {:?}: floor_y={}, grid={}, dt={}",
            self.config_path, self.floor_y, self.grid_size, self.dt
        );
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();

        // [physics] section
        if let Some(v) = float("physics", "floor_y") {
            self.floor_y = v as f32;
        }
        if let Some(v) = float("physics", "max_fall_speed") {
            self.max_fall_speed = v as f32;
        }

        // [level] section
        if let Some(v) = float("level", "grid_size") {
            if v > 0.0 {
                self.grid_size = v as f32;
            }
        }
        if let Some(v) = uint("level", "height") {
            self.level_height = v as u32;
        }

        // [session] section
        if let Some(v) = uint("session", "coin_score") {
            self.coin_score = v as u32;
        }
        if let Some(v) = uint("session", "enemy_penalty") {
            self.enemy_penalty = v as u32;
        }
        if let Some(v) = float("session", "contact_damage") {
            self.contact_damage = v as f32;
        }
        if let Some(v) = float("session", "enemy_speed") {
            self.enemy_speed = v as f32;
        }

        // [run] section
        if let Some(v) = float("run", "dt") {
            if v > 0.0 {
                self.dt = v as f32;
            }
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("physics", "floor_y", Some(self.floor_y.to_string()));
        config.set(
            "physics",
            "max_fall_speed",
            Some(self.max_fall_speed.to_string()),
        );
        config.set("level", "grid_size", Some(self.grid_size.to_string()));
        config.set("level", "height", Some(self.level_height.to_string()));
        config.set("session", "coin_score", Some(self.coin_score.to_string()));
        config.set(
            "session",
            "enemy_penalty",
            Some(self.enemy_penalty.to_string()),
        );
        config.set(
            "session",
            "contact_damage",
            Some(self.contact_damage.to_string()),
        );
        config.set("session", "enemy_speed", Some(self.enemy_speed.to_string()));
        config.set("run", "dt", Some(self.dt.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Lowest y a protagonist may reach before it is respawned.
    pub fn kill_plane(&self) -> f32 {
        self.level_height as f32 * self.grid_size
    }
}
