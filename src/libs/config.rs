//! Configuration management for the dayboard application.
//!
//! Settings are stored as JSON in the platform-specific application data
//! directory. Each integration (local task store, ClickUp, calendar,
//! weather) has its own optional configuration module, so users enable
//! only the sources they actually use. An interactive setup wizard
//! (`dayboard init`) walks through the modules with pre-filled defaults.
//!
//! Sensitive material is split: API keys live in the configuration file
//! like any other setting, while the calendar token blob is cached
//! separately, encrypted at rest (see `libs::secret`).

use super::data_storage::DataStorage;
use crate::api::calendar::CalendarConfig;
use crate::api::clickup::ClickUpConfig;
use crate::api::weather::WeatherConfig;
use crate::db::things::ThingsConfig;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the application.
///
/// Used during interactive setup to display available modules and route
/// the user's selection to the module-specific wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// HTTP listener configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Address the HTTP server binds to, e.g. `127.0.0.1`.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Main configuration container for the entire application.
///
/// All integration configurations are optional; missing modules simply
/// mean the corresponding dashboard section is unavailable. The
/// `skip_serializing_if` attributes keep unconfigured modules out of the
/// JSON file.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Local task store (Things-style database) configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub things: Option<ThingsConfig>,

    /// ClickUp API integration configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clickup: Option<ClickUpConfig>,

    /// Calendar provider (Google Calendar) configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarConfig>,

    /// Weather source location configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherConfig>,

    /// HTTP listener configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// Returns the default (empty) configuration when no file exists, so
    /// the application can run with minimal setup. A file that exists but
    /// cannot be parsed is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the current configuration to the filesystem as pretty JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive configuration setup wizard.
    ///
    /// Presents a multi-select of available modules, then delegates to
    /// each selected module's own prompt sequence, pre-filling existing
    /// values as defaults. Returns the updated configuration for saving.
    pub fn init() -> Result<Self> {
        let mut config = match Self::read() {
            Ok(config) => config,
            Err(_) => Config::default(),
        };

        let node_descriptions = vec![
            ThingsConfig::module(),
            ClickUpConfig::module(),
            CalendarConfig::module(),
            WeatherConfig::module(),
            ConfigModule {
                key: "server".to_string(),
                name: "Server".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select the modules to configure")
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                // Source integrations delegate to their own setup methods
                "things" => config.things = Some(ThingsConfig::init(&config.things)?),
                "clickup" => config.clickup = Some(ClickUpConfig::init(&config.clickup)?),
                "calendar" => config.calendar = Some(CalendarConfig::init(&config.calendar)?),
                "weather" => config.weather = Some(WeatherConfig::init(&config.weather)?),

                // HTTP listener settings
                "server" => {
                    let default = config.server.clone().unwrap_or_default();
                    println!("Server settings");
                    config.server = Some(ServerConfig {
                        host: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt("Enter the address to bind")
                            .default(default.host)
                            .interact_text()?,
                        port: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt("Enter the port to listen on")
                            .default(default.port)
                            .interact_text()?,
                    });
                }
                _ => {} // Unknown module keys are safely ignored
            }
        }

        Ok(config)
    }
}
