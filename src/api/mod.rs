//! API client modules for external service integrations.
//!
//! Provides clients for the remote sources the dashboard pulls from:
//! ClickUp for project tasks, a calendar provider for events, and
//! Open-Meteo for weather. Each client is constructed from its own
//! configuration module and owns its HTTP plumbing; callers only see
//! normalized data or a `SourceError` kind.

// API client modules
pub mod calendar;
pub mod clickup;
pub mod weather;

// Re-export configuration structs for easier access from other modules
pub use calendar::CalendarConfig;
pub use clickup::ClickUpConfig;
pub use weather::WeatherConfig;
