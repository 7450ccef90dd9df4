//! # Dayboard - Personal Day Dashboard Backend
//!
//! A small HTTP backend that aggregates a local task database, ClickUp
//! tasks, calendar events and weather data into one consolidated view,
//! and stores daily journal reflections.
//!
//! ## Features
//!
//! - **Today View**: Classifies local tasks into the "Today" view and groups them by area
//! - **Completed Log**: Yesterday's and recent completed tasks, grouped by project
//! - **ClickUp Integration**: Walks the workspace hierarchy and collects tasks by due date
//! - **Calendar Integration**: Fetches events from every readable calendar
//! - **Weather**: Current conditions plus a two-day hourly forecast
//! - **Overview**: One endpoint composing all sources, tolerant of individual outages
//! - **Reflections**: CRUD for morning/evening journal entries with image refs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dayboard::libs::config::Config;
//! use dayboard::server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::read()?;
//!     let app = server::router(server::AppState::new(config));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
pub mod server;
