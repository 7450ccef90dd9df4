//! Calendar provider client: enumeration, event fetch, token lifecycle.
//!
//! Authorization follows the provider's OAuth flow. A one-time
//! interactive exchange (run from `dayboard init`) trades an
//! authorization code for a token pair, which is cached encrypted at
//! rest. Expired access tokens are refreshed transparently; a refresh
//! failure or a missing grant surfaces as an authentication error, never
//! as a hang inside a request.

use crate::libs::config::ConfigModule;
use crate::libs::error::{SourceError, SourceResult};
use crate::libs::secret::Secret;
use chrono::{DateTime, Local, Utc};
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const TOKEN_FILE: &str = ".calendar_token";
const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Seconds of remaining lifetime below which a token counts as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Roles that grant read access to a calendar's events.
const READABLE_ROLES: [&str; 3] = ["owner", "writer", "reader"];

/// A normalized calendar event.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub location: String,
    pub attendees: Vec<String>,
    pub calendar_id: String,
    pub calendar_name: String,
    pub event_id: String,
    pub html_link: String,
}

/// One day's worth of events in the recent-events view.
#[derive(Debug, Clone, Serialize)]
pub struct EventDay {
    pub date: String,
    pub events: Vec<CalendarEvent>,
}

// Wire types

#[derive(Debug, Deserialize)]
struct CalendarListResponse {
    #[serde(default)]
    items: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, rename = "accessRole")]
    pub access_role: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<WireEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<WireAttendee>,
    #[serde(default, rename = "htmlLink")]
    pub html_link: Option<String>,
}

/// Either a timed instant or a date-only value for all-day events.
#[derive(Debug, Clone, Deserialize)]
pub struct EventTime {
    #[serde(default, rename = "dateTime")]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl EventTime {
    /// The displayed value: the timed field when present, else the
    /// date-only field.
    pub fn display(&self) -> String {
        self.date_time.clone().or_else(|| self.date.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAttendee {
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "self")]
    pub is_self: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
    refresh_token: Option<String>,
    /// Unix timestamp after which the access token is no longer valid.
    expires_at: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Whether a listed calendar should contribute events: not deleted or
/// hidden, not the provider's synthetic "Tasks" calendar (that would
/// double-count task data as events), and readable by the current
/// identity.
pub fn is_readable(entry: &CalendarEntry) -> bool {
    if entry.deleted || entry.hidden {
        return false;
    }
    if entry.summary == "Tasks" {
        return false;
    }
    READABLE_ROLES.contains(&entry.access_role.as_str())
}

pub fn normalize_event(event: WireEvent, calendar_id: &str, calendar_name: &str) -> CalendarEvent {
    CalendarEvent {
        title: event.summary.unwrap_or_else(|| "No Title".to_string()),
        start_time: event.start.display(),
        end_time: event.end.display(),
        description: event.description.unwrap_or_default(),
        location: event.location.unwrap_or_default(),
        attendees: event
            .attendees
            .into_iter()
            .filter(|attendee| !attendee.is_self)
            .map(|attendee| attendee.email)
            .collect(),
        calendar_id: calendar_id.to_string(),
        calendar_name: calendar_name.to_string(),
        event_id: event.id,
        html_link: event.html_link.unwrap_or_default(),
    }
}

/// Groups events by the date part of their start time, ascending.
pub fn group_by_day(events: &[CalendarEvent]) -> Vec<EventDay> {
    let mut days: Vec<EventDay> = Vec::new();
    for event in events {
        let date = event.start_time.split('T').next().unwrap_or(&event.start_time).to_string();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.events.push(event.clone()),
            None => days.push(EventDay {
                date,
                events: vec![event.clone()],
            }),
        }
    }
    days.sort_by(|a, b| a.date.cmp(&b.date));
    for day in days.iter_mut() {
        day.events.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }
    days
}

pub struct Calendar {
    client: Client,
    config: CalendarConfig,
    secret: Secret,
}

impl Calendar {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
            secret: Secret::new(TOKEN_FILE),
        }
    }

    /// Fetches events overlapping the window from every readable
    /// calendar, ordered by start time within each calendar. A calendar
    /// whose fetch fails is logged and skipped.
    pub async fn list_events(&self, start: DateTime<Local>, end: DateTime<Local>) -> SourceResult<Vec<CalendarEvent>> {
        let token = self.access_token().await?;
        let time_min = start.to_rfc3339();
        let time_max = end.to_rfc3339();

        let calendars = self.calendar_list(&token).await?;
        debug!("Found {} calendars", calendars.len());

        let mut all_events = Vec::new();
        for calendar in calendars {
            if !is_readable(&calendar) {
                debug!("Skipping calendar {}", calendar.summary);
                continue;
            }

            let query = [
                ("timeMin", time_min.clone()),
                ("timeMax", time_max.clone()),
                // Expand recurring events into concrete instances
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            let url = format!("{}/calendars/{}/events", self.config.api_url, calendar.id);
            let response = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .and_then(|res| res.error_for_status());

            let events = match response {
                Ok(res) => match res.json::<EventsResponse>().await {
                    Ok(body) => body.items,
                    Err(e) => {
                        warn!("Skipping calendar {}: {}", calendar.summary, e);
                        continue;
                    }
                },
                Err(e) => {
                    warn!("Skipping calendar {}: {}", calendar.summary, e);
                    continue;
                }
            };

            for event in events {
                all_events.push(normalize_event(event, &calendar.id, &calendar.summary));
            }
        }

        Ok(all_events)
    }

    async fn calendar_list(&self, token: &str) -> SourceResult<Vec<CalendarEntry>> {
        let url = format!("{}/users/me/calendarList", self.config.api_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SourceError::upstream("calendar", e))?
            .error_for_status()
            .map_err(|e| SourceError::upstream("calendar", e))?;

        let body: CalendarListResponse = response.json().await.map_err(|e| SourceError::upstream("calendar", e))?;
        Ok(body.items)
    }

    /// Returns a valid access token, refreshing the cached one when it
    /// has expired.
    async fn access_token(&self) -> SourceResult<String> {
        let stored = self
            .secret
            .load()
            .ok()
            .and_then(|blob| serde_json::from_str::<StoredToken>(&blob).ok())
            .ok_or_else(|| SourceError::auth("calendar", "no stored authorization; run `dayboard init` to authorize"))?;

        if stored.expires_at > Utc::now().timestamp() + EXPIRY_MARGIN_SECS {
            return Ok(stored.access_token);
        }

        let Some(refresh_token) = stored.refresh_token.clone() else {
            return Err(SourceError::auth("calendar", "token expired and no refresh token is stored"));
        };

        debug!("Refreshing expired calendar token");
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let token = self.request_token(&params).await?;

        // The provider may omit the refresh token on renewal; keep the old one
        self.store_token(&StoredToken {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.or(Some(refresh_token)),
            expires_at: Utc::now().timestamp() + token.expires_in,
        })?;

        Ok(token.access_token)
    }

    /// Runs the one-time interactive authorization exchange and caches
    /// the resulting token pair.
    pub async fn authorize_interactive(&self) -> anyhow::Result<()> {
        let consent_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.config.auth_url, self.config.client_id, REDIRECT_URI, SCOPE
        );
        println!("Open this URL in your browser and authorize calendar access:\n\n  {}\n", consent_url);

        let code: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Paste the authorization code")
            .interact_text()?;

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code.trim()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ];
        let token = self.request_token(&params).await?;

        self.store_token(&StoredToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now().timestamp() + token.expires_in,
        })?;
        println!("Calendar authorization saved");

        Ok(())
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> SourceResult<TokenResponse> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| SourceError::auth("calendar", e))?;

        if !response.status().is_success() {
            // A failed exchange invalidates whatever is cached
            let _ = self.secret.clear();
            return Err(SourceError::auth("calendar", format!("token endpoint answered {}", response.status())));
        }

        response.json::<TokenResponse>().await.map_err(|e| SourceError::auth("calendar", e))
    }

    fn store_token(&self, token: &StoredToken) -> SourceResult<()> {
        let blob = serde_json::to_string(token).map_err(|e| SourceError::auth("calendar", e))?;
        self.secret.store(&blob).map_err(|e| SourceError::auth("calendar", e))?;
        Ok(())
    }
}

/// Configuration for the calendar provider integration.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CalendarConfig {
    /// OAuth client id of the installed application.
    pub client_id: String,

    /// OAuth client secret of the installed application.
    pub client_secret: String,

    /// Base URL of the calendar API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// OAuth token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// OAuth consent page.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

fn default_api_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

impl CalendarConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "calendar".to_string(),
            name: "Calendar".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> anyhow::Result<Self> {
        let config = config.clone().unwrap_or(Self {
            client_id: "".to_string(),
            client_secret: "".to_string(),
            api_url: default_api_url(),
            token_url: default_token_url(),
            auth_url: default_auth_url(),
        });
        println!("Calendar settings");
        Ok(Self {
            client_id: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your OAuth client id")
                .default(config.client_id)
                .interact_text()?,
            client_secret: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your OAuth client secret")
                .default(config.client_secret)
                .interact_text()?,
            api_url: config.api_url,
            token_url: config.token_url,
            auth_url: config.auth_url,
        })
    }
}
