//! Open-Meteo client for current conditions and a two-day hourly forecast.

use crate::libs::config::ConfigModule;
use crate::libs::error::{SourceError, SourceResult};
use chrono::{Duration, NaiveDateTime};
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.open-meteo.com/v1";

const HOURLY_FIELDS: &str = "temperature_2m,apparent_temperature,precipitation_probability,weathercode,windspeed_10m";

/// Weather for one location: current conditions plus the remaining
/// hours of today and all of tomorrow. Recomputed on every request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    pub current: CurrentWeather,
    pub today: Vec<HourForecast>,
    pub tomorrow: Vec<HourForecast>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeather {
    pub temp: i64,
    pub wind_speed: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourForecast {
    pub time: String,
    pub temp: i64,
    pub feels_like: i64,
    pub description: String,
    pub wind_speed: f64,
    pub precipitation_prob: Option<f64>,
}

// Wire types

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWire,
    hourly: HourlyWire,
}

#[derive(Debug, Deserialize)]
struct CurrentWire {
    temperature: f64,
    windspeed: f64,
    weathercode: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyWire {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    pub weathercode: Vec<u32>,
    pub windspeed_10m: Vec<f64>,
}

/// Converts a WMO weather code to a human description.
pub fn describe(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Splits the hourly forecast into today's and tomorrow's buckets.
/// Hours already in the past are dropped.
pub fn bucket_hourly(hourly: &HourlyWire, now: NaiveDateTime) -> (Vec<HourForecast>, Vec<HourForecast>) {
    let today = now.date();
    let tomorrow = today + Duration::days(1);

    let mut today_forecasts = Vec::new();
    let mut tomorrow_forecasts = Vec::new();

    for (i, time) in hourly.time.iter().enumerate() {
        let Ok(forecast_time) = NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M") else {
            continue;
        };
        if forecast_time < now {
            continue;
        }

        let forecast = HourForecast {
            time: forecast_time.format("%H:%M").to_string(),
            temp: hourly.temperature_2m.get(i).copied().unwrap_or_default().round() as i64,
            feels_like: hourly.apparent_temperature.get(i).copied().unwrap_or_default().round() as i64,
            description: describe(hourly.weathercode.get(i).copied().unwrap_or(u32::MAX)).to_string(),
            wind_speed: hourly.windspeed_10m.get(i).copied().unwrap_or_default(),
            precipitation_prob: hourly.precipitation_probability.get(i).copied().flatten(),
        };

        if forecast_time.date() == today {
            today_forecasts.push(forecast);
        } else if forecast_time.date() == tomorrow {
            tomorrow_forecasts.push(forecast);
        }
    }

    (today_forecasts, tomorrow_forecasts)
}

pub struct Weather {
    client: Client,
    config: WeatherConfig,
}

impl Weather {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    /// Fetches current weather and the hourly forecast, bucketed
    /// relative to `now`.
    pub async fn forecast(&self, now: NaiveDateTime) -> SourceResult<WeatherSnapshot> {
        let url = format!("{}/forecast", self.config.api_url);
        let query = [
            ("latitude", self.config.latitude.to_string()),
            ("longitude", self.config.longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", self.config.timezone.clone()),
            ("forecast_days", "2".to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::upstream("weather", e))?
            .error_for_status()
            .map_err(|e| SourceError::upstream("weather", e))?;

        let body: ForecastResponse = response.json().await.map_err(|e| SourceError::upstream("weather", e))?;

        let (today, tomorrow) = bucket_hourly(&body.hourly, now);
        Ok(WeatherSnapshot {
            current: CurrentWeather {
                temp: body.current_weather.temperature.round() as i64,
                wind_speed: body.current_weather.windspeed,
                description: describe(body.current_weather.weathercode).to_string(),
            },
            today,
            tomorrow,
        })
    }
}

/// Configuration for the weather source location.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WeatherConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    /// Display label used in the endpoint path and responses.
    pub location: String,

    /// Base URL of the weather API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for WeatherConfig {
    /// Manchester, UK.
    fn default() -> Self {
        WeatherConfig {
            latitude: 53.4808,
            longitude: -2.2426,
            timezone: "Europe/London".to_string(),
            location: "manchester".to_string(),
            api_url: default_api_url(),
        }
    }
}

impl WeatherConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "weather".to_string(),
            name: "Weather".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> anyhow::Result<Self> {
        let config = config.clone().unwrap_or_default();
        println!("Weather settings");
        Ok(Self {
            latitude: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter the location latitude")
                .default(config.latitude)
                .interact_text()?,
            longitude: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter the location longitude")
                .default(config.longitude)
                .interact_text()?,
            timezone: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter the IANA timezone")
                .default(config.timezone)
                .interact_text()?,
            location: Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter the location label")
                .default(config.location)
                .interact_text()?,
            api_url: config.api_url,
        })
    }
}
