//! IP geolocation followed by a current-weather lookup.
//!
//! Both calls are plain HTTPS GETs returning JSON. The weather call needs the
//! coordinates from the first, so they run back to back. No retries.

use std::time::Duration;

use serde::Deserialize;

use crate::settings::WeatherSettings;

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("location lookup failed: {0}")]
    Location(#[source] reqwest::Error),

    #[error("weather lookup failed: {0}")]
    Weather(#[source] reqwest::Error),

    #[error("weather response had no conditions")]
    MissingCondition,

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainReading,
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: i64,
    pub condition: String,
}

impl WeatherReport {
    fn from_response(location: Location, response: WeatherResponse) -> Result<Self, WeatherError> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingCondition)?
            .description;
        Ok(Self {
            city: location.city,
            temperature_c: response.main.temp.round() as i64,
            condition,
        })
    }

    pub fn info_line(&self) -> String {
        format!("📍 {}: {}°C, {}", self.city, self.temperature_c, self.condition)
    }

    pub fn overlay_text(&self, time: &str) -> String {
        format!("{}\n🕑 {time}", self.info_line())
    }

    pub fn utterance(&self, time: &str) -> String {
        format!(
            "In {}, it's {} degrees and {}. The time is {time}.",
            self.city, self.temperature_c, self.condition
        )
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    location_url: String,
    weather_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(WeatherError::Client)?;

        Ok(Self {
            client,
            location_url: settings.location_url.clone(),
            weather_url: settings.weather_url.clone(),
            api_key: settings.resolved_api_key(),
        })
    }

    pub async fn current(&self) -> Result<WeatherReport, WeatherError> {
        let location = self.locate().await?;
        let response = self.weather_at(&location).await?;
        WeatherReport::from_response(location, response)
    }

    async fn locate(&self) -> Result<Location, WeatherError> {
        self.client
            .get(&self.location_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(WeatherError::Location)?
            .json::<Location>()
            .await
            .map_err(WeatherError::Location)
    }

    async fn weather_at(&self, location: &Location) -> Result<WeatherResponse, WeatherError> {
        let query = [
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("units", "metric".to_string()),
            ("appid", self.api_key.clone()),
        ];
        self.client
            .get(&self.weather_url)
            .query(&query)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(WeatherError::Weather)?
            .json::<WeatherResponse>()
            .await
            .map_err(WeatherError::Weather)
    }
}
