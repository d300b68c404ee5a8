use super::JsonFetch;
use crate::core::error::ChatError;
use crate::plugins::WeatherRecord;

use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::Url;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

const FALLBACK_CONDITIONS: [&str; 4] = ["Sunny", "Cloudy", "Rainy", "Partly Cloudy"];
const FALLBACK_ICON: &str = "01d";
const MPS_TO_KPH: f64 = 3.6;

#[derive(Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    name: String,
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
    icon: String,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

/// Current-conditions lookup against an OpenWeatherMap-style endpoint.
pub struct WeatherFetcher {
    fetch: Arc<dyn JsonFetch>,
    base_url: String,
    api_key: String,
}

impl WeatherFetcher {
    pub fn new(fetch: Arc<dyn JsonFetch>, base_url: &str, api_key: &str) -> Self {
        Self {
            fetch,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn request_url(&self, city: &str) -> Result<String, ChatError> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
        )
        .map_err(|e| ChatError::Config(format!("weather base_url {}: {}", self.base_url, e)))?;
        Ok(url.into())
    }

    pub async fn current(&self, city: &str) -> Result<WeatherRecord, ChatError> {
        let url = self.request_url(city)?;
        let body = self.fetch.fetch_json(&url).await?;
        let parsed: CurrentWeather = serde_json::from_value(body)?;
        to_record(parsed, city)
    }

    /// Live conditions, or a synthetic reading when the lookup fails.
    pub async fn current_or_synthetic(&self, city: &str) -> WeatherRecord {
        match self.current(city).await {
            Ok(record) => record,
            Err(e) => {
                warn!(city, error = %e, "weather lookup failed, using synthetic reading");
                synthesize_weather(city, &mut rand::thread_rng())
            }
        }
    }
}

fn to_record(parsed: CurrentWeather, city: &str) -> Result<WeatherRecord, ChatError> {
    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::Serialization("weather response has no conditions".into()))?;

    let location = if parsed.name.trim().is_empty() {
        city.to_string()
    } else {
        parsed.name
    };

    Ok(WeatherRecord {
        location,
        temperature_celsius: parsed.main.temp.round() as i32,
        condition: condition.description,
        humidity_percent: parsed.main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_speed_kph: (parsed.wind.speed * MPS_TO_KPH).round().max(0.0) as u32,
        icon_id: condition.icon,
    })
}

/// A plausible reading for `location`: 5–34 °C, 40–79 % humidity,
/// 5–24 km/h wind.
pub fn synthesize_weather<R: Rng>(location: &str, rng: &mut R) -> WeatherRecord {
    WeatherRecord {
        location: location.to_string(),
        temperature_celsius: rng.gen_range(5..=34),
        condition: FALLBACK_CONDITIONS
            .choose(&mut *rng)
            .copied()
            .unwrap_or(FALLBACK_CONDITIONS[0])
            .to_string(),
        humidity_percent: rng.gen_range(40..=79),
        wind_speed_kph: rng.gen_range(5..=24),
        icon_id: FALLBACK_ICON.to_string(),
    }
}
