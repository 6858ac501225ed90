//! Forecast record generation.
//!
//! Each request gets a fresh sequence of records with consecutive dates starting
//! tomorrow, a random Celsius temperature, and a random summary word. Nothing is
//! stored; the records are dropped once serialized.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::config::{ConfigError, ForecastSettings};

/// Celsius-to-Fahrenheit divisor (roughly 5/9)
pub const CELSIUS_DIVISOR: f64 = 0.5556;

/// Convert Celsius to Fahrenheit, truncating toward zero before adding 32.
pub fn celsius_to_fahrenheit(temperature_c: i32) -> i32 {
    32 + (f64::from(temperature_c) / CELSIUS_DIVISOR) as i32
}

/// One generated forecast entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    /// Serialized as an ISO-8601 calendar date (`YYYY-MM-DD`)
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: Option<String>,
}

impl ForecastRecord {
    pub fn new(date: NaiveDate, temperature_c: i32, summary: Option<String>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: celsius_to_fahrenheit(temperature_c),
            summary,
        }
    }
}

/// Builds forecast sequences from validated settings.
#[derive(Debug, Clone)]
pub struct ForecastGenerator {
    settings: ForecastSettings,
}

impl ForecastGenerator {
    /// Rejects settings that cannot produce a forecast (empty temperature range, zero days).
    pub fn new(settings: ForecastSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Generate `settings.days` records dated `today + 1` onwards.
    pub fn generate(&self, today: NaiveDate, rng: &mut fastrand::Rng) -> Vec<ForecastRecord> {
        (1..=self.settings.days as u64)
            .map(|offset| {
                let date = today
                    .checked_add_days(Days::new(offset))
                    .unwrap_or(NaiveDate::MAX);
                let temperature_c =
                    rng.i32(self.settings.min_temperature_c..self.settings.max_temperature_c);
                ForecastRecord::new(date, temperature_c, self.pick_summary(rng))
            })
            .collect()
    }

    /// Generate against the local calendar date with a process-seeded RNG.
    pub fn generate_now(&self) -> Vec<ForecastRecord> {
        let mut rng = fastrand::Rng::new();
        self.generate(Local::now().date_naive(), &mut rng)
    }

    fn pick_summary(&self, rng: &mut fastrand::Rng) -> Option<String> {
        if self.settings.summaries.is_empty() {
            return None;
        }
        let index = rng.usize(..self.settings.summaries.len());
        self.settings.summaries.get(index).cloned()
    }
}

impl Default for ForecastGenerator {
    fn default() -> Self {
        Self {
            settings: ForecastSettings::default(),
        }
    }
}
