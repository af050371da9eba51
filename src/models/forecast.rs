//! Forecast samples and their aggregation into daily summaries

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Days shown in the forecast modal
pub const FORECAST_DAYS: usize = 5;

/// One time-stamped entry of the 5-day/3-hour forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub icon_id: String,
    pub description: String,
}

/// Summary of one calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day_name: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon_id: String,
    pub description: String,
}

impl ForecastDay {
    fn open(date: NaiveDate, sample: &ForecastSample) -> Self {
        Self {
            date,
            day_name: date.format("%a").to_string(),
            temp_min: sample.temp_min,
            temp_max: sample.temp_max,
            humidity: sample.humidity,
            wind_speed: sample.wind_speed,
            icon_id: sample.icon_id.clone(),
            description: sample.description.clone(),
        }
    }

    fn absorb(&mut self, sample: &ForecastSample) {
        self.temp_min = self.temp_min.min(sample.temp_min);
        self.temp_max = self.temp_max.max(sample.temp_max);
    }

    /// Short date label, e.g. "Oct 19"
    #[must_use]
    pub fn date_label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }

    /// Wind speed converted to km/h
    #[must_use]
    pub fn wind_kmh(&self) -> f64 {
        self.wind_speed * 3.6
    }
}

/// Raw forecast samples with the city's offset from UTC
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
    pub utc_offset: FixedOffset,
}

/// Forecast for one city as shown in the modal
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Forecast {
    pub city_name: String,
    pub country: String,
    pub days: Vec<ForecastDay>,
}

/// Group samples by calendar day in `offset`, keeping running min/max.
///
/// Non-temperature fields come from the first sample of each day. Days keep
/// the order in which they first appear and at most `max_days` are returned.
#[must_use]
pub fn aggregate_daily(
    samples: &[ForecastSample],
    offset: FixedOffset,
    max_days: usize,
) -> Vec<ForecastDay> {
    let mut days: Vec<ForecastDay> = Vec::new();

    for sample in samples {
        let date = sample.timestamp.with_timezone(&offset).date_naive();
        match days.iter_mut().find(|day| day.date == date) {
            Some(day) => day.absorb(sample),
            None => days.push(ForecastDay::open(date, sample)),
        }
    }

    days.truncate(max_days);
    days
}
