use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;
use crate::errors::SummaryError;
use crate::manager_meteo::models::{ForecastDay, PressureSeries};

/// WMO weather codes counted as precipitation: drizzle (51-55), rain (61-65),
/// rain showers (80-82) and thunderstorm (95-99)
const PRECIPITATION_CODES: [u8; 12] = [51, 53, 55, 61, 63, 65, 80, 81, 82, 95, 96, 99];

/// Share of rainy days at which a period counts as rainy
const RAINY_RATIO: f64 = 0.5;

/// Overall character of a forecast period
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherType {
    Rainy,
    Dry,
}

/// Rain statistics over a forecast period
#[derive(Debug, Copy, Clone)]
pub struct WeekPattern {
    pub weather_type: WeatherType,
    pub rainy_days: usize,
    pub total_days: usize,
}

/// Aggregated statistics over one forecast period
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub avg_sunshine_hours: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub current_pressure: Option<f64>,
    pub weather_type: WeatherType,
    pub rainy_days: usize,
    pub total_days: usize,
    pub percentage_rainy: f64,
}

/// Returns true if the weather code stands for a precipitation condition
///
/// # Arguments
///
/// * 'weather_code' - WMO weather code as reported per forecast day
pub fn is_rainy_day(weather_code: u8) -> bool {
    PRECIPITATION_CODES.contains(&weather_code)
}

/// Counts the rainy days among the given weather codes and classifies the
/// whole period as rainy when at least half of its days carry precipitation.
///
/// # Arguments
///
/// * 'weather_codes' - one WMO weather code per day, at least one
pub fn analyze_week_pattern(weather_codes: &[u8]) -> Result<WeekPattern, SummaryError> {
    if weather_codes.is_empty() {
        return Err(SummaryError::EmptyInput("no weather codes to analyze".to_string()));
    }

    let total_days = weather_codes.len();
    let rainy_days = weather_codes.iter().filter(|c| is_rainy_day(**c)).count();

    let weather_type = if rainy_days as f64 / total_days as f64 >= RAINY_RATIO {
        WeatherType::Rainy
    } else {
        WeatherType::Dry
    };

    Ok(WeekPattern { weather_type, rainy_days, total_days })
}

/// Looks up the surface pressure for the current hour and returns it rounded
/// to two decimals.
///
/// The series carries ISO-8601 wall clock timestamps in ascending order, so
/// string comparison equals chronological comparison and the first timestamp
/// at or after 'now_local' is the reading to report. When now lies past the
/// end of the series the first entry is returned, which keeps the value the
/// service has always reported for that case.
///
/// An inconsistent series (empty, or timestamps and values out of step) is
/// logged and answered with None rather than an error, so that the rest of a
/// summary stays computable.
///
/// # Arguments
///
/// * 'series' - hourly pressure series in upstream local time
/// * 'now_local' - current wall clock time in the upstream's timezone
pub fn current_hour_pressure(series: &PressureSeries, now_local: NaiveDateTime) -> Option<f64> {
    if series.time.is_empty() || series.time.len() != series.surface_pressure.len() {
        warn!("inconsistent pressure series, {} timestamps and {} values",
            series.time.len(), series.surface_pressure.len());
        return None;
    }

    let now = now_local.format("%Y-%m-%dT%H:%M:%S").to_string();
    let index = series.time.iter()
        .position(|t| t.as_str() >= now.as_str())
        .unwrap_or(0);

    Some(round2(series.surface_pressure[index]))
}

/// Derives the summary statistics for one forecast period.
///
/// Every field is rounded on its own, temperatures and sunshine hours to two
/// decimals, the rainy day percentage to one.
///
/// # Arguments
///
/// * 'days' - forecast days to aggregate, at least one
/// * 'pressure' - hourly pressure series, when the upstream delivered one
/// * 'now_local' - current wall clock time in the upstream's timezone
pub fn summarize_week(
    days: &[ForecastDay],
    pressure: Option<&PressureSeries>,
    now_local: NaiveDateTime,
) -> Result<WeeklySummary, SummaryError> {
    if days.is_empty() {
        return Err(SummaryError::MalformedData("no forecast days to summarize".to_string()));
    }

    let total_sunshine: f64 = days.iter().map(|d| d.sunshine_seconds).sum();
    let avg_sunshine_hours = round2(total_sunshine / days.len() as f64 / 3600.0);

    let min_temperature = round2(days.iter().map(|d| d.temp_min).fold(f64::INFINITY, f64::min));
    let max_temperature = round2(days.iter().map(|d| d.temp_max).fold(f64::NEG_INFINITY, f64::max));

    let codes: Vec<u8> = days.iter().map(|d| d.weather_code).collect();
    let pattern = analyze_week_pattern(&codes)?;
    let percentage_rainy = round1(pattern.rainy_days as f64 / pattern.total_days as f64 * 100.0);

    let current_pressure = pressure.and_then(|s| current_hour_pressure(s, now_local));

    Ok(WeeklySummary {
        avg_sunshine_hours,
        min_temperature,
        max_temperature,
        current_pressure,
        weather_type: pattern.weather_type,
        rainy_days: pattern.rainy_days,
        total_days: pattern.total_days,
        percentage_rainy,
    })
}

/// Rounds to two decimals, halves away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal, halves away from zero
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(date: &str, code: u8, temp_min: f64, temp_max: f64, sunshine_seconds: f64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            weather_code: code,
            temp_min,
            temp_max,
            sunshine_seconds,
        }
    }

    fn noon(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
            .and_hms_opt(12, 30, 0).unwrap()
    }

    #[test]
    fn rain_codes_cover_drizzle_rain_showers_and_thunderstorm() {
        for code in [51, 53, 55, 61, 63, 65, 80, 81, 82, 95, 96, 99] {
            assert!(is_rainy_day(code), "code {} should count as rainy", code);
        }
        for code in [0, 1, 2, 3, 45, 48, 71, 75, 77, 85] {
            assert!(!is_rainy_day(code), "code {} should not count as rainy", code);
        }
    }

    #[test]
    fn four_rainy_days_of_seven_make_a_rainy_week() {
        let pattern = analyze_week_pattern(&[61, 61, 61, 61, 0, 0, 0]).unwrap();

        assert_eq!(pattern.weather_type, WeatherType::Rainy);
        assert_eq!(pattern.rainy_days, 4);
        assert_eq!(pattern.total_days, 7);
    }

    #[test]
    fn three_rainy_days_of_seven_make_a_dry_week() {
        let pattern = analyze_week_pattern(&[61, 63, 80, 0, 1, 2, 3]).unwrap();

        assert_eq!(pattern.weather_type, WeatherType::Dry);
        assert_eq!(pattern.rainy_days, 3);
    }

    #[test]
    fn pattern_threshold_follows_the_period_length() {
        // one rainy day is half of a two day horizon
        let pattern = analyze_week_pattern(&[61, 0]).unwrap();
        assert_eq!(pattern.weather_type, WeatherType::Rainy);

        let pattern = analyze_week_pattern(&[61, 0, 0]).unwrap();
        assert_eq!(pattern.weather_type, WeatherType::Dry);
    }

    #[test]
    fn empty_code_list_is_rejected() {
        let result = analyze_week_pattern(&[]);
        assert!(matches!(result, Err(SummaryError::EmptyInput(_))));
    }

    #[test]
    fn pressure_lookup_picks_first_hour_at_or_after_now() {
        let series = PressureSeries {
            time: vec![
                "2024-01-15T11:00".to_string(),
                "2024-01-15T12:00".to_string(),
                "2024-01-15T13:00".to_string(),
            ],
            surface_pressure: vec![1001.0, 1002.0, 1003.456],
        };

        // now is 12:30, the 13:00 reading is the first one not in the past
        assert_eq!(current_hour_pressure(&series, noon("2024-01-15")), Some(1003.46));
    }

    #[test]
    fn pressure_lookup_falls_back_to_first_entry_when_now_is_past_the_series() {
        let series = PressureSeries {
            time: vec![
                "2024-01-14T22:00".to_string(),
                "2024-01-14T23:00".to_string(),
            ],
            surface_pressure: vec![990.5, 991.5],
        };

        assert_eq!(current_hour_pressure(&series, noon("2024-01-15")), Some(990.5));
    }

    #[test]
    fn inconsistent_pressure_series_yields_none() {
        let mismatched = PressureSeries {
            time: vec!["2024-01-15T12:00".to_string()],
            surface_pressure: vec![1000.0, 1001.0],
        };
        assert_eq!(current_hour_pressure(&mismatched, noon("2024-01-15")), None);

        let empty = PressureSeries { time: vec![], surface_pressure: vec![] };
        assert_eq!(current_hour_pressure(&empty, noon("2024-01-15")), None);
    }

    #[test]
    fn summary_aggregates_one_week() {
        let days = vec![
            day("2024-01-15", 61, -3.1, 2.0, 3600.0),
            day("2024-01-16", 61, -1.0, 4.5, 7200.0),
            day("2024-01-17", 61, 0.5, 5.0, 0.0),
            day("2024-01-18", 61, 1.0, 6.5, 1800.0),
            day("2024-01-19", 0, 2.0, 8.0, 10800.0),
            day("2024-01-20", 1, 0.0, 7.0, 9000.0),
            day("2024-01-21", 2, -2.5, 3.0, 5400.0),
        ];
        let series = PressureSeries {
            time: vec!["2024-01-15T12:00".to_string(), "2024-01-15T13:00".to_string()],
            surface_pressure: vec![1013.251, 1014.0],
        };

        let summary = summarize_week(&days, Some(&series), noon("2024-01-15")).unwrap();

        // 37800 seconds over 7 days is 1.5 hours per day
        assert_eq!(summary.avg_sunshine_hours, 1.5);
        assert_eq!(summary.min_temperature, -3.1);
        assert_eq!(summary.max_temperature, 8.0);
        assert_eq!(summary.current_pressure, Some(1014.0));
        assert_eq!(summary.weather_type, WeatherType::Rainy);
        assert_eq!(summary.rainy_days, 4);
        assert_eq!(summary.total_days, 7);
        assert_eq!(summary.percentage_rainy, 57.1);
        assert!(summary.min_temperature <= summary.max_temperature);
    }

    #[test]
    fn summary_percentage_matches_its_own_counts() {
        let days = vec![
            day("2024-01-15", 95, -3.0, 2.0, 3600.0),
            day("2024-01-16", 0, -1.0, 4.5, 7200.0),
            day("2024-01-17", 82, 0.5, 5.0, 0.0),
        ];

        let summary = summarize_week(&days, None, noon("2024-01-15")).unwrap();

        let recomputed = summary.rainy_days as f64 / summary.total_days as f64 * 100.0;
        assert!((summary.percentage_rainy - recomputed).abs() <= 0.1);
        assert!(summary.percentage_rainy >= 0.0 && summary.percentage_rainy <= 100.0);
    }

    #[test]
    fn summary_without_pressure_series_has_no_pressure() {
        let days = vec![day("2024-01-15", 0, 1.0, 2.0, 3600.0)];

        let summary = summarize_week(&days, None, noon("2024-01-15")).unwrap();

        assert_eq!(summary.current_pressure, None);
    }

    #[test]
    fn summary_is_idempotent() {
        let days = vec![
            day("2024-01-15", 61, -3.0, 2.0, 3661.0),
            day("2024-01-16", 0, -1.0, 4.5, 7199.0),
        ];
        let series = PressureSeries {
            time: vec!["2024-01-15T13:00".to_string()],
            surface_pressure: vec![1013.7],
        };

        let first = summarize_week(&days, Some(&series), noon("2024-01-15")).unwrap();
        let second = summarize_week(&days, Some(&series), noon("2024-01-15")).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn empty_day_list_is_rejected() {
        let result = summarize_week(&[], None, noon("2024-01-15"));
        assert!(matches!(result, Err(SummaryError::MalformedData(_))));
    }
}
