use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use actix_web::error::{InternalError, QueryPayloadError};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use crate::AppState;
use crate::manager_meteo::errors::MeteoError;
use crate::solar_energy;
use crate::weather_summary::{self, WeeklySummary};

#[derive(Deserialize, Serialize, Debug, Copy, Clone)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize)]
struct SuccessResponse<T: Serialize> {
    status: &'static str,
    data: T,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ForecastData {
    location: Coordinates,
    forecasts: Vec<DailyEnergyForecast>,
}

#[derive(Serialize)]
struct SummaryData {
    location: Coordinates,
    summary: WeeklySummary,
}

/// One forecast day enriched with the estimated solar yield, temperatures in
/// degrees Celsius, sunshine in hours, energy in kWh
#[derive(Serialize)]
struct DailyEnergyForecast {
    date: NaiveDate,
    weather_code: u8,
    temp_min: f64,
    temp_max: f64,
    sunshine_duration: f64,
    generated_energy: f64,
}

#[get("/weather/forecast")]
pub async fn forecast(params: web::Query<Coordinates>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);

    let location = params.into_inner();
    if let Err(message) = validate_coordinates(&location) {
        return bad_request(message);
    }

    let forecast = match data.meteo.fetch_forecast(location.latitude, location.longitude).await {
        Ok(f) => f,
        Err(e) => {
            error!("failed to fetch forecast: {}", e);
            return upstream_error(&e);
        }
    };

    let mut forecasts: Vec<DailyEnergyForecast> = Vec::with_capacity(forecast.days.len());
    for day in &forecast.days {
        let generated_energy = match solar_energy::energy_production(day.sunshine_seconds, &data.solar) {
            Ok(kwh) => kwh,
            Err(e) => {
                error!("failed to estimate energy production: {}", e);
                return internal_error(e.to_string());
            }
        };

        forecasts.push(DailyEnergyForecast {
            date: day.date,
            weather_code: day.weather_code,
            temp_min: round1(day.temp_min),
            temp_max: round1(day.temp_max),
            sunshine_duration: round2(day.sunshine_seconds / 3600.0),
            generated_energy,
        });
    }

    success(ForecastData { location, forecasts })
}

#[get("/weather/summary")]
pub async fn summary(params: web::Query<Coordinates>, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);

    let location = params.into_inner();
    if let Err(message) = validate_coordinates(&location) {
        return bad_request(message);
    }

    let week_forecast = match data.meteo.fetch_forecast(location.latitude, location.longitude).await {
        Ok(f) => f,
        Err(e) => {
            error!("failed to fetch forecast: {}", e);
            return upstream_error(&e);
        }
    };

    let now_local = local_now(week_forecast.utc_offset_seconds);

    match weather_summary::summarize_week(&week_forecast.days, week_forecast.pressure.as_ref(), now_local) {
        Ok(summary) => success(SummaryData { location, summary }),
        Err(e) => {
            error!("failed to summarize forecast: {}", e);
            internal_error(e.to_string())
        }
    }
}

/// Maps a rejected query string, missing or non numeric parameters, onto the
/// service's error envelope instead of the framework default
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(format!("Missing or invalid parameters: {}", err));
    InternalError::from_response(err, response).into()
}

/// Checks that the requested coordinates lie on the globe
fn validate_coordinates(location: &Coordinates) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&location.latitude) {
        return Err("Invalid latitude. Must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&location.longitude) {
        return Err("Invalid longitude. Must be between -180 and 180".to_string());
    }

    Ok(())
}

/// Current wall clock time at the forecast location, derived from the UTC
/// offset the upstream reports along with its local timestamps
fn local_now(utc_offset_seconds: i64) -> NaiveDateTime {
    Utc::now().naive_utc() + TimeDelta::seconds(utc_offset_seconds)
}

fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(SuccessResponse { status: "success", data })
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { status: "error", message })
}

fn internal_error(message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse { status: "error", message })
}

/// A failed upstream call answers with 502, a payload the upstream got wrong
/// with 500
fn upstream_error(e: &MeteoError) -> HttpResponse {
    match e {
        MeteoError::Meteo(_) => {
            HttpResponse::BadGateway().json(ErrorResponse { status: "error", message: e.to_string() })
        }
        MeteoError::Document(_) => internal_error(e.to_string()),
    }
}

/// Rounds to one decimal, halves away from zero
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to two decimals, halves away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
