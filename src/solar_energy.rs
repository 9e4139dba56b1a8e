use serde::Deserialize;
use crate::errors::EnergyError;

/// Parameters of the modeled solar installation
#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(default)]
pub struct SolarParameters {
    /// Nameplate capacity in kW
    pub installed_power_kw: f64,
    /// Overall panel efficiency, within (0, 1]
    pub panel_efficiency: f64,
}

impl Default for SolarParameters {
    fn default() -> Self {
        SolarParameters {
            installed_power_kw: 2.5,
            panel_efficiency: 0.2,
        }
    }
}

/// Estimates the energy produced in kWh during a period of direct sunshine.
///
/// The result is rounded to two decimals, halves away from zero. A negative
/// duration violates the domain and is rejected rather than clamped.
///
/// # Arguments
///
/// * 'sunshine_seconds' - seconds of direct sunshine
/// * 'params' - installation parameters
pub fn energy_production(sunshine_seconds: f64, params: &SolarParameters) -> Result<f64, EnergyError> {
    if sunshine_seconds < 0.0 {
        return Err(EnergyError(format!("negative sunshine duration: {}", sunshine_seconds)));
    }

    let sunshine_hours = sunshine_seconds / 3600.0;
    let energy_kwh = params.installed_power_kw * sunshine_hours * params.panel_efficiency;

    Ok((energy_kwh * 100.0).round() / 100.0)
}
