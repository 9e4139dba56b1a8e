pub mod errors;
pub mod logging;
pub mod initialization;
pub mod handlers;
pub mod manager_meteo;
pub mod weather_summary;
pub mod solar_energy;

use crate::manager_meteo::Meteo;
use crate::solar_energy::SolarParameters;

/// State shared by all request handlers, the upstream client and the
/// parameters of the modeled solar installation
pub struct AppState {
    pub meteo: Meteo,
    pub solar: SolarParameters,
}
