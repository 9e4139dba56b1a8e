use actix_web::{web, App, HttpServer};
use log::info;
use solarcast::errors::UnrecoverableError;
use solarcast::handlers;
use solarcast::initialization::config;
use solarcast::manager_meteo::Meteo;
use solarcast::AppState;

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let meteo = Meteo::new(&config.meteo)?;
    let state = web::Data::new(AppState {
        meteo,
        solar: config.solar,
    });

    info!("starting server on {}:{}", config.web_server.bind_address, config.web_server.bind_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::QueryConfig::default().error_handler(handlers::query_error_handler))
            .service(handlers::forecast)
            .service(handlers::summary)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
