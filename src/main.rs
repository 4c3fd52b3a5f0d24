use std::io;

use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::info;

use taskboard::config::Config;
use taskboard::{configure_app, db};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let pool = db::connect(&config)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let settings = config.settings();

    info!("Access policy: {:?}", settings.access_policy);
    info!("Server running at http://{}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure_app(pool.clone(), settings))
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
