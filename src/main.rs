use std::env;
use std::sync::Arc;

use actix_files::Files;
use actix_web::middleware::Compress;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use calzados_marilo::api::routes::{api_routes, health_routes};
use calzados_marilo::api::services::health::mark_start_time;
use calzados_marilo::cli;
use calzados_marilo::config::{get_config, init_config};
use calzados_marilo::storage::SeaOrmStorage;
use calzados_marilo::system::logging::init_logging;
use calzados_marilo::system::startup::prepare_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_config();
    let config = get_config();
    let _log_guard = init_logging(config);

    // CLI mode for any command other than `serve`; a bare invocation serves.
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && args[1] != "serve" {
        cli::run_cli().await;
        return Ok(());
    }

    mark_start_time();

    let storage = Arc::new(
        SeaOrmStorage::from_config()
            .await
            .context("storage initialization failed")?,
    );

    prepare_server(config, &storage)
        .await
        .context("server preparation failed")?;

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let static_route = config.assets.static_route.clone();
    let static_dir = config.assets.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.as_ref().clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .service(api_routes())
            .service(health_routes())
            .service(Files::new(&static_route, &static_dir))
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await?;

    Ok(())
}
