use std::error::Error;
use std::sync::Arc;

use log::{info, initialize_logger, warn};
use movies::config::Config;
use movies::environment::Environment;
use movies::routes;
use movies::seed;
use movies::store::InMemoryStore;

// one request body runs at a time against the shared collection
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = Arc::new(initialize_logger());

    let config = Config::from_env()?;
    let movies = seed::load(config.seed_path.as_deref())?;

    info!(logger, "Starting...";
        "port" => config.port,
        "movies" => movies.len(),
        "allowed_origins" => config.allowed_origins.len()
    );

    let store = Arc::new(InMemoryStore::with_movies(movies)?);
    let environment = Environment::new(logger.clone(), store, Arc::new(config.allowed_origins));

    let shutdown_logger = logger.clone();
    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(shutdown_logger, "Could not listen for Ctrl-C"; "error" => %e);
            futures::future::pending::<()>().await;
        }
    };

    let (address, server) = warp::serve(routes::make_api(environment))
        .try_bind_with_graceful_shutdown(([0, 0, 0, 0], config.port), shutdown)?;

    info!(logger, "Listening..."; "address" => %address);

    server.await;

    info!(logger, "Exiting gracefully...");

    Ok(())
}
