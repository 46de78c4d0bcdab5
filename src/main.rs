mod utils;

use std::{env, error::Error, sync::Arc};

use mcstatus::{
    config::StatusConfig,
    http::{self, AppState},
    logging::StatusLogger,
    metrics::QueryMetrics,
    query::StatusClient,
    telemetry::{get_meter, init_meter},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    #[cfg(debug_assertions)]
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let meter_provider = if dotenvy::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        Some(init_meter()?)
    } else {
        None
    };

    let config_file = env::current_dir()?.join("settings.toml");
    let mut config = StatusConfig::load_or_init(&config_file)?;
    config.apply_env()?;

    let metrics = Arc::new(QueryMetrics::new(&get_meter()));
    let client = StatusClient::new(config.query_options()).with_metrics(metrics);
    let state = Arc::new(AppState::new(client));

    let listener = TcpListener::bind(config.listen_addr()?).await?;
    if let Err(err) = http::serve(listener, state, shutdown_signal()).await {
        StatusLogger::server_error(&err);
    }

    if let Some(provider) = meter_provider {
        provider.shutdown()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    use futures::future::{select_all, FutureExt};
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        let _ = tokio::signal::ctrl_c().await;
        StatusLogger::shutting_down();
        return;
    };

    let sigint_fut = sigint.recv().boxed();
    let sigterm_fut = sigterm.recv().boxed();
    let _ = select_all([sigint_fut, sigterm_fut]).await;
    StatusLogger::shutting_down();
}
