//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use tasks_backend::config::AppSettings;
use tasks_backend::inbound::http::health::HealthState;

use server::{ServerConfig, StartupError, build_task_board, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(StartupError::from)?;
    let tasks = build_task_board(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), ServerConfig::new(bind_addr, tasks))?;
    info!(%bind_addr, "task board listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
