use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use pacer::utils::SystemClock;
use pacer::{AppState, Config, app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Invalid configuration")?;

    let pool = db::build_pool(&config.database_url, config.pool_size, config.busy_timeout)
        .context("Failed to create DB pool")?;
    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        db::init_schema(&mut conn).context("Failed to initialise database schema")?;
    }
    log::info!("Using database {}", config.database_url);

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(pool, config, Arc::new(SystemClock));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", bind_addr))?;
    log::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;
    Ok(())
}
