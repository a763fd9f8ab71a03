use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{api::error, constants::Env};

pub async fn connect_database(env: &Env) -> Result<PgPool, error::SystemError> {
    let database_url = env
        .database_url
        .as_deref()
        .ok_or_else(|| error::SystemError::config("DATABASE_URL must be set"))?;

    let pool = PgPoolOptions::new()
        .max_connections(env.max_connections)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(env.acquire_timeout_secs))
        .acquire_slow_threshold(std::time::Duration::from_secs(env.acquire_timeout_secs))
        .connect(database_url)
        .await?;

    tracing::info!("Connected to relationship database (max {} connections)", env.max_connections);
    Ok(pool)
}

/// Applies the bundled `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), error::SystemError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Relationship migrations applied");
    Ok(())
}

/// Installs a fmt subscriber at `env.log_level`. Does nothing if one is already installed.
pub fn init_tracing(env: &Env) {
    if tracing_subscriber::fmt().with_max_level(env.log_level).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
