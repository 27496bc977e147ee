use sqlx::{
    PgPool,
    migrate::Migrator,
    postgres::{PgConnectOptions, PgSslMode},
};
use std::str::FromStr;

pub mod codes;
pub mod payment;
pub mod replica;
pub mod user;

pub mod models {
    pub mod code;
    pub mod payment;
    pub mod user;
}

pub mod dtos {
    pub mod code;
    pub mod payment;
    pub mod user;
}

static ONLINE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/online");
static OFFLINE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/offline");

/// Handles to both Postgres stores.
///
/// The online store is the source of truth for users and payments; the
/// offline store holds the code mirror and the user replica that the local
/// redemption machines read from. The two pools are fully independent, a
/// connection to one never depends on the other.
#[derive(Clone)]
pub struct Stores {
    pub online: PgPool,
    pub offline: PgPool,
}

/// Connects to both stores, creating each database and running its
/// migrations if needed. Fails if either store is unreachable.
pub async fn setup(
    online_url: &str,
    offline_url: &str,
    require_ssl: bool,
) -> Result<Stores, Box<dyn std::error::Error>> {
    let online = setup_store(online_url, require_ssl, &ONLINE_MIGRATOR).await?;
    let offline = setup_store(offline_url, require_ssl, &OFFLINE_MIGRATOR).await?;

    Ok(Stores { online, offline })
}

async fn setup_store(
    database_url: &str,
    require_ssl: bool,
    migrator: &Migrator,
) -> Result<PgPool, Box<dyn std::error::Error>> {
    let url = url::Url::parse(database_url)?;
    let db_name = url.path().trim_start_matches('/');
    let username = url.username();
    let password = url.password().unwrap_or("");
    let host = url.host_str().unwrap_or("localhost");
    let port = url.port().unwrap_or(5432);

    let admin_url = format!(
        "postgresql://{}:{}@{}:{}/postgres",
        username, password, host, port
    );

    let mut admin_options = PgConnectOptions::from_str(&admin_url)?;
    if require_ssl {
        admin_options = admin_options.ssl_mode(PgSslMode::Require);
    }

    let admin_pool = PgPool::connect_with(admin_options).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name)
            .fetch_one(&admin_pool)
            .await?;

    if !exists {
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&admin_pool)
            .await?;
    }

    admin_pool.close().await;

    let mut options = PgConnectOptions::from_str(database_url)?;
    if require_ssl {
        options = options.ssl_mode(PgSslMode::Require);
    }
    let pool = PgPool::connect_with(options).await?;

    migrator.run(&pool).await?;

    Ok(pool)
}
