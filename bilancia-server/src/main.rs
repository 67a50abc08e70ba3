use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

// ri-utilizziamo le funzioni e strutture definite in lib.rs
use bilancia_server::{
    build_sqlite_url, connect_pool, mirror::MirrorStore, routes, run_migrations, storage_dir,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Costruisci l'URL del database SQLite
    let db_url = build_sqlite_url().context("build sqlite DATABASE_URL")?;
    tracing::info!("Using DATABASE_URL = {}", db_url);
    // Connetti al database
    let pool = connect_pool(&db_url).await.context("connect to sqlite")?;
    // Esegui il bootstrap delle tabelle
    run_migrations(&pool).await.context("run migrations")?;

    // Directory dei file specchio: validata/creata una sola volta qui,
    // non come effetto collaterale a livello di modulo.
    let dir = storage_dir();
    let mirror = MirrorStore::open(&dir).with_context(|| format!("open storage dir {:?}", dir))?;
    tracing::info!("Mirror files under {:?}", dir);

    // Crea lo stato dell'applicazione condiviso
    let state = Arc::new(AppState { pool, mirror });
    // Configura le rotte dell'applicazione
    let app = routes::router(state);

    // Ottieni l'indirizzo di binding dal env o usa il default
    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
    let addr: SocketAddr = bind.parse().context("parse BIND_ADDR")?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind tcp listener")?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}
