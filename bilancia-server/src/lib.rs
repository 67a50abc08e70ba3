use anyhow::Context;
use axum::http::StatusCode;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

pub mod access;
pub mod controllers;
pub mod error;
pub mod mirror;
pub mod routes;
pub mod store;

use mirror::MirrorStore;

pub struct AppState {
    pub pool: SqlitePool,
    /// Store dei file specchio degli account, uno per username.
    pub mirror: MirrorStore,
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s))
}

/// Crea un DB URL SQLite leggendo la variabile d'ambiente DATABASE_URL.
/// Se non è impostata, usa "bilancia.db" nella directory corrente.
pub fn build_sqlite_url() -> anyhow::Result<String> {
    let raw = std::env::var("DATABASE_URL").unwrap_or_else(|_| "bilancia.db".to_string());
    if raw == "sqlite::memory:" {
        return Ok(raw);
    }
    // Rimuovi il prefisso "sqlite://" se presente, per ottenere il percorso del file.
    let path_part = if raw.starts_with("sqlite://") {
        raw.trim_start_matches("sqlite:///")
            .trim_start_matches("sqlite://")
            .to_string()
    } else {
        raw
    };
    sqlite_url_for_path(&PathBuf::from(path_part))
}

/// Directory dei file specchio, letta da STORAGE_DIR (default "storage/ids").
/// La creazione avviene esplicitamente all'avvio tramite MirrorStore::open.
pub fn storage_dir() -> PathBuf {
    PathBuf::from(std::env::var("STORAGE_DIR").unwrap_or_else(|_| "storage/ids".to_string()))
}

// Connect to the database and return a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Esegue il bootstrap delle tabelle. Crea le tabelle se non esistono.
// `username` è PRIMARY KEY: l'unicità degli account è garantita dal DB,
// non dalla logica applicativa (due insert concorrenti -> uno perde).
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username   TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            password   TEXT NOT NULL,
            rfid       TEXT NOT NULL DEFAULT '',
            role       TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL
        );"#,
        r#"
        CREATE TABLE IF NOT EXISTS records (
            record_id TEXT PRIMARY KEY,
            content   TEXT NOT NULL,
            operator  TEXT NOT NULL DEFAULT 'unknown',
            username  TEXT NOT NULL,
            rfid      TEXT NOT NULL DEFAULT '',
            timestamp TEXT NOT NULL
        );"#,
    ];
    // applica ogni statement di bootstrap
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", &s[..s.len().min(40)].replace('\n', " ")))?;
    }
    Ok(())
}

/// Controlla lo stato di salute del database tentando di acquisire una connessione dal pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
