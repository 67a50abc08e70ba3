use bilancia_core::{new_record_id, now_timestamp, Record, User};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::error::ApiError;

/*
    Store di account e registrazioni: tutta la superficie CRUD sul DB.
    Le scritture specchio su file sono responsabilità del chiamante
    (controller), che combina le due fasi e segnala il successo parziale.
*/

const USER_COLUMNS: &str = "name, username, password, rfid, role, created_at";
const RECORD_COLUMNS: &str = "record_id, content, operator, username, rfid, timestamp";

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        name: row.try_get("name")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
        rfid: row.try_get("rfid")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
    })
}

fn record_from_row(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    Ok(Record {
        record_id: row.try_get("record_id")?,
        content: row.try_get("content")?,
        operator: row.try_get("operator")?,
        username: row.try_get("username")?,
        rfid: row.try_get("rfid")?,
        timestamp: row.try_get("timestamp")?,
    })
}

/// Crea un account. L'unicità di `username` è garantita dal vincolo di chiave
/// primaria: l'insert perdente di una corsa riceve DuplicateUsername, mai una
/// sovrascrittura silenziosa.
pub async fn create_user(
    pool: &SqlitePool,
    name: String,
    username: String,
    password: String,
    rfid: String,
) -> Result<User, ApiError> {
    let user = User {
        name,
        username,
        password,
        rfid,
        role: "user".to_string(),
        created_at: now_timestamp(),
    };

    sqlx::query(
        "INSERT INTO users (name, username, password, rfid, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.name)
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.rfid)
    .bind(&user.role)
    .bind(&user.created_at)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::DuplicateUsername,
        other => ApiError::Store(other),
    })?;

    Ok(user)
}

/// Aggiorna un account esistente: solo password e rfid sono mutabili.
pub async fn update_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    rfid: &str,
) -> Result<User, ApiError> {
    let result = sqlx::query("UPDATE users SET password = ?, rfid = ? WHERE username = ?")
        .bind(password)
        .bind(rfid)
        .bind(username)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::UserNotFound);
    }

    // rileggi la riga aggiornata per restituirla al chiamante
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_one(pool)
    .await?;
    Ok(user_from_row(&row)?)
}

/// Elenco account, i più recenti per primi. Niente paginazione né filtri.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;
    rows.iter().map(user_from_row).collect()
}

/// Verifica le credenziali con un'unica lookup a predicato combinato
/// (username E password insieme, non un controllo in due passi).
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ? AND password = ?"
    ))
    .bind(username)
    .bind(password)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(user_from_row).transpose()
}

/// Persiste una registrazione. Va chiamata solo dopo che il controllo di
/// accesso ha risposto Ok: qui non si riverifica nulla.
pub async fn insert_record(
    pool: &SqlitePool,
    content: String,
    operator: String,
    username: String,
    rfid: String,
) -> Result<Record, sqlx::Error> {
    let record = Record {
        record_id: new_record_id(),
        content,
        operator,
        username,
        rfid,
        timestamp: now_timestamp(),
    };

    sqlx::query(
        "INSERT INTO records (record_id, content, operator, username, rfid, timestamp) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.record_id)
    .bind(&record.content)
    .bind(&record.operator)
    .bind(&record.username)
    .bind(&record.rfid)
    .bind(&record.timestamp)
    .execute(pool)
    .await?;

    Ok(record)
}

/// Elenco registrazioni, le più recenti per prime; il filtro opzionale
/// restringe a un solo username.
pub async fn list_records(
    pool: &SqlitePool,
    username: Option<&str>,
) -> Result<Vec<Record>, sqlx::Error> {
    let rows = match username {
        Some(u) => {
            sqlx::query(&format!(
                "SELECT {RECORD_COLUMNS} FROM records WHERE username = ? ORDER BY timestamp DESC"
            ))
            .bind(u)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {RECORD_COLUMNS} FROM records ORDER BY timestamp DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    rows.iter().map(record_from_row).collect()
}

/// Elimina per id. Idempotente: un id inesistente non è un errore.
pub async fn delete_record(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM records WHERE record_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
