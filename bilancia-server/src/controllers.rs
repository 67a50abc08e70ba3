use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Html,
    Json,
};
use bilancia_core::{
    CreateRecordRequest, CreateUserRequest, DeleteResponse, LoginRequest, LoginResponse,
    LoginUser, Record, UpdateUserRequest, User, UserResponse,
};
use std::sync::Arc;

use crate::access::{self, AccessDecision};
use crate::error::ApiError;
use crate::store;
use crate::AppState;

/// Handler per GET /
pub async fn root() -> Html<&'static str> {
    Html("<h1>Bilancia API Server</h1>")
}

/// Handler per POST /api/login
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // SCORCIATOIA CABLATA admin/admin: valutata prima di qualsiasi query,
    // restituisce un amministratore sintetico che non esiste sul DB.
    // Ramo esplicito e isolato apposta, facile da individuare e rimuovere.
    if req.username == "admin" && req.password == "admin" {
        return Ok(Json(LoginResponse {
            success: true,
            user: LoginUser {
                name: "System Admin".to_string(),
                username: "admin".to_string(),
                role: "admin".to_string(),
                rfid: "MASTER".to_string(),
            },
        }));
    }

    match store::authenticate(&state.pool, &req.username, &req.password).await? {
        Some(user) => Ok(Json(LoginResponse {
            success: true,
            user: LoginUser {
                name: user.name,
                username: user.username,
                role: user.role,
                rfid: user.rfid,
            },
        })),
        None => Err(ApiError::InvalidCredentials),
    }
}

/// Handler per GET /api/users
pub async fn list_users(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(store::list_users(&state.pool).await?))
}

/// Handler per POST /api/users
pub async fn create_user(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    // convalida prima di qualsiasi I/O
    if req.name.is_empty() || req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "name, username and password are required".to_string(),
        ));
    }

    let user =
        store::create_user(&state.pool, req.name, req.username, req.password, req.rfid).await?;

    // Seconda fase della doppia persistenza: lo snapshot specchio. Un
    // fallimento qui non annulla la scrittura primaria: la risposta resta
    // 201 ma segnala il successo parziale nel campo `warning`.
    let warning = match state.mirror.write_snapshot(&user).await {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(
                username = %user.username,
                error = %e,
                "scrittura del file specchio fallita dopo il salvataggio primario"
            );
            Some(format!("user saved but mirror file write failed: {e}"))
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            user,
            warning,
        }),
    ))
}

/// Handler per PUT /api/users/:username
pub async fn update_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(username): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = store::update_user(&state.pool, &username, &req.password, &req.rfid).await?;

    // riallinea il file specchio ai valori appena scritti
    let warning = match state.mirror.patch_credentials(&user).await {
        Ok(()) => None,
        Err(e) => {
            tracing::error!(
                username = %user.username,
                error = %e,
                "aggiornamento del file specchio fallito dopo l'update primario"
            );
            Some(format!("user updated but mirror file write failed: {e}"))
        }
    };

    Ok(Json(UserResponse {
        success: true,
        user,
        warning,
    }))
}

/// Handler per GET /api/data
pub async fn list_records(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(store::list_records(&state.pool, None).await?))
}

/// Handler per GET /api/data/:username
pub async fn list_records_for(
    Extension(state): Extension<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(store::list_records(&state.pool, Some(&username)).await?))
}

/// Handler per POST /api/data: l'invio viene persistito solo se il controllo
/// di accesso autorizza la coppia (username, rfid) dichiarata.
pub async fn create_record(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    // convalida prima di qualsiasi I/O
    if req.content.is_empty() || req.username.is_empty() {
        return Err(ApiError::Validation(
            "content and username are required".to_string(),
        ));
    }

    match access::authorize(&state.pool, &req.username, &req.rfid).await? {
        AccessDecision::NotFound => Err(ApiError::ProfileNotFound),
        AccessDecision::Denied { .. } => Err(ApiError::RfidMismatch),
        AccessDecision::Ok => {
            let record = store::insert_record(
                &state.pool,
                req.content,
                req.operator,
                req.username,
                req.rfid,
            )
            .await?;
            Ok((StatusCode::CREATED, Json(record)))
        }
    }
}

/// Handler per DELETE /api/data/:id. Idempotente: elimina anche un id
/// inesistente senza errore.
pub async fn delete_record(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    store::delete_record(&state.pool, &id).await?;
    Ok(Json(DeleteResponse {
        message: "Data deleted".to_string(),
    }))
}
