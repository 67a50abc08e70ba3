use serde::{Deserialize, Serialize};

use crate::models::User;

/*
    DTO per le richieste/risposte HTTP.
    I campi obbligatori di creazione hanno default vuoto: la convalida
    (campo mancante -> 400) avviene nei controller, prima di toccare il DB.
*/

// Login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Vista ridotta dell'utente restituita dal login (senza password).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub name: String,
    pub username: String,
    pub role: String,
    pub rfid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: LoginUser,
}

// Creazione account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Vuoto = nessun token assegnato.
    #[serde(default)]
    pub rfid: String,
}

// Aggiornamento account: solo password e rfid sono mutabili.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub password: String,
    pub rfid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
    /// Presente solo in caso di successo parziale (scrittura specchio fallita).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// Invio registrazione
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default)]
    pub username: String,
    /// Token presentato; vuoto combacia solo con un token memorizzato vuoto.
    #[serde(default)]
    pub rfid: String,
}

fn default_operator() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: String,
}
