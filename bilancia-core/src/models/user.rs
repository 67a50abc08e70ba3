use serde::{Deserialize, Serialize};

/// Utente esposto sul wire e persistito dal server.
/// `username` è la chiave unica: immutabile, usata anche come nome del file specchio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub username: String,
    /// Credenziale opaca, confrontata per uguaglianza esatta (niente hashing, vedi DESIGN.md).
    pub password: String,
    /// Token RFID assegnato dall'amministratore; stringa vuota = nessun token.
    pub rfid: String,
    /// "admin" oppure "user".
    pub role: String,
    pub created_at: String, // RFC3339 UTC
}
