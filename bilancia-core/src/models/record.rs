use serde::{Deserialize, Serialize};

/// Registrazione di pesatura persistita dal server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: String,
    pub content: String,
    /// Attribuzione libera dell'operatore, "unknown" se non indicata.
    pub operator: String,
    /// Riferimento allo username dell'utente (non è una foreign key).
    pub username: String,
    /// Token presentato al momento dell'invio, conservato a fini di audit.
    pub rfid: String,
    pub timestamp: String, // RFC3339 UTC
}
