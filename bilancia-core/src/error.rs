use serde::{Deserialize, Serialize};

/// Corpo JSON condiviso per tutte le risposte d'errore.
/// Ogni fallimento porta almeno `message`; i dinieghi di sicurezza
/// (credenziali o RFID) portano anche `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    pub message: String,
}
