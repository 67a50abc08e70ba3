use sqlx::{Row, SqlitePool};

/*
    Controllo di accesso per l'invio delle registrazioni: una sola lettura
    seguita da un confronto esatto, nessun retry. La finestra tra questa
    lettura e la successiva INSERT della registrazione non è transazionale.
*/

/// Esito della verifica del token presentato contro quello memorizzato.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Token combaciante: l'invio è autorizzato.
    Ok,
    /// Token diverso da quello in archivio: evento rilevante per l'audit,
    /// distinto sia da NotFound sia dagli errori di convalida.
    Denied { expected: String },
    /// Nessun account per lo username dichiarato: nessun profilo di sicurezza.
    NotFound,
}

/// Autorizza un invio confrontando il token presentato con quello assegnato
/// allo username dichiarato. Un token vuoto combacia solo con un token
/// memorizzato vuoto.
pub async fn authorize(
    pool: &SqlitePool,
    username: &str,
    presented: &str,
) -> Result<AccessDecision, sqlx::Error> {
    let row = sqlx::query("SELECT rfid FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    let row = match row {
        Some(r) => r,
        None => return Ok(AccessDecision::NotFound),
    };
    let expected: String = row.try_get("rfid")?;

    if expected != presented {
        // Audit strutturato del diniego. Il token atteso non viene loggato:
        // scriverlo accanto a un tentativo fallito lo rivelerebbe (vedi DESIGN.md).
        tracing::warn!(
            username,
            presented,
            "invio registrazione negato: RFID non corrispondente"
        );
        return Ok(AccessDecision::Denied { expected });
    }

    Ok(AccessDecision::Ok)
}
