use anyhow::Context;
use bilancia_core::User;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;

/// Snapshot JSON di un account scritto nel file specchio alla creazione.
/// Porta anche la password in chiaro: comportamento ereditato, vedi DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorFile {
    pub name: String,
    pub username: String,
    pub password: String,
    pub rfid: String,
    pub created_at: String,
}

impl MirrorFile {
    fn snapshot_of(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            password: user.password.clone(),
            rfid: user.rfid.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Copia secondaria degli account: un file JSON per username sotto la
/// directory di storage. Le scritture sullo stesso username sono serializzate
/// da un mutex per file; username diversi procedono in parallelo.
pub struct MirrorStore {
    dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MirrorStore {
    /// Valida/crea la directory una sola volta, all'avvio del processo.
    pub fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("create storage dir {:?}", dir))?;
        Ok(Self {
            dir,
            locks: DashMap::new(),
        })
    }

    /// Percorso del file specchio per uno username.
    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}.json"))
    }

    fn lock_for(&self, username: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(username.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Scrive lo snapshot completo dell'account appena creato. Deve completare
    /// prima che la creazione sia considerata riuscita: un fallimento qui viene
    /// segnalato dal chiamante come successo parziale.
    pub async fn write_snapshot(&self, user: &User) -> anyhow::Result<()> {
        let lock = self.lock_for(&user.username);
        let _guard = lock.lock().await;
        self.write_file(&user.username, &MirrorFile::snapshot_of(user))
            .await
    }

    /// Riallinea il file specchio dopo un aggiornamento: rilegge il contenuto
    /// corrente, sostituisce solo password e rfid e riscrive. Se il file manca
    /// viene ricreato da zero dai valori appena scritti sul DB.
    pub async fn patch_credentials(&self, user: &User) -> anyhow::Result<()> {
        let lock = self.lock_for(&user.username);
        let _guard = lock.lock().await;

        let path = self.path_for(&user.username);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                // patch su Value generico: gli eventuali campi extra nel file
                // vengono preservati, non solo quelli dello snapshot
                let mut current: Value = serde_json::from_str(&text)
                    .with_context(|| format!("parse mirror file {:?}", path))?;
                current["password"] = Value::String(user.password.clone());
                current["rfid"] = Value::String(user.rfid.clone());
                self.write_file(&user.username, &current).await
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.write_file(&user.username, &MirrorFile::snapshot_of(user))
                    .await
            }
            Err(e) => Err(e).with_context(|| format!("read mirror file {:?}", path)),
        }
    }

    async fn write_file<T: Serialize>(&self, username: &str, value: &T) -> anyhow::Result<()> {
        let path = self.path_for(username);
        let json =
            serde_json::to_string_pretty(value).context("serialize mirror snapshot")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("write mirror file {:?}", path))?;
        Ok(())
    }
}
