use anyhow::Result;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

use bilancia_core::User;
use bilancia_server::mirror::MirrorStore;

fn sample_user() -> User {
    User {
        name: "Bob Rossi".to_string(),
        username: "bob".to_string(),
        password: "pw1".to_string(),
        rfid: "TAG1".to_string(),
        role: "user".to_string(),
        created_at: "2025-11-02T10:10:10Z".to_string(),
    }
}

/*
    Obiettivo test: lo snapshot alla creazione scrive un file JSON indentato
    con i cinque campi previsti, leggibile e ricaricabile.
*/
#[tokio::test]
async fn snapshot_written_at_creation() -> Result<()> {
    let td = TempDir::new()?;
    let mirror = MirrorStore::open(td.path().join("ids"))?;
    let user = sample_user();

    mirror.write_snapshot(&user).await?;

    let path = mirror.path_for("bob");
    assert!(path.exists());
    let text = fs::read_to_string(&path)?;
    assert!(text.contains('\n'), "mirror file should be human-readable (indented)");

    let v: Value = serde_json::from_str(&text)?;
    assert_eq!(v["name"], user.name);
    assert_eq!(v["username"], user.username);
    assert_eq!(v["password"], user.password);
    assert_eq!(v["rfid"], user.rfid);
    assert_eq!(v["createdAt"], user.created_at);
    Ok(())
}

/*
    Obiettivo test: la patch sostituisce solo password e rfid e preserva tutto
    il resto del file, compresi eventuali campi extra non previsti dallo snapshot.
*/
#[tokio::test]
async fn patch_replaces_only_credentials() -> Result<()> {
    let td = TempDir::new()?;
    let mirror = MirrorStore::open(td.path().join("ids"))?;
    let user = sample_user();
    mirror.write_snapshot(&user).await?;

    // aggiungi a mano un campo extra: la patch non deve perderlo
    let path = mirror.path_for("bob");
    let mut v: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    v["nota"] = Value::String("campo aggiunto a mano".to_string());
    fs::write(&path, serde_json::to_string_pretty(&v)?)?;

    let mut updated = user.clone();
    updated.password = "pw2".to_string();
    updated.rfid = "TAG2".to_string();
    mirror.patch_credentials(&updated).await?;

    let v: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(v["password"], "pw2");
    assert_eq!(v["rfid"], "TAG2");
    assert_eq!(v["name"], user.name);
    assert_eq!(v["createdAt"], user.created_at);
    assert_eq!(v["nota"], "campo aggiunto a mano");
    Ok(())
}

/*
    Obiettivo test: se il file specchio manca, la patch lo ricrea da zero con
    lo snapshot completo dei valori appena scritti sul DB.
*/
#[tokio::test]
async fn patch_recreates_missing_file() -> Result<()> {
    let td = TempDir::new()?;
    let mirror = MirrorStore::open(td.path().join("ids"))?;

    let mut user = sample_user();
    user.password = "pw2".to_string();
    user.rfid = "TAG2".to_string();

    let path = mirror.path_for("bob");
    assert!(!path.exists());

    mirror.patch_credentials(&user).await?;

    let v: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(v["name"], user.name);
    assert_eq!(v["username"], "bob");
    assert_eq!(v["password"], "pw2");
    assert_eq!(v["rfid"], "TAG2");
    assert_eq!(v["createdAt"], user.created_at);
    Ok(())
}

/*
    Obiettivo test: open crea le directory annidate mancanti ed è idempotente.
*/
#[tokio::test]
async fn open_creates_nested_dirs_idempotently() -> Result<()> {
    let td = TempDir::new()?;
    let nested = td.path().join("a").join("b").join("ids");
    assert!(!nested.exists());

    let first = MirrorStore::open(&nested)?;
    assert!(nested.exists(), "storage dir should have been created");
    first.write_snapshot(&sample_user()).await?;

    // riaprire la stessa directory non deve fallire né toccare i file esistenti
    let second = MirrorStore::open(&nested)?;
    assert!(second.path_for("bob").exists());
    Ok(())
}

/*
    Obiettivo test: scritture concorrenti sullo stesso username sono
    serializzate dal lock per file: alla fine il file è sempre JSON valido.
*/
#[tokio::test]
async fn concurrent_patches_leave_valid_json() -> Result<()> {
    let td = TempDir::new()?;
    let mirror = std::sync::Arc::new(MirrorStore::open(td.path().join("ids"))?);
    mirror.write_snapshot(&sample_user()).await?;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let mirror = mirror.clone();
        tasks.push(tokio::spawn(async move {
            let mut user = sample_user();
            user.password = format!("pw{i}");
            user.rfid = format!("TAG{i}");
            mirror.patch_credentials(&user).await
        }));
    }
    for task in tasks {
        task.await.expect("task should not panic")?;
    }

    let v: Value = serde_json::from_str(&fs::read_to_string(mirror.path_for("bob"))?)?;
    // ultimo scrittore vince, ma il file deve restare uno snapshot coerente
    assert!(v["password"].as_str().unwrap().starts_with("pw"));
    assert!(v["rfid"].as_str().unwrap().starts_with("TAG"));
    assert_eq!(v["name"], "Bob Rossi");
    Ok(())
}
