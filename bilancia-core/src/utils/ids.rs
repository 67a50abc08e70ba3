use uuid::Uuid;

/// Genera un nuovo recordId unico (UUIDv4) come stringa.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
