pub mod user;
pub mod record;

// Re-export per comodità
pub use user::User;
pub use record::Record;
