//! bilancia-core: tipi condivisi tra client e server (modelli, DTO HTTP, errori).
//! Niente I/O o dipendenze non compatibili con WASM.

pub mod error;
pub mod models;
pub mod protocol;
pub mod utils;

// Re-export utili per ridurre i percorsi nel crate server
pub use error::ErrorBody;
pub use models::{record::Record, user::User};
pub use protocol::http::{
    CreateRecordRequest, CreateUserRequest, DeleteResponse, LoginRequest, LoginResponse,
    LoginUser, UpdateUserRequest, UserResponse,
};
pub use utils::{new_record_id, now_timestamp};
