pub mod http;

// Re-export comodi
pub use http::{
    CreateRecordRequest, CreateUserRequest, DeleteResponse, LoginRequest, LoginResponse,
    LoginUser, UpdateUserRequest, UserResponse,
};
