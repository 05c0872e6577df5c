pub mod auth;
pub mod dto;
pub mod handler;
pub mod storage;

pub use auth::GoogleOAuth;
pub use handler::SheetsSnapshotSource;
pub use storage::TokenStorage;
