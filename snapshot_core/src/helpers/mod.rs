pub mod amount;
pub mod dto;
pub mod serde_utils;
pub mod utils;
