pub mod handler;
pub mod holders;
pub mod identity;
pub mod supply;
pub mod verdict;

#[cfg(test)]
pub(crate) mod testing;

pub use handler::{validate_snapshot, ValidationOptions};
