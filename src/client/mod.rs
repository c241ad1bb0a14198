pub mod error;
pub mod repository;
pub mod rest;

#[cfg(test)]
pub(crate) mod testing;

pub use error::*;
pub use repository::*;
pub use rest::*;
