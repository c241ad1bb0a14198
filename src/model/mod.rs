pub mod common;
pub mod entity;
pub mod inventory;
pub mod medication;
pub mod query;
pub mod route;

pub use common::*;
pub use entity::*;
pub use inventory::*;
pub use medication::*;
pub use query::*;
pub use route::*;
