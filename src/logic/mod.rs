pub mod delete;
pub mod form;
pub mod merge;
pub mod navigation;
pub mod relationship;
pub mod resolve;

pub use delete::*;
pub use form::*;
pub use merge::{merge_missing, same_identity};
pub use navigation::*;
pub use relationship::*;
pub use resolve::*;
