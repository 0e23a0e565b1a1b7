//! Resource storage
//!
//! Handles identifier validation, content kinds, and the file-backed store.

pub mod filesystem;
pub mod kind;
pub mod locks;
pub mod operations;
pub mod results;
pub mod validation;

pub use kind::ResourceKind;
pub use operations::ResourceStore;
pub use results::{FetchResult, RemoveResult, WriteResult};
pub use validation::{is_valid_identifier, validate_identifier};
