// Core types and functionality for the file analyzer: sandboxed file store,
// table loading and the dataset operations exposed as tools

pub mod error;
pub mod operations;
pub mod sample;
pub mod storage;
pub mod table;
pub mod types;

pub use error::{DatasetError, DatasetResult, TableError};
pub use storage::FileStore;
pub use table::Table;
pub use types::*;
