//! quizdeck-store — file-backed quiz document storage.
//!
//! Implements the core `QuizStore` trait over a flat directory of JSON
//! documents, the way the quizzes are authored and published. Also provides
//! an in-memory store for tests and the TOML configuration the CLI loads.

pub mod config;
pub mod fs;
pub mod memory;

pub use config::{load_config, load_config_from, StoreConfig};
pub use fs::{file_name_for, FsStore};
pub use memory::MemoryStore;
