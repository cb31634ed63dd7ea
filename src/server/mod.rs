//! Server module for Atelier
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `validation`: Checks applied to the loaded configuration
//! - `init_stores`: SQLite store initialization
//! - `init`: Main server initialization and run loop

pub mod config;
mod init;
mod init_stores;
mod loader;
mod validation;

// Re-export public API
pub use init::run;
pub use init_stores::{init_stores, resolve_data_dir, StoreBundle};
pub use loader::load_config;
