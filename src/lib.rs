// lib.rs - Main library file that exports all modules
pub mod api_client;
pub mod config;
pub mod console;
pub mod controller;
pub mod session;
pub mod youtube;

// Re-export commonly used types for convenience
pub use api_client::*;
pub use config::*;
pub use console::*;
pub use controller::*;
pub use session::*;
pub use youtube::*;
