pub mod commands;
pub mod driver;
pub mod parser;
pub mod runner;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export common items
pub use driver::ios::UsbmuxBackend;
pub use runner::{Menu, Workflow};
pub use utils::config::Config;
