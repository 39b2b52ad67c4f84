//! Interactive workflow: console, menu state machine and external tool runs

pub mod console;
pub mod menu;
pub mod process;
pub mod state;
pub mod workflow;

pub use console::Console;
pub use menu::Menu;
pub use process::{ProcessRunner, ToolOutput, ToolRunner};
pub use state::*;
pub use workflow::Workflow;
