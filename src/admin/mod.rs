//! Admin interface
//!
//! Lets an operator inspect linked gateways and force them off the reflector.

pub mod console;
pub mod handlers;
pub mod parser;

pub use console::spawn_console;
pub use handlers::handle_admin_command;
pub use parser::{AdminCommand, parse_admin_command};
