pub mod admin;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod utils;

pub use crate::config::ReflectorConfig;
pub use registry::{AddOutcome, ClientKey, ClientRecord, ClientRegistry};
pub use server::Reflector;
