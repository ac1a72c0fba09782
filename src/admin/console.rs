//! Admin console
//!
//! Reads admin commands from stdin while the reflector runs.

use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::admin::handlers::handle_admin_command;
use crate::admin::parser::parse_admin_command;
use crate::registry::ClientRegistry;
use crate::server::PeerSession;

/// Spawns a task answering console commands until stdin closes.
pub fn spawn_console(registry: Arc<ClientRegistry<PeerSession>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let command = parse_admin_command(&line);
                    println!("{}", handle_admin_command(&registry, &command, Instant::now()));
                }
                Ok(None) => {
                    info!("Admin console closed");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read admin command: {}", e);
                    break;
                }
            }
        }
    })
}
