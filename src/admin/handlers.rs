use log::info;
use std::fmt::Write;
use std::time::Instant;

use crate::admin::parser::AdminCommand;
use crate::registry::{ClientKey, ClientRegistry};
use crate::server::PeerSession;

const HELP: &str = "commands: list | count | kick <address> <port> | help";

// Handle a single admin command and return the text to show
pub fn handle_admin_command(
    registry: &ClientRegistry<PeerSession>,
    command: &AdminCommand,
    now: Instant,
) -> String {
    match command {
        AdminCommand::List => handle_cmd_list(registry, now),
        AdminCommand::Count => format!("{} clients linked", registry.len()),
        AdminCommand::Kick { address, port } => handle_cmd_kick(registry, address, *port),
        AdminCommand::Help => HELP.to_string(),
        AdminCommand::Invalid(reason) => reason.clone(),
        AdminCommand::Unknown(raw) => format!("unknown command {:?}; {}", raw, HELP),
    }
}

fn handle_cmd_list(registry: &ClientRegistry<PeerSession>, now: Instant) -> String {
    let mut clients = registry.list();
    if clients.is_empty() {
        return "no clients linked".to_string();
    }
    clients.sort_by(|a, b| a.label().cmp(b.label()).then_with(|| a.key().cmp(b.key())));

    let mut out = format!("{:<10} {:<24} {:>5}", "CALLSIGN", "ADDRESS", "IDLE");
    for client in &clients {
        let _ = write!(
            out,
            "\n{:<10} {:<24} {:>4}s",
            client.label(),
            client.key().to_string(),
            client.extra().idle_for(now).as_secs()
        );
    }
    out
}

fn handle_cmd_kick(registry: &ClientRegistry<PeerSession>, address: &str, port: u16) -> String {
    let key = match ClientKey::new(address, port) {
        Ok(key) => key,
        Err(e) => return e.to_string(),
    };

    match registry.remove_key(&key) {
        Some(removed) => {
            info!("Removing {} ({}) by admin request", removed.label(), removed.key());
            format!("kicked {} ({})", removed.label(), removed.key())
        }
        None => format!("no client at {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClientRecord;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    fn registry_with(callsigns: &[&str], now: Instant) -> ClientRegistry<PeerSession> {
        let registry = ClientRegistry::new();
        for (i, callsign) in callsigns.iter().enumerate() {
            let peer: SocketAddr = format!("10.1.0.{}:{}", i + 1, 42000 + i).parse().unwrap();
            let key = ClientKey::try_from(peer).unwrap();
            registry.add(Arc::new(ClientRecord::new(
                key,
                *callsign,
                PeerSession::new(peer, now),
            )));
        }
        registry
    }

    #[test]
    fn test_list_sorted_by_callsign() {
        let now = Instant::now();
        let registry = registry_with(&["M0ZZZ", "G4KLX"], now);
        let out = handle_admin_command(
            &registry,
            &AdminCommand::List,
            now + Duration::from_secs(12),
        );

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("CALLSIGN"));
        assert!(lines[1].starts_with("G4KLX"));
        assert!(lines[1].contains("10.1.0.2:42001"));
        assert!(lines[1].ends_with("12s"));
        assert!(lines[2].starts_with("M0ZZZ"));
    }

    #[test]
    fn test_list_empty() {
        let registry = registry_with(&[], Instant::now());
        assert_eq!(
            handle_admin_command(&registry, &AdminCommand::List, Instant::now()),
            "no clients linked"
        );
    }

    #[test]
    fn test_count() {
        let registry = registry_with(&["A", "B", "C"], Instant::now());
        assert_eq!(
            handle_admin_command(&registry, &AdminCommand::Count, Instant::now()),
            "3 clients linked"
        );
    }

    #[test]
    fn test_kick() {
        let now = Instant::now();
        let registry = registry_with(&["G4KLX", "M0ZZZ"], now);
        let kick = AdminCommand::Kick {
            address: "10.1.0.1".to_string(),
            port: 42000,
        };

        assert_eq!(
            handle_admin_command(&registry, &kick, now),
            "kicked G4KLX (10.1.0.1:42000)"
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            handle_admin_command(&registry, &kick, now),
            "no client at 10.1.0.1:42000"
        );
        registry.verify().unwrap();
    }

    #[test]
    fn test_kick_invalid_identity() {
        let registry = registry_with(&["G4KLX"], Instant::now());
        let kick = AdminCommand::Kick {
            address: "10.1.0.1".to_string(),
            port: 0,
        };
        let out = handle_admin_command(&registry, &kick, Instant::now());
        assert!(out.starts_with("Invalid client identity"));
        assert_eq!(registry.len(), 1);
    }
}
