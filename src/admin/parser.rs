//! Admin command parsing
//!
//! Parses lines typed at the reflector console.

/// Command typed at the admin console
#[derive(Debug, PartialEq)]
pub enum AdminCommand {
    List,
    Count,
    Kick { address: String, port: u16 },
    Help,
    Invalid(String),
    Unknown(String),
}

// Parse raw console line into AdminCommand enum
pub fn parse_admin_command(raw: &str) -> AdminCommand {
    let trimmed = raw.trim();
    let mut parts = trimmed.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "LIST" | "LS" => AdminCommand::List,
        "COUNT" => AdminCommand::Count,
        "HELP" | "?" => AdminCommand::Help,
        "KICK" => parse_kick(&args),
        _ => AdminCommand::Unknown(trimmed.to_string()),
    }
}

fn parse_kick(args: &[&str]) -> AdminCommand {
    let [address, port] = args else {
        return AdminCommand::Invalid("usage: kick <address> <port>".to_string());
    };

    match port.parse::<u16>() {
        Ok(port) => AdminCommand::Kick {
            address: address.to_string(),
            port,
        },
        Err(_) => AdminCommand::Invalid(format!("invalid port: {}", port)),
    }
}
