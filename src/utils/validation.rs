//! Input validation utilities
//!
//! Provides validation for peer identities before they reach the registry.

/// Longest address accepted, matching the DNS name limit.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Validate that a peer address is non-empty and free of whitespace or control characters
pub fn is_valid_address(address: &str) -> bool {
    !address.is_empty()
        && address.len() <= MAX_ADDRESS_LENGTH
        && !address
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
}

/// Validate a UDP source port
pub fn is_valid_port(port: u16) -> bool {
    port != 0
}
