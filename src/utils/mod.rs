//! Shared utilities: CIDR helpers and column layout.

pub mod columns;
pub mod ip_utils;

pub use columns::adaptive_columnize;
pub use ip_utils::{is_private_ipv4, is_private_net, parse_ipv4_net};
