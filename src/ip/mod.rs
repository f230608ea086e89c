//! IP address space and mapping module.
//!
//! This module owns the private IPv4 address pool for the managed subnet
//! and the mapper that reconciles it with the addresses recorded in the
//! device table.

pub mod space;
pub mod mapper;

// Re-export commonly used types
pub use space::{AddressSpace, AddressSpaceError};
pub use mapper::{MappingError, MappingSummary, NetworkMapper};
