//! DomainMaster Core Library
//!
//! Provides the business logic of the domain portfolio tracker:
//! - Domain records and their lifecycle (import, manual edit, deletion)
//! - Portfolio queries (search, status filter, sorting, statistics)
//! - The bulk RDAP refresh pipeline (Refresh Service)
//!
//! Storage is abstracted behind [`DomainRepository`] and lookups behind
//! [`DomainLookup`](domain_master_rdap::DomainLookup), so the same services run against the JSON
//! file store, in-memory stores, or mocks.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::DomainRepository;
