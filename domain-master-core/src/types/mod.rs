//! 类型定义模块

mod domain;
mod query;
mod refresh;

pub use domain::{
    Domain, DomainStatus, DomainUpdate, EXPIRING_SOON_DAYS, ExpiryState, UNKNOWN_REGISTRAR,
};
pub use query::{DomainQuery, DomainStats, SortDirection, SortField, compare_domains};
pub use refresh::{ImportResult, RefreshProgress, RefreshSummary};

// Re-export RDAP 库的公共类型
pub use domain_master_rdap::{LookupOutcome, RdapRecord, RdapSummary, UpdateStatus};
