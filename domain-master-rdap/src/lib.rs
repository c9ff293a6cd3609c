//! RDAP lookup client for DomainMaster
//!
//! 每个域名发起一次 RDAP 查询，把返回的 JSON 归约为组合所需的注册字段，并归类为 [`LookupOutcome`]。
//! Expected failures (unsupported TLD, unknown domain, transport trouble) are outcomes, not errors;
//! only an unexpected HTTP status surfaces as [`RdapError`].

mod error;
mod http;
mod services;
mod types;

pub use error::{RdapError, RdapResult};
pub use http::truncate_for_log;
pub use services::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_UNSUPPORTED_TLDS, DomainLookup,
    RDAP_MEDIA_TYPE, RdapClient, RdapClientBuilder,
};
pub use types::{
    LookupOutcome, RdapEntitySummary, RdapEvent, RdapRecord, RdapSummary, UpdateStatus,
};
