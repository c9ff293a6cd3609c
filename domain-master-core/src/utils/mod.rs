//! Utility module

pub mod datetime;
pub mod domain_list;

pub use domain_list::parse_domain_list;
