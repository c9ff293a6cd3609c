//! Storage layer abstraction trait definition

mod domain_repository;

pub use domain_repository::DomainRepository;
