//! Credential store adapters.

pub mod memory;

pub use memory::InMemoryUserRepository;
