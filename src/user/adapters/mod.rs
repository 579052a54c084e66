//! Adapter implementations for user persistence.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
