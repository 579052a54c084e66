//! Port contracts for user persistence and identity resolution.

pub mod repository;

pub use repository::{
    Identity, IdentityResolver, UserRepository, UserRepositoryError, UserRepositoryResult,
};
