//! Tasks, their lifecycle, and the workflow rule table.
//!
//! Tasks are created by the new-task wizard and afterwards change only
//! through actions the rule table grants to the viewer's relationship with
//! the task. Every status and comment change leaves a history entry. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
