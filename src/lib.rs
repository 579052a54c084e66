//! Tasker: a chat-driven task tracker.
//!
//! Users register through the chat, admins approve or ban them, and
//! approved users hand tasks to each other and move them through a fixed
//! lifecycle with comments and an audit history.
//!
//! # Architecture
//!
//! Tasker follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, `PostgreSQL`,
//!   console)
//!
//! # Modules
//!
//! - [`user`]: Registration, moderation, and identity resolution
//! - [`task`]: Task lifecycle and the workflow rule table
//! - [`session`]: Per-identity menu position, wizard, and sliders
//! - [`chat`]: Inbound events, rendering, and the update dispatcher
//! - [`config`]: Bootstrap configuration
//! - [`storage`]: `PostgreSQL` pool and schema bootstrap

pub mod chat;
pub mod config;
pub mod session;
pub mod storage;
pub mod task;
pub mod user;
