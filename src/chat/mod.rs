//! Chat-facing edge of the assistant.
//!
//! Inbound events are modelled in [`event`], outbound rendering goes
//! through the [`ports::RenderGateway`] port, and the [`Dispatcher`] ties
//! both to the session engine and the user and task services.

pub mod adapters;
pub mod dispatcher;
pub mod event;
pub mod ports;
pub mod templates;

pub use dispatcher::{DispatchError, DispatchResult, Dispatcher};
pub use event::{Callback, ChatCommand, ConversationContext, EventKind, InboundEvent};
