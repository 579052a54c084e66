//! Port definitions for the chat transport.

pub mod render;

pub use render::{
    ActionButton, Markup, MessageRef, OutboundMessage, RenderError, RenderGateway, RenderResult,
};
