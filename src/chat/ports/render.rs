//! Render gateway port: everything the core asks of the chat transport.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Address of a message already delivered to a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    /// Chat holding the message.
    pub chat_id: i64,
    /// Transport-assigned message number.
    pub message_id: i64,
}

/// Inline action attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    /// Text on the button.
    pub label: String,
    /// Callback data sent back when pressed.
    pub data: String,
}

impl ActionButton {
    /// Creates an action button.
    #[must_use]
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Controls attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Markup {
    /// Plain text.
    #[default]
    None,
    /// Reply keyboard, as rows of labels.
    Menu(Vec<Vec<String>>),
    /// Inline actions, in display order.
    Actions(Vec<ActionButton>),
}

/// A message the core wants rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message body.
    pub text: String,
    /// Attached controls.
    pub markup: Markup,
}

impl OutboundMessage {
    /// Creates a plain text message.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::None,
        }
    }

    /// Creates a message carrying a reply keyboard.
    #[must_use]
    pub fn menu(text: impl Into<String>, rows: &[Vec<&str>]) -> Self {
        let owned = rows
            .iter()
            .map(|row| row.iter().map(|label| (*label).to_owned()).collect())
            .collect();
        Self {
            text: text.into(),
            markup: Markup::Menu(owned),
        }
    }

    /// Creates a message carrying inline actions.
    #[must_use]
    pub fn with_actions(text: impl Into<String>, actions: Vec<ActionButton>) -> Self {
        Self {
            text: text.into(),
            markup: Markup::Actions(actions),
        }
    }
}

/// Errors reported by a render gateway.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// A message template failed to render.
    #[error("failed to render template `{template}`: {reason}")]
    Template {
        /// Template name.
        template: &'static str,
        /// Error reported by the template engine.
        reason: String,
    },
    /// The message to edit or delete is unknown to the transport.
    #[error("message {message_id} not found in chat {chat_id}")]
    UnknownMessage {
        /// Chat holding the message.
        chat_id: i64,
        /// Missing message number.
        message_id: i64,
    },
    /// The transport failed.
    #[error("chat transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RenderError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// Outbound side of the chat transport.
#[async_trait]
pub trait RenderGateway: Send + Sync {
    /// Sends a new message to `chat_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Transport`] when delivery fails.
    async fn send_message(
        &self,
        chat_id: i64,
        message: OutboundMessage,
    ) -> RenderResult<MessageRef>;

    /// Replaces the contents of a delivered message.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownMessage`] when the target does not
    /// exist, or [`RenderError::Transport`] when delivery fails.
    async fn edit_message(&self, target: MessageRef, message: OutboundMessage) -> RenderResult<()>;

    /// Deletes a delivered message.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnknownMessage`] when the target does not
    /// exist, or [`RenderError::Transport`] when delivery fails.
    async fn delete_message(&self, target: MessageRef) -> RenderResult<()>;

    /// Sends a message with inline actions.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Transport`] when delivery fails.
    async fn send_message_with_actions(
        &self,
        chat_id: i64,
        text: String,
        actions: Vec<ActionButton>,
    ) -> RenderResult<MessageRef> {
        self.send_message(chat_id, OutboundMessage::with_actions(text, actions))
            .await
    }
}
