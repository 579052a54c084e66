//! Render gateway that records every call, for tests and dry runs.

use crate::chat::ports::{
    MessageRef, OutboundMessage, RenderError, RenderGateway, RenderResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One call received by [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    /// A new message.
    Sent(MessageRef, OutboundMessage),
    /// An in-place edit.
    Edited(MessageRef, OutboundMessage),
    /// A deletion.
    Deleted(MessageRef),
}

impl RenderCall {
    /// Returns the message addressed by the call.
    #[must_use]
    pub const fn target(&self) -> MessageRef {
        match self {
            Self::Sent(target, _) | Self::Edited(target, _) | Self::Deleted(target) => *target,
        }
    }

    /// Returns the rendered message, if the call carried one.
    #[must_use]
    pub const fn message(&self) -> Option<&OutboundMessage> {
        match self {
            Self::Sent(_, message) | Self::Edited(_, message) => Some(message),
            Self::Deleted(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct RecordingState {
    next_message_id: i64,
    live: HashMap<MessageRef, OutboundMessage>,
    calls: Vec<RenderCall>,
}

/// Thread-safe gateway keeping an ordered log of render calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingGateway {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    /// Returns the calls addressed to one chat, in order.
    #[must_use]
    pub fn calls_for(&self, chat_id: i64) -> Vec<RenderCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.target().chat_id == chat_id)
            .collect()
    }

    /// Returns the texts sent or edited in one chat, in order.
    #[must_use]
    pub fn texts_for(&self, chat_id: i64) -> Vec<String> {
        self.calls_for(chat_id)
            .iter()
            .filter_map(RenderCall::message)
            .map(|message| message.text.clone())
            .collect()
    }

    /// Returns the current contents of a delivered message.
    #[must_use]
    pub fn message(&self, target: MessageRef) -> Option<OutboundMessage> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.live.get(&target).cloned())
    }

    /// Returns the most recent message sent or edited in one chat.
    #[must_use]
    pub fn last_for(&self, chat_id: i64) -> Option<OutboundMessage> {
        self.calls_for(chat_id)
            .iter()
            .rev()
            .find_map(RenderCall::message)
            .cloned()
    }

    /// Forgets every recorded call, keeping delivered messages.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RecordingState) -> RenderResult<T>) -> RenderResult<T> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| RenderError::transport(std::io::Error::other(err.to_string())))?;
        f(&mut state)
    }
}

fn unknown(target: MessageRef) -> RenderError {
    RenderError::UnknownMessage {
        chat_id: target.chat_id,
        message_id: target.message_id,
    }
}

#[async_trait]
impl RenderGateway for RecordingGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        message: OutboundMessage,
    ) -> RenderResult<MessageRef> {
        self.with_state(|state| {
            state.next_message_id += 1;
            let target = MessageRef {
                chat_id,
                message_id: state.next_message_id,
            };
            state.live.insert(target, message.clone());
            state.calls.push(RenderCall::Sent(target, message));
            Ok(target)
        })
    }

    async fn edit_message(&self, target: MessageRef, message: OutboundMessage) -> RenderResult<()> {
        self.with_state(|state| {
            let slot = state.live.get_mut(&target).ok_or_else(|| unknown(target))?;
            *slot = message.clone();
            state.calls.push(RenderCall::Edited(target, message));
            Ok(())
        })
    }

    async fn delete_message(&self, target: MessageRef) -> RenderResult<()> {
        self.with_state(|state| {
            state.live.remove(&target).ok_or_else(|| unknown(target))?;
            state.calls.push(RenderCall::Deleted(target));
            Ok(())
        })
    }
}
