//! Inbound events delivered by the chat transport.

use crate::task::domain::{TaskAction, TaskId};
use crate::user::domain::{DisplayName, UserId};
use thiserror::Error;

/// Kind of inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Free text or a reply-keyboard button.
    Text,
    /// A `/command` message.
    Command,
    /// An inline-button press carrying callback data.
    CallbackAction,
}

/// Where the event came from, for replies and in-place edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversationContext {
    /// Chat the event belongs to.
    pub chat_id: i64,
    /// Message that carried the event, or the message whose button was
    /// pressed.
    pub message_id: Option<i64>,
}

/// An event for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Sender identity.
    pub identity: UserId,
    /// Sender display name reported by the transport.
    pub sender: DisplayName,
    /// Event kind.
    pub kind: EventKind,
    /// Text, command line, or callback data.
    pub payload: String,
    /// Conversation context.
    pub context: ConversationContext,
}

impl InboundEvent {
    /// Creates a text event.
    #[must_use]
    pub fn text(identity: UserId, payload: impl Into<String>) -> Self {
        Self::new(identity, EventKind::Text, payload)
    }

    /// Creates a command event.
    #[must_use]
    pub fn command(identity: UserId, payload: impl Into<String>) -> Self {
        Self::new(identity, EventKind::Command, payload)
    }

    /// Creates a callback event.
    #[must_use]
    pub fn callback(identity: UserId, payload: impl Into<String>) -> Self {
        Self::new(identity, EventKind::CallbackAction, payload)
    }

    /// Sets the sender display name.
    #[must_use]
    pub fn with_sender(mut self, sender: DisplayName) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the conversation context.
    #[must_use]
    pub const fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = context;
        self
    }

    fn new(identity: UserId, kind: EventKind, payload: impl Into<String>) -> Self {
        Self {
            identity,
            sender: DisplayName::default(),
            kind,
            payload: payload.into(),
            context: ConversationContext {
                chat_id: identity.value(),
                message_id: None,
            },
        }
    }
}

/// A recognised `/command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// `/start`, shows the main menu.
    Start,
    /// `/task <id>`, shows a task card.
    Task(Option<String>),
    /// `/history <id>`, lists a task's history.
    History(Option<String>),
    /// Any other command.
    Unknown(String),
}

impl ChatCommand {
    /// Parses a command line such as `/task 12`.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split_whitespace();
        let name = tokens
            .next()
            .unwrap_or_default()
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let argument = tokens.next().map(str::to_owned);
        match name.as_str() {
            "start" => Self::Start,
            "task" => Self::Task(argument),
            "history" => Self::History(argument),
            _ => Self::Unknown(name),
        }
    }
}

/// Error returned for callback data the dispatcher does not understand.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised callback data: {0}")]
pub struct ParseCallbackError(pub String);

/// Decoded inline-button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    /// `NewUserRequest`: an unknown identity asks for access.
    RequestAccess,
    /// `NewUserCancel`: an unknown identity declines to register.
    CancelRequest,
    /// `NewUserAccept|<id>`: an admin accepts a request.
    AcceptUser(UserId),
    /// `NewUserDecline|<id>`: an admin declines a request.
    DeclineUser(UserId),
    /// `<Action>|<taskId>`: an action on a task card.
    Task(TaskAction, TaskId),
}

impl Callback {
    /// Encodes the callback for an inline button.
    #[must_use]
    pub fn encode(self) -> String {
        match self {
            Self::RequestAccess => "NewUserRequest".to_owned(),
            Self::CancelRequest => "NewUserCancel".to_owned(),
            Self::AcceptUser(id) => format!("NewUserAccept|{id}"),
            Self::DeclineUser(id) => format!("NewUserDecline|{id}"),
            Self::Task(action, id) => format!("{}|{id}", action.label()),
        }
    }
}

impl TryFrom<&str> for Callback {
    type Error = ParseCallbackError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let malformed = || ParseCallbackError(value.to_owned());
        let (head, argument) = value
            .trim()
            .split_once('|')
            .map_or((value.trim(), None), |(head, tail)| (head, Some(tail)));
        match (head, argument) {
            ("NewUserRequest", None) => Ok(Self::RequestAccess),
            ("NewUserCancel", None) => Ok(Self::CancelRequest),
            ("NewUserAccept", Some(raw)) => UserId::try_from(raw)
                .map(Self::AcceptUser)
                .map_err(|_| malformed()),
            ("NewUserDecline", Some(raw)) => UserId::try_from(raw)
                .map(Self::DeclineUser)
                .map_err(|_| malformed()),
            (action, Some(raw)) => {
                let parsed_action = TaskAction::try_from(action).map_err(|_| malformed())?;
                let task_id = TaskId::try_from(raw).map_err(|_| malformed())?;
                Ok(Self::Task(parsed_action, task_id))
            }
            _ => Err(malformed()),
        }
    }
}
