//! Shared harness for dispatcher integration tests.

use std::sync::Arc;

use tasker::chat::adapters::{RecordingGateway, RenderCall};
use tasker::chat::ports::{Markup, MessageRef, OutboundMessage, RenderGateway};
use tasker::chat::{ConversationContext, Dispatcher, InboundEvent};
use tasker::session::{MenuNode, Session};
use tasker::task::adapters::memory::InMemoryTaskRepository;
use tasker::task::domain::{Task, TaskDraft, TaskId};
use tasker::task::ports::TaskRepository;
use tasker::user::adapters::InMemoryUserRepository;
use tasker::user::domain::{AccessDecision, DisplayName, User, UserId};
use mockable::DefaultClock;

/// Identity of the bootstrap admin in every harness.
pub const ADMIN: i64 = 100;

/// A wired dispatcher plus handles on its collaborators.
pub struct Harness<T = InMemoryTaskRepository>
where
    T: TaskRepository + 'static,
{
    pub dispatcher: Arc<Dispatcher<InMemoryUserRepository, T, RecordingGateway, DefaultClock>>,
    pub users: Arc<InMemoryUserRepository>,
    pub tasks: Arc<T>,
    pub gateway: Arc<RecordingGateway>,
    pub admin: User,
}

/// Builds a harness over in-memory task storage with a provisioned admin.
///
/// # Errors
///
/// Returns an error if the admin cannot be provisioned.
pub async fn harness() -> eyre::Result<Harness> {
    harness_with(Arc::new(InMemoryTaskRepository::new())).await
}

/// Builds a harness over the given task repository.
///
/// # Errors
///
/// Returns an error if the admin cannot be provisioned.
pub async fn harness_with<T>(tasks: Arc<T>) -> eyre::Result<Harness<T>>
where
    T: TaskRepository + 'static,
{
    let users = Arc::new(InMemoryUserRepository::new());
    let gateway = Arc::new(RecordingGateway::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&users),
        Arc::clone(&tasks),
        Arc::clone(&gateway),
        Arc::new(DefaultClock),
    ));
    let admin = dispatcher
        .access()
        .provision_admin(UserId::new(ADMIN)?, DisplayName::new("Root", "Admin"))
        .await?;
    Ok(Harness {
        dispatcher,
        users,
        tasks,
        gateway,
        admin,
    })
}

impl<T> Harness<T>
where
    T: TaskRepository + 'static,
{
    /// Registers and approves a member.
    ///
    /// # Errors
    ///
    /// Returns an error if registration or approval fails.
    pub async fn member(&self, id: i64, first_name: &str) -> eyre::Result<UserId> {
        let identity = UserId::new(id)?;
        self.requested(id, first_name).await?;
        self.dispatcher
            .access()
            .decide_request(&self.admin, identity, AccessDecision::Accept)
            .await?;
        Ok(identity)
    }

    /// Registers a member whose request is still pending.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn requested(&self, id: i64, first_name: &str) -> eyre::Result<UserId> {
        let identity = UserId::new(id)?;
        self.dispatcher
            .access()
            .request_access(identity, DisplayName::new(first_name, "Tester"))
            .await?;
        Ok(identity)
    }

    /// Sends a text message as `identity`.
    pub async fn text(&self, identity: UserId, text: &str) {
        self.dispatcher
            .handle(InboundEvent::text(identity, text))
            .await;
    }

    /// Sends a sequence of text messages as `identity`.
    pub async fn texts(&self, identity: UserId, texts: &[&str]) {
        for text in texts {
            self.text(identity, text).await;
        }
    }

    /// Sends a command as `identity`.
    pub async fn command(&self, identity: UserId, line: &str) {
        self.dispatcher
            .handle(InboundEvent::command(identity, line))
            .await;
    }

    /// Presses an inline button as `identity`, optionally on a message.
    pub async fn press(&self, identity: UserId, data: &str, message: Option<MessageRef>) {
        let context = ConversationContext {
            chat_id: identity.value(),
            message_id: message.map(|target| target.message_id),
        };
        self.dispatcher
            .handle(InboundEvent::callback(identity, data).with_context(context))
            .await;
    }

    /// Returns a copy of the session of `identity`.
    pub async fn session(&self, identity: UserId) -> Session {
        let session = self.dispatcher.sessions().get_or_create(identity).await;
        let guard = session.lock().await;
        guard.clone()
    }

    /// Returns the menu node of `identity`.
    pub async fn node(&self, identity: UserId) -> MenuNode {
        self.session(identity).await.node()
    }

    /// Returns every text shown to `identity`, in order.
    #[must_use]
    pub fn texts_for(&self, identity: UserId) -> Vec<String> {
        self.gateway.texts_for(identity.value())
    }

    /// Returns the last message shown to `identity`.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was shown.
    pub fn last(&self, identity: UserId) -> eyre::Result<OutboundMessage> {
        self.gateway
            .last_for(identity.value())
            .ok_or_else(|| eyre::eyre!("no message for {identity}"))
    }

    /// Returns the address of the last message sent to `identity`.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing was sent.
    pub fn last_ref(&self, identity: UserId) -> eyre::Result<MessageRef> {
        self.gateway
            .calls_for(identity.value())
            .iter()
            .rev()
            .find_map(|call| match call {
                RenderCall::Sent(target, _) => Some(*target),
                RenderCall::Edited(..) | RenderCall::Deleted(_) => None,
            })
            .ok_or_else(|| eyre::eyre!("no message sent to {identity}"))
    }

    /// Returns `true` when any text shown to `identity` contains `needle`.
    #[must_use]
    pub fn saw(&self, identity: UserId, needle: &str) -> bool {
        self.texts_for(identity)
            .iter()
            .any(|text| text.contains(needle))
    }

    /// Creates a task directly through the workflow service.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails.
    pub async fn task(&self, owner: UserId, assignee: UserId, title: &str) -> eyre::Result<Task> {
        let draft = TaskDraft::new(owner, assignee, title, "details")?;
        Ok(self.dispatcher.tasks().create(draft).await?)
    }

    /// Sends a message directly so it can later be edited by a callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the message.
    pub async fn seed_message(&self, identity: UserId) -> eyre::Result<MessageRef> {
        Ok(self
            .gateway
            .send_message(identity.value(), OutboundMessage::text("seed"))
            .await?)
    }
}

impl Harness {
    /// Loads a task from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is missing.
    pub async fn stored(&self, id: TaskId) -> eyre::Result<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| eyre::eyre!("task {id} missing"))
    }
}

/// Returns the reply-keyboard labels of a message.
#[must_use]
pub fn keyboard_labels(message: &OutboundMessage) -> Vec<String> {
    match &message.markup {
        Markup::Menu(rows) => rows.iter().flatten().cloned().collect(),
        Markup::None | Markup::Actions(_) => Vec::new(),
    }
}

/// Returns the inline action labels of a message.
#[must_use]
pub fn action_labels(message: &OutboundMessage) -> Vec<String> {
    match &message.markup {
        Markup::Actions(actions) => actions.iter().map(|action| action.label.clone()).collect(),
        Markup::None | Markup::Menu(_) => Vec::new(),
    }
}

/// Returns the inline callback data of a message.
#[must_use]
pub fn action_data(message: &OutboundMessage) -> Vec<String> {
    match &message.markup {
        Markup::Actions(actions) => actions.iter().map(|action| action.data.clone()).collect(),
        Markup::None | Markup::Menu(_) => Vec::new(),
    }
}
