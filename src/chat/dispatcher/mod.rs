//! Update dispatcher: routes inbound events to the session engine.
//!
//! Every event runs in its own tokio task. The per-identity session mutex
//! is held for the whole event, so two events of one identity never
//! interleave while events of different identities proceed in parallel.
//!
//! Handlers apply a menu transition only after their persistence calls
//! succeed; a failure leaves the session where it was and is reported to
//! the user as a notice.

mod error;
mod menus;
mod moderation;
mod registration;
mod tasks;
mod wizard;

pub use error::{DispatchError, DispatchResult};

use super::event::{Callback, ConversationContext, EventKind, InboundEvent};
use super::ports::{MessageRef, OutboundMessage, RenderGateway};
use crate::session::{MenuNode, Session, SessionStore, menu::keyboard};
use crate::task::ports::TaskRepository;
use crate::task::services::TaskWorkflowService;
use crate::user::domain::{AccessDecision, User, UserId, UserStatus};
use crate::user::ports::{IdentityResolver, UserRepository};
use crate::user::services::{AccessService, AccessServiceError};
use error::During;
use mockable::Clock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

const WAIT_FOR_APPROVAL: &str = "Keep calm and wait for approval message!";
const DECLINED: &str = "I'm so sorry but your request was declined.\nAsk admins to restore your account";

/// Routes inbound events to navigator, wizard, and workflow handlers.
pub struct Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    users: Arc<U>,
    access: AccessService<U, C>,
    tasks: TaskWorkflowService<T, C>,
    sessions: SessionStore<U>,
    gateway: Arc<G>,
}

impl<U, T, G, C> Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Wires a dispatcher over the given repositories and gateway.
    #[must_use]
    pub fn new(users: Arc<U>, tasks: Arc<T>, gateway: Arc<G>, clock: Arc<C>) -> Self {
        Self {
            access: AccessService::new(Arc::clone(&users), Arc::clone(&clock)),
            tasks: TaskWorkflowService::new(tasks, clock),
            sessions: SessionStore::new(Arc::clone(&users)),
            users,
            gateway,
        }
    }

    /// Returns the access service used by the handlers.
    #[must_use]
    pub const fn access(&self) -> &AccessService<U, C> {
        &self.access
    }

    /// Returns the task workflow service used by the handlers.
    #[must_use]
    pub const fn tasks(&self) -> &TaskWorkflowService<T, C> {
        &self.tasks
    }

    /// Returns the session registry.
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore<U> {
        &self.sessions
    }

    /// Spawns a unit of work for `event`.
    pub fn dispatch(self: &Arc<Self>, event: InboundEvent) -> JoinHandle<()> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.handle(event).await })
    }

    /// Handles one event to completion under the identity's session lock.
    ///
    /// Failures are logged and turned into a notice for the sender; they
    /// never escape this call.
    pub async fn handle(&self, event: InboundEvent) {
        let session = self.sessions.get_or_create(event.identity).await;
        let mut guard = session.lock().await;
        if let Err(err) = self.process(&mut guard, &event).await {
            warn!(
                identity = %event.identity,
                node = %guard.node(),
                error = %err,
                "event handling failed"
            );
            let notice = OutboundMessage::text(err.notice());
            if let Err(render_err) = self
                .gateway
                .send_message(event.context.chat_id, notice)
                .await
            {
                error!(identity = %event.identity, error = %render_err, "failure notice not delivered");
            }
        }
    }

    async fn process(&self, session: &mut Session, event: &InboundEvent) -> DispatchResult<()> {
        let identity = self
            .users
            .resolve(event.identity)
            .await
            .map_err(AccessServiceError::from)
            .during("checking your account")?;
        session.set_user(identity.into_user());

        let callback = match event.kind {
            EventKind::CallbackAction => Some(Callback::try_from(event.payload.as_str())),
            EventKind::Text | EventKind::Command => None,
        };
        let chat_id = event.context.chat_id;
        match (callback, session.user().map(User::status)) {
            (Some(Ok(Callback::RequestAccess)), _) => self.request_access(session, event).await,
            (Some(Ok(Callback::CancelRequest)), _) => self.cancel_request(event).await,
            (_, None) => self.greet(event).await,
            (_, Some(UserStatus::Requested)) => self.send_text(chat_id, WAIT_FOR_APPROVAL).await,
            (_, Some(UserStatus::Banned)) => self.send_text(chat_id, DECLINED).await,
            (Some(Ok(parsed)), Some(UserStatus::Approved)) => {
                self.callback(session, event, parsed).await
            }
            (Some(Err(err)), Some(UserStatus::Approved)) => {
                debug!(identity = %event.identity, error = %err, "callback ignored");
                self.send_text(chat_id, err.to_string()).await
            }
            (None, Some(UserStatus::Approved)) => match event.kind {
                EventKind::Command => self.command(session, event).await,
                EventKind::Text | EventKind::CallbackAction => self.navigate(session, event).await,
            },
        }
    }

    async fn callback(
        &self,
        session: &mut Session,
        event: &InboundEvent,
        callback: Callback,
    ) -> DispatchResult<()> {
        match callback {
            Callback::RequestAccess => self.request_access(session, event).await,
            Callback::CancelRequest => self.cancel_request(event).await,
            Callback::AcceptUser(target) => {
                self.decide(session, event, target, AccessDecision::Accept)
                    .await
            }
            Callback::DeclineUser(target) => {
                self.decide(session, event, target, AccessDecision::Decline)
                    .await
            }
            Callback::Task(action, task_id) => {
                self.task_action(session, event, action, task_id).await
            }
        }
    }

    async fn send(&self, chat_id: i64, message: OutboundMessage) -> DispatchResult<MessageRef> {
        Ok(self.gateway.send_message(chat_id, message).await?)
    }

    async fn send_text(&self, chat_id: i64, text: impl Into<String> + Send) -> DispatchResult<()> {
        self.send(chat_id, OutboundMessage::text(text)).await?;
        Ok(())
    }

    /// Moves the session to `node` and renders that node's keyboard.
    async fn show_menu(
        &self,
        session: &mut Session,
        chat_id: i64,
        node: MenuNode,
        text: impl Into<String> + Send,
    ) -> DispatchResult<()> {
        session.navigate(node);
        let rows = keyboard(node, session.is_admin());
        self.send(chat_id, OutboundMessage::menu(text, &rows))
            .await?;
        Ok(())
    }

    /// Edits the message that carried the event, or sends a new one.
    async fn replace_or_send(
        &self,
        context: ConversationContext,
        message: OutboundMessage,
    ) -> DispatchResult<()> {
        match context.message_id {
            Some(message_id) => {
                let target = MessageRef {
                    chat_id: context.chat_id,
                    message_id,
                };
                self.gateway.edit_message(target, message).await?;
            }
            None => {
                self.send(context.chat_id, message).await?;
            }
        }
        Ok(())
    }

    /// Best-effort message to another user; failures are only logged.
    async fn notify(&self, recipient: UserId, message: OutboundMessage) {
        if let Err(err) = self.gateway.send_message(recipient.value(), message).await {
            warn!(identity = %recipient, error = %err, "notification not delivered");
        }
    }
}
