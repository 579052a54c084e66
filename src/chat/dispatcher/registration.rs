//! First contact, access requests, and admin decisions on them.

use super::{DispatchResult, Dispatcher, During};
use crate::chat::event::{Callback, InboundEvent};
use crate::chat::ports::{ActionButton, OutboundMessage, RenderGateway};
use crate::chat::templates::{self, timestamp};
use crate::session::{MenuNode, Session};
use crate::task::ports::TaskRepository;
use crate::user::domain::{AccessDecision, UserId};
use crate::user::ports::UserRepository;
use crate::user::services::{AccessRequestOutcome, DecisionOutcome};
use mockable::Clock;
use tracing::warn;

impl<U, T, G, C> Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Offers registration to an identity seen for the first time.
    pub(super) async fn greet(&self, event: &InboundEvent) -> DispatchResult<()> {
        let text = format!(
            "Hello, {}. I can see you are new one here.\nWould you like to send request to approve your account?",
            event.sender
        );
        let actions = vec![
            ActionButton::new("✓ Yes", Callback::RequestAccess.encode()),
            ActionButton::new("🚫 No", Callback::CancelRequest.encode()),
        ];
        self.gateway
            .send_message_with_actions(event.context.chat_id, text, actions)
            .await?;
        Ok(())
    }

    pub(super) async fn request_access(
        &self,
        session: &mut Session,
        event: &InboundEvent,
    ) -> DispatchResult<()> {
        let outcome = self
            .access
            .request_access(event.identity, event.sender.clone())
            .await
            .during("sending your request")?;
        match outcome {
            AccessRequestOutcome::AlreadyRequested(user) => {
                session.set_user(Some(user));
                self.send_text(event.context.chat_id, "You have already made request")
                    .await
            }
            AccessRequestOutcome::Created(user) => {
                let text = templates::access_request(&user)?;
                let admins = self.access.admins().await.unwrap_or_else(|err| {
                    warn!(identity = %user.id(), error = %err, "admins not notified of request");
                    Vec::new()
                });
                for admin in &admins {
                    let actions = vec![
                        ActionButton::new("Accept", Callback::AcceptUser(user.id()).encode()),
                        ActionButton::new("Decline", Callback::DeclineUser(user.id()).encode()),
                    ];
                    self.notify(admin.id(), OutboundMessage::with_actions(text.clone(), actions))
                        .await;
                }
                session.set_user(Some(user));
                self.replace_or_send(
                    event.context,
                    OutboundMessage::text(
                        "Your request has been sent.\nKeep calm and wait for approval message!",
                    ),
                )
                .await
            }
        }
    }

    pub(super) async fn cancel_request(&self, event: &InboundEvent) -> DispatchResult<()> {
        let text = format!("Dear, {}. See you next time\nBye!", event.sender);
        self.replace_or_send(event.context, OutboundMessage::text(text))
            .await
    }

    /// Applies an admin's Accept or Decline on a pending request.
    pub(super) async fn decide(
        &self,
        session: &mut Session,
        event: &InboundEvent,
        target: UserId,
        decision: AccessDecision,
    ) -> DispatchResult<()> {
        let chat_id = event.context.chat_id;
        let Some(admin) = session.user().filter(|user| user.is_admin()).cloned() else {
            return self
                .show_menu(session, chat_id, MenuNode::Main, MenuNode::Main.to_string())
                .await;
        };
        let activity = match decision {
            AccessDecision::Accept => "approving user",
            AccessDecision::Decline => "declining user",
        };
        let outcome = self
            .access
            .decide_request(&admin, target, decision)
            .await
            .during(activity)?;
        match outcome {
            DecisionOutcome::AlreadyDecided(user) => {
                let text = format!(
                    "{} is already {} since {}",
                    user.name(),
                    user.status().label().to_lowercase(),
                    timestamp(user.changed_at())
                );
                self.replace_or_send(event.context, OutboundMessage::text(text))
                    .await
            }
            DecisionOutcome::Applied(user) => {
                let at = timestamp(user.changed_at());
                let (to_user, to_admin) = match decision {
                    AccessDecision::Accept => (
                        format!("Your account has been approved by {} at {at}", admin.name()),
                        format!("Account {} has been approved", user.name()),
                    ),
                    AccessDecision::Decline => (
                        format!(
                            "Unfortunately your request has been declined by {} at {at}. Try to text to admin",
                            admin.name()
                        ),
                        format!("Request of {} has been declined", user.name()),
                    ),
                };
                self.notify(user.id(), OutboundMessage::text(to_user)).await;
                self.replace_or_send(event.context, OutboundMessage::text(to_admin))
                    .await
            }
        }
    }
}
