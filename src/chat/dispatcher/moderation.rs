//! Users→Edit moderation queues browsed with a slider.

use super::{DispatchResult, Dispatcher, During};
use crate::chat::ports::{OutboundMessage, RenderGateway};
use crate::chat::templates::{self, timestamp};
use crate::session::menu::keyboard;
use crate::session::{ActiveSlider, MenuNode, Session, SlideOutcome, Slider, SliderEdge, SliderStep};
use crate::task::ports::TaskRepository;
use crate::user::domain::{ModerationKind, User, UserStatus};
use crate::user::ports::UserRepository;
use crate::user::services::ModerationOutcome;
use mockable::Clock;

const fn verb(kind: ModerationKind) -> &'static str {
    match kind {
        ModerationKind::Approve => "approve",
        ModerationKind::Ban => "ban",
        ModerationKind::Unban => "unban",
    }
}

const fn queue_activity(kind: ModerationKind) -> &'static str {
    match kind {
        ModerationKind::Approve => "taking approving list",
        ModerationKind::Ban => "taking users list",
        ModerationKind::Unban => "taking ban list",
    }
}

const fn action_activity(kind: ModerationKind) -> &'static str {
    match kind {
        ModerationKind::Approve => "approving user",
        ModerationKind::Ban => "banning user",
        ModerationKind::Unban => "unbanning user",
    }
}

pub(super) const fn edge_word(edge: SliderEdge) -> &'static str {
    match edge {
        SliderEdge::First => "first",
        SliderEdge::Last => "last",
    }
}

impl<U, T, G, C> Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Captures a fresh queue snapshot and shows its first user.
    pub(super) async fn open_moderation(
        &self,
        session: &mut Session,
        chat_id: i64,
        kind: ModerationKind,
    ) -> DispatchResult<()> {
        let queue = self
            .access
            .moderation_queue(kind, session.identity())
            .await
            .during(queue_activity(kind))?;
        if queue.is_empty() {
            let text = format!("I have no users to {} for now", verb(kind));
            return self
                .show_menu(session, chat_id, MenuNode::UsersEdit, text)
                .await;
        }
        let mut slider = Slider::new(queue);
        slider.advance();
        session.open_slider(ActiveSlider::Users { kind, slider });
        self.render_moderation_card(session, chat_id).await
    }

    /// Moves through the queue, or acts on the user under the cursor and
    /// then moves on.
    pub(super) async fn moderate(
        &self,
        session: &mut Session,
        chat_id: i64,
        kind: ModerationKind,
        step: SliderStep,
    ) -> DispatchResult<()> {
        let target = match session.slider() {
            Some(ActiveSlider::Users {
                kind: active,
                slider,
            }) if *active == kind => slider.current().map(User::id),
            _ => None,
        };
        let Some(target_id) = target else {
            return self.open_moderation(session, chat_id, kind).await;
        };

        if step == SliderStep::Act {
            let Some(moderator) = session.user().cloned() else {
                return self
                    .show_menu(session, chat_id, MenuNode::Main, MenuNode::Main.to_string())
                    .await;
            };
            let outcome = self
                .access
                .moderate(&moderator, target_id, kind)
                .await
                .during(action_activity(kind))?;
            self.announce_moderation(chat_id, &moderator, &outcome, kind)
                .await?;
        }

        let moved = match session.slider_mut() {
            Some(ActiveSlider::Users { slider, .. }) => Some(match step {
                SliderStep::Previous => slider.retreat(),
                SliderStep::Next | SliderStep::Act => slider.advance(),
            }),
            _ => None,
        };
        match moved {
            Some(SlideOutcome::Moved(_)) => self.render_moderation_card(session, chat_id).await,
            Some(SlideOutcome::Exhausted(edge)) => {
                session.close_slider();
                let text = format!("No more users to {}. It was {} one", verb(kind), edge_word(edge));
                self.show_menu(session, chat_id, MenuNode::UsersEdit, text)
                    .await
            }
            None => Ok(()),
        }
    }

    async fn render_moderation_card(&self, session: &Session, chat_id: i64) -> DispatchResult<()> {
        let Some(ActiveSlider::Users { slider, .. }) = session.slider() else {
            return Ok(());
        };
        let Some(user) = slider.current() else {
            return Ok(());
        };
        let text = templates::moderation_card(user, slider.cursor(), slider.len())?;
        let rows = keyboard(session.node(), session.is_admin());
        self.send(chat_id, OutboundMessage::menu(text, &rows)).await?;
        Ok(())
    }

    async fn announce_moderation(
        &self,
        chat_id: i64,
        moderator: &User,
        outcome: &ModerationOutcome,
        kind: ModerationKind,
    ) -> DispatchResult<()> {
        let at = timestamp(outcome.user.changed_at());
        let name = outcome.user.name();
        let by = moderator.name();
        let (to_user, to_moderator) = match (kind, outcome.previous_status) {
            (ModerationKind::Ban, UserStatus::Requested) => (
                format!("Unfortunately your request has been declined by {by} at {at}. Try to text to admin"),
                format!("Request of {name} has been declined"),
            ),
            (ModerationKind::Ban, _) => (
                format!("Your account has been banned by {by} at {at}"),
                format!("Account {name} has been banned"),
            ),
            (ModerationKind::Approve, _) => (
                format!("Your account has been approved by {by} at {at}"),
                format!("Account {name} has been approved"),
            ),
            (ModerationKind::Unban, _) => (
                format!("Your account has been restored by {by} at {at}"),
                format!("Account {name} has been unbanned"),
            ),
        };
        self.notify(outcome.user.id(), OutboundMessage::text(to_user))
            .await;
        self.send_text(chat_id, to_moderator).await
    }
}
