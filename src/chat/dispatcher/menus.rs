//! Text input routed through the menu navigator.

use super::{DispatchResult, Dispatcher, During};
use crate::chat::event::InboundEvent;
use crate::chat::ports::{OutboundMessage, RenderGateway};
use crate::chat::templates;
use crate::session::menu::keyboard;
use crate::session::navigator::{self, Handler, NavContext, Transition};
use crate::session::{MenuNode, Session};
use crate::task::ports::TaskRepository;
use crate::user::domain::UserListing;
use crate::user::ports::UserRepository;
use mockable::Clock;
use tracing::debug;

impl<U, T, G, C> Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) async fn navigate(
        &self,
        session: &mut Session,
        event: &InboundEvent,
    ) -> DispatchResult<()> {
        let ctx = NavContext {
            node: session.node(),
            is_admin: session.is_admin(),
            slider_active: session.slider_drives_node(),
        };
        let Transition { node, handler } = navigator::next(ctx, &event.payload);
        debug!(identity = %event.identity, from = %ctx.node, to = %node, "menu transition");

        let chat_id = event.context.chat_id;
        match handler {
            Handler::ShowMenu => self.show_menu(session, chat_id, node, node.to_string()).await,
            Handler::ListUsers(listing) => self.list_users(session, chat_id, listing).await,
            Handler::OpenModeration(kind) => self.open_moderation(session, chat_id, kind).await,
            Handler::Moderate(kind, step) => self.moderate(session, chat_id, kind, step).await,
            Handler::OpenTaskList(relationship, status) => {
                self.open_task_list(session, chat_id, relationship, status)
                    .await
            }
            Handler::BrowseTasks(step) => self.browse_tasks(session, chat_id, step).await,
            Handler::StartWizard => self.start_wizard(session, chat_id).await,
            Handler::Wizard(input) => self.feed_wizard(session, chat_id, &input).await,
            Handler::SubmitComment(text) => self.submit_comment(session, chat_id, &text).await,
        }
    }

    async fn list_users(
        &self,
        session: &mut Session,
        chat_id: i64,
        listing: UserListing,
    ) -> DispatchResult<()> {
        let users = self
            .access
            .list(listing)
            .await
            .during("taking users list")?;
        let label = listing.status().label().to_lowercase();
        let text = templates::user_listing(&label, &users)?;
        session.navigate(MenuNode::UsersView);
        let rows = keyboard(MenuNode::UsersView, session.is_admin());
        self.send(chat_id, OutboundMessage::menu(text, &rows)).await?;
        Ok(())
    }
}
