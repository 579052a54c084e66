//! Task cards, folder sliders, status changes, comments, and history.

use super::moderation::edge_word;
use super::{DispatchError, DispatchResult, Dispatcher, During};
use crate::chat::event::{Callback, ChatCommand, ConversationContext, InboundEvent};
use crate::chat::ports::{ActionButton, MessageRef, OutboundMessage, RenderGateway};
use crate::chat::templates;
use crate::session::menu::{Button, keyboard};
use crate::session::{ActiveSlider, MenuNode, Session, SlideOutcome, Slider, SliderStep};
use crate::task::domain::{HistoryEntry, Relationship, TaskAction, TaskId, TaskStatus};
use crate::task::ports::TaskRepository;
use crate::task::services::{TaskView, TaskWorkflowError};
use crate::user::domain::{DisplayName, UserId};
use crate::user::ports::UserRepository;
use mockable::Clock;
use std::collections::HashMap;
use tracing::warn;

/// Builds the card text of a task and the viewer's allowed actions.
pub(super) fn card(view: &TaskView) -> DispatchResult<(String, Vec<ActionButton>)> {
    let text = templates::task_card(&view.task)?;
    let id = view.task.id();
    let actions = view
        .actions
        .iter()
        .map(|action| ActionButton::new(action.label(), Callback::Task(*action, id).encode()))
        .collect();
    Ok((text, actions))
}

impl<U, T, G, C> Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) async fn command(
        &self,
        session: &mut Session,
        event: &InboundEvent,
    ) -> DispatchResult<()> {
        let chat_id = event.context.chat_id;
        match ChatCommand::parse(&event.payload) {
            ChatCommand::Start | ChatCommand::Unknown(_) => {
                self.show_menu(session, chat_id, MenuNode::Main, MenuNode::Main.to_string())
                    .await
            }
            ChatCommand::Task(argument) => {
                match self.task_argument(chat_id, "task", argument).await? {
                    Some(id) => self.show_task(session, chat_id, id).await,
                    None => Ok(()),
                }
            }
            ChatCommand::History(argument) => {
                match self.task_argument(chat_id, "history", argument).await? {
                    Some(id) => self.show_history(session, chat_id, id).await,
                    None => Ok(()),
                }
            }
        }
    }

    /// Parses a task number argument, replying to the user when it is
    /// missing or malformed.
    async fn task_argument(
        &self,
        chat_id: i64,
        command: &str,
        argument: Option<String>,
    ) -> DispatchResult<Option<TaskId>> {
        let Some(raw) = argument else {
            self.send_text(
                chat_id,
                format!("you should input task number after /{command} command"),
            )
            .await?;
            return Ok(None);
        };
        if let Ok(id) = TaskId::try_from(raw.as_str()) {
            Ok(Some(id))
        } else {
            self.send_text(chat_id, format!("{raw} - wrong argument type"))
                .await?;
            Ok(None)
        }
    }

    async fn show_task(&self, session: &mut Session, chat_id: i64, id: TaskId) -> DispatchResult<()> {
        let view = self
            .tasks
            .view(session.identity(), id)
            .await
            .during("selecting task info")?;
        self.send_card(session, chat_id, &view).await
    }

    async fn show_history(
        &self,
        session: &mut Session,
        chat_id: i64,
        id: TaskId,
    ) -> DispatchResult<()> {
        let view = self
            .tasks
            .view(session.identity(), id)
            .await
            .during("selecting task history")?;
        let entries = self
            .tasks
            .history(session.identity(), id)
            .await
            .during("selecting task history")?;
        let text = if entries.is_empty() {
            "There is no history for this task".to_owned()
        } else {
            let actors = self.actor_names(&entries).await;
            templates::history(&view.task, &entries, &actors)?
        };
        self.show_menu(session, chat_id, MenuNode::Main, text).await
    }

    /// Looks up the display names of everyone who touched the task.
    /// Failed lookups are logged and leave the actor unnamed.
    async fn actor_names(&self, entries: &[HistoryEntry]) -> HashMap<UserId, DisplayName> {
        let mut names = HashMap::new();
        for entry in entries {
            let actor = entry.changed_by;
            if names.contains_key(&actor) {
                continue;
            }
            match self.users.find_by_id(actor).await {
                Ok(Some(user)) => {
                    names.insert(actor, user.name().clone());
                }
                Ok(None) => {}
                Err(err) => warn!(identity = %actor, error = %err, "history actor lookup failed"),
            }
        }
        names
    }

    pub(super) async fn task_action(
        &self,
        session: &mut Session,
        event: &InboundEvent,
        action: TaskAction,
        id: TaskId,
    ) -> DispatchResult<()> {
        match action {
            TaskAction::History => self.show_history(session, event.context.chat_id, id).await,
            TaskAction::Comment => self.begin_comment(session, event, id).await,
            TaskAction::Start | TaskAction::Complete | TaskAction::Reject | TaskAction::Close => {
                self.change_status(session, event, action, id).await
            }
        }
    }

    async fn change_status(
        &self,
        session: &mut Session,
        event: &InboundEvent,
        action: TaskAction,
        id: TaskId,
    ) -> DispatchResult<()> {
        let chat_id = event.context.chat_id;
        match self.tasks.transition(session.identity(), id, action).await {
            Ok(view) => {
                self.edit_card(session, event.context, &view).await?;
                let text = format!(
                    "Status has been changed to {} for Task {id}",
                    view.task.status()
                );
                self.send_text(chat_id, text).await
            }
            Err(TaskWorkflowError::ActionNotAllowed {
                action: rejected,
                view,
            }) => {
                let target = rejected
                    .target_status()
                    .map_or_else(|| rejected.label(), TaskStatus::label);
                self.send_text(
                    chat_id,
                    format!("It isn't allowed to change the status to {target} for Task #{id}"),
                )
                .await?;
                self.edit_card(session, event.context, &view).await
            }
            Err(err) => Err(DispatchError::workflow("updating task status", err)),
        }
    }

    async fn begin_comment(
        &self,
        session: &mut Session,
        event: &InboundEvent,
        id: TaskId,
    ) -> DispatchResult<()> {
        let chat_id = event.context.chat_id;
        match self
            .tasks
            .authorize(session.identity(), id, TaskAction::Comment)
            .await
        {
            Ok(_) => {
                session.navigate(MenuNode::Comment);
                session.focus(Some(id));
                self.prompt_comment(chat_id, id).await
            }
            Err(TaskWorkflowError::ActionNotAllowed { view, .. }) => {
                self.send_text(chat_id, format!("It isn't allowed to comment Task #{id}"))
                    .await?;
                self.edit_card(session, event.context, &view).await
            }
            Err(err) => Err(DispatchError::workflow("checking current task status", err)),
        }
    }

    async fn prompt_comment(&self, chat_id: i64, id: TaskId) -> DispatchResult<()> {
        let rows = [vec![Button::Cancel.label()]];
        self.send(
            chat_id,
            OutboundMessage::menu(format!("Task #{id}\nEnter comment:"), &rows),
        )
        .await?;
        Ok(())
    }

    pub(super) async fn submit_comment(
        &self,
        session: &mut Session,
        chat_id: i64,
        text: &str,
    ) -> DispatchResult<()> {
        let Some(id) = session.focused_task() else {
            return self
                .show_menu(session, chat_id, MenuNode::Main, MenuNode::Main.to_string())
                .await;
        };
        if text.trim().is_empty() {
            return self.prompt_comment(chat_id, id).await;
        }
        let task = self
            .tasks
            .comment(session.identity(), id, text)
            .await
            .during("saving comment")?;
        let notice = format!("Comment has been saved for Task {}", task.id());
        self.show_menu(session, chat_id, MenuNode::Main, notice).await
    }

    /// Captures the folder snapshot and shows its first task.
    pub(super) async fn open_task_list(
        &self,
        session: &mut Session,
        chat_id: i64,
        relationship: Relationship,
        status: TaskStatus,
    ) -> DispatchResult<()> {
        let found = self
            .tasks
            .list(session.identity(), relationship, status)
            .await
            .during("selecting tasks")?;
        let status_word = status.label().to_lowercase();
        if found.is_empty() {
            let text = format!("I have no {status_word} tasks in {relationship}");
            return self
                .show_menu(session, chat_id, MenuNode::Folder(relationship), text)
                .await;
        }
        let header = format!("{relationship}: {} {status_word} task(s)", found.len());
        let mut slider = Slider::new(found);
        slider.advance();
        session.open_slider(ActiveSlider::Tasks {
            relationship,
            status,
            slider,
        });
        let rows = keyboard(session.node(), session.is_admin());
        self.send(chat_id, OutboundMessage::menu(header, &rows))
            .await?;
        self.render_task_slider(session, chat_id).await
    }

    pub(super) async fn browse_tasks(
        &self,
        session: &mut Session,
        chat_id: i64,
        step: SliderStep,
    ) -> DispatchResult<()> {
        let moved = match session.slider_mut() {
            Some(ActiveSlider::Tasks { status, slider, .. }) => Some((
                *status,
                match step {
                    SliderStep::Previous => slider.retreat(),
                    SliderStep::Next | SliderStep::Act => slider.advance(),
                },
            )),
            _ => None,
        };
        match moved {
            Some((_, SlideOutcome::Moved(_))) => self.render_task_slider(session, chat_id).await,
            Some((status, SlideOutcome::Exhausted(edge))) => {
                session.close_slider();
                let folder = session.node();
                let text = format!(
                    "No more {} tasks. It was {} one",
                    status.label().to_lowercase(),
                    edge_word(edge)
                );
                self.show_menu(session, chat_id, folder, text).await
            }
            None => {
                let parent = session.node().parent();
                self.show_menu(session, chat_id, parent, parent.to_string())
                    .await
            }
        }
    }

    async fn render_task_slider(&self, session: &mut Session, chat_id: i64) -> DispatchResult<()> {
        let current = match session.slider() {
            Some(ActiveSlider::Tasks { slider, .. }) => slider.current().cloned(),
            _ => None,
        };
        let Some(view) = current.and_then(|task| TaskView::of(task, session.identity())) else {
            return Ok(());
        };
        self.send_card(session, chat_id, &view).await
    }

    async fn send_card(&self, session: &mut Session, chat_id: i64, view: &TaskView) -> DispatchResult<()> {
        let (text, actions) = card(view)?;
        let sent = self
            .gateway
            .send_message_with_actions(chat_id, text, actions)
            .await?;
        session.focus(Some(view.task.id()));
        session.set_last_rendered(Some(sent));
        Ok(())
    }

    /// Re-renders a card in place: the message that carried the callback,
    /// else the last rendered message, else a new message.
    async fn edit_card(
        &self,
        session: &mut Session,
        context: ConversationContext,
        view: &TaskView,
    ) -> DispatchResult<()> {
        let target = context
            .message_id
            .map(|message_id| MessageRef {
                chat_id: context.chat_id,
                message_id,
            })
            .or_else(|| session.last_rendered());
        let Some(existing) = target else {
            return self.send_card(session, context.chat_id, view).await;
        };
        let (text, actions) = card(view)?;
        self.gateway
            .edit_message(existing, OutboundMessage::with_actions(text, actions))
            .await?;
        session.focus(Some(view.task.id()));
        session.set_last_rendered(Some(existing));
        Ok(())
    }
}
