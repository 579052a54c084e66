//! The new-task wizard as seen from the chat.

use super::tasks::card;
use super::{DispatchError, DispatchResult, Dispatcher, During};
use crate::chat::ports::{Markup, OutboundMessage, RenderGateway};
use crate::session::menu::Button;
use crate::session::wizard::roster;
use crate::session::{MenuNode, Session, WizardReply, WizardState, WizardSubmission};
use crate::task::domain::{Task, TaskDraft};
use crate::task::ports::TaskRepository;
use crate::task::services::TaskView;
use crate::user::domain::UserId;
use crate::user::ports::UserRepository;
use mockable::Clock;
use tracing::warn;

impl<U, T, G, C> Dispatcher<U, T, G, C>
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    G: RenderGateway + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub(super) async fn start_wizard(&self, session: &mut Session, chat_id: i64) -> DispatchResult<()> {
        let users = self
            .access
            .assignable_users()
            .await
            .during("selecting users. Can't start new task")?;
        session.start_wizard(WizardState::start(roster(&users)));
        self.prompt_wizard(session, chat_id).await
    }

    pub(super) async fn feed_wizard(
        &self,
        session: &mut Session,
        chat_id: i64,
        input: &str,
    ) -> DispatchResult<()> {
        let state = session.take_wizard();
        if !state.is_active() {
            return self
                .show_menu(session, chat_id, MenuNode::Main, MenuNode::Main.to_string())
                .await;
        }
        let previous = state.clone();
        let (next, reply) = state.handle(input);
        match reply {
            WizardReply::Prompt | WizardReply::Ignored => {
                session.restore_wizard(next);
                self.prompt_wizard(session, chat_id).await
            }
            WizardReply::Cancelled => {
                self.show_menu(session, chat_id, MenuNode::Main, "Task creation cancelled")
                    .await
            }
            WizardReply::Exited => {
                self.show_menu(session, chat_id, MenuNode::Main, MenuNode::Main.to_string())
                    .await
            }
            WizardReply::Submit(submission) => {
                match self.save_task(session.identity(), submission).await {
                    Ok(task) => {
                        let text = format!("Task #{} has been created", task.id());
                        self.show_menu(session, chat_id, MenuNode::Main, text).await
                    }
                    Err(err) => {
                        session.restore_wizard(previous);
                        Err(err)
                    }
                }
            }
        }
    }

    async fn save_task(&self, owner: UserId, submission: WizardSubmission) -> DispatchResult<Task> {
        let WizardSubmission {
            assignee,
            title,
            description,
        } = submission;
        let draft = TaskDraft::new(owner, assignee, title, description)
            .map_err(|err| DispatchError::workflow("saving task", err.into()))?;
        let task = self.tasks.create(draft).await.during("saving task")?;
        if assignee != owner {
            self.notify_assignee(&task).await;
        }
        Ok(task)
    }

    async fn notify_assignee(&self, task: &Task) {
        let Some(view) = TaskView::of(task.clone(), task.assignee()) else {
            return;
        };
        let (text, actions) = match card(&view) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(task_id = %task.id(), error = %err, "assignee card not rendered");
                return;
            }
        };
        let delivered = self
            .gateway
            .send_message_with_actions(
                task.assignee().value(),
                format!("You have a new task\n{text}"),
                actions,
            )
            .await;
        if let Err(err) = delivered {
            warn!(identity = %task.assignee(), error = %err, "notification not delivered");
        }
    }

    async fn prompt_wizard(&self, session: &Session, chat_id: i64) -> DispatchResult<()> {
        let (text, mut rows): (String, Vec<Vec<String>>) = match session.wizard() {
            WizardState::NotStarted => return Ok(()),
            WizardState::SelectingUser { roster } => (
                "Select user to assign the task".to_owned(),
                roster.iter().map(|candidate| vec![candidate.label()]).collect(),
            ),
            WizardState::EnteringTitle { assignee, .. } => (
                format!("Assignee: {}\nEnter task title", assignee.name),
                Vec::new(),
            ),
            WizardState::EnteringDescription {
                assignee, title, ..
            } => (
                format!(
                    "Assignee: {}\nTitle: {title}\nEnter task description",
                    assignee.name
                ),
                Vec::new(),
            ),
            WizardState::Confirming {
                assignee,
                title,
                description,
                ..
            } => (
                format!(
                    "Assignee: {}\nTitle: {title}\nDescription: {description}\nSave the task?",
                    assignee.name
                ),
                vec![vec![Button::Save.label().to_owned()]],
            ),
        };
        rows.push(vec![
            Button::Back.label().to_owned(),
            Button::Cancel.label().to_owned(),
        ]);
        let message = OutboundMessage {
            text,
            markup: Markup::Menu(rows),
        };
        self.send(chat_id, message).await?;
        Ok(())
    }
}
