//! Per-identity conversational state.

use super::{menu::MenuNode, slider::Slider, wizard::WizardState};
use crate::chat::ports::MessageRef;
use crate::task::domain::{Relationship, Task, TaskId, TaskStatus};
use crate::user::domain::{ModerationKind, User, UserId};

/// The slider currently driving a session, with the listing it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSlider {
    /// A moderation queue.
    Users {
        /// Queue being browsed.
        kind: ModerationKind,
        /// Snapshot of the queue.
        slider: Slider<User>,
    },
    /// A task folder filtered by status.
    Tasks {
        /// Folder being browsed.
        relationship: Relationship,
        /// Status filter.
        status: TaskStatus,
        /// Snapshot of the matching tasks.
        slider: Slider<Task>,
    },
}

impl ActiveSlider {
    /// Returns the menu node this slider drives.
    #[must_use]
    pub const fn node(&self) -> MenuNode {
        match self {
            Self::Users { kind, .. } => MenuNode::Moderation(*kind),
            Self::Tasks {
                relationship,
                status,
                ..
            } => MenuNode::FolderList(*relationship, *status),
        }
    }
}

/// Conversational state of one identity.
///
/// A running wizard and an active slider exclude each other: starting one
/// discards the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: UserId,
    user: Option<User>,
    node: MenuNode,
    wizard: WizardState,
    slider: Option<ActiveSlider>,
    focused_task: Option<TaskId>,
    last_rendered: Option<MessageRef>,
}

impl Session {
    /// Creates a session at the root menu.
    #[must_use]
    pub const fn new(identity: UserId, user: Option<User>) -> Self {
        Self {
            identity,
            user,
            node: MenuNode::Main,
            wizard: WizardState::NotStarted,
            slider: None,
            focused_task: None,
            last_rendered: None,
        }
    }

    /// Returns the owning identity.
    #[must_use]
    pub const fn identity(&self) -> UserId {
        self.identity
    }

    /// Returns the resolved user snapshot.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Replaces the user snapshot.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Returns `true` when the snapshot carries admin rights.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Returns the current menu node.
    #[must_use]
    pub const fn node(&self) -> MenuNode {
        self.node
    }

    /// Returns the wizard state.
    #[must_use]
    pub const fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    /// Returns the active slider.
    #[must_use]
    pub const fn slider(&self) -> Option<&ActiveSlider> {
        self.slider.as_ref()
    }

    /// Returns the active slider for mutation.
    pub const fn slider_mut(&mut self) -> Option<&mut ActiveSlider> {
        self.slider.as_mut()
    }

    /// Returns `true` when a slider drives the current node.
    #[must_use]
    pub fn slider_drives_node(&self) -> bool {
        self.slider
            .as_ref()
            .is_some_and(|active| active.node() == self.node)
    }

    /// Returns the focused task.
    #[must_use]
    pub const fn focused_task(&self) -> Option<TaskId> {
        self.focused_task
    }

    /// Returns the last message rendered for this session.
    #[must_use]
    pub const fn last_rendered(&self) -> Option<MessageRef> {
        self.last_rendered
    }

    /// Moves to `node`, discarding a wizard or slider that does not belong
    /// to it.
    pub fn navigate(&mut self, node: MenuNode) {
        if node != MenuNode::NewTask {
            self.wizard = WizardState::NotStarted;
        }
        if self
            .slider
            .as_ref()
            .is_some_and(|active| active.node() != node)
        {
            self.slider = None;
        }
        self.node = node;
    }

    /// Installs a running wizard and moves to the `New` node.
    pub fn start_wizard(&mut self, wizard: WizardState) {
        self.slider = None;
        self.wizard = wizard;
        self.node = MenuNode::NewTask;
    }

    /// Takes the wizard out of the session for a consuming transition.
    pub fn take_wizard(&mut self) -> WizardState {
        std::mem::take(&mut self.wizard)
    }

    /// Puts a wizard back after a transition.
    pub fn restore_wizard(&mut self, wizard: WizardState) {
        self.wizard = wizard;
    }

    /// Installs a freshly captured slider and moves to its node.
    pub fn open_slider(&mut self, active: ActiveSlider) {
        self.wizard = WizardState::NotStarted;
        self.node = active.node();
        self.slider = Some(active);
    }

    /// Discards the slider and returns to the parent of its node.
    pub fn close_slider(&mut self) {
        if let Some(active) = self.slider.take() {
            self.node = active.node().parent();
        }
    }

    /// Focuses a task for rule checks and comments.
    pub fn focus(&mut self, task: Option<TaskId>) {
        self.focused_task = task;
    }

    /// Records the last rendered message.
    pub fn set_last_rendered(&mut self, message: Option<MessageRef>) {
        self.last_rendered = message;
    }
}
