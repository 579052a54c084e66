//! Menu nodes and the button vocabulary of the conversation tree.

use crate::task::domain::{Relationship, TaskStatus};
use crate::user::domain::{ModerationKind, UserListing};
use std::fmt;

/// Position of a session in the conversation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuNode {
    /// Root menu.
    #[default]
    Main,
    /// Admin user management.
    Users,
    /// Read-only user listings.
    UsersView,
    /// Moderation entry points.
    UsersEdit,
    /// A moderation queue browsed with a slider.
    Moderation(ModerationKind),
    /// Inbox or Sent folder, choosing a status.
    Folder(Relationship),
    /// Tasks of one folder and status browsed with a slider.
    FolderList(Relationship, TaskStatus),
    /// The new-task wizard is active.
    NewTask,
    /// Waiting for comment text for the focused task.
    Comment,
}

impl MenuNode {
    /// Returns the node `Back` leads to.
    #[must_use]
    pub const fn parent(self) -> Self {
        match self {
            Self::Main | Self::Users | Self::Folder(_) | Self::NewTask | Self::Comment => {
                Self::Main
            }
            Self::UsersView | Self::UsersEdit => Self::Users,
            Self::Moderation(_) => Self::UsersEdit,
            Self::FolderList(relationship, _) => Self::Folder(relationship),
        }
    }

    /// Returns `true` for nodes reserved to admins.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(
            self,
            Self::Users | Self::UsersView | Self::UsersEdit | Self::Moderation(_)
        )
    }

    /// Returns `true` for nodes driven by a pagination slider.
    #[must_use]
    pub const fn is_slider_node(self) -> bool {
        matches!(self, Self::Moderation(_) | Self::FolderList(..))
    }
}

impl fmt::Display for MenuNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("Main"),
            Self::Users => f.write_str("Users"),
            Self::UsersView => f.write_str("Users/View"),
            Self::UsersEdit => f.write_str("Users/Edit"),
            Self::Moderation(kind) => write!(f, "Users/Edit/{}", kind.label()),
            Self::Folder(relationship) => write!(f, "{relationship}"),
            Self::FolderList(relationship, status) => write!(f, "{relationship}/{status}"),
            Self::NewTask => f.write_str("New"),
            Self::Comment => f.write_str("Comment"),
        }
    }
}

/// Reply-keyboard buttons understood by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Return to the root menu.
    Main,
    /// Open user management.
    Users,
    /// Go to the parent node.
    Back,
    /// Open user listings.
    View,
    /// List approved users.
    All,
    /// List pending requests.
    Requests,
    /// List banned users.
    Banned,
    /// Open moderation.
    Edit,
    /// Approve queue or action.
    Approve,
    /// Ban queue or action.
    Ban,
    /// Unban queue or action.
    Unban,
    /// Previous slider item.
    Previous,
    /// Next slider item.
    Next,
    /// Open the inbox folder.
    Inbox,
    /// Open the sent folder.
    Sent,
    /// New task from Main, `New` status inside a folder.
    New,
    /// Save the wizard.
    Save,
    /// Abort to Main.
    Cancel,
    /// `Started` status.
    Started,
    /// `Rejected` status.
    Rejected,
    /// `Completed` status.
    Completed,
    /// `Closed` status.
    Closed,
}

impl Button {
    /// Parses an exact button label.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let button = match text.trim() {
            "Main" => Self::Main,
            "Users" => Self::Users,
            "Back" => Self::Back,
            "View" => Self::View,
            "All" => Self::All,
            "Requests" => Self::Requests,
            "Banned" => Self::Banned,
            "Edit" => Self::Edit,
            "Approve" => Self::Approve,
            "Ban" => Self::Ban,
            "Unban" => Self::Unban,
            "Previous" => Self::Previous,
            "Next" => Self::Next,
            "Inbox" => Self::Inbox,
            "Sent" => Self::Sent,
            "New" => Self::New,
            "Save" => Self::Save,
            "Cancel" => Self::Cancel,
            "Started" => Self::Started,
            "Rejected" => Self::Rejected,
            "Completed" => Self::Completed,
            "Closed" => Self::Closed,
            _ => return None,
        };
        Some(button)
    }

    /// Returns the label shown on the keyboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::Users => "Users",
            Self::Back => "Back",
            Self::View => "View",
            Self::All => "All",
            Self::Requests => "Requests",
            Self::Banned => "Banned",
            Self::Edit => "Edit",
            Self::Approve => "Approve",
            Self::Ban => "Ban",
            Self::Unban => "Unban",
            Self::Previous => "Previous",
            Self::Next => "Next",
            Self::Inbox => "Inbox",
            Self::Sent => "Sent",
            Self::New => "New",
            Self::Save => "Save",
            Self::Cancel => "Cancel",
            Self::Started => "Started",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
            Self::Closed => "Closed",
        }
    }

    /// Interprets the button as a task status filter.
    #[must_use]
    pub const fn status(self) -> Option<TaskStatus> {
        match self {
            Self::New => Some(TaskStatus::New),
            Self::Started => Some(TaskStatus::Started),
            Self::Rejected => Some(TaskStatus::Rejected),
            Self::Completed => Some(TaskStatus::Completed),
            Self::Closed => Some(TaskStatus::Closed),
            _ => None,
        }
    }

    /// Interprets the button as a moderation queue.
    #[must_use]
    pub const fn moderation(self) -> Option<ModerationKind> {
        match self {
            Self::Approve => Some(ModerationKind::Approve),
            Self::Ban => Some(ModerationKind::Ban),
            Self::Unban => Some(ModerationKind::Unban),
            _ => None,
        }
    }

    /// Interprets the button as a read-only user listing.
    #[must_use]
    pub const fn listing(self) -> Option<UserListing> {
        match self {
            Self::All => Some(UserListing::All),
            Self::Requests => Some(UserListing::Requests),
            Self::Banned => Some(UserListing::Banned),
            _ => None,
        }
    }

    /// Returns the button for a task status.
    #[must_use]
    pub const fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::New => Self::New,
            TaskStatus::Started => Self::Started,
            TaskStatus::Rejected => Self::Rejected,
            TaskStatus::Completed => Self::Completed,
            TaskStatus::Closed => Self::Closed,
        }
    }

    /// Returns the button for a moderation queue.
    #[must_use]
    pub const fn for_moderation(kind: ModerationKind) -> Self {
        match kind {
            ModerationKind::Approve => Self::Approve,
            ModerationKind::Ban => Self::Ban,
            ModerationKind::Unban => Self::Unban,
        }
    }
}

/// Keyboard layout for a node, as rows of button labels.
#[must_use]
pub fn keyboard(node: MenuNode, is_admin: bool) -> Vec<Vec<&'static str>> {
    let labels = |buttons: &[Button]| -> Vec<&'static str> {
        buttons.iter().map(|button| button.label()).collect()
    };
    match node {
        MenuNode::Main | MenuNode::Comment | MenuNode::NewTask => {
            let mut rows = vec![labels(&[Button::Inbox, Button::Sent, Button::New])];
            if is_admin {
                rows.push(labels(&[Button::Users]));
            }
            rows
        }
        MenuNode::Users => vec![labels(&[Button::View, Button::Edit]), labels(&[Button::Back])],
        MenuNode::UsersView => vec![
            labels(&[Button::All, Button::Requests, Button::Banned]),
            labels(&[Button::Back]),
        ],
        MenuNode::UsersEdit => vec![
            labels(&[Button::Approve, Button::Ban, Button::Unban]),
            labels(&[Button::Back]),
        ],
        MenuNode::Moderation(kind) => vec![
            labels(&[Button::Previous, Button::for_moderation(kind), Button::Next]),
            labels(&[Button::Back, Button::Cancel]),
        ],
        MenuNode::Folder(_) => vec![
            TaskStatus::ALL
                .iter()
                .map(|status| Button::for_status(*status).label())
                .collect(),
            labels(&[Button::Back]),
        ],
        MenuNode::FolderList(..) => vec![
            labels(&[Button::Previous, Button::Next]),
            labels(&[Button::Back, Button::Main]),
        ],
    }
}
