//! Transition table of the menu tree.
//!
//! [`next`] is pure: it maps the current node, the caller's role, and the
//! input text to the next node and the handler the dispatcher must run.
//! Every pair maps somewhere; unknown input falls back to `Main`.

use super::menu::{Button, MenuNode};
use crate::task::domain::{Relationship, TaskStatus};
use crate::user::domain::{ModerationKind, UserListing};

/// Inputs to the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavContext {
    /// Current node.
    pub node: MenuNode,
    /// Whether the caller holds admin rights.
    pub is_admin: bool,
    /// Whether a slider is positioned on the current node.
    pub slider_active: bool,
}

/// Direction or action applied to the item under a slider cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderStep {
    /// Move to the next item.
    Next,
    /// Move to the previous item.
    Previous,
    /// Act on the current item, then move on.
    Act,
}

/// Side-effecting work attached to a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Render the keyboard of the target node.
    ShowMenu,
    /// Print a Users→View listing.
    ListUsers(UserListing),
    /// Query a moderation queue and position the cursor on its first item.
    OpenModeration(ModerationKind),
    /// Move through or act on the moderation queue.
    Moderate(ModerationKind, SliderStep),
    /// Query a task folder and show its first task.
    OpenTaskList(Relationship, TaskStatus),
    /// Move through the task slider.
    BrowseTasks(SliderStep),
    /// Start the new-task wizard.
    StartWizard,
    /// Feed input to the running wizard.
    Wizard(String),
    /// Store a comment on the focused task.
    SubmitComment(String),
}

/// Outcome of the transition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Node to move to once the handler succeeds.
    pub node: MenuNode,
    /// Work to run.
    pub handler: Handler,
}

impl Transition {
    const fn show(node: MenuNode) -> Self {
        Self {
            node,
            handler: Handler::ShowMenu,
        }
    }

    const fn main() -> Self {
        Self::show(MenuNode::Main)
    }
}

/// Computes the next node and handler for `input`.
#[must_use]
pub fn next(ctx: NavContext, input: &str) -> Transition {
    if ctx.node.requires_admin() && !ctx.is_admin {
        return Transition::main();
    }

    match ctx.node {
        MenuNode::NewTask => {
            return Transition {
                node: MenuNode::NewTask,
                handler: Handler::Wizard(input.to_owned()),
            };
        }
        MenuNode::Comment => return comment(input),
        _ => {}
    }

    let Some(button) = Button::parse(input) else {
        return Transition::main();
    };

    match button {
        Button::Main | Button::Cancel => return Transition::main(),
        Button::Back => return Transition::show(ctx.node.parent()),
        _ => {}
    }

    let transition = match ctx.node {
        MenuNode::Main => from_main(button),
        MenuNode::Users => from_users(button),
        MenuNode::UsersView => button.listing().map(|listing| Transition {
            node: MenuNode::UsersView,
            handler: Handler::ListUsers(listing),
        }),
        MenuNode::UsersEdit => button.moderation().map(|kind| Transition {
            node: MenuNode::Moderation(kind),
            handler: Handler::OpenModeration(kind),
        }),
        MenuNode::Moderation(kind) => from_moderation(kind, button, ctx.slider_active),
        MenuNode::Folder(relationship) => button.status().map(|status| Transition {
            node: MenuNode::FolderList(relationship, status),
            handler: Handler::OpenTaskList(relationship, status),
        }),
        MenuNode::FolderList(relationship, status) => {
            from_folder_list(relationship, status, button, ctx.slider_active)
        }
        MenuNode::NewTask | MenuNode::Comment => None,
    };

    let target = transition.unwrap_or_else(Transition::main);
    if target.node.requires_admin() && !ctx.is_admin {
        return Transition::main();
    }
    target
}

fn comment(input: &str) -> Transition {
    match Button::parse(input) {
        Some(Button::Cancel | Button::Back | Button::Main) => Transition::main(),
        _ => Transition {
            node: MenuNode::Main,
            handler: Handler::SubmitComment(input.to_owned()),
        },
    }
}

fn from_main(button: Button) -> Option<Transition> {
    match button {
        Button::Inbox => Some(Transition::show(MenuNode::Folder(Relationship::Inbox))),
        Button::Sent => Some(Transition::show(MenuNode::Folder(Relationship::Sent))),
        Button::Users => Some(Transition::show(MenuNode::Users)),
        Button::New => Some(Transition {
            node: MenuNode::NewTask,
            handler: Handler::StartWizard,
        }),
        _ => None,
    }
}

fn from_users(button: Button) -> Option<Transition> {
    match button {
        Button::View => Some(Transition::show(MenuNode::UsersView)),
        Button::Edit => Some(Transition::show(MenuNode::UsersEdit)),
        _ => None,
    }
}

fn from_moderation(
    kind: ModerationKind,
    button: Button,
    slider_active: bool,
) -> Option<Transition> {
    let node = MenuNode::Moderation(kind);
    let handler = match (button, slider_active) {
        (Button::Next, true) => Handler::Moderate(kind, SliderStep::Next),
        (Button::Previous, true) => Handler::Moderate(kind, SliderStep::Previous),
        (pressed, true) if pressed.moderation() == Some(kind) => {
            Handler::Moderate(kind, SliderStep::Act)
        }
        (pressed, false) if pressed.moderation() == Some(kind) => Handler::OpenModeration(kind),
        _ => return None,
    };
    Some(Transition { node, handler })
}

fn from_folder_list(
    relationship: Relationship,
    status: TaskStatus,
    button: Button,
    slider_active: bool,
) -> Option<Transition> {
    let node = MenuNode::FolderList(relationship, status);
    let handler = match (button, slider_active) {
        (Button::Next, true) => Handler::BrowseTasks(SliderStep::Next),
        (Button::Previous, true) => Handler::BrowseTasks(SliderStep::Previous),
        (pressed, _) => {
            let reopened = pressed.status()?;
            return Some(Transition {
                node: MenuNode::FolderList(relationship, reopened),
                handler: Handler::OpenTaskList(relationship, reopened),
            });
        }
    };
    Some(Transition { node, handler })
}
