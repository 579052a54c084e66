//! The four-step new-task wizard.

use super::menu::Button;
use crate::user::domain::{DisplayName, User, UserId};

/// A user offered on the assignee keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// 1-based position on the keyboard.
    pub index: usize,
    /// Identity of the candidate.
    pub user_id: UserId,
    /// Display name of the candidate.
    pub name: DisplayName,
}

impl Candidate {
    /// Returns the keyboard label, `"{index} | {first} {last}"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} | {}", self.index, self.name)
    }
}

/// Builds the numbered candidate roster from approved users.
#[must_use]
pub fn roster(users: &[User]) -> Vec<Candidate> {
    users
        .iter()
        .enumerate()
        .map(|(offset, user)| Candidate {
            index: offset + 1,
            user_id: user.id(),
            name: user.name().clone(),
        })
        .collect()
}

/// Values collected by a completed wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSubmission {
    /// Chosen assignee.
    pub assignee: UserId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
}

/// Wizard progress. Each step carries only the values collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WizardState {
    /// No wizard is running.
    #[default]
    NotStarted,
    /// Waiting for the assignee.
    SelectingUser {
        /// Users offered as assignees.
        roster: Vec<Candidate>,
    },
    /// Waiting for the title.
    EnteringTitle {
        /// Users offered as assignees.
        roster: Vec<Candidate>,
        /// Chosen assignee.
        assignee: Candidate,
    },
    /// Waiting for the description.
    EnteringDescription {
        /// Users offered as assignees.
        roster: Vec<Candidate>,
        /// Chosen assignee.
        assignee: Candidate,
        /// Entered title.
        title: String,
    },
    /// Waiting for `Save`.
    Confirming {
        /// Users offered as assignees.
        roster: Vec<Candidate>,
        /// Chosen assignee.
        assignee: Candidate,
        /// Entered title.
        title: String,
        /// Entered description.
        description: String,
    },
}

/// What the dispatcher should do after feeding input to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardReply {
    /// Render the prompt of the current step.
    Prompt,
    /// The input did not fit the step; nothing changed.
    Ignored,
    /// The wizard was aborted.
    Cancelled,
    /// `Back` on the first step left the wizard.
    Exited,
    /// `Save` was pressed; persist the submission.
    Submit(WizardSubmission),
}

impl WizardState {
    /// Starts a wizard on the assignee step.
    #[must_use]
    pub const fn start(roster: Vec<Candidate>) -> Self {
        Self::SelectingUser { roster }
    }

    /// Returns `true` while a wizard is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    /// Feeds one text input to the wizard.
    #[must_use]
    pub fn handle(self, input: &str) -> (Self, WizardReply) {
        match Button::parse(input) {
            Some(Button::Cancel) => (Self::NotStarted, WizardReply::Cancelled),
            Some(Button::Back) => self.back(),
            _ => self.accept(input.trim()),
        }
    }

    fn back(self) -> (Self, WizardReply) {
        match self {
            Self::NotStarted | Self::SelectingUser { .. } => (Self::NotStarted, WizardReply::Exited),
            Self::EnteringTitle { roster, .. } => (Self::SelectingUser { roster }, WizardReply::Prompt),
            Self::EnteringDescription {
                roster, assignee, ..
            } => (Self::EnteringTitle { roster, assignee }, WizardReply::Prompt),
            Self::Confirming {
                roster,
                assignee,
                title,
                ..
            } => (
                Self::EnteringDescription {
                    roster,
                    assignee,
                    title,
                },
                WizardReply::Prompt,
            ),
        }
    }

    fn accept(self, input: &str) -> (Self, WizardReply) {
        match self {
            Self::NotStarted => (Self::NotStarted, WizardReply::Ignored),
            Self::SelectingUser { roster } => match pick(&roster, input) {
                Some(assignee) => (Self::EnteringTitle { roster, assignee }, WizardReply::Prompt),
                None => (Self::SelectingUser { roster }, WizardReply::Ignored),
            },
            Self::EnteringTitle { roster, assignee } if input.is_empty() => {
                (Self::EnteringTitle { roster, assignee }, WizardReply::Ignored)
            }
            Self::EnteringTitle { roster, assignee } => (
                Self::EnteringDescription {
                    roster,
                    assignee,
                    title: input.to_owned(),
                },
                WizardReply::Prompt,
            ),
            Self::EnteringDescription {
                roster,
                assignee,
                title,
            } => (
                Self::Confirming {
                    roster,
                    assignee,
                    title,
                    description: input.to_owned(),
                },
                WizardReply::Prompt,
            ),
            Self::Confirming {
                assignee,
                title,
                description,
                ..
            } if Button::parse(input) == Some(Button::Save) => (
                Self::NotStarted,
                WizardReply::Submit(WizardSubmission {
                    assignee: assignee.user_id,
                    title,
                    description,
                }),
            ),
            confirming @ Self::Confirming { .. } => (confirming, WizardReply::Ignored),
        }
    }
}

/// Matches `"3"`, `"3 | Ada Lovelace"`, or the bare display name.
fn pick(roster: &[Candidate], input: &str) -> Option<Candidate> {
    let index = input
        .split('|')
        .next()
        .and_then(|head| head.trim().parse::<usize>().ok());
    roster
        .iter()
        .find(|candidate| {
            index.map_or_else(
                || candidate.name.to_string() == input,
                |wanted| candidate.index == wanted,
            )
        })
        .cloned()
}
