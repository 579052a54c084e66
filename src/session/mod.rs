//! Per-identity conversational session engine.
//!
//! A [`Session`] tracks where in the menu tree a user is, an optional
//! running [`WizardState`], and an optional [`ActiveSlider`]. The
//! [`navigator`] decides transitions, the [`SessionStore`] hands out one
//! serialized session per identity.

pub mod menu;
pub mod navigator;
pub mod slider;
pub mod state;
pub mod store;
pub mod wizard;

pub use menu::{Button, MenuNode};
pub use navigator::{Handler, NavContext, SliderStep, Transition};
pub use slider::{SlideOutcome, Slider, SliderEdge};
pub use state::{ActiveSlider, Session};
pub use store::SessionStore;
pub use wizard::{Candidate, WizardReply, WizardState, WizardSubmission};

#[cfg(test)]
mod tests;
